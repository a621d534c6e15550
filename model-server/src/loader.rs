//! Model artifact discovery and decoding.
//!
//! The loader runs once at startup. It never fails the process: every problem
//! is recorded in [`LoadDiagnostics`] and the server starts without a model.
//!
//! # Artifact formats
//!
//! Files ending in one of [`MODEL_EXTENSIONS`] are decoded with the binary
//! model codec (`bincode`). Any other file is decoded as a JSON object.
//!
//! # Fallback discovery
//!
//! When the requested path does not exist, the first file in the same
//! directory carrying a model extension is used instead. "First" follows the
//! directory listing order, which differs between filesystems, so a directory
//! is expected to hold a single candidate.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serving_core::{ArtifactError, Classifier, ModelArtifact};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Extensions of binary model artifacts.
pub const MODEL_EXTENSIONS: [&str; 3] = ["bin", "model", "sav"];

/// Errors that can occur while loading an artifact
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Model file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode binary model artifact: {0}")]
    Binary(#[from] bincode::Error),

    #[error("failed to decode JSON model artifact: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] ArtifactError),
}

/// Encoding of an artifact, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Binary,
    Json,
}

impl ArtifactFormat {
    pub fn from_path(path: &Path) -> Self {
        if has_model_extension(path) {
            Self::Binary
        } else {
            Self::Json
        }
    }
}

fn has_model_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| MODEL_EXTENSIONS.contains(&ext))
}

/// Outcome of the startup load, as reported by `/model_info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadDiagnostics {
    pub model_loaded: bool,
    pub model_path_tried: Option<String>,
    pub last_load_error: Option<String>,
}

/// Model handle plus the diagnostics of the attempt that produced it.
pub struct LoadOutcome {
    pub model: Option<Arc<dyn Classifier>>,
    pub diagnostics: LoadDiagnostics,
}

/// Apply the fallback discovery rule to `requested`.
///
/// Returns `requested` unchanged when it exists or when no candidate is
/// found next to it.
pub fn resolve_model_path(requested: &Path) -> PathBuf {
    if requested.exists() {
        return requested.to_path_buf();
    }

    let dir = match requested.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "Cannot scan model directory");
            return requested.to_path_buf();
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file() && has_model_extension(&path) {
            info!(
                requested = %requested.display(),
                found = %path.display(),
                "Default model file missing, using discovered artifact"
            );
            return path;
        }
    }

    requested.to_path_buf()
}

/// Decode an artifact from disk using the format implied by its extension.
pub fn read_artifact(path: &Path) -> Result<ModelArtifact, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let artifact: ModelArtifact = match ArtifactFormat::from_path(path) {
        ArtifactFormat::Binary => bincode::deserialize_from(reader)?,
        ArtifactFormat::Json => serde_json::from_reader(reader)?,
    };
    Ok(artifact)
}

/// Encode an artifact to disk using the format implied by its extension.
pub fn write_artifact(path: &Path, artifact: &ModelArtifact) -> Result<(), LoadError> {
    let file = File::create(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    match ArtifactFormat::from_path(path) {
        ArtifactFormat::Binary => bincode::serialize_into(&mut writer, artifact)?,
        ArtifactFormat::Json => serde_json::to_writer_pretty(&mut writer, artifact)?,
    }
    writer.flush().map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve, decode and validate the model at `requested`.
pub fn load_model(requested: &Path) -> LoadOutcome {
    let path = resolve_model_path(requested);
    let path_tried = Some(path.display().to_string());

    let result = read_artifact(&path)
        .and_then(|artifact| artifact.into_classifier().map_err(LoadError::from));

    match result {
        Ok(model) => {
            info!(path = %path.display(), model = model.name(), "Loaded model");
            LoadOutcome {
                model: Some(Arc::from(model)),
                diagnostics: LoadDiagnostics {
                    model_loaded: true,
                    model_path_tried: path_tried,
                    last_load_error: None,
                },
            }
        }
        Err(e) => {
            if matches!(e, LoadError::NotFound(_)) {
                warn!(path = %path.display(), "Model file not found");
            } else {
                error!(path = %path.display(), error = %e, "Failed to load model");
            }
            LoadOutcome {
                model: None,
                diagnostics: LoadDiagnostics {
                    model_loaded: false,
                    model_path_tried: path_tried,
                    last_load_error: Some(e.to_string()),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serving_core::{Label, LinearRegression, LogisticRegression};

    fn logistic() -> ModelArtifact {
        ModelArtifact::LogisticRegression(LogisticRegression {
            classes: vec![Label::I64(0), Label::I64(1)],
            feature_names: None,
            coefficients: vec![vec![1.0, 1.0]],
            intercepts: vec![0.0],
        })
    }

    #[test]
    fn test_format_by_extension() {
        assert_eq!(
            ArtifactFormat::from_path(Path::new("m/gesture.bin")),
            ArtifactFormat::Binary
        );
        assert_eq!(
            ArtifactFormat::from_path(Path::new("gesture.sav")),
            ArtifactFormat::Binary
        );
        assert_eq!(
            ArtifactFormat::from_path(Path::new("gesture.model")),
            ArtifactFormat::Binary
        );
        assert_eq!(
            ArtifactFormat::from_path(Path::new("gesture.json")),
            ArtifactFormat::Json
        );
        assert_eq!(
            ArtifactFormat::from_path(Path::new("gesture")),
            ArtifactFormat::Json
        );
    }

    #[test]
    fn test_existing_path_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gesture_detection.bin");
        write_artifact(&path, &logistic()).unwrap();

        assert_eq!(resolve_model_path(&path), path);
    }

    #[test]
    fn test_fallback_picks_model_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a model").unwrap();
        let candidate = dir.path().join("trained.sav");
        write_artifact(&candidate, &logistic()).unwrap();

        let resolved = resolve_model_path(&dir.path().join("gesture_detection.bin"));
        assert_eq!(resolved, candidate);
    }

    #[test]
    fn test_fallback_ignores_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("old.bin")).unwrap();

        let requested = dir.path().join("gesture_detection.bin");
        assert_eq!(resolve_model_path(&requested), requested);
    }

    #[test]
    fn test_missing_model_is_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let requested = dir.path().join("gesture_detection.bin");

        let outcome = load_model(&requested);
        assert!(outcome.model.is_none());
        assert!(!outcome.diagnostics.model_loaded);
        assert_eq!(
            outcome.diagnostics.model_path_tried,
            Some(requested.display().to_string())
        );
        let message = outcome.diagnostics.last_load_error.unwrap();
        assert!(message.starts_with("Model file not found: "));
    }

    #[test]
    fn test_binary_round_trip_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gesture_detection.bin");
        write_artifact(&path, &logistic()).unwrap();

        let outcome = load_model(&path);
        assert!(outcome.model.is_some());
        assert_eq!(
            outcome.diagnostics,
            LoadDiagnostics {
                model_loaded: true,
                model_path_tried: Some(path.display().to_string()),
                last_load_error: None,
            }
        );
    }

    #[test]
    fn test_json_artifact_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regressor.json");
        let artifact = ModelArtifact::LinearRegression(LinearRegression {
            feature_names: None,
            coefficients: vec![1.0],
            intercept: 0.0,
        });
        write_artifact(&path, &artifact).unwrap();

        assert_eq!(read_artifact(&path).unwrap(), artifact);
        assert!(load_model(&path).model.is_some());
    }

    #[test]
    fn test_corrupt_artifact_is_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gesture_detection.bin");
        std::fs::write(&path, [0xff, 0xff, 0xff, 0xff, 0x01]).unwrap();

        let outcome = load_model(&path);
        assert!(outcome.model.is_none());
        assert!(!outcome.diagnostics.model_loaded);
        assert!(outcome.diagnostics.last_load_error.is_some());
    }

    #[test]
    fn test_invalid_artifact_is_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(
            &path,
            r#"{"linear_regression": {"coefficients": [], "intercept": 0.0}}"#,
        )
        .unwrap();

        let outcome = load_model(&path);
        assert!(outcome.model.is_none());
        assert!(outcome
            .diagnostics
            .last_load_error
            .unwrap()
            .contains("coefficients must not be empty"));
    }
}
