//! Shared application state for the model server.
//!
//! The state is built once, before the listener starts serving, and never
//! mutated afterwards. Handlers only read it, so it is shared as a plain
//! `Arc<AppState>` with no lock.

use std::path::Path;
use std::sync::Arc;

use serving_core::Classifier;

use crate::loader::{self, LoadDiagnostics, LoadOutcome};

pub struct AppState {
    /// Loaded model, `None` when the startup load found nothing usable.
    pub model: Option<Arc<dyn Classifier>>,

    /// Outcome of the startup load for `/model_info`.
    pub diagnostics: LoadDiagnostics,
}

impl AppState {
    /// Run the loader against `requested` and wrap the result.
    pub fn load(requested: &Path) -> Self {
        Self::from_outcome(loader::load_model(requested))
    }

    pub fn from_outcome(outcome: LoadOutcome) -> Self {
        crate::metrics::set_model_loaded(outcome.model.is_some());
        Self {
            model: outcome.model,
            diagnostics: outcome.diagnostics,
        }
    }

    /// State serving an already constructed model.
    pub fn with_model(model: Arc<dyn Classifier>, path: Option<String>) -> Self {
        Self::from_outcome(LoadOutcome {
            model: Some(model),
            diagnostics: LoadDiagnostics {
                model_loaded: true,
                model_path_tried: path,
                last_load_error: None,
            },
        })
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model.is_some()
    }
}
