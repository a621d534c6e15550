//! Logistic regression (binary sigmoid or multinomial softmax).

use serde::{Deserialize, Serialize};

use super::features::feature_matrix;
use super::{argmax, ArtifactError, Classifier, ModelError, ModelInput, ProbabilisticClassifier};
use crate::scalar::Label;

pub(crate) const NAME: &str = "logistic_regression";

/// Linear classifier with one coefficient row per class, or a single row
/// for the binary case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub classes: Vec<Label>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl LogisticRegression {
    fn n_features(&self) -> usize {
        self.coefficients.first().map_or(0, Vec::len)
    }

    pub(crate) fn validate(&self) -> Result<(), ArtifactError> {
        if self.classes.len() < 2 {
            return Err(ArtifactError::new(NAME, "at least two classes are required"));
        }
        let expected_rows = if self.classes.len() == 2 && self.coefficients.len() == 1 {
            1
        } else {
            self.classes.len()
        };
        if self.coefficients.len() != expected_rows {
            return Err(ArtifactError::new(
                NAME,
                format!(
                    "{} classes need {} coefficient rows, found {}",
                    self.classes.len(),
                    expected_rows,
                    self.coefficients.len()
                ),
            ));
        }
        if self.intercepts.len() != self.coefficients.len() {
            return Err(ArtifactError::new(
                NAME,
                format!(
                    "{} coefficient rows but {} intercepts",
                    self.coefficients.len(),
                    self.intercepts.len()
                ),
            ));
        }
        let width = self.n_features();
        if width == 0 || self.coefficients.iter().any(|row| row.len() != width) {
            return Err(ArtifactError::new(
                NAME,
                "coefficient rows must be non-empty and equally long",
            ));
        }
        if let Some(names) = &self.feature_names {
            if names.len() != width {
                return Err(ArtifactError::new(
                    NAME,
                    format!("{} feature names for {} coefficients", names.len(), width),
                ));
            }
        }
        Ok(())
    }

    fn decision_function(&self, x: &[f64]) -> Vec<f64> {
        self.coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(w, b)| b + w.iter().zip(x).map(|(wi, xi)| wi * xi).sum::<f64>())
            .collect()
    }

    fn row_proba(&self, x: &[f64]) -> Vec<f64> {
        let z = self.decision_function(x);
        if z.len() == 1 {
            let p = sigmoid(z[0]);
            return vec![1.0 - p, p];
        }
        softmax(&z)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn softmax(z: &[f64]) -> Vec<f64> {
    let max = z.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exp: Vec<f64> = z.iter().map(|v| (v - max).exp()).collect();
    let sum: f64 = exp.iter().sum();
    exp.into_iter().map(|e| e / sum).collect()
}

impl Classifier for LogisticRegression {
    fn predict(&self, input: ModelInput<'_>) -> Result<Vec<Label>, ModelError> {
        Ok(self
            .predict_proba(input)?
            .iter()
            .map(|p| self.classes[argmax(p)].clone())
            .collect())
    }

    fn probabilities(&self) -> Option<&dyn ProbabilisticClassifier> {
        Some(self)
    }

    fn name(&self) -> &str {
        NAME
    }
}

impl ProbabilisticClassifier for LogisticRegression {
    fn predict_proba(&self, input: ModelInput<'_>) -> Result<Vec<Vec<f64>>, ModelError> {
        let x = feature_matrix(input, self.feature_names.as_deref(), self.n_features())?;
        Ok(x.iter().map(|row| self.row_proba(row)).collect())
    }
}
