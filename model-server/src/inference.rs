//! Scoring a table against the loaded model.
//!
//! Prediction is tried on the labelled table first and, if the model rejects
//! it, once more on the raw values. Confidence is best effort: any failure in
//! the probability call drops confidence for the whole response, and a row
//! whose maximum probability is not a finite number gets `null`.

use serde::Serialize;
use serving_core::{Classifier, ModelInput, Scalar, Table};
use tracing::{debug, warn};

use crate::error::ApiError;

/// One response entry per input row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionEntry {
    pub prediction: Scalar,
    /// Absent when confidences were not computed, `null` when this row's
    /// value could not be represented.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Option<f64>>,
}

/// Result of scoring one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub entries: Vec<PredictionEntry>,
    /// The labelled attempt failed and the positional retry produced the
    /// predictions.
    pub used_fallback: bool,
    /// The model offers probabilities but computing them failed.
    pub confidence_failed: bool,
}

/// Predict every row of `table`.
pub fn predict_table(model: &dyn Classifier, table: &Table) -> Result<Prediction, ApiError> {
    let (labels, input) = match model.predict(ModelInput::Named(table)) {
        Ok(labels) => (labels, ModelInput::Named(table)),
        Err(named) => {
            debug!(error = %named, "Labelled prediction failed, retrying on raw values");
            match model.predict(ModelInput::Positional(table)) {
                Ok(labels) => (labels, ModelInput::Positional(table)),
                Err(positional) => {
                    return Err(ApiError::PredictionFailed {
                        named: named.to_string(),
                        positional: positional.to_string(),
                    });
                }
            }
        }
    };

    if labels.len() != table.n_rows() {
        return Err(ApiError::Internal(format!(
            "Model returned {} predictions for {} rows",
            labels.len(),
            table.n_rows()
        )));
    }

    let mut confidence_failed = false;
    let confidences = model.probabilities().and_then(|proba| {
        match proba.predict_proba(input) {
            Ok(rows) => Some(rows.iter().map(|r| row_confidence(r)).collect::<Vec<_>>()),
            Err(e) => {
                warn!(error = %e, "Probability computation failed, omitting confidence");
                confidence_failed = true;
                None
            }
        }
    });

    let entries = labels
        .iter()
        .enumerate()
        .map(|(i, label)| PredictionEntry {
            prediction: label.to_scalar(),
            confidence: confidences
                .as_ref()
                .map(|c| c.get(i).copied().flatten()),
        })
        .collect();

    Ok(Prediction {
        entries,
        used_fallback: !input.is_named(),
        confidence_failed,
    })
}

/// Largest class probability of one row. `None` when the row is empty or
/// holds any non-finite probability.
fn row_confidence(probabilities: &[f64]) -> Option<f64> {
    if probabilities.iter().any(|p| !p.is_finite()) {
        return None;
    }
    probabilities.iter().copied().reduce(f64::max)
}
