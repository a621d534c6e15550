//! Classifier capabilities and the model families a stored artifact can hold.
//!
//! A loaded model always offers [`Classifier::predict`]. Models that can
//! estimate class probabilities additionally return a
//! [`ProbabilisticClassifier`] from [`Classifier::probabilities`]; callers
//! query for the capability instead of assuming it.

mod features;
pub mod linear;
pub mod logistic;
pub mod tree;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scalar::Label;
use crate::table::Table;

pub use linear::LinearRegression;
pub use logistic::LogisticRegression;
pub use tree::{DecisionTree, TreeNode};

/// How a table is presented to a model.
#[derive(Debug, Clone, Copy)]
pub enum ModelInput<'a> {
    /// The table with its column labels; models that recorded feature names
    /// select and reorder columns by name.
    Named(&'a Table),
    /// Only the raw values; column labels are ignored and columns are taken
    /// in order.
    Positional(&'a Table),
}

impl<'a> ModelInput<'a> {
    pub const fn table(&self) -> &'a Table {
        match *self {
            Self::Named(t) | Self::Positional(t) => t,
        }
    }

    pub const fn is_named(&self) -> bool {
        matches!(self, Self::Named(_))
    }
}

/// Errors raised by a model while scoring a table.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("feature names seen at fit time, yet now missing: {}", .0.join(", "))]
    MissingFeatures(Vec<String>),

    #[error("feature names unseen at fit time: {}", .0.join(", "))]
    UnexpectedFeatures(Vec<String>),

    #[error("input has {got} features, but the model is expecting {expected} features")]
    FeatureCount { expected: usize, got: usize },

    #[error("could not convert {value} to float (row {row}, column {column})")]
    NonNumeric {
        row: usize,
        column: usize,
        value: String,
    },

    #[error("input contains a missing value (row {row}, column {column})")]
    MissingValue { row: usize, column: usize },

    #[error("input contains infinity or a value too large (row {row}, column {column})")]
    NonFinite { row: usize, column: usize },
}

/// Errors raised when an artifact's contents are inconsistent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {model} artifact: {reason}")]
pub struct ArtifactError {
    pub model: &'static str,
    pub reason: String,
}

impl ArtifactError {
    pub(crate) fn new(model: &'static str, reason: impl Into<String>) -> Self {
        Self {
            model,
            reason: reason.into(),
        }
    }
}

/// Required prediction capability of a loaded model.
pub trait Classifier: Send + Sync {
    /// Predict one label per input row.
    fn predict(&self, input: ModelInput<'_>) -> Result<Vec<Label>, ModelError>;

    /// The probability capability, when the model has one.
    fn probabilities(&self) -> Option<&dyn ProbabilisticClassifier> {
        None
    }

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}

/// Optional capability: per-row, per-class probabilities.
pub trait ProbabilisticClassifier: Send + Sync {
    fn predict_proba(&self, input: ModelInput<'_>) -> Result<Vec<Vec<f64>>, ModelError>;
}

/// A decoded model artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelArtifact {
    LogisticRegression(LogisticRegression),
    DecisionTree(DecisionTree),
    LinearRegression(LinearRegression),
}

impl ModelArtifact {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::LogisticRegression(_) => logistic::NAME,
            Self::DecisionTree(_) => tree::NAME,
            Self::LinearRegression(_) => linear::NAME,
        }
    }

    /// Check the artifact's internal shape.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        match self {
            Self::LogisticRegression(m) => m.validate(),
            Self::DecisionTree(m) => m.validate(),
            Self::LinearRegression(m) => m.validate(),
        }
    }

    /// Validate and turn the artifact into a model handle.
    pub fn into_classifier(self) -> Result<Box<dyn Classifier>, ArtifactError> {
        self.validate()?;
        let model: Box<dyn Classifier> = match self {
            Self::LogisticRegression(m) => Box::new(m),
            Self::DecisionTree(m) => Box::new(m),
            Self::LinearRegression(m) => Box::new(m),
        };
        Ok(model)
    }
}

/// Index of the first maximum.
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate().skip(1) {
        if *v > values[best] {
            best = i;
        }
    }
    best
}
