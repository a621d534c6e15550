//! Ordinary linear regression. Predicts a float per row and has no
//! probability capability.

use serde::{Deserialize, Serialize};

use super::features::feature_matrix;
use super::{ArtifactError, Classifier, ModelError, ModelInput};
use crate::scalar::Label;

pub(crate) const NAME: &str = "linear_regression";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegression {
    pub(crate) fn validate(&self) -> Result<(), ArtifactError> {
        if self.coefficients.is_empty() {
            return Err(ArtifactError::new(NAME, "coefficients must not be empty"));
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.coefficients.len() {
                return Err(ArtifactError::new(
                    NAME,
                    format!(
                        "{} feature names for {} coefficients",
                        names.len(),
                        self.coefficients.len()
                    ),
                ));
            }
        }
        Ok(())
    }
}

impl Classifier for LinearRegression {
    fn predict(&self, input: ModelInput<'_>) -> Result<Vec<Label>, ModelError> {
        let x = feature_matrix(input, self.feature_names.as_deref(), self.coefficients.len())?;
        Ok(x.iter()
            .map(|row| {
                let y = self.intercept
                    + self
                        .coefficients
                        .iter()
                        .zip(row)
                        .map(|(w, v)| w * v)
                        .sum::<f64>();
                Label::F64(y)
            })
            .collect())
    }

    fn name(&self) -> &str {
        NAME
    }
}
