//! Single decision tree stored as a flat node array.

use serde::{Deserialize, Serialize};

use super::features::feature_matrix;
use super::{argmax, ArtifactError, Classifier, ModelError, ModelInput, ProbabilisticClassifier};
use crate::scalar::Label;

pub(crate) const NAME: &str = "decision_tree";

/// A tree node. Node 0 is the root; children always come after their parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    /// Go `left` when `x[feature] <= threshold`, otherwise `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Per-class training sample counts (or weights) that reached this leaf.
    Leaf { counts: Vec<f64> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub classes: Vec<Label>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub n_features: usize,
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    pub(crate) fn validate(&self) -> Result<(), ArtifactError> {
        if self.classes.is_empty() {
            return Err(ArtifactError::new(NAME, "classes must not be empty"));
        }
        if self.n_features == 0 {
            return Err(ArtifactError::new(NAME, "n_features must be positive"));
        }
        if self.nodes.is_empty() {
            return Err(ArtifactError::new(NAME, "nodes must not be empty"));
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.n_features {
                return Err(ArtifactError::new(
                    NAME,
                    format!("{} feature names for {} features", names.len(), self.n_features),
                ));
            }
        }

        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= self.n_features {
                        return Err(ArtifactError::new(
                            NAME,
                            format!("node {idx} splits on feature {feature} of {}", self.n_features),
                        ));
                    }
                    for child in [left, right] {
                        if *child <= idx || *child >= self.nodes.len() {
                            return Err(ArtifactError::new(
                                NAME,
                                format!("node {idx} has invalid child {child}"),
                            ));
                        }
                    }
                }
                TreeNode::Leaf { counts } => {
                    if counts.len() != self.classes.len() {
                        return Err(ArtifactError::new(
                            NAME,
                            format!(
                                "leaf {idx} has {} counts for {} classes",
                                counts.len(),
                                self.classes.len()
                            ),
                        ));
                    }
                    if counts.iter().any(|c| *c < 0.0) || counts.iter().sum::<f64>() <= 0.0 {
                        return Err(ArtifactError::new(
                            NAME,
                            format!("leaf {idx} counts must be non-negative with a positive total"),
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    fn leaf(&self, x: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[*feature] <= *threshold { *left } else { *right };
                }
                TreeNode::Leaf { counts } => return counts,
            }
        }
    }

    fn matrix(&self, input: ModelInput<'_>) -> Result<Vec<Vec<f64>>, ModelError> {
        feature_matrix(input, self.feature_names.as_deref(), self.n_features)
    }
}

impl Classifier for DecisionTree {
    fn predict(&self, input: ModelInput<'_>) -> Result<Vec<Label>, ModelError> {
        Ok(self
            .matrix(input)?
            .iter()
            .map(|x| self.classes[argmax(self.leaf(x))].clone())
            .collect())
    }

    fn probabilities(&self) -> Option<&dyn ProbabilisticClassifier> {
        Some(self)
    }

    fn name(&self) -> &str {
        NAME
    }
}

impl ProbabilisticClassifier for DecisionTree {
    fn predict_proba(&self, input: ModelInput<'_>) -> Result<Vec<Vec<f64>>, ModelError> {
        Ok(self
            .matrix(input)?
            .iter()
            .map(|x| {
                let counts = self.leaf(x);
                let total: f64 = counts.iter().sum();
                counts.iter().map(|c| c / total).collect()
            })
            .collect())
    }
}
