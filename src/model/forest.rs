//! Random forest regressor
//!
//! Trees are stored as flat node lists. A split sends the row left when
//! `x[feature] <= threshold`. Children always sit after their parent in the
//! list, which `validate` checks so traversal is guaranteed to terminate.

use serde::Deserialize;

use crate::features::{FeatureRow, FEATURE_COUNT};
use super::{InferenceError, Predictor};

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Leaf {
        leaf: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        for (idx, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Leaf { leaf } if !leaf.is_finite() => {
                    return Err(format!("node {} has a non-finite leaf value", idx));
                }
                TreeNode::Leaf { .. } => {}
                TreeNode::Split { feature, threshold, left, right } => {
                    if feature >= FEATURE_COUNT {
                        return Err(format!(
                            "node {} splits on feature {} (only {} features)",
                            idx, feature, FEATURE_COUNT
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has a non-finite threshold", idx));
                    }
                    for child in [left, right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(format!("node {} has invalid child index {}", idx, child));
                        }
                    }
                }
            }
        }

        Ok(())
    }

    fn evaluate(&self, values: &[f64; FEATURE_COUNT]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                TreeNode::Leaf { leaf } => return leaf,
                TreeNode::Split { feature, threshold, left, right } => {
                    idx = if values[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RandomForestRegressor {
    pub trees: Vec<RegressionTree>,
}

impl RandomForestRegressor {
    pub fn validate(&self) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate().map_err(|e| format!("tree {}: {}", i, e))?;
        }
        Ok(())
    }

    fn score(&self, row: &FeatureRow) -> f64 {
        let sum: f64 = self.trees.iter().map(|t| t.evaluate(row.values())).sum();
        sum / self.trees.len() as f64
    }
}

impl Predictor for RandomForestRegressor {
    fn kind(&self) -> &'static str {
        "random_forest"
    }

    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, InferenceError> {
        Ok(rows.iter().map(|row| self.score(row)).collect())
    }
}
