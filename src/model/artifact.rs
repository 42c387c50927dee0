//! Model artifact format
//!
//! The training pipeline exports a JSON document:
//!
//! ```text
//! {
//!   "format_version": 1,
//!   "name": "wine-quality-linear",
//!   "feature_names": ["fixed acidity", ...],
//!   "estimator": { "kind": "linear" | "random_forest", ... }
//! }
//! ```

use serde::Deserialize;

use crate::features::FEATURE_LAYOUT;
use super::forest::RandomForestRegressor;
use super::linear::LinearRegressor;
use super::{LoadError, Predictor};

/// Artifact layout version this build understands
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub estimator: EstimatorSpec,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EstimatorSpec {
    Linear(LinearRegressor),
    RandomForest(RandomForestRegressor),
}

impl ModelArtifact {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, LoadError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Check version and feature layout, then hand out the estimator
    pub fn into_predictor(self) -> Result<Box<dyn Predictor>, LoadError> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(LoadError::UnsupportedVersion {
                found: self.format_version,
                expected: ARTIFACT_FORMAT_VERSION,
            });
        }

        if let Some(names) = &self.feature_names {
            if !names.iter().map(String::as_str).eq(FEATURE_LAYOUT.iter().copied()) {
                return Err(LoadError::SchemaMismatch(format!(
                    "artifact was trained on {:?}, expected {:?}",
                    names, FEATURE_LAYOUT
                )));
            }
        }

        match self.estimator {
            EstimatorSpec::Linear(model) => {
                model.validate().map_err(LoadError::InvalidEstimator)?;
                Ok(Box::new(model))
            }
            EstimatorSpec::RandomForest(model) => {
                model.validate().map_err(LoadError::InvalidEstimator)?;
                Ok(Box::new(model))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn linear_artifact() -> serde_json::Value {
        json!({
            "format_version": 1,
            "name": "test-linear",
            "feature_names": FEATURE_LAYOUT,
            "estimator": {
                "kind": "linear",
                "intercept": 3.0,
                "coefficients": [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0.25]
            }
        })
    }

    fn parse(value: serde_json::Value) -> Result<Box<dyn Predictor>, LoadError> {
        ModelArtifact::from_slice(value.to_string().as_bytes())?.into_predictor()
    }

    #[test]
    fn test_linear_artifact_loads() {
        let predictor = parse(linear_artifact()).unwrap();
        assert_eq!(predictor.kind(), "linear");
    }

    #[test]
    fn test_forest_artifact_loads() {
        let predictor = parse(json!({
            "format_version": 1,
            "estimator": {
                "kind": "random_forest",
                "trees": [{ "nodes": [{ "leaf": 5.0 }] }]
            }
        }))
        .unwrap();
        assert_eq!(predictor.kind(), "random_forest");
    }

    #[test]
    fn test_version_mismatch() {
        let mut artifact = linear_artifact();
        artifact["format_version"] = json!(2);
        assert!(matches!(
            parse(artifact),
            Err(LoadError::UnsupportedVersion { found: 2, expected: 1 })
        ));
    }

    #[test]
    fn test_reordered_feature_names_rejected() {
        let mut names: Vec<&str> = FEATURE_LAYOUT.to_vec();
        names.swap(0, 1);
        let mut artifact = linear_artifact();
        artifact["feature_names"] = json!(names);
        assert!(matches!(parse(artifact), Err(LoadError::SchemaMismatch(_))));
    }

    #[test]
    fn test_wrong_coefficient_count_is_parse_error() {
        let mut artifact = linear_artifact();
        artifact["estimator"]["coefficients"] = json!([1.0, 2.0]);
        assert!(matches!(parse(artifact), Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_invalid_forest_rejected() {
        let result = parse(json!({
            "format_version": 1,
            "estimator": { "kind": "random_forest", "trees": [] }
        }));
        assert!(matches!(result, Err(LoadError::InvalidEstimator(_))));
    }

    #[test]
    fn test_unknown_kind_is_parse_error() {
        let mut artifact = linear_artifact();
        artifact["estimator"]["kind"] = json!("svm");
        assert!(matches!(parse(artifact), Err(LoadError::Parse(_))));
    }
}
