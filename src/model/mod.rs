//! Model Host - loads the trained estimator once and serves predictions
//!
//! The handle is built before the server starts and injected into the
//! router state. It never changes afterwards: a failed load leaves the
//! process permanently in the `Unloaded` state.

pub mod artifact;
pub mod forest;
pub mod linear;
#[cfg(feature = "onnx")]
pub mod onnx;

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::features::FeatureRow;
use artifact::ModelArtifact;

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("model file not found at {0}")]
    NotFound(String),

    #[error("failed to read model file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unsupported artifact format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("feature layout mismatch: {0}")]
    SchemaMismatch(String),

    #[error("invalid estimator: {0}")]
    InvalidEstimator(String),

    #[error("unsupported artifact format: {0}")]
    UnsupportedFormat(String),

    #[cfg(feature = "onnx")]
    #[error("onnx runtime error: {0}")]
    Onnx(String),
}

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("model returned no output")]
    EmptyOutput,

    #[error("model returned a non-finite score ({0})")]
    NonFinite(f64),

    #[error("model score {0} does not fit in a 64-bit integer")]
    OutOfRange(f64),

    #[error("{0}")]
    Backend(String),
}

// ============================================================================
// PREDICTOR TRAIT
// ============================================================================

/// A trained estimator. `predict` takes `&self` so one instance can serve
/// any number of concurrent requests.
pub trait Predictor: Send + Sync {
    fn kind(&self) -> &'static str;

    /// One score per input row
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, InferenceError>;
}

// ============================================================================
// MODEL HANDLE
// ============================================================================

/// Metadata reported by `/health`
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub path: String,
    pub name: Option<String>,
    pub kind: String,
    pub sha256: String,
    pub loaded_at: DateTime<Utc>,
}

pub struct LoadedModel {
    info: ModelInfo,
    estimator: Box<dyn Predictor>,
}

impl LoadedModel {
    /// Wrap an estimator that did not come from a file
    pub fn in_memory(estimator: Box<dyn Predictor>) -> Self {
        let info = ModelInfo {
            path: "<memory>".to_string(),
            name: None,
            kind: estimator.kind().to_string(),
            sha256: String::new(),
            loaded_at: Utc::now(),
        };
        Self { info, estimator }
    }

    pub fn info(&self) -> &ModelInfo {
        &self.info
    }

    /// Score a single row (a one-row batch; the first output is the score)
    pub fn predict_one(&self, row: &FeatureRow) -> Result<f64, InferenceError> {
        self.estimator
            .predict(std::slice::from_ref(row))?
            .first()
            .copied()
            .ok_or(InferenceError::EmptyOutput)
    }
}

/// Shared, read-only model capability
#[derive(Clone)]
pub enum ModelHandle {
    Loaded(Arc<LoadedModel>),
    Unloaded,
}

impl ModelHandle {
    pub fn loaded(model: LoadedModel) -> Self {
        ModelHandle::Loaded(Arc::new(model))
    }

    pub fn get(&self) -> Option<&LoadedModel> {
        match self {
            ModelHandle::Loaded(model) => Some(model.as_ref()),
            ModelHandle::Unloaded => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, ModelHandle::Loaded(_))
    }
}

/// Integer quality score: truncation toward zero, not rounding
pub fn quality_score(raw: f64) -> Result<i64, InferenceError> {
    if !raw.is_finite() {
        return Err(InferenceError::NonFinite(raw));
    }

    // i64::MIN is exactly representable; 2^63 is one past i64::MAX
    let truncated = raw.trunc();
    if truncated < i64::MIN as f64 || truncated >= 9_223_372_036_854_775_808.0 {
        return Err(InferenceError::OutOfRange(raw));
    }
    Ok(truncated as i64)
}

// ============================================================================
// MODEL HOST
// ============================================================================

pub struct ModelHost;

impl ModelHost {
    /// Load the artifact at `path`. Never fails: any error is logged and
    /// the returned handle is `Unloaded`.
    pub fn load(path: impl AsRef<Path>) -> ModelHandle {
        let path = path.as_ref();

        match Self::try_load(path) {
            Ok(model) => {
                let info = model.info();
                tracing::info!(
                    path = %info.path,
                    kind = %info.kind,
                    sha256 = %info.sha256,
                    "Model loaded successfully"
                );
                ModelHandle::loaded(model)
            }
            Err(LoadError::NotFound(p)) => {
                tracing::warn!(
                    "Model file not found at {}. Ensure the model is trained and saved.",
                    p
                );
                ModelHandle::Unloaded
            }
            Err(e) => {
                tracing::error!("Error loading model from {}: {}", path.display(), e);
                ModelHandle::Unloaded
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<LoadedModel, LoadError> {
        if !path.is_file() {
            return Err(LoadError::NotFound(path.display().to_string()));
        }

        let bytes = std::fs::read(path)?;
        let sha256 = hex::encode(Sha256::digest(&bytes));

        let is_onnx = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("onnx"))
            .unwrap_or(false);

        let (name, estimator) = if is_onnx {
            (None, Self::load_onnx(&bytes)?)
        } else {
            let artifact = ModelArtifact::from_slice(&bytes)?;
            let name = artifact.name.clone();
            (name, artifact.into_predictor()?)
        };

        Ok(LoadedModel {
            info: ModelInfo {
                path: path.display().to_string(),
                name,
                kind: estimator.kind().to_string(),
                sha256,
                loaded_at: Utc::now(),
            },
            estimator,
        })
    }

    #[cfg(feature = "onnx")]
    fn load_onnx(bytes: &[u8]) -> Result<Box<dyn Predictor>, LoadError> {
        Ok(Box::new(onnx::OnnxRegressor::from_bytes(bytes)?))
    }

    #[cfg(not(feature = "onnx"))]
    fn load_onnx(_bytes: &[u8]) -> Result<Box<dyn Predictor>, LoadError> {
        Err(LoadError::UnsupportedFormat(
            "ONNX artifacts require the `onnx` feature".to_string(),
        ))
    }
}
