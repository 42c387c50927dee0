//! Error handling
//!
//! Every failure on `/predict` ends up here and is rendered as a JSON
//! object with an explicit status code.

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::features::FeatureError;
use crate::model::InferenceError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Model host never loaded an artifact
    #[error("Model not loaded. Cannot make predictions.")]
    ModelNotLoaded,

    // Client input errors
    #[error("Request must be JSON")]
    NotJson,

    #[error("Missing features in request body.")]
    MissingFeatures {
        missing: Vec<String>,
        expected: Vec<String>,
    },

    // Feature coercion or inference errors
    #[error("Prediction failed: {0}")]
    PredictionFailed(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ModelNotLoaded => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotJson => StatusCode::BAD_REQUEST,
            AppError::MissingFeatures { .. } => StatusCode::BAD_REQUEST,
            AppError::PredictionFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = self.to_string();

        let body = match &self {
            AppError::MissingFeatures { missing, expected } => {
                tracing::debug!("Rejected request, missing features: {:?}", missing);
                json!({
                    "error": error_message,
                    "missing": missing,
                    "expected": expected,
                })
            }
            AppError::PredictionFailed(msg) => {
                tracing::error!("Prediction failed: {}", msg);
                json!({ "error": error_message })
            }
            AppError::ModelNotLoaded => {
                tracing::warn!("Prediction requested but no model is loaded");
                json!({ "error": error_message })
            }
            AppError::NotJson => json!({ "error": error_message }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<FeatureError> for AppError {
    fn from(err: FeatureError) -> Self {
        AppError::PredictionFailed(err.to_string())
    }
}

impl From<InferenceError> for AppError {
    fn from(err: InferenceError) -> Self {
        AppError::PredictionFailed(err.to_string())
    }
}
