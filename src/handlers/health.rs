//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::model::ModelInfo;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    model_loaded: bool,
    model: Option<ModelInfo>,
    environment: String,
    version: &'static str,
    timestamp: i64,
}

/// Reports `degraded` rather than failing when no model is loaded, so the
/// route stays usable as a readiness signal.
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let model = state.model.get().map(|m| m.info().clone());

    Json(HealthResponse {
        status: if model.is_some() { "healthy" } else { "degraded" },
        model_loaded: model.is_some(),
        model,
        environment: state.config.environment.clone(),
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
