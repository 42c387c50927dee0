//! Prediction handler

use axum::{
    body::Body,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::features::{self, FeatureRow};
use crate::model::quality_score;
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub predicted_quality: i64,
    pub input_features: Map<String, Value>,
}

/// Score one wine sample.
///
/// The model check happens before the body is read, so an unloaded model
/// answers 500 for every request whatever its size.
pub async fn predict(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> AppResult<Json<PredictionResponse>> {
    let model = state.model.get().ok_or(AppError::ModelNotLoaded)?;

    if !is_json_content_type(&headers) {
        return Err(AppError::NotJson);
    }

    let limit = state.config.max_body_bytes.unwrap_or(usize::MAX);
    let bytes = axum::body::to_bytes(body, limit).await.map_err(|e| {
        tracing::debug!("Failed to buffer request body: {}", e);
        AppError::NotJson
    })?;

    let input = parse_json_object(&bytes)?;

    let missing = features::missing_features(&input);
    if !missing.is_empty() {
        return Err(AppError::MissingFeatures {
            missing,
            expected: features::expected_features(),
        });
    }

    let row = FeatureRow::from_map(&input)?;
    let predicted_quality = quality_score(model.predict_one(&row)?)?;

    tracing::debug!(predicted_quality, "Prediction served");

    Ok(Json(PredictionResponse {
        predicted_quality,
        input_features: input,
    }))
}

/// Accepts `application/json` and `application/*+json`, ignoring parameters
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime == "application/json"
        || (mime.starts_with("application/") && mime.ends_with("+json"))
}

fn parse_json_object(body: &[u8]) -> AppResult<Map<String, Value>> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(AppError::NotJson),
    }
}
