use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::features::SCHEMA_VERSION;
use crate::predict::features_from_json;
use crate::server::state::AppState;
use crate::HeartError;

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    /// One row per input, one probability per row
    pub predictions: Vec<Vec<f32>>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub schema_version: u32,
}

/// Error returned to API callers as `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    /// 400 for bad syntax, 415 without a JSON content type, 422 otherwise
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(rejection.status(), rejection.body_text())
    }
}

impl From<HeartError> for ApiError {
    fn from(err: HeartError) -> Self {
        let status = match err {
            HeartError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::new(status, err.to_string())
    }
}

/// POST /predict
pub async fn predict(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> std::result::Result<Json<PredictResponse>, ApiError> {
    let Json(body) = payload?;

    let features = features_from_json(&body)?;
    log::info!("Input vector: {:?}", features);

    let probability = state.predictor.predict(&features).map_err(|e| {
        log::error!("Prediction failed: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(PredictResponse {
        predictions: vec![vec![probability]],
    }))
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        schema_version: SCHEMA_VERSION,
    })
}
