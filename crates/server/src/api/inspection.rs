use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use opticheck_core::{ImagePayload, InspectError, Label, Roi};

use crate::state::AppState;

#[derive(Deserialize)]
pub struct AddSampleRequest {
    /// Base64 image body, with or without a `data:image/...;base64,` prefix.
    pub image: String,
    pub label: Label,
    /// Region of interest; the caller's value is authoritative.
    pub roi: Roi,
}

#[derive(Deserialize)]
pub struct PredictRequest {
    pub image: String,
    pub roi: Roi,
}

#[derive(Serialize)]
pub struct AddSampleResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_count: Option<u64>,
}

#[derive(Serialize)]
pub struct TrainResponse {
    pub status: &'static str,
    pub accuracy: f64,
}

#[derive(Serialize)]
pub struct PredictResponse {
    pub status: &'static str,
    pub prediction: Label,
    pub confidence: f64,
}

#[derive(Serialize)]
pub struct CountsResponse {
    pub status: &'static str,
    pub good: u64,
    pub defective: u64,
}

#[derive(Serialize)]
struct ErrorBody {
    status: &'static str,
    kind: &'static str,
    message: String,
}

/// Maps an orchestration failure to an HTTP response. Every failure body
/// carries a kind discriminator and message; no stage failure ever yields
/// a success status.
pub struct ApiError(InspectError);

impl From<InspectError> for ApiError {
    fn from(err: InspectError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.kind() {
            "invalid_region" | "stage_io" => StatusCode::BAD_REQUEST,
            "configuration" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        warn!("inspection call failed ({}): {}", self.0.kind(), self.0);
        let body = ErrorBody {
            status: "error",
            kind: self.0.kind(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub async fn add_sample(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddSampleRequest>,
) -> Result<Json<AddSampleResponse>, ApiError> {
    let payload = ImagePayload::new(request.image);
    let receipt = state
        .service()
        .add_sample(&payload, request.label, request.roi)
        .await?;
    Ok(Json(AddSampleResponse {
        status: "success",
        sample_count: receipt.sample_count,
    }))
}

pub async fn train(State(state): State<Arc<AppState>>) -> Result<Json<TrainResponse>, ApiError> {
    let report = state.service().train().await?;
    Ok(Json(TrainResponse {
        status: "success",
        accuracy: report.accuracy,
    }))
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let payload = ImagePayload::new(request.image);
    let prediction = state.service().predict(&payload, request.roi).await?;
    Ok(Json(PredictResponse {
        status: "success",
        prediction: prediction.label,
        confidence: prediction.confidence,
    }))
}

pub async fn sample_counts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CountsResponse>, ApiError> {
    let counts = state.service().sample_counts().await?;
    Ok(Json(CountsResponse {
        status: "success",
        good: counts.good,
        defective: counts.defective,
    }))
}
