//! HTTP handlers.
//!
//! Every error response is `{"error": <message>, "reason": <code>, "retryable": <bool>}`.
//! `retryable` tells the device whether resending the same payload later can
//! succeed.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use shared_types::{DeviceRegistration, SignedSubmission};
use std::sync::Arc;
use tracing::{info, warn};
use wa_05_submission_pipeline::{
    BlobStore, DeviceRegistry, ReasonCode, RegistrationError, SubmissionApi, SubmissionError,
    SubmissionPipeline,
};

/// Default and maximum page sizes for `/api/data`.
pub const DEFAULT_DATA_LIMIT: usize = 50;
pub const MAX_DATA_LIMIT: usize = 100;
pub const LATEST_DATA_LIMIT: usize = 10;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<SubmissionPipeline>,
    pub registry: Arc<DeviceRegistry>,
    pub store: Arc<dyn BlobStore>,
}

impl AppState {
    pub fn new(pipeline: Arc<SubmissionPipeline>) -> Self {
        Self {
            registry: pipeline.registry(),
            store: pipeline.blob_store(),
            pipeline,
        }
    }
}

/// Error response body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    reason: &'static str,
    retryable: bool,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>, reason: &'static str) -> Self {
        Self {
            status,
            message: message.into(),
            reason,
            retryable: false,
        }
    }

    fn from_reason(status: StatusCode, message: impl Into<String>, reason: ReasonCode) -> Self {
        Self {
            retryable: reason.is_retryable(),
            ..Self::new(status, message, reason.as_str())
        }
    }

    fn malformed(message: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, "malformed")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "error": self.message,
                "reason": self.reason,
                "retryable": self.retryable,
            })),
        )
            .into_response()
    }
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        let reason = err.reason_code();
        let (status, message) = match reason {
            ReasonCode::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded"),
            ReasonCode::BadSignature => (StatusCode::BAD_REQUEST, "Invalid signature"),
            ReasonCode::InvalidPayload => (StatusCode::BAD_REQUEST, "Invalid weather data"),
            ReasonCode::StorageUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "Failed to store reading")
            }
        };
        Self::from_reason(status, message, reason)
    }
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, err.to_string(), "invalid_registration")
    }
}

/// `POST /api/submit`
pub async fn submit(
    State(state): State<AppState>,
    body: Result<Json<SignedSubmission>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(submission) = body.map_err(|e| {
        warn!(error = %e, "Undecodable submission");
        ApiError::malformed("Invalid payload")
    })?;

    let accepted = state.pipeline.process(submission).await?;

    Ok(Json(json!({
        "message": "Weather data submitted successfully",
        "content_address": accepted.content_address,
        "device_id": accepted.device_id,
        "timestamp": accepted.accepted_at,
        "data_hash": accepted.data_hash,
    })))
}

/// `POST /api/register`
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<DeviceRegistration>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(registration) = body.map_err(|_| ApiError::malformed("Invalid registration data"))?;

    let record = state.registry.register(&registration, Utc::now())?;
    wa_telemetry::REGISTERED_DEVICES.set(state.registry.len() as i64);
    info!(device_id = %record.device_id, location = %record.location, "Device registered");

    Ok(Json(json!({
        "message": "Device registration received",
        "device_id": record.device_id,
        "status": record.status,
    })))
}

#[derive(Debug, Default, Deserialize)]
pub struct DataQuery {
    pub limit: Option<String>,
}

/// Requested page size, falling back to the default outside `1..=100`.
pub fn effective_limit(raw: Option<&str>) -> usize {
    raw.and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| (1..=MAX_DATA_LIMIT).contains(n))
        .unwrap_or(DEFAULT_DATA_LIMIT)
}

/// `GET /api/data?limit=N`
pub async fn data(
    State(state): State<AppState>,
    Query(query): Query<DataQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let limit = effective_limit(query.limit.as_deref());
    let readings = recent(&state, limit).await?;
    Ok(Json(json!({ "count": readings.len(), "data": readings })))
}

/// `GET /api/data/latest`
pub async fn latest(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let readings = recent(&state, LATEST_DATA_LIMIT).await?;
    Ok(Json(json!({ "data": readings })))
}

async fn recent(
    state: &AppState,
    limit: usize,
) -> Result<Vec<wa_05_submission_pipeline::StoredReading>, ApiError> {
    state.store.recent(limit).await.map_err(|e| {
        warn!(error = %e, "Blob store listing failed");
        ApiError::from_reason(
            StatusCode::SERVICE_UNAVAILABLE,
            "Failed to read stored data",
            ReasonCode::StorageUnavailable,
        )
    })
}

/// `GET /api/devices`
pub async fn devices(State(state): State<AppState>) -> Json<serde_json::Value> {
    let devices = state.registry.list();
    Json(json!({ "count": devices.len(), "devices": devices }))
}

/// `GET /api/health`
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `GET /metrics`
pub async fn metrics() -> Response {
    match wa_telemetry::encode_metrics() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "Metrics encoding failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
