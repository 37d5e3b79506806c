//! Response bodies returned by the collector.

use serde::Deserialize;

/// `POST /api/submit` success body.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    pub message: String,
    pub content_address: String,
    pub device_id: String,
    pub timestamp: String,
    pub data_hash: String,
}

/// `POST /api/register` success body.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub device_id: String,
    pub status: String,
}

/// `GET /api/health` body.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
}

/// Error body shared by every rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub reason: String,
}
