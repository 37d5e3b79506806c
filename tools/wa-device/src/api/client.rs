//! HTTP client for the collector.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::{DeviceRegistration, SignedSubmission};
use thiserror::Error;

use super::types::*;

/// Errors that can occur when talking to the collector.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Rejected with {status}: {error} ({reason})")]
    Rejected {
        status: StatusCode,
        error: String,
        reason: String,
    },
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl ApiError {
    /// Machine-readable rejection reason, if the collector gave one.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Rejected { reason, .. } if !reason.is_empty() => Some(reason),
            _ => None,
        }
    }

    /// Whether resubmitting later can succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(_) => true,
            Self::Rejected { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            _ => false,
        }
    }
}

/// Collector API client.
pub struct CollectorClient {
    client: Client,
    base_url: String,
}

impl CollectorClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(ApiError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| self.connection_error(e))?;
        decode(response).await
    }

    fn connection_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_connect() || e.is_timeout() {
            ApiError::Connection(format!("Cannot reach {}", self.base_url))
        } else {
            ApiError::Http(e)
        }
    }

    /// Register this device's public key.
    pub async fn register(
        &self,
        registration: &DeviceRegistration,
    ) -> Result<RegisterResponse, ApiError> {
        self.post("/api/register", registration).await
    }

    /// Submit one signed reading.
    pub async fn submit(&self, submission: &SignedSubmission) -> Result<SubmitResponse, ApiError> {
        self.post("/api/submit", submission).await
    }

    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        let response = self
            .client
            .get(self.url("/api/health"))
            .send()
            .await
            .map_err(|e| self.connection_error(e))?;
        decode(response).await
    }
}

async fn decode<R: DeserializeOwned>(response: Response) -> Result<R, ApiError> {
    let status = response.status();
    if status.is_success() {
        return response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()));
    }

    let body: ErrorBody = response.json().await.unwrap_or_default();
    Err(ApiError::Rejected {
        status,
        error: body.error,
        reason: body.reason,
    })
}
