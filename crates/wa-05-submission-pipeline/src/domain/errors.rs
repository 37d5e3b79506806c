//! # Pipeline Errors
//!
//! Every rejection carries its internal cause for logging and collapses to a
//! public [`ReasonCode`] for the caller.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use wa_02_signature_verification::SignatureFailure;
use wa_03_payload_validation::PayloadViolation;

/// Public rejection reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    RateLimited,
    BadSignature,
    InvalidPayload,
    StorageUnavailable,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::BadSignature => "bad_signature",
            Self::InvalidPayload => "invalid_payload",
            Self::StorageUnavailable => "storage_unavailable",
        }
    }

    /// Whether resubmitting the same payload later can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::StorageUnavailable)
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Blob store failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlobStoreError {
    #[error("blob store unavailable: {0}")]
    Unavailable(String),

    #[error("blob store did not answer within {0:?}")]
    Timeout(Duration),

    #[error("reading could not be encoded for storage: {0}")]
    Encoding(String),
}

/// Why a submission was not accepted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmissionError {
    #[error("rate limit exceeded")]
    RateLimited,

    #[error("invalid signature: {0}")]
    BadSignature(#[from] SignatureFailure),

    #[error("invalid weather data: {0}")]
    InvalidPayload(#[from] PayloadViolation),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] BlobStoreError),
}

impl SubmissionError {
    pub fn reason_code(&self) -> ReasonCode {
        match self {
            Self::RateLimited => ReasonCode::RateLimited,
            Self::BadSignature(_) => ReasonCode::BadSignature,
            Self::InvalidPayload(_) => ReasonCode::InvalidPayload,
            Self::StorageUnavailable(_) => ReasonCode::StorageUnavailable,
        }
    }
}

/// Registration rejections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("Device ID and public key are required")]
    MissingField,

    #[error("device_id is not a valid device identifier")]
    InvalidDeviceId,

    #[error("public_key is not an uncompressed P-256 point")]
    InvalidPublicKey,

    #[error("device_id does not match public_key")]
    DeviceIdMismatch,
}
