//! # Signature Verification Service
//!
//! Implements `SignatureVerificationApi` on top of the domain verifier, adding
//! the optional device-binding rule.

use crate::domain::errors::SignatureFailure;
use crate::domain::verifier;
use crate::ports::inbound::SignatureVerificationApi;
use shared_types::{DeviceId, SignedSubmission};
use tracing::debug;

/// Signature verification service.
#[derive(Debug, Clone)]
pub struct SignatureVerificationService {
    enforce_device_binding: bool,
}

impl SignatureVerificationService {
    /// # Arguments
    /// * `enforce_device_binding` - also require `reading.device_id` to be the
    ///   identity derived from the submission's public key
    pub fn new(enforce_device_binding: bool) -> Self {
        Self {
            enforce_device_binding,
        }
    }

    pub fn enforces_device_binding(&self) -> bool {
        self.enforce_device_binding
    }
}

impl Default for SignatureVerificationService {
    fn default() -> Self {
        Self::new(true)
    }
}

impl SignatureVerificationApi for SignatureVerificationService {
    fn check(&self, submission: &SignedSubmission) -> Result<DeviceId, SignatureFailure> {
        let result = verifier::check(submission).and_then(|device_id| {
            if self.enforce_device_binding {
                verifier::check_device_binding(&submission.reading, &device_id)?;
            }
            Ok(device_id)
        });

        if let Err(failure) = &result {
            debug!(
                claimed_device = %submission.reading.device_id,
                reason = ?failure,
                "Signature check failed"
            );
        }
        result
    }
}
