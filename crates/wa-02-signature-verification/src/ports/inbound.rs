//! # Inbound Ports (Driving Ports / API)
//!
//! What the submission pipeline asks of this subsystem.

use crate::domain::errors::SignatureFailure;
use shared_types::{DeviceId, SignedSubmission};

/// Signature verification API.
///
/// Implementations must be thread-safe (`Send + Sync`) and must never panic
/// on malformed input.
pub trait SignatureVerificationApi: Send + Sync {
    /// Verify a submission, returning the identity that signed it.
    fn check(&self, submission: &SignedSubmission) -> Result<DeviceId, SignatureFailure>;

    /// `true` iff [`Self::check`] succeeds.
    fn verify(&self, submission: &SignedSubmission) -> bool {
        self.check(submission).is_ok()
    }
}
