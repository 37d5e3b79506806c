//! # Inbound Ports (Driving Ports / API)

use crate::domain::entities::AcceptedSubmission;
use crate::domain::errors::SubmissionError;
use async_trait::async_trait;
use shared_types::SignedSubmission;

/// Entry point for inbound submissions.
#[async_trait]
pub trait SubmissionApi: Send + Sync {
    /// Run one submission through every stage. Each call is evaluated
    /// independently; there are no retries inside.
    async fn process(
        &self,
        submission: SignedSubmission,
    ) -> Result<AcceptedSubmission, SubmissionError>;
}
