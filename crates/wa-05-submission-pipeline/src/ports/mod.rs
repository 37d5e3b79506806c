//! # Ports Layer
//!
//! - **Inbound (Driving)**: `SubmissionApi`, called by the HTTP collector
//! - **Outbound (Driven)**: `BlobStore`, where accepted readings go

pub mod inbound;
pub mod outbound;
