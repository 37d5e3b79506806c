//! Cross-crate flows.

pub mod http_flow;
pub mod submission_flow;
