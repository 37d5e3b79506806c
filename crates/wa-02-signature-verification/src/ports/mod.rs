//! # Ports Layer
//!
//! - **Inbound (Driving)**: API the submission pipeline calls

pub mod inbound;
