//! # Weather-Attest Test Suite
//!
//! Cross-crate tests that no single subsystem crate can host.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/
//! │   ├── submission_flow.rs   # device identity → pipeline, in process
//! │   └── http_flow.rs         # wa-device client → collector over TCP
//! └── benches/
//!     └── submission_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p wa-tests
//! cargo test -p wa-tests integration::http_flow
//! cargo bench -p wa-tests
//! ```

pub mod integration;
