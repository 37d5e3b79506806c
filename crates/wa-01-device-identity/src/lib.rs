//! # Device Identity Subsystem (WA-01)
//!
//! Runs on the device. Owns the P-256 keypair, the derived `DeviceId`, and
//! turns readings into `SignedSubmission`s the collector can verify.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): identity, stored-key decoding, signing
//! - **Ports Layer** (`ports/`): `KeyPersistence` outbound trait
//! - **Adapters** (`adapters/`): JSON key file with owner-only permissions
//! - **Service Layer** (`service.rs`): `KeyStore::load_or_create`
//!
//! ## Key Lifecycle
//!
//! ```text
//! load ──ok──→ decode ──ok──→ consistent? ──yes──→ DeviceIdentity
//!   │             │                │
//!   └─absent      └─corrupt        └─mismatch
//!          \          |           /
//!           └──→ generate + persist ──→ DeviceIdentity
//! ```
//!
//! A persist failure is fatal: a device without a stable identity cannot
//! submit.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::key_file::JsonKeyFile;
pub use domain::errors::IdentityError;
pub use domain::identity::{DeviceIdentity, StoredKeys};
pub use domain::signer::sign;
pub use ports::outbound::KeyPersistence;
pub use service::{load_or_create, KeyStore};
