//! # Domain Layer
//!
//! Pure validation rules. The caller supplies "now".

pub mod bounds;
pub mod errors;
pub mod validator;
