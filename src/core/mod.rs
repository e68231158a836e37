//! Core password recipient types and operations.
//!
//! - [`algorithm`] - KEK algorithm identifiers and the sizing table
//! - [`error`] - Error types
//! - [`generator`] - Building password recipient infos
//! - [`oid`] - Object identifiers used in the encoding
//! - [`operations`] - Key derivation and key wrapping
//! - [`recipient`] - Recovering the content-encryption key
//! - [`types`] - DER structures

pub mod algorithm;
pub mod error;
pub mod generator;
pub mod oid;
pub mod operations;
pub mod recipient;
pub mod types;

// Re-export commonly used items
pub use algorithm::{AlgorithmSizing, AlgorithmTable, KekAlgorithm};
pub use error::{PwriError, PwriResult};
pub use generator::{PasswordRecipientInfoGenerator, PwriConfig};
pub use recipient::PasswordRecipient;
