//! Cryptographic operations for password recipients.
//!
//! - [`kdf`] - Password conversion and PBKDF2 key derivation
//! - [`wrap`] - Key wrap delegate contracts and the RFC 3211 wrap

pub mod kdf;
pub mod wrap;
