//! Error types for password recipient operations.
//!
//! This module provides a unified error type for generating and recovering
//! password recipient infos. Error messages are intentionally vague for
//! security-sensitive operations to avoid leaking information that could
//! aid attacks.

use der::asn1::ObjectIdentifier;
use thiserror::Error;

/// Errors that can occur when generating or processing a password recipient.
#[derive(Debug, Error)]
pub enum PwriError {
    /// The key-encryption algorithm has no entry in the algorithm table.
    #[error("Unknown key-encryption algorithm: {0}")]
    UnknownAlgorithm(ObjectIdentifier),

    /// Key derivation failed (zero iterations, empty salt, bad output size).
    #[error("Key derivation failed")]
    KeyDerivationFailed,

    /// The key wrap operation failed.
    #[error("Key wrap failed")]
    WrapFailed,

    /// The key material is invalid (wrong size for the cipher, etc.).
    #[error("Invalid key material")]
    InvalidKey,

    /// Unwrapping the content-encryption key failed (wrong password,
    /// corrupted data, etc.).
    /// Intentionally vague for security.
    #[error("Key unwrap failed")]
    UnwrapFailed,

    /// The record names an algorithm this crate cannot process.
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(ObjectIdentifier),

    /// The record is structurally invalid.
    #[error("Invalid password recipient info")]
    InvalidFormat,

    /// DER encoding or decoding error.
    #[error("DER error: {0}")]
    Encoding(der::Error),

    /// The random source failed to produce bytes.
    #[error("Random source unavailable")]
    EntropyUnavailable,
}

impl PwriError {
    /// Returns `true` for configuration errors raised before any
    /// randomness is consumed.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::UnknownAlgorithm(_))
    }

    /// Returns `true` when the key derivation primitive rejected its inputs.
    #[must_use]
    pub const fn is_derivation(&self) -> bool {
        matches!(self, Self::KeyDerivationFailed)
    }

    /// Returns `true` for failures reported by a key wrap delegate.
    #[must_use]
    pub const fn is_wrap(&self) -> bool {
        matches!(self, Self::WrapFailed | Self::InvalidKey)
    }
}

// Not `#[from]`: without its `std` feature `der::Error` does not implement
// `std::error::Error`, so it cannot be the error source.
impl From<der::Error> for PwriError {
    fn from(err: der::Error) -> Self {
        Self::Encoding(err)
    }
}

/// Result type alias for password recipient operations.
pub type PwriResult<T> = Result<T, PwriError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let oid = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.1.2");
        let err = PwriError::UnknownAlgorithm(oid);
        assert_eq!(
            err.to_string(),
            "Unknown key-encryption algorithm: 2.16.840.1.101.3.4.1.2"
        );

        let err = PwriError::KeyDerivationFailed;
        assert_eq!(err.to_string(), "Key derivation failed");

        let err = PwriError::WrapFailed;
        assert_eq!(err.to_string(), "Key wrap failed");

        let err = PwriError::UnwrapFailed;
        assert_eq!(err.to_string(), "Key unwrap failed");

        let err = PwriError::InvalidFormat;
        assert_eq!(err.to_string(), "Invalid password recipient info");

        let err = PwriError::EntropyUnavailable;
        assert_eq!(err.to_string(), "Random source unavailable");
    }

    #[test]
    fn test_error_taxonomy() {
        let oid = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.1.2");
        assert!(PwriError::UnknownAlgorithm(oid).is_configuration());
        assert!(PwriError::KeyDerivationFailed.is_derivation());
        assert!(PwriError::WrapFailed.is_wrap());
        assert!(PwriError::InvalidKey.is_wrap());
        assert!(!PwriError::UnwrapFailed.is_wrap());
        assert!(!PwriError::KeyDerivationFailed.is_configuration());
    }

    #[test]
    fn test_from_der_error() {
        use crate::core::types::Pbkdf2Params;
        use der::Decode;

        // SEQUENCE claiming 14 bytes, ending inside the salt.
        let truncated = [0x30, 0x0e, 0x04, 0x08, 0x00, 0x00];
        let err: PwriError = Pbkdf2Params::from_der(&truncated)
            .map(|_| ())
            .expect_err("truncated input must not decode")
            .into();

        assert!(matches!(err, PwriError::Encoding(_)));
        assert!(err.to_string().starts_with("DER error: "));
        assert!(!err.is_configuration() && !err.is_derivation() && !err.is_wrap());
    }

    #[test]
    fn test_error_debug() {
        let err = PwriError::InvalidFormat;
        let debug_str = format!("{err:?}");
        assert!(debug_str.contains("InvalidFormat"));
    }
}
