//! PBKDF2 algorithm parameters (PKCS #5 v2.0).
//!
//! ```text
//! PBKDF2-params ::= SEQUENCE {
//!     salt            CHOICE { specified OCTET STRING, otherSource AlgorithmIdentifier },
//!     iterationCount  INTEGER (1..MAX),
//!     keyLength       INTEGER (1..MAX) OPTIONAL,
//!     prf             AlgorithmIdentifier DEFAULT algid-hmacWithSHA1 }
//! ```
//!
//! Only the `specified` salt choice is supported.

use der::asn1::OctetString;
use der::Sequence;

use crate::core::types::AlgorithmIdentifier;

/// Encoded form of the PBKDF2 parameters.
#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
pub struct Pbkdf2Params {
    /// The salt.
    pub salt: OctetString,

    /// The iteration count.
    pub iteration_count: u32,

    /// Derived key length in bytes, if recorded.
    #[asn1(optional = "true")]
    pub key_length: Option<u32>,

    /// The PRF; absent means HMAC-SHA1.
    #[asn1(optional = "true")]
    pub prf: Option<AlgorithmIdentifier>,
}
