//! Password recipient info (RFC 3211) for CMS enveloped data.
//!
//! A `PasswordRecipientInfo` lets anyone who knows a password recover the
//! content-encryption key (CEK) of a CMS message. The password is stretched
//! with PBKDF2 into a key-encryption key (KEK), and the CEK is wrapped under
//! it. Salt, iteration count and the KEK cipher with its IV are all recorded
//! so the recipient can repeat the derivation.
//!
//! # Quick Start
//!
//! ```rust
//! # #[cfg(feature = "rfc3211")]
//! # {
//! use pwri::core::algorithm::KekAlgorithm;
//! use pwri::core::generator::PasswordRecipientInfoGenerator;
//! use pwri::core::operations::wrap::Rfc3211KeyWrap;
//! use pwri::core::recipient::PasswordRecipient;
//! use pwri::core::types::PasswordRecipientInfo;
//!
//! let content_key = [0xaa; 16];
//!
//! let mut generator = PasswordRecipientInfoGenerator::new(
//!     KekAlgorithm::Aes128Cbc,
//!     "correct horse",
//!     Rfc3211KeyWrap::new(),
//! )
//! .expect("AES-128-CBC is in the standard table");
//!
//! // DER for the `pwri [3]` alternative of a CMS RecipientInfo
//! let der = generator
//!     .generate(&content_key)
//!     .and_then(|pwri| pwri.to_recipient_info_der())
//!     .expect("generation should succeed");
//!
//! let parsed = PasswordRecipientInfo::from_recipient_info_der(&der).expect("valid DER");
//! let recovered = PasswordRecipient::new("correct horse")
//!     .recover_content_key(&parsed, &Rfc3211KeyWrap::new())
//!     .expect("same password recovers the key");
//! assert_eq!(recovered.as_slice(), &content_key);
//! # }
//! ```
//!
//! # KEK Algorithms
//!
//! | Algorithm | Key | Block / IV |
//! |-----------|-----|------------|
//! | DES-EDE3-CBC | 192 bits | 8 bytes |
//! | AES-128-CBC | 128 bits | 16 bytes |
//! | AES-192-CBC | 192 bits | 16 bytes |
//! | AES-256-CBC | 256 bits | 16 bytes |
//!
//! Other ciphers can be added through a custom
//! [`AlgorithmTable`](core::algorithm::AlgorithmTable) or explicit
//! [`AlgorithmSizing`](core::algorithm::AlgorithmSizing), together with a
//! matching [`KeyWrapper`](core::operations::wrap::KeyWrapper).
//!
//! # Features
//!
//! ```toml
//! [dependencies]
//! pwri = "0.1"  # includes the RFC 3211 key wrap
//! pwri = { version = "0.1", default-features = false }  # bring your own wrap
//! pwri = { version = "0.1", features = ["prelude"] }  # ergonomic imports
//! ```
//!
//! # Security
//!
//! - Passwords and derived keys are zeroized on drop
//! - Debug output redacts passwords and salts
//! - Unwrap check bytes are compared in constant time
//! - No unsafe code
//!
//! # Modules
//!
//! - [`core`] - Core types and operations
//! - [`prelude`] - Ergonomic imports (requires `prelude` feature)

#![forbid(unsafe_code)]

pub mod core;

#[cfg(feature = "prelude")]
pub mod prelude;

// Re-export commonly used items at crate root
pub use core::algorithm::{AlgorithmSizing, AlgorithmTable, KekAlgorithm};
pub use core::error::{PwriError, PwriResult};
pub use core::generator::{PasswordRecipientInfoGenerator, PwriConfig};
pub use core::operations::kdf::{PasswordConversion, Prf};
pub use core::operations::wrap::{KeyUnwrapper, KeyWrapper};
pub use core::recipient::PasswordRecipient;
pub use core::types::PasswordRecipientInfo;

#[cfg(feature = "rfc3211")]
pub use core::operations::wrap::Rfc3211KeyWrap;
