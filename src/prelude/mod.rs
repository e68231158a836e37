//! Ergonomic imports for password recipient work.
//!
//! ```rust
//! # #[cfg(feature = "rfc3211")]
//! # {
//! use pwri::prelude::*;
//!
//! let mut generator = PasswordRecipientInfoGenerator::new(
//!     KekAlgorithm::Aes256Cbc,
//!     "correct horse",
//!     Rfc3211KeyWrap::new(),
//! )
//! .expect("AES-256-CBC is in the standard table")
//! .prf(Prf::HmacSha256);
//!
//! let pwri = generator.generate(&[0x42; 32]).expect("generation should succeed");
//! let cek = PasswordRecipient::new("correct horse")
//!     .recover_content_key(&pwri, &Rfc3211KeyWrap::new())
//!     .expect("same password recovers the key");
//! assert_eq!(cek.as_slice(), &[0x42; 32]);
//! # }
//! ```

pub use crate::core::algorithm::{AlgorithmSizing, AlgorithmTable, KekAlgorithm};
pub use crate::core::error::{PwriError, PwriResult};
pub use crate::core::generator::{PasswordRecipientInfoGenerator, PwriConfig};
pub use crate::core::operations::kdf::{DerivationParams, PasswordConversion, Prf};
pub use crate::core::operations::wrap::{KeyUnwrapper, KeyWrapper};
pub use crate::core::recipient::PasswordRecipient;
pub use crate::core::types::{AlgorithmIdentifier, PasswordRecipientInfo};

#[cfg(feature = "rfc3211")]
pub use crate::core::operations::wrap::Rfc3211KeyWrap;
