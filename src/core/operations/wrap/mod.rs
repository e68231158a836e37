//! Key wrapping contracts.
//!
//! Wrapping the content-encryption key under the derived key-encryption
//! key is delegated to a [`KeyWrapper`]. The generator hands it the KEK
//! algorithm identifier (carrying the IV), the derived key and the
//! content-encryption key, and stores whatever bytes come back. Errors
//! are passed through unchanged.
//!
//! [`KeyUnwrapper`] is the inverse used when recovering the key.
//!
//! Closures implement both traits, so a one-off delegate needs no type:
//!
//! ```rust
//! use pwri::core::error::PwriResult;
//! use pwri::core::operations::wrap::KeyWrapper;
//! use pwri::core::types::AlgorithmIdentifier;
//!
//! fn wrap_with<W: KeyWrapper>(mut wrapper: W) -> PwriResult<Vec<u8>> {
//!     let kek = AlgorithmIdentifier::new(pwri::core::oid::AES128_CBC);
//!     wrapper.wrap(&kek, &[0u8; 16], &[0xaa; 16])
//! }
//!
//! let wrapped = wrap_with(|_kek: &AlgorithmIdentifier, _key: &[u8], cek: &[u8]| -> PwriResult<Vec<u8>> {
//!     Ok(cek.iter().rev().copied().collect())
//! })
//! .expect("wrap should succeed");
//! assert_eq!(wrapped.len(), 16);
//! ```
//!
//! [`Rfc3211KeyWrap`] is the standard implementation (feature `rfc3211`).

#[cfg(feature = "rfc3211")]
mod rfc3211;

#[cfg(feature = "rfc3211")]
pub use rfc3211::Rfc3211KeyWrap;

use crate::core::error::PwriResult;
use crate::core::types::AlgorithmIdentifier;

/// Wraps a content-encryption key under a key-encryption key.
pub trait KeyWrapper {
    /// Wraps `content_key` with `kek` using the cipher and IV named by
    /// `kek_algorithm`.
    ///
    /// # Errors
    ///
    /// Implementation-defined; returned to the caller of `generate` as is.
    fn wrap(
        &mut self,
        kek_algorithm: &AlgorithmIdentifier,
        kek: &[u8],
        content_key: &[u8],
    ) -> PwriResult<Vec<u8>>;
}

/// Recovers a content-encryption key wrapped by a [`KeyWrapper`].
pub trait KeyUnwrapper {
    /// Unwraps `wrapped_key` with `kek` using the cipher and IV named by
    /// `kek_algorithm`.
    ///
    /// # Errors
    ///
    /// Implementation-defined; typically [`PwriError::UnwrapFailed`] for a
    /// wrong password.
    ///
    /// [`PwriError::UnwrapFailed`]: crate::core::error::PwriError::UnwrapFailed
    fn unwrap_key(
        &self,
        kek_algorithm: &AlgorithmIdentifier,
        kek: &[u8],
        wrapped_key: &[u8],
    ) -> PwriResult<Vec<u8>>;
}

impl<F> KeyWrapper for F
where
    F: FnMut(&AlgorithmIdentifier, &[u8], &[u8]) -> PwriResult<Vec<u8>>,
{
    fn wrap(
        &mut self,
        kek_algorithm: &AlgorithmIdentifier,
        kek: &[u8],
        content_key: &[u8],
    ) -> PwriResult<Vec<u8>> {
        self(kek_algorithm, kek, content_key)
    }
}

impl<F> KeyUnwrapper for F
where
    F: Fn(&AlgorithmIdentifier, &[u8], &[u8]) -> PwriResult<Vec<u8>>,
{
    fn unwrap_key(
        &self,
        kek_algorithm: &AlgorithmIdentifier,
        kek: &[u8],
        wrapped_key: &[u8],
    ) -> PwriResult<Vec<u8>> {
        self(kek_algorithm, kek, wrapped_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::PwriError;
    use crate::core::oid;

    #[test]
    fn test_closure_as_wrapper() -> PwriResult<()> {
        let mut calls = 0;
        let mut wrapper =
            |kek_alg: &AlgorithmIdentifier, kek: &[u8], cek: &[u8]| -> PwriResult<Vec<u8>> {
                calls += 1;
                assert_eq!(kek_alg.algorithm, oid::AES128_CBC);
                Ok(kek.iter().zip(cek).map(|(a, b)| a ^ b).collect())
            };

        let kek_alg = AlgorithmIdentifier::new(oid::AES128_CBC);
        let wrapped = KeyWrapper::wrap(&mut wrapper, &kek_alg, &[0x0f; 4], &[0xf0; 4])?;
        assert_eq!(wrapped, vec![0xff; 4]);
        assert_eq!(calls, 1);
        Ok(())
    }

    #[test]
    fn test_closure_error_passes_through() {
        let mut wrapper = |_: &AlgorithmIdentifier, _: &[u8], _: &[u8]| -> PwriResult<Vec<u8>> {
            Err(PwriError::InvalidKey)
        };

        let kek_alg = AlgorithmIdentifier::new(oid::AES128_CBC);
        let result = KeyWrapper::wrap(&mut wrapper, &kek_alg, &[], &[]);
        assert!(matches!(result, Err(PwriError::InvalidKey)));
    }
}
