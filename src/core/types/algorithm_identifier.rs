//! `AlgorithmIdentifier` as used throughout CMS.
//!
//! ```text
//! AlgorithmIdentifier ::= SEQUENCE {
//!     algorithm   OBJECT IDENTIFIER,
//!     parameters  ANY DEFINED BY algorithm OPTIONAL }
//! ```

use der::asn1::{Any, ObjectIdentifier, OctetString};
use der::{Choice, DecodeValue, EncodeValue, Sequence, Tagged};

use crate::core::error::{PwriError, PwriResult};

/// An algorithm identifier with optional, already-encoded parameters.
#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
pub struct AlgorithmIdentifier {
    /// The algorithm's object identifier.
    pub algorithm: ObjectIdentifier,

    /// DER-encoded parameters, if any.
    #[asn1(optional = "true")]
    pub parameters: Option<Any>,
}

impl AlgorithmIdentifier {
    /// Creates an identifier without parameters.
    #[must_use]
    pub const fn new(algorithm: ObjectIdentifier) -> Self {
        Self {
            algorithm,
            parameters: None,
        }
    }

    /// Creates an identifier whose parameters are the DER encoding of `params`.
    ///
    /// # Errors
    ///
    /// Returns [`PwriError::Encoding`] if `params` cannot be encoded.
    pub fn with_parameters<T>(algorithm: ObjectIdentifier, params: &T) -> PwriResult<Self>
    where
        T: Tagged + EncodeValue,
    {
        Ok(Self {
            algorithm,
            parameters: Some(Any::encode_from(params)?),
        })
    }

    /// Creates the `{ algorithm, OCTET STRING iv }` identifier CBC ciphers use.
    ///
    /// # Errors
    ///
    /// Returns [`PwriError::Encoding`] if the IV is too long to encode.
    pub fn with_iv(algorithm: ObjectIdentifier, iv: &[u8]) -> PwriResult<Self> {
        Self::with_parameters(algorithm, &OctetString::new(iv)?)
    }

    /// Decodes the parameters as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`PwriError::InvalidFormat`] if there are no parameters, or
    /// [`PwriError::Encoding`] if they do not decode as `T`.
    pub fn parameters_as<'a, T>(&'a self) -> PwriResult<T>
    where
        T: Choice<'a> + DecodeValue<'a>,
    {
        let params = self.parameters.as_ref().ok_or(PwriError::InvalidFormat)?;
        Ok(params.decode_as::<T>()?)
    }

    /// Returns the IV carried as `OCTET STRING` parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are missing or not an `OCTET STRING`.
    pub fn iv(&self) -> PwriResult<Vec<u8>> {
        Ok(self.parameters_as::<OctetString>()?.into_bytes())
    }

    /// Returns an error unless this identifier names `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`PwriError::UnsupportedAlgorithm`] on mismatch.
    pub fn assert_algorithm(&self, expected: &ObjectIdentifier) -> PwriResult<()> {
        if self.algorithm == *expected {
            Ok(())
        } else {
            Err(PwriError::UnsupportedAlgorithm(self.algorithm))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::oid;
    use der::{Decode, Encode};

    #[test]
    fn test_with_iv_encoding() -> PwriResult<()> {
        let id = AlgorithmIdentifier::with_iv(oid::AES128_CBC, &[0x11; 16])?;
        let der = id.to_der()?;

        let mut expected = vec![0x30, 0x1d, 0x06, 0x09];
        expected.extend_from_slice(&[0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x01, 0x02]);
        expected.extend_from_slice(&[0x04, 0x10]);
        expected.extend_from_slice(&[0x11; 16]);
        assert_eq!(der, expected);

        let decoded = AlgorithmIdentifier::from_der(&der)?;
        assert_eq!(decoded, id);
        assert_eq!(decoded.iv()?, vec![0x11; 16]);
        Ok(())
    }

    #[test]
    fn test_without_parameters() -> PwriResult<()> {
        let id = AlgorithmIdentifier::new(oid::HMAC_WITH_SHA256);
        let decoded = AlgorithmIdentifier::from_der(&id.to_der()?)?;

        assert_eq!(decoded.parameters, None);
        assert!(matches!(decoded.iv(), Err(PwriError::InvalidFormat)));
        Ok(())
    }

    #[test]
    fn test_assert_algorithm() {
        let id = AlgorithmIdentifier::new(oid::PBKDF2);
        assert!(id.assert_algorithm(&oid::PBKDF2).is_ok());
        assert!(matches!(
            id.assert_algorithm(&oid::PWRI_KEK),
            Err(PwriError::UnsupportedAlgorithm(found)) if found == oid::PBKDF2
        ));
    }
}
