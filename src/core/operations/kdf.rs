//! PBKDF2 key derivation for password recipients.
//!
//! The password is first converted to bytes with a [`PasswordConversion`]
//! and then stretched with PBKDF2 into a key-encryption key of the size
//! the KEK algorithm requires.
//!
//! The conversion is not recorded in the recipient info. Sender and
//! recipient must agree on it out of band; [`PasswordConversion::Utf8`] is
//! the default on both sides.

use der::asn1::{Any, ObjectIdentifier, OctetString};
use hmac::Hmac;
use rand_core::TryCryptoRng;
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};
use zeroize::Zeroizing;

use crate::core::error::{PwriError, PwriResult};
use crate::core::oid;
use crate::core::types::{AlgorithmIdentifier, Pbkdf2Params};

/// How the character password is turned into PBKDF2 input bytes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PasswordConversion {
    /// PKCS #5 legacy conversion: each UTF-16 code unit truncated to its
    /// low byte. Only ASCII and Latin-1 passwords survive it intact.
    Pkcs5,
    /// Full UTF-8 encoding.
    #[default]
    Utf8,
}

impl PasswordConversion {
    /// Converts `password` to bytes.
    #[must_use]
    pub fn to_bytes(self, password: &str) -> Zeroizing<Vec<u8>> {
        match self {
            // Truncation is the legacy behaviour.
            Self::Pkcs5 => Zeroizing::new(password.encode_utf16().map(|unit| unit as u8).collect()),
            Self::Utf8 => Zeroizing::new(password.as_bytes().to_vec()),
        }
    }
}

/// Pseudorandom function used inside PBKDF2.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prf {
    /// HMAC-SHA1, the PKCS #5 default. Encoded by omission.
    #[default]
    HmacSha1,
    /// HMAC-SHA256.
    HmacSha256,
    /// HMAC-SHA384.
    HmacSha384,
    /// HMAC-SHA512.
    HmacSha512,
}

impl Prf {
    /// Returns the PRF's object identifier.
    #[must_use]
    pub const fn oid(self) -> ObjectIdentifier {
        match self {
            Self::HmacSha1 => oid::HMAC_WITH_SHA1,
            Self::HmacSha256 => oid::HMAC_WITH_SHA256,
            Self::HmacSha384 => oid::HMAC_WITH_SHA384,
            Self::HmacSha512 => oid::HMAC_WITH_SHA512,
        }
    }

    /// Returns the `prf` field to encode: `None` for the default.
    #[must_use]
    pub fn algorithm_identifier(self) -> Option<AlgorithmIdentifier> {
        match self {
            Self::HmacSha1 => None,
            _ => Some(AlgorithmIdentifier {
                algorithm: self.oid(),
                parameters: Some(Any::null()),
            }),
        }
    }

    /// Reads the PRF from a decoded `prf` field.
    ///
    /// # Errors
    ///
    /// Returns [`PwriError::UnsupportedAlgorithm`] for any other PRF.
    pub fn from_algorithm_identifier(prf: Option<&AlgorithmIdentifier>) -> PwriResult<Self> {
        let Some(prf) = prf else {
            return Ok(Self::HmacSha1);
        };
        [
            Self::HmacSha1,
            Self::HmacSha256,
            Self::HmacSha384,
            Self::HmacSha512,
        ]
        .into_iter()
        .find(|candidate| candidate.oid() == prf.algorithm)
        .ok_or(PwriError::UnsupportedAlgorithm(prf.algorithm))
    }
}

/// Salt and iteration count for one derivation.
#[derive(Clone, PartialEq, Eq)]
pub struct DerivationParams {
    salt: Vec<u8>,
    iteration_count: u32,
}

impl core::fmt::Debug for DerivationParams {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DerivationParams")
            .field("salt_len", &self.salt.len())
            .field("iteration_count", &self.iteration_count)
            .finish()
    }
}

impl DerivationParams {
    /// Length of a generated salt.
    pub const DEFAULT_SALT_LEN: usize = 20;

    /// Iteration count used with a generated salt.
    pub const DEFAULT_ITERATION_COUNT: u32 = 1024;

    /// Creates explicit parameters. They are validated at derivation time.
    #[must_use]
    pub fn new(salt: impl Into<Vec<u8>>, iteration_count: u32) -> Self {
        Self {
            salt: salt.into(),
            iteration_count,
        }
    }

    /// Draws a fresh [`DEFAULT_SALT_LEN`](Self::DEFAULT_SALT_LEN)-byte salt
    /// and pairs it with [`DEFAULT_ITERATION_COUNT`](Self::DEFAULT_ITERATION_COUNT).
    ///
    /// # Errors
    ///
    /// Returns [`PwriError::EntropyUnavailable`] if the random source fails.
    pub fn generate<R: TryCryptoRng + ?Sized>(rng: &mut R) -> PwriResult<Self> {
        let salt = random_bytes(rng, Self::DEFAULT_SALT_LEN)?;
        Ok(Self::new(salt, Self::DEFAULT_ITERATION_COUNT))
    }

    /// Returns the salt.
    #[must_use]
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// Returns the iteration count.
    #[must_use]
    pub const fn iteration_count(&self) -> u32 {
        self.iteration_count
    }

    /// Builds the encoded parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PwriError::Encoding`] if the salt cannot be encoded.
    pub fn to_pbkdf2_params(&self, prf: Prf) -> PwriResult<Pbkdf2Params> {
        Ok(Pbkdf2Params {
            salt: OctetString::new(self.salt.as_slice())?,
            iteration_count: self.iteration_count,
            key_length: None,
            prf: prf.algorithm_identifier(),
        })
    }
}

impl From<&Pbkdf2Params> for DerivationParams {
    fn from(params: &Pbkdf2Params) -> Self {
        Self::new(params.salt.as_bytes(), params.iteration_count)
    }
}

/// Derives `key_len` bytes of key material from `password`.
///
/// Deterministic: the same inputs always give the same key.
///
/// # Errors
///
/// Returns [`PwriError::KeyDerivationFailed`] if the iteration count is
/// zero, the salt is empty, or `key_len` is zero.
pub fn derive_key(
    password: &str,
    conversion: PasswordConversion,
    params: &DerivationParams,
    prf: Prf,
    key_len: usize,
) -> PwriResult<Zeroizing<Vec<u8>>> {
    if params.iteration_count == 0 || params.salt.is_empty() || key_len == 0 {
        return Err(PwriError::KeyDerivationFailed);
    }

    tracing::trace!(
        iterations = params.iteration_count,
        key_len,
        ?prf,
        ?conversion,
        "deriving key-encryption key"
    );

    let password = conversion.to_bytes(password);
    let mut key = Zeroizing::new(vec![0u8; key_len]);
    let salt = params.salt.as_slice();
    let rounds = params.iteration_count;

    match prf {
        Prf::HmacSha1 => pbkdf2::pbkdf2::<Hmac<Sha1>>(&password, salt, rounds, &mut key),
        Prf::HmacSha256 => pbkdf2::pbkdf2::<Hmac<Sha256>>(&password, salt, rounds, &mut key),
        Prf::HmacSha384 => pbkdf2::pbkdf2::<Hmac<Sha384>>(&password, salt, rounds, &mut key),
        Prf::HmacSha512 => pbkdf2::pbkdf2::<Hmac<Sha512>>(&password, salt, rounds, &mut key),
    }
    .map_err(|_| PwriError::KeyDerivationFailed)?;

    Ok(key)
}

/// Fills a new buffer of `len` bytes from `rng`.
pub(crate) fn random_bytes<R: TryCryptoRng + ?Sized>(rng: &mut R, len: usize) -> PwriResult<Vec<u8>> {
    let mut bytes = vec![0u8; len];
    rng.try_fill_bytes(&mut bytes)
        .map_err(|_| PwriError::EntropyUnavailable)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> DerivationParams {
        DerivationParams::new([0u8; 8], 2048)
    }

    #[test]
    fn test_derive_golden_vector() -> PwriResult<()> {
        // PBKDF2-HMAC-SHA1("correct horse", 00 * 8, 2048, 16)
        let key = derive_key("correct horse", PasswordConversion::Utf8, &params(), Prf::HmacSha1, 16)?;
        assert_eq!(hex::encode(key.as_slice()), "5b61ebcd430f0196686b298500d095a2");
        Ok(())
    }

    #[test]
    fn test_derive_is_deterministic() -> PwriResult<()> {
        let first = derive_key("hunter2", PasswordConversion::Utf8, &params(), Prf::HmacSha256, 32)?;
        let second = derive_key("hunter2", PasswordConversion::Utf8, &params(), Prf::HmacSha256, 32)?;
        assert_eq!(first, second);
        assert_eq!(first.len(), 32);
        Ok(())
    }

    #[test]
    fn test_conversions_differ_for_non_ascii() -> PwriResult<()> {
        let pkcs5 = derive_key("pässwörd", PasswordConversion::Pkcs5, &params(), Prf::HmacSha1, 16)?;
        let utf8 = derive_key("pässwörd", PasswordConversion::Utf8, &params(), Prf::HmacSha1, 16)?;
        assert_ne!(pkcs5, utf8);
        Ok(())
    }

    #[test]
    fn test_conversions_agree_for_ascii() -> PwriResult<()> {
        let pkcs5 = derive_key("hunter2", PasswordConversion::Pkcs5, &params(), Prf::HmacSha1, 16)?;
        let utf8 = derive_key("hunter2", PasswordConversion::Utf8, &params(), Prf::HmacSha1, 16)?;
        assert_eq!(pkcs5, utf8);
        Ok(())
    }

    #[test]
    fn test_pkcs5_conversion_truncates() {
        assert_eq!(PasswordConversion::Pkcs5.to_bytes("é").as_slice(), &[0xe9]);
        assert_eq!(PasswordConversion::Utf8.to_bytes("é").as_slice(), &[0xc3, 0xa9]);
        // U+20AC keeps only its low byte.
        assert_eq!(PasswordConversion::Pkcs5.to_bytes("€").as_slice(), &[0xac]);
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let bad = DerivationParams::new([0u8; 8], 0);
        let result = derive_key("hunter2", PasswordConversion::Utf8, &bad, Prf::HmacSha1, 16);
        assert!(matches!(result, Err(PwriError::KeyDerivationFailed)));
    }

    #[test]
    fn test_empty_salt_rejected() {
        let bad = DerivationParams::new(Vec::new(), 1024);
        let result = derive_key("hunter2", PasswordConversion::Utf8, &bad, Prf::HmacSha1, 16);
        assert!(matches!(result, Err(PwriError::KeyDerivationFailed)));
    }

    #[test]
    fn test_prf_encoding() -> PwriResult<()> {
        assert_eq!(Prf::HmacSha1.algorithm_identifier(), None);
        assert_eq!(Prf::from_algorithm_identifier(None)?, Prf::HmacSha1);

        for prf in [Prf::HmacSha256, Prf::HmacSha384, Prf::HmacSha512] {
            let id = prf.algorithm_identifier();
            assert_eq!(Prf::from_algorithm_identifier(id.as_ref())?, prf);
        }

        let unknown = AlgorithmIdentifier::new(oid::PBKDF2);
        assert!(matches!(
            Prf::from_algorithm_identifier(Some(&unknown)),
            Err(PwriError::UnsupportedAlgorithm(_))
        ));
        Ok(())
    }

    #[test]
    fn test_generated_params_use_defaults() -> PwriResult<()> {
        let mut rng = rand_core::OsRng;
        let first = DerivationParams::generate(&mut rng)?;
        let second = DerivationParams::generate(&mut rng)?;

        assert_eq!(first.salt().len(), DerivationParams::DEFAULT_SALT_LEN);
        assert_eq!(first.iteration_count(), DerivationParams::DEFAULT_ITERATION_COUNT);
        assert_ne!(first.salt(), second.salt());
        Ok(())
    }

    #[test]
    fn test_debug_redacts_salt() {
        let debug_str = format!("{:?}", DerivationParams::new([0xab; 8], 1024));
        assert!(debug_str.contains("salt_len: 8"));
        assert!(!debug_str.contains("171"));
    }
}
