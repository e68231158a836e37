//! `PasswordRecipientInfo` (RFC 3211 / RFC 5652 §6.2.4).
//!
//! ```text
//! PasswordRecipientInfo ::= SEQUENCE {
//!     version                 CMSVersion,   -- always 0
//!     keyDerivationAlgorithm  [0] KeyDerivationAlgorithmIdentifier OPTIONAL,
//!     keyEncryptionAlgorithm  KeyEncryptionAlgorithmIdentifier,
//!     encryptedKey            EncryptedKey }
//!
//! RecipientInfo ::= CHOICE { ..., pwri [3] PasswordRecipientInfo, ... }
//! ```
//!
//! The CMS module uses implicit tagging, so the `pwri` alternative is the
//! SEQUENCE with its tag replaced by `[3]`.

use der::asn1::{ContextSpecific, ContextSpecificRef, OctetString};
use der::{Decode, Encode, Reader, Sequence, SliceReader, TagMode, TagNumber};

use crate::core::error::{PwriError, PwriResult};
use crate::core::oid;
use crate::core::types::{AlgorithmIdentifier, Pbkdf2Params};

/// Context tag of the `pwri` alternative of `RecipientInfo`.
const PWRI_TAG: TagNumber = TagNumber::N3;

/// A password recipient info: everything a holder of the password needs
/// to recover the content-encryption key.
#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
#[asn1(tag_mode = "IMPLICIT")]
pub struct PasswordRecipientInfo {
    /// Syntax version; always [`PasswordRecipientInfo::VERSION`].
    pub version: u8,

    /// PBKDF2 with its salt and iteration count.
    #[asn1(context_specific = "0", optional = "true")]
    pub key_derivation_algorithm: Option<AlgorithmIdentifier>,

    /// `id-alg-PWRI-KEK` wrapping the KEK cipher identifier and IV.
    pub key_encryption_algorithm: AlgorithmIdentifier,

    /// The wrapped content-encryption key.
    pub encrypted_key: OctetString,
}

impl PasswordRecipientInfo {
    /// The only version RFC 3211 defines.
    pub const VERSION: u8 = 0;

    /// Decodes a bare `PasswordRecipientInfo` SEQUENCE.
    ///
    /// # Errors
    ///
    /// Returns [`PwriError::Encoding`] on malformed DER.
    pub fn from_der_bytes(bytes: &[u8]) -> PwriResult<Self> {
        Ok(Self::from_der(bytes)?)
    }

    /// Encodes as a bare `PasswordRecipientInfo` SEQUENCE.
    ///
    /// # Errors
    ///
    /// Returns [`PwriError::Encoding`] if encoding fails.
    pub fn to_der_bytes(&self) -> PwriResult<Vec<u8>> {
        Ok(self.to_der()?)
    }

    /// Encodes as the `pwri` alternative of `RecipientInfo` (`[3] IMPLICIT`).
    ///
    /// # Errors
    ///
    /// Returns [`PwriError::Encoding`] if encoding fails.
    pub fn to_recipient_info_der(&self) -> PwriResult<Vec<u8>> {
        let tagged = ContextSpecificRef {
            tag_number: PWRI_TAG,
            tag_mode: TagMode::Implicit,
            value: self,
        };
        Ok(tagged.to_der()?)
    }

    /// Decodes the `pwri` alternative of `RecipientInfo`.
    ///
    /// # Errors
    ///
    /// Returns [`PwriError::InvalidFormat`] if the input is another
    /// `RecipientInfo` alternative, or [`PwriError::Encoding`] on malformed DER.
    pub fn from_recipient_info_der(bytes: &[u8]) -> PwriResult<Self> {
        let mut reader = SliceReader::new(bytes)?;
        let tagged = ContextSpecific::<Self>::decode_implicit(&mut reader, PWRI_TAG)?
            .ok_or(PwriError::InvalidFormat)?;
        Ok(reader.finish(tagged.value)?)
    }

    /// Returns the wrapped content-encryption key bytes.
    #[must_use]
    pub fn encrypted_key(&self) -> &[u8] {
        self.encrypted_key.as_bytes()
    }

    /// Returns the PBKDF2 parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PwriError::InvalidFormat`] if no key derivation algorithm is
    /// present, or [`PwriError::UnsupportedAlgorithm`] if it is not PBKDF2.
    pub fn pbkdf2_params(&self) -> PwriResult<Pbkdf2Params> {
        let kdf = self
            .key_derivation_algorithm
            .as_ref()
            .ok_or(PwriError::InvalidFormat)?;
        kdf.assert_algorithm(&oid::PBKDF2)?;
        kdf.parameters_as::<Pbkdf2Params>()
    }

    /// Returns the salt recorded in the PBKDF2 parameters.
    ///
    /// # Errors
    ///
    /// See [`PasswordRecipientInfo::pbkdf2_params`].
    pub fn salt(&self) -> PwriResult<Vec<u8>> {
        Ok(self.pbkdf2_params()?.salt.into_bytes())
    }

    /// Returns the iteration count recorded in the PBKDF2 parameters.
    ///
    /// # Errors
    ///
    /// See [`PasswordRecipientInfo::pbkdf2_params`].
    pub fn iteration_count(&self) -> PwriResult<u32> {
        Ok(self.pbkdf2_params()?.iteration_count)
    }

    /// Returns the KEK cipher identifier (with its IV) nested inside the
    /// `id-alg-PWRI-KEK` parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PwriError::UnsupportedAlgorithm`] if the key-encryption
    /// algorithm is not `id-alg-PWRI-KEK`.
    pub fn kek_algorithm(&self) -> PwriResult<AlgorithmIdentifier> {
        self.key_encryption_algorithm
            .assert_algorithm(&oid::PWRI_KEK)?;
        self.key_encryption_algorithm
            .parameters_as::<AlgorithmIdentifier>()
    }
}
