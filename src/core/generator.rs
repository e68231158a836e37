//! Password recipient info generation.
//!
//! Generation is split in two:
//!
//! - [`PwriConfig`] holds everything fixed before generation (password,
//!   KEK algorithm and sizing, password conversion, PRF, optional explicit
//!   salt and iteration count). [`PwriConfig::assemble`] is a pure function
//!   of the configuration plus an explicit salt, IV and wrap delegate.
//! - [`PasswordRecipientInfoGenerator`] pairs a configuration with a random
//!   source and a wrap delegate. Its [`generate`] fills in the IV and, when
//!   none was configured, a fresh salt before calling `assemble`.
//!
//! Defaulted salts are not stored back into the configuration: every
//! `generate` call without an explicit salt draws a new one.
//!
//! # Example
//!
//! ```rust
//! use pwri::core::algorithm::KekAlgorithm;
//! use pwri::core::error::PwriResult;
//! use pwri::core::generator::PasswordRecipientInfoGenerator;
//! use pwri::core::types::AlgorithmIdentifier;
//!
//! // Any wrap delegate works; `Rfc3211KeyWrap` is the standard one.
//! let wrap = |_: &AlgorithmIdentifier, kek: &[u8], cek: &[u8]| -> PwriResult<Vec<u8>> {
//!     Ok(cek.iter().zip(kek).map(|(c, k)| c ^ k).collect())
//! };
//!
//! let mut generator = PasswordRecipientInfoGenerator::new(
//!     KekAlgorithm::Aes128Cbc,
//!     "correct horse",
//!     wrap,
//! )
//! .expect("AES-128-CBC is in the standard table")
//! .salt_and_iteration_count([0u8; 8], 2048);
//!
//! let pwri = generator.generate(&[0xaa; 16]).expect("generation should succeed");
//! assert_eq!(pwri.salt().expect("PBKDF2 params"), vec![0u8; 8]);
//! assert_eq!(pwri.iteration_count().expect("PBKDF2 params"), 2048);
//! ```
//!
//! # Concurrency
//!
//! A generator is used by one caller at a time; `generate` takes
//! `&mut self` because it draws from the random source and may mutate the
//! wrap delegate. Share it across threads behind a lock if needed.
//!
//! [`generate`]: PasswordRecipientInfoGenerator::generate

use core::fmt::{self, Debug};

use der::asn1::{ObjectIdentifier, OctetString};
use rand_core::{OsRng, TryCryptoRng};
use zeroize::Zeroizing;

use crate::core::algorithm::{AlgorithmSizing, AlgorithmTable};
use crate::core::error::{PwriError, PwriResult};
use crate::core::oid;
use crate::core::operations::kdf::{
    derive_key, random_bytes, DerivationParams, PasswordConversion, Prf,
};
use crate::core::operations::wrap::KeyWrapper;
use crate::core::types::{AlgorithmIdentifier, PasswordRecipientInfo};

/// Configuration of a password recipient.
#[derive(Clone)]
pub struct PwriConfig {
    password: Zeroizing<String>,
    kek_algorithm: ObjectIdentifier,
    sizing: AlgorithmSizing,
    conversion: PasswordConversion,
    prf: Prf,
    derivation: Option<DerivationParams>,
}

impl Debug for PwriConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PwriConfig")
            .field("password", &"[REDACTED]")
            .field("kek_algorithm", &self.kek_algorithm)
            .field("sizing", &self.sizing)
            .field("conversion", &self.conversion)
            .field("prf", &self.prf)
            .field("derivation", &self.derivation)
            .finish()
    }
}

impl PwriConfig {
    /// Creates a configuration sized from the standard algorithm table.
    ///
    /// # Errors
    ///
    /// Returns [`PwriError::UnknownAlgorithm`] if `kek_algorithm` is not in
    /// [`AlgorithmTable::STANDARD`].
    pub fn new(kek_algorithm: impl Into<ObjectIdentifier>, password: &str) -> PwriResult<Self> {
        Self::with_table(&AlgorithmTable::STANDARD, kek_algorithm, password)
    }

    /// Creates a configuration sized from `table`.
    ///
    /// # Errors
    ///
    /// Returns [`PwriError::UnknownAlgorithm`] if `kek_algorithm` is not in
    /// `table`.
    pub fn with_table(
        table: &AlgorithmTable,
        kek_algorithm: impl Into<ObjectIdentifier>,
        password: &str,
    ) -> PwriResult<Self> {
        let kek_algorithm = kek_algorithm.into();
        let sizing = table.sizes_for(&kek_algorithm)?;
        Ok(Self::with_sizing(kek_algorithm, password, sizing))
    }

    /// Creates a configuration with explicit sizes, bypassing the table.
    #[must_use]
    pub fn with_sizing(
        kek_algorithm: impl Into<ObjectIdentifier>,
        password: &str,
        sizing: AlgorithmSizing,
    ) -> Self {
        Self {
            password: Zeroizing::new(password.to_owned()),
            kek_algorithm: kek_algorithm.into(),
            sizing,
            conversion: PasswordConversion::default(),
            prf: Prf::default(),
            derivation: None,
        }
    }

    /// Sets how the password is converted to bytes.
    #[must_use]
    pub fn password_conversion(mut self, conversion: PasswordConversion) -> Self {
        self.conversion = conversion;
        self
    }

    /// Uses this salt and iteration count instead of generating them.
    #[must_use]
    pub fn salt_and_iteration_count(mut self, salt: impl Into<Vec<u8>>, iteration_count: u32) -> Self {
        self.derivation = Some(DerivationParams::new(salt, iteration_count));
        self
    }

    /// Sets the PBKDF2 pseudorandom function.
    #[must_use]
    pub fn prf(mut self, prf: Prf) -> Self {
        self.prf = prf;
        self
    }

    /// The key-encryption algorithm.
    #[must_use]
    pub const fn kek_algorithm(&self) -> ObjectIdentifier {
        self.kek_algorithm
    }

    /// Key and block sizes for the key-encryption algorithm.
    #[must_use]
    pub const fn sizing(&self) -> AlgorithmSizing {
        self.sizing
    }

    /// The configured password conversion.
    #[must_use]
    pub const fn conversion(&self) -> PasswordConversion {
        self.conversion
    }

    /// The configured PRF.
    #[must_use]
    pub const fn prf_algorithm(&self) -> Prf {
        self.prf
    }

    /// The explicit salt and iteration count, if set.
    #[must_use]
    pub const fn derivation_params(&self) -> Option<&DerivationParams> {
        self.derivation.as_ref()
    }

    /// Derives the key-encryption key, wraps `content_key` and assembles
    /// the recipient info.
    ///
    /// `iv` must be `sizing().block_bytes` long.
    ///
    /// # Errors
    ///
    /// - [`PwriError::InvalidFormat`] if `iv` has the wrong length
    /// - [`PwriError::KeyDerivationFailed`] if PBKDF2 rejects `params`
    /// - whatever `wrapper` returns, unchanged
    pub fn assemble<W: KeyWrapper + ?Sized>(
        &self,
        params: &DerivationParams,
        iv: &[u8],
        content_key: &[u8],
        wrapper: &mut W,
    ) -> PwriResult<PasswordRecipientInfo> {
        if iv.len() != self.sizing.block_bytes {
            return Err(PwriError::InvalidFormat);
        }

        let kek = derive_key(
            &self.password,
            self.conversion,
            params,
            self.prf,
            self.sizing.key_len(),
        )?;

        let kek_algorithm = AlgorithmIdentifier::with_iv(self.kek_algorithm, iv)?;
        let encrypted_key = wrapper.wrap(&kek_algorithm, &kek, content_key)?;

        let key_derivation_algorithm =
            AlgorithmIdentifier::with_parameters(oid::PBKDF2, &params.to_pbkdf2_params(self.prf)?)?;
        let key_encryption_algorithm =
            AlgorithmIdentifier::with_parameters(oid::PWRI_KEK, &kek_algorithm)?;

        Ok(PasswordRecipientInfo {
            version: PasswordRecipientInfo::VERSION,
            key_derivation_algorithm: Some(key_derivation_algorithm),
            key_encryption_algorithm,
            encrypted_key: OctetString::new(encrypted_key)?,
        })
    }
}

/// Generates password recipient infos.
///
/// Setters consume and return the generator so they chain; they may be
/// called between `generate` calls and affect only later ones.
pub struct PasswordRecipientInfoGenerator<W, R = OsRng> {
    config: PwriConfig,
    wrapper: W,
    rng: R,
}

impl<W, R> Debug for PasswordRecipientInfoGenerator<W, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordRecipientInfoGenerator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<W: KeyWrapper> PasswordRecipientInfoGenerator<W, OsRng> {
    /// Creates a generator for `kek_algorithm`, sized from the standard table.
    ///
    /// # Errors
    ///
    /// Returns [`PwriError::UnknownAlgorithm`] if `kek_algorithm` is not in
    /// [`AlgorithmTable::STANDARD`]. No randomness is consumed.
    pub fn new(
        kek_algorithm: impl Into<ObjectIdentifier>,
        password: &str,
        wrapper: W,
    ) -> PwriResult<Self> {
        Ok(Self::from_config(PwriConfig::new(kek_algorithm, password)?, wrapper))
    }

    /// Creates a generator for `kek_algorithm`, sized from `table`.
    ///
    /// # Errors
    ///
    /// Returns [`PwriError::UnknownAlgorithm`] if `kek_algorithm` is not in
    /// `table`.
    pub fn with_table(
        table: &AlgorithmTable,
        kek_algorithm: impl Into<ObjectIdentifier>,
        password: &str,
        wrapper: W,
    ) -> PwriResult<Self> {
        Ok(Self::from_config(
            PwriConfig::with_table(table, kek_algorithm, password)?,
            wrapper,
        ))
    }

    /// Creates a generator with explicit key and block sizes.
    #[must_use]
    pub fn with_sizing(
        kek_algorithm: impl Into<ObjectIdentifier>,
        password: &str,
        sizing: AlgorithmSizing,
        wrapper: W,
    ) -> Self {
        Self::from_config(PwriConfig::with_sizing(kek_algorithm, password, sizing), wrapper)
    }

    /// Creates a generator from an existing configuration.
    #[must_use]
    pub fn from_config(config: PwriConfig, wrapper: W) -> Self {
        Self {
            config,
            wrapper,
            rng: OsRng,
        }
    }
}

impl<W, R> PasswordRecipientInfoGenerator<W, R> {
    /// Sets how the password is converted to bytes.
    #[must_use]
    pub fn password_conversion(mut self, conversion: PasswordConversion) -> Self {
        self.config = self.config.password_conversion(conversion);
        self
    }

    /// Uses this salt and iteration count for every later `generate` call.
    #[must_use]
    pub fn salt_and_iteration_count(mut self, salt: impl Into<Vec<u8>>, iteration_count: u32) -> Self {
        self.config = self.config.salt_and_iteration_count(salt, iteration_count);
        self
    }

    /// Sets the PBKDF2 pseudorandom function.
    #[must_use]
    pub fn prf(mut self, prf: Prf) -> Self {
        self.config = self.config.prf(prf);
        self
    }

    /// Replaces the random source used for IVs and generated salts.
    #[must_use]
    pub fn rng<R2>(self, rng: R2) -> PasswordRecipientInfoGenerator<W, R2> {
        PasswordRecipientInfoGenerator {
            config: self.config,
            wrapper: self.wrapper,
            rng,
        }
    }

    /// The generator's configuration.
    #[must_use]
    pub const fn config(&self) -> &PwriConfig {
        &self.config
    }
}

impl<W: KeyWrapper, R: TryCryptoRng> PasswordRecipientInfoGenerator<W, R> {
    /// Generates a recipient info for `content_key`.
    ///
    /// Draws a `block_bytes` IV, then (unless configured) a fresh 20-byte
    /// salt with 1024 iterations, derives the key-encryption key, wraps
    /// `content_key` and assembles the result. Nothing is returned on
    /// failure.
    ///
    /// # Errors
    ///
    /// - [`PwriError::EntropyUnavailable`] if the random source fails
    /// - [`PwriError::KeyDerivationFailed`] if PBKDF2 rejects the parameters
    /// - whatever the wrap delegate returns, unchanged
    pub fn generate(&mut self, content_key: &[u8]) -> PwriResult<PasswordRecipientInfo> {
        // The IV is one block for every table entry.
        let iv = random_bytes(&mut self.rng, self.config.sizing.block_bytes)?;

        let (params, defaulted) = match &self.config.derivation {
            Some(params) => (params.clone(), false),
            None => (DerivationParams::generate(&mut self.rng)?, true),
        };

        let pwri = self
            .config
            .assemble(&params, &iv, content_key, &mut self.wrapper)?;

        tracing::debug!(
            kek_algorithm = %self.config.kek_algorithm,
            iv_len = iv.len(),
            iterations = params.iteration_count(),
            salt_len = params.salt().len(),
            defaulted_salt = defaulted,
            "generated password recipient info"
        );

        Ok(pwri)
    }
}
