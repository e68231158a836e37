//! Recovering the content-encryption key from a password recipient info.
//!
//! This is the receiving side of [`generator`](crate::core::generator):
//! the PBKDF2 parameters and KEK cipher are read back from the record, the
//! key-encryption key is re-derived from the password, and the wrapped key
//! is handed to a [`KeyUnwrapper`].
//!
//! The password conversion is not recorded in the record, so it must match
//! the one the sender used.

use core::fmt::{self, Debug};

use zeroize::Zeroizing;

use crate::core::algorithm::AlgorithmTable;
use crate::core::error::{PwriError, PwriResult};
use crate::core::operations::kdf::{derive_key, DerivationParams, PasswordConversion, Prf};
use crate::core::operations::wrap::KeyUnwrapper;
use crate::core::types::PasswordRecipientInfo;

/// Longest key length accepted from a record's `keyLength` field.
const MAX_KEY_LENGTH: usize = 64;

/// A holder of the password, able to open password recipient infos.
#[derive(Clone)]
pub struct PasswordRecipient {
    password: Zeroizing<String>,
    conversion: PasswordConversion,
    table: AlgorithmTable,
    max_iteration_count: u32,
}

impl Debug for PasswordRecipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordRecipient")
            .field("password", &"[REDACTED]")
            .field("conversion", &self.conversion)
            .field("max_iteration_count", &self.max_iteration_count)
            .finish_non_exhaustive()
    }
}

impl PasswordRecipient {
    /// Highest iteration count accepted from a record unless raised with
    /// [`max_iteration_count`](Self::max_iteration_count).
    pub const DEFAULT_MAX_ITERATION_COUNT: u32 = 10_000_000;

    /// Creates a recipient using UTF-8 conversion and the standard table.
    #[must_use]
    pub fn new(password: &str) -> Self {
        Self {
            password: Zeroizing::new(password.to_owned()),
            conversion: PasswordConversion::default(),
            table: AlgorithmTable::STANDARD,
            max_iteration_count: Self::DEFAULT_MAX_ITERATION_COUNT,
        }
    }

    /// Sets how the password is converted to bytes.
    #[must_use]
    pub fn password_conversion(mut self, conversion: PasswordConversion) -> Self {
        self.conversion = conversion;
        self
    }

    /// Sets the table used to size the key-encryption key when the record
    /// carries no explicit key length.
    #[must_use]
    pub fn table(mut self, table: AlgorithmTable) -> Self {
        self.table = table;
        self
    }

    /// Sets the highest iteration count accepted from a record.
    ///
    /// The count comes from untrusted input and PBKDF2 runs that many
    /// rounds, so records above the ceiling are refused before deriving.
    #[must_use]
    pub fn max_iteration_count(mut self, max: u32) -> Self {
        self.max_iteration_count = max;
        self
    }

    /// Recovers the content-encryption key from `pwri`.
    ///
    /// # Errors
    ///
    /// - [`PwriError::InvalidFormat`] for an unexpected version, a missing
    ///   key derivation algorithm, an out-of-range key length, or an
    ///   iteration count above the configured ceiling
    /// - [`PwriError::UnsupportedAlgorithm`] if the KDF is not PBKDF2, the
    ///   key-encryption algorithm is not `id-alg-PWRI-KEK`, or the PRF is
    ///   unknown
    /// - [`PwriError::UnknownAlgorithm`] if the KEK cipher is not in the
    ///   table and no key length is recorded
    /// - whatever `unwrapper` returns, unchanged
    pub fn recover_content_key<U: KeyUnwrapper + ?Sized>(
        &self,
        pwri: &PasswordRecipientInfo,
        unwrapper: &U,
    ) -> PwriResult<Zeroizing<Vec<u8>>> {
        if pwri.version != PasswordRecipientInfo::VERSION {
            return Err(PwriError::InvalidFormat);
        }

        let pbkdf2 = pwri.pbkdf2_params()?;
        if pbkdf2.iteration_count > self.max_iteration_count {
            tracing::debug!(
                iterations = pbkdf2.iteration_count,
                max = self.max_iteration_count,
                "iteration count above ceiling"
            );
            return Err(PwriError::InvalidFormat);
        }
        let prf = Prf::from_algorithm_identifier(pbkdf2.prf.as_ref())?;
        let kek_algorithm = pwri.kek_algorithm()?;

        let key_len = match pbkdf2.key_length {
            Some(len) => usize::try_from(len)
                .ok()
                .filter(|len| (1..=MAX_KEY_LENGTH).contains(len))
                .ok_or(PwriError::InvalidFormat)?,
            None => self.table.sizes_for(&kek_algorithm.algorithm)?.key_len(),
        };

        let params = DerivationParams::from(&pbkdf2);
        let kek = derive_key(&self.password, self.conversion, &params, prf, key_len)?;
        let content_key = unwrapper.unwrap_key(&kek_algorithm, &kek, pwri.encrypted_key())?;

        tracing::debug!(
            kek_algorithm = %kek_algorithm.algorithm,
            iterations = params.iteration_count(),
            "recovered content-encryption key"
        );

        Ok(Zeroizing::new(content_key))
    }
}
