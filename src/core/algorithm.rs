//! Key-encryption algorithm sizing.
//!
//! This module maps key-encryption (KEK) algorithm identifiers to the key
//! size the password must be stretched to and the cipher block size, which
//! also fixes the IV length.
//!
//! The mapping is an immutable [`AlgorithmTable`] value. The built-in
//! [`AlgorithmTable::STANDARD`] covers the four algorithms RFC 3211
//! implementations are expected to support; callers may build their own
//! table and inject it into the generator.
//!
//! # Extending the table
//!
//! The IV length is taken from `block_bytes` for every entry. That is
//! correct for the CBC ciphers listed here; a mode whose IV is not one
//! block long needs its own IV sizing before it can be added.

use core::fmt::{self, Display};
use std::borrow::Cow;

use der::asn1::ObjectIdentifier;

use crate::core::error::{PwriError, PwriResult};
use crate::core::oid;

/// Key and block sizes for a key-encryption algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlgorithmSizing {
    /// Size of the derived key-encryption key, in bits.
    pub key_bits: u32,
    /// Cipher block size in bytes; also the IV length.
    pub block_bytes: usize,
}

impl AlgorithmSizing {
    /// Creates a sizing record.
    #[must_use]
    pub const fn new(key_bits: u32, block_bytes: usize) -> Self {
        Self {
            key_bits,
            block_bytes,
        }
    }

    /// Derived key length in bytes. Partial bytes are dropped.
    #[must_use]
    pub const fn key_len(&self) -> usize {
        (self.key_bits / 8) as usize
    }
}

/// The key-encryption algorithms in the standard table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KekAlgorithm {
    /// Triple-DES (EDE, three keys) in CBC mode.
    DesEde3Cbc,
    /// AES-128 in CBC mode.
    Aes128Cbc,
    /// AES-192 in CBC mode.
    Aes192Cbc,
    /// AES-256 in CBC mode.
    Aes256Cbc,
}

impl KekAlgorithm {
    /// All supported algorithms.
    pub const ALL: [Self; 4] = [
        Self::DesEde3Cbc,
        Self::Aes128Cbc,
        Self::Aes192Cbc,
        Self::Aes256Cbc,
    ];

    /// Returns the algorithm's object identifier.
    #[must_use]
    pub const fn oid(self) -> ObjectIdentifier {
        match self {
            Self::DesEde3Cbc => oid::DES_EDE3_CBC,
            Self::Aes128Cbc => oid::AES128_CBC,
            Self::Aes192Cbc => oid::AES192_CBC,
            Self::Aes256Cbc => oid::AES256_CBC,
        }
    }

    /// Returns the fixed sizing for this algorithm.
    #[must_use]
    pub const fn sizing(self) -> AlgorithmSizing {
        match self {
            Self::DesEde3Cbc => AlgorithmSizing::new(192, 8),
            Self::Aes128Cbc => AlgorithmSizing::new(128, 16),
            Self::Aes192Cbc => AlgorithmSizing::new(192, 16),
            Self::Aes256Cbc => AlgorithmSizing::new(256, 16),
        }
    }

    /// Looks up the algorithm for an object identifier.
    #[must_use]
    pub fn from_oid(oid: &ObjectIdentifier) -> Option<Self> {
        Self::ALL.into_iter().find(|alg| alg.oid() == *oid)
    }
}

impl From<KekAlgorithm> for ObjectIdentifier {
    fn from(alg: KekAlgorithm) -> Self {
        alg.oid()
    }
}

impl TryFrom<&ObjectIdentifier> for KekAlgorithm {
    type Error = PwriError;

    fn try_from(oid: &ObjectIdentifier) -> Result<Self, Self::Error> {
        Self::from_oid(oid).ok_or(PwriError::UnknownAlgorithm(*oid))
    }
}

impl Display for KekAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DesEde3Cbc => "DES-EDE3-CBC",
            Self::Aes128Cbc => "AES-128-CBC",
            Self::Aes192Cbc => "AES-192-CBC",
            Self::Aes256Cbc => "AES-256-CBC",
        };
        f.write_str(name)
    }
}

const STANDARD_ENTRIES: [(ObjectIdentifier, AlgorithmSizing); 4] = [
    (oid::DES_EDE3_CBC, KekAlgorithm::DesEde3Cbc.sizing()),
    (oid::AES128_CBC, KekAlgorithm::Aes128Cbc.sizing()),
    (oid::AES192_CBC, KekAlgorithm::Aes192Cbc.sizing()),
    (oid::AES256_CBC, KekAlgorithm::Aes256Cbc.sizing()),
];

/// Immutable mapping from KEK algorithm identifier to its sizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmTable {
    entries: Cow<'static, [(ObjectIdentifier, AlgorithmSizing)]>,
}

impl Default for AlgorithmTable {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl AlgorithmTable {
    /// DES-EDE3-CBC and AES-128/192/256-CBC.
    pub const STANDARD: Self = Self {
        entries: Cow::Borrowed(&STANDARD_ENTRIES),
    };

    /// Returns the sizing for `algorithm`.
    ///
    /// # Errors
    ///
    /// Returns [`PwriError::UnknownAlgorithm`] if the table has no entry.
    pub fn sizes_for(&self, algorithm: &ObjectIdentifier) -> PwriResult<AlgorithmSizing> {
        self.entries
            .iter()
            .find(|(oid, _)| oid == algorithm)
            .map(|(_, sizing)| *sizing)
            .ok_or(PwriError::UnknownAlgorithm(*algorithm))
    }

    /// Returns `true` if the table has an entry for `algorithm`.
    #[must_use]
    pub fn contains(&self, algorithm: &ObjectIdentifier) -> bool {
        self.entries.iter().any(|(oid, _)| oid == algorithm)
    }

    /// Returns a table with `algorithm` added, replacing any existing entry.
    #[must_use]
    pub fn with_entry(mut self, algorithm: ObjectIdentifier, sizing: AlgorithmSizing) -> Self {
        let entries = self.entries.to_mut();
        match entries.iter_mut().find(|(oid, _)| *oid == algorithm) {
            Some(entry) => entry.1 = sizing,
            None => entries.push((algorithm, sizing)),
        }
        self
    }

    /// Iterates over the table entries.
    pub fn iter(&self) -> impl Iterator<Item = &(ObjectIdentifier, AlgorithmSizing)> {
        self.entries.iter()
    }
}
