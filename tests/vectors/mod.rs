//! Test vector types for password recipient tests.
//!
//! The vectors were computed independently of this crate: PBKDF2 with a
//! reference HMAC implementation, and the full records by hand-assembling
//! DER around a reference CBC cipher.

// Some fields only exist to document the vector
#![allow(dead_code)]

use serde::Deserialize;

/// A test vector suite (top-level JSON structure).
#[derive(Debug, Deserialize)]
pub struct TestVectorSuite<T> {
    pub name: String,
    pub tests: Vec<T>,
}

/// Test vector for PBKDF2 key-encryption key derivation.
#[derive(Debug, Deserialize)]
pub struct Pbkdf2TestVector {
    pub name: String,
    #[serde(rename = "expect-fail")]
    pub expect_fail: bool,
    #[serde(default)]
    pub comment: Option<String>,
    pub password: String,
    /// `utf8` or `pkcs5`
    pub conversion: String,
    /// Hex-encoded salt
    pub salt: String,
    pub iterations: u32,
    /// `hmac-sha1`, `hmac-sha256`, `hmac-sha384` or `hmac-sha512`
    pub prf: String,
    /// Hex-encoded derived key (null for fail tests)
    pub key: Option<String>,
    /// Requested key length for fail tests
    #[serde(rename = "key-len", default)]
    pub key_len: Option<usize>,
}

/// Test vector for a complete password recipient info.
///
/// Every random byte (IV and wrap padding) is `fill`.
#[derive(Debug, Deserialize)]
pub struct PwriTestVector {
    pub name: String,
    #[serde(rename = "expect-fail")]
    pub expect_fail: bool,
    #[serde(default)]
    pub comment: Option<String>,
    pub password: Option<String>,
    pub conversion: Option<String>,
    /// Dotted KEK algorithm OID
    #[serde(rename = "kek-algorithm")]
    pub kek_algorithm: Option<String>,
    pub salt: Option<String>,
    pub iterations: Option<u32>,
    #[serde(rename = "content-key")]
    pub content_key: Option<String>,
    pub fill: Option<String>,
    /// Hex-encoded derived KEK
    pub kek: Option<String>,
    #[serde(rename = "encrypted-key")]
    pub encrypted_key: Option<String>,
    /// Hex-encoded bare `PasswordRecipientInfo` DER
    pub pwri: String,
    /// Hex-encoded `[3]`-tagged `RecipientInfo` DER
    #[serde(rename = "recipient-info")]
    pub recipient_info: Option<String>,
}

/// Decode hex string to bytes.
pub fn hex_decode(s: &str) -> Option<Vec<u8>> {
    hex::decode(s).ok()
}

/// Load test vectors from a JSON file.
pub fn load_vectors<T: serde::de::DeserializeOwned>(path: &str) -> TestVectorSuite<T> {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read test vector file {path}: {e}"));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse test vector file {path}: {e}"))
}
