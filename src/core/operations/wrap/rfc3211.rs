//! RFC 3211 key wrap over CBC-mode block ciphers.
//!
//! The content-encryption key is formatted as
//! `LEN || ~CEK[0..3] || CEK || padding`, padded with random bytes to a
//! multiple of the cipher block size (and at least two blocks), then
//! CBC-encrypted twice under the key-encryption key. The first pass uses
//! the IV from the algorithm identifier; the second pass uses the last
//! ciphertext block of the first.
//!
//! Supported ciphers: DES-EDE3-CBC, AES-128-CBC, AES-192-CBC, AES-256-CBC.

use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockCipher, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit};
use des::TdesEde3;
use rand_core::{OsRng, TryCryptoRng};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use super::{KeyUnwrapper, KeyWrapper};
use crate::core::algorithm::KekAlgorithm;
use crate::core::error::{PwriError, PwriResult};
use crate::core::operations::kdf::random_bytes;
use crate::core::types::AlgorithmIdentifier;

/// Length byte plus three check bytes.
const HEADER_LEN: usize = 4;

/// Largest key the one-byte length field can describe.
const MAX_KEY_LEN: usize = 255;

/// RFC 3211 key wrap.
///
/// The random source is only used for padding.
///
/// # Example
///
/// ```rust
/// use pwri::core::operations::wrap::{KeyUnwrapper, KeyWrapper, Rfc3211KeyWrap};
/// use pwri::core::types::AlgorithmIdentifier;
/// use pwri::core::oid;
///
/// let kek_alg = AlgorithmIdentifier::with_iv(oid::AES128_CBC, &[0x11; 16])
///     .expect("iv encodes");
/// let kek = [0x42u8; 16];
///
/// let mut wrap = Rfc3211KeyWrap::new();
/// let wrapped = wrap.wrap(&kek_alg, &kek, &[0xaa; 16]).expect("wrap should succeed");
/// assert_eq!(wrapped.len(), 32);
///
/// let unwrapped = wrap.unwrap_key(&kek_alg, &kek, &wrapped).expect("unwrap should succeed");
/// assert_eq!(unwrapped, vec![0xaa; 16]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Rfc3211KeyWrap<R = OsRng> {
    rng: R,
}

impl Rfc3211KeyWrap<OsRng> {
    /// Creates a wrapper padding from the operating system's random source.
    #[must_use]
    pub const fn new() -> Self {
        Self { rng: OsRng }
    }
}

impl<R> Rfc3211KeyWrap<R> {
    /// Creates a wrapper padding from `rng`.
    #[must_use]
    pub const fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: TryCryptoRng> KeyWrapper for Rfc3211KeyWrap<R> {
    fn wrap(
        &mut self,
        kek_algorithm: &AlgorithmIdentifier,
        kek: &[u8],
        content_key: &[u8],
    ) -> PwriResult<Vec<u8>> {
        let alg = supported_algorithm(kek_algorithm)?;
        let iv = kek_algorithm.iv()?;
        let block = alg.sizing().block_bytes;

        let mut buf = format_key(&mut self.rng, content_key, block)?;
        match alg {
            KekAlgorithm::DesEde3Cbc => wrap_in_place::<TdesEde3>(kek, &iv, &mut buf, block)?,
            KekAlgorithm::Aes128Cbc => wrap_in_place::<Aes128>(kek, &iv, &mut buf, block)?,
            KekAlgorithm::Aes192Cbc => wrap_in_place::<Aes192>(kek, &iv, &mut buf, block)?,
            KekAlgorithm::Aes256Cbc => wrap_in_place::<Aes256>(kek, &iv, &mut buf, block)?,
        }
        Ok(buf.to_vec())
    }
}

impl<R> KeyUnwrapper for Rfc3211KeyWrap<R> {
    fn unwrap_key(
        &self,
        kek_algorithm: &AlgorithmIdentifier,
        kek: &[u8],
        wrapped_key: &[u8],
    ) -> PwriResult<Vec<u8>> {
        let alg = supported_algorithm(kek_algorithm)?;
        let iv = kek_algorithm.iv()?;
        let block = alg.sizing().block_bytes;

        if wrapped_key.len() < 2 * block || wrapped_key.len() % block != 0 {
            return Err(PwriError::UnwrapFailed);
        }

        let mut buf = Zeroizing::new(wrapped_key.to_vec());
        match alg {
            KekAlgorithm::DesEde3Cbc => unwrap_in_place::<TdesEde3>(kek, &iv, &mut buf, block)?,
            KekAlgorithm::Aes128Cbc => unwrap_in_place::<Aes128>(kek, &iv, &mut buf, block)?,
            KekAlgorithm::Aes192Cbc => unwrap_in_place::<Aes192>(kek, &iv, &mut buf, block)?,
            KekAlgorithm::Aes256Cbc => unwrap_in_place::<Aes256>(kek, &iv, &mut buf, block)?,
        }
        parse_key(&buf)
    }
}

fn supported_algorithm(kek_algorithm: &AlgorithmIdentifier) -> PwriResult<KekAlgorithm> {
    KekAlgorithm::from_oid(&kek_algorithm.algorithm)
        .ok_or(PwriError::UnsupportedAlgorithm(kek_algorithm.algorithm))
}

/// Builds `LEN || ~CEK[0..3] || CEK || padding`.
fn format_key<R: TryCryptoRng + ?Sized>(
    rng: &mut R,
    content_key: &[u8],
    block: usize,
) -> PwriResult<Zeroizing<Vec<u8>>> {
    if content_key.len() < 3 || content_key.len() > MAX_KEY_LEN {
        return Err(PwriError::InvalidKey);
    }

    let unpadded = HEADER_LEN + content_key.len();
    let len = unpadded.div_ceil(block).max(2) * block;

    let mut buf = Zeroizing::new(Vec::with_capacity(len));
    buf.push(content_key.len() as u8);
    buf.extend(content_key[..3].iter().map(|byte| !byte));
    buf.extend_from_slice(content_key);
    buf.extend_from_slice(&random_bytes(rng, len - unpadded)?);
    Ok(buf)
}

/// Reverses [`format_key`], checking the length and check bytes.
fn parse_key(buf: &[u8]) -> PwriResult<Vec<u8>> {
    let key_len = usize::from(buf[0]);
    if key_len < 3 || key_len > buf.len() - HEADER_LEN {
        return Err(PwriError::UnwrapFailed);
    }

    let mut check = [0u8; 3];
    for (i, byte) in check.iter_mut().enumerate() {
        *byte = buf[1 + i] ^ buf[HEADER_LEN + i];
    }
    if !bool::from(check.ct_eq(&[0xff; 3])) {
        return Err(PwriError::UnwrapFailed);
    }

    Ok(buf[HEADER_LEN..HEADER_LEN + key_len].to_vec())
}

fn wrap_in_place<C>(kek: &[u8], iv: &[u8], buf: &mut [u8], block: usize) -> PwriResult<()>
where
    C: BlockEncryptMut + BlockCipher + KeyInit,
{
    cbc_encrypt::<C>(kek, iv, buf)?;
    let second_iv = buf[buf.len() - block..].to_vec();
    cbc_encrypt::<C>(kek, &second_iv, buf)
}

fn unwrap_in_place<C>(kek: &[u8], iv: &[u8], buf: &mut [u8], block: usize) -> PwriResult<()>
where
    C: BlockDecryptMut + BlockCipher + KeyInit,
{
    let len = buf.len();

    // Blocks 2..n of the first-pass ciphertext.
    let first_block = buf[..block].to_vec();
    cbc_decrypt::<C>(kek, &first_block, &mut buf[block..])?;

    // Its last block was the IV of the second pass over block 1.
    let second_iv = buf[len - block..].to_vec();
    cbc_decrypt::<C>(kek, &second_iv, &mut buf[..block])?;

    cbc_decrypt::<C>(kek, iv, buf)
}

fn cbc_encrypt<C>(key: &[u8], iv: &[u8], buf: &mut [u8]) -> PwriResult<()>
where
    C: BlockEncryptMut + BlockCipher + KeyInit,
{
    let len = buf.len();
    cbc::Encryptor::<C>::new_from_slices(key, iv)
        .map_err(|_| PwriError::InvalidKey)?
        .encrypt_padded_mut::<NoPadding>(buf, len)
        .map_err(|_| PwriError::WrapFailed)?;
    Ok(())
}

fn cbc_decrypt<C>(key: &[u8], iv: &[u8], buf: &mut [u8]) -> PwriResult<()>
where
    C: BlockDecryptMut + BlockCipher + KeyInit,
{
    cbc::Decryptor::<C>::new_from_slices(key, iv)
        .map_err(|_| PwriError::InvalidKey)?
        .decrypt_padded_mut::<NoPadding>(buf)
        .map_err(|_| PwriError::UnwrapFailed)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use der::asn1::ObjectIdentifier;

    fn kek_alg(alg: KekAlgorithm) -> PwriResult<AlgorithmIdentifier> {
        AlgorithmIdentifier::with_iv(alg.oid(), &vec![0x11; alg.sizing().block_bytes])
    }

    #[test]
    fn test_wrap_unwrap_roundtrip_all_algorithms() -> PwriResult<()> {
        for alg in KekAlgorithm::ALL {
            let kek = vec![0x42u8; alg.sizing().key_len()];
            let kek_alg = kek_alg(alg)?;
            let mut wrap = Rfc3211KeyWrap::new();

            for cek_len in [8usize, 16, 24, 32] {
                let cek = vec![0xaau8; cek_len];
                let wrapped = wrap.wrap(&kek_alg, &kek, &cek)?;

                assert_eq!(wrapped.len() % alg.sizing().block_bytes, 0);
                assert!(wrapped.len() >= 2 * alg.sizing().block_bytes);
                assert_eq!(wrap.unwrap_key(&kek_alg, &kek, &wrapped)?, cek);
            }
        }
        Ok(())
    }

    #[test]
    fn test_wrap_known_answer_aes128() -> PwriResult<()> {
        // Padding drawn from a source of 0x11 bytes.
        struct Fill;
        impl rand_core::RngCore for Fill {
            fn next_u32(&mut self) -> u32 {
                0x1111_1111
            }
            fn next_u64(&mut self) -> u64 {
                0x1111_1111_1111_1111
            }
            fn fill_bytes(&mut self, dst: &mut [u8]) {
                dst.fill(0x11);
            }
        }
        impl rand_core::CryptoRng for Fill {}

        let kek = hex::decode("5b61ebcd430f0196686b298500d095a2").expect("valid hex");
        let mut wrap = Rfc3211KeyWrap::with_rng(Fill);
        let wrapped = wrap.wrap(&kek_alg(KekAlgorithm::Aes128Cbc)?, &kek, &[0xaa; 16])?;

        assert_eq!(
            hex::encode(wrapped),
            "f4a3a28b89330dd295f28a42d6c0e0c95b53197f602878033274a50995562cc6"
        );
        Ok(())
    }

    #[test]
    fn test_unwrap_wrong_kek_fails() -> PwriResult<()> {
        let kek_alg = kek_alg(KekAlgorithm::Aes256Cbc)?;
        let mut wrap = Rfc3211KeyWrap::new();
        let wrapped = wrap.wrap(&kek_alg, &[0x01; 32], &[0xaa; 32])?;

        let result = wrap.unwrap_key(&kek_alg, &[0x02; 32], &wrapped);
        assert!(matches!(result, Err(PwriError::UnwrapFailed)));
        Ok(())
    }

    #[test]
    fn test_unwrap_rejects_bad_lengths() -> PwriResult<()> {
        let kek_alg = kek_alg(KekAlgorithm::Aes128Cbc)?;
        let wrap = Rfc3211KeyWrap::new();

        assert!(matches!(
            wrap.unwrap_key(&kek_alg, &[0; 16], &[0; 16]),
            Err(PwriError::UnwrapFailed)
        ));
        assert!(matches!(
            wrap.unwrap_key(&kek_alg, &[0; 16], &[0; 33]),
            Err(PwriError::UnwrapFailed)
        ));
        Ok(())
    }

    #[test]
    fn test_wrong_kek_length_is_invalid_key() -> PwriResult<()> {
        let mut wrap = Rfc3211KeyWrap::new();
        let result = wrap.wrap(&kek_alg(KekAlgorithm::Aes128Cbc)?, &[0; 15], &[0xaa; 16]);
        assert!(matches!(result, Err(PwriError::InvalidKey)));
        Ok(())
    }

    #[test]
    fn test_content_key_bounds() -> PwriResult<()> {
        let kek_alg = kek_alg(KekAlgorithm::Aes128Cbc)?;
        let mut wrap = Rfc3211KeyWrap::new();

        assert!(matches!(
            wrap.wrap(&kek_alg, &[0; 16], &[0xaa; 2]),
            Err(PwriError::InvalidKey)
        ));
        assert!(matches!(
            wrap.wrap(&kek_alg, &[0; 16], &[0xaa; 256]),
            Err(PwriError::InvalidKey)
        ));
        assert!(wrap.wrap(&kek_alg, &[0; 16], &[0xaa; 255]).is_ok());
        Ok(())
    }

    #[test]
    fn test_unsupported_cipher() {
        let other = AlgorithmIdentifier::new(ObjectIdentifier::new_unwrap("1.2.840.113549.3.2"));
        let mut wrap = Rfc3211KeyWrap::new();
        let result = wrap.wrap(&other, &[0; 16], &[0xaa; 16]);
        assert!(matches!(result, Err(PwriError::UnsupportedAlgorithm(_))));
    }
}
