//! AES-CBC encryption of Bark payloads.
//!
//! Key and IV are taken as raw bytes of the configured text, exactly as the
//! Bark app reads them. The key length picks the AES variant.

use aes::{Aes128, Aes192, Aes256};
use base64::{engine::general_purpose::STANDARD, Engine};
use cbc::cipher::{
    generic_array::GenericArray, BlockCipher, BlockDecryptMut, BlockEncryptMut, KeyInit,
    KeyIvInit,
};
use std::fmt;
use zeroize::Zeroizing;

use crate::error::CryptoError;
use crate::padding::{pkcs7_pad, pkcs7_unpad};

/// AES block size in bytes. Also the required IV length.
pub const BLOCK_SIZE: usize = 16;

/// AES key material, zeroed on drop.
#[derive(Clone)]
pub struct AesKey(Zeroizing<Vec<u8>>);

impl AesKey {
    /// Wrap the configured key text.
    pub fn new(key: &str) -> Self {
        Self(Zeroizing::new(key.as_bytes().to_vec()))
    }

    /// Key length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the key is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the length selects one of AES-128/192/256.
    pub fn is_valid_length(&self) -> bool {
        matches!(self.len(), 16 | 24 | 32)
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for AesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AesKey({} bytes)", self.len())
    }
}

/// Encrypt `plaintext` with AES-CBC and PKCS#7 padding.
///
/// Returns the ciphertext as standard, padded base64.
///
/// # Errors
///
/// - `Encrypt` if `iv` is not [`BLOCK_SIZE`] bytes
/// - `CipherInit` if the key is not 16, 24 or 32 bytes
pub fn encrypt(plaintext: &[u8], key: &AesKey, iv: &[u8]) -> Result<String, CryptoError> {
    check_iv(iv)?;

    let mut buf = pkcs7_pad(plaintext, BLOCK_SIZE);
    match key.len() {
        16 => encrypt_blocks::<Aes128>(key.as_bytes(), iv, &mut buf)?,
        24 => encrypt_blocks::<Aes192>(key.as_bytes(), iv, &mut buf)?,
        32 => encrypt_blocks::<Aes256>(key.as_bytes(), iv, &mut buf)?,
        n => return Err(invalid_key_length(n)),
    }

    Ok(STANDARD.encode(buf))
}

/// Decrypt base64 `ciphertext` produced by [`encrypt`].
///
/// # Errors
///
/// - `Decode` if `ciphertext` is not base64
/// - `Encrypt` / `CipherInit` as for [`encrypt`]
/// - `InvalidPadding` if the key or IV is wrong or the data was altered
pub fn decrypt(ciphertext: &str, key: &AesKey, iv: &[u8]) -> Result<Vec<u8>, CryptoError> {
    check_iv(iv)?;

    let mut buf = STANDARD.decode(ciphertext)?;
    if buf.is_empty() || buf.len() % BLOCK_SIZE != 0 {
        return Err(CryptoError::InvalidPadding);
    }

    match key.len() {
        16 => decrypt_blocks::<Aes128>(key.as_bytes(), iv, &mut buf)?,
        24 => decrypt_blocks::<Aes192>(key.as_bytes(), iv, &mut buf)?,
        32 => decrypt_blocks::<Aes256>(key.as_bytes(), iv, &mut buf)?,
        n => return Err(invalid_key_length(n)),
    }

    let len = pkcs7_unpad(&buf, BLOCK_SIZE)?.len();
    buf.truncate(len);
    Ok(buf)
}

fn check_iv(iv: &[u8]) -> Result<(), CryptoError> {
    if iv.len() != BLOCK_SIZE {
        return Err(CryptoError::Encrypt(format!(
            "IV must be {} bytes, got {}",
            BLOCK_SIZE,
            iv.len()
        )));
    }
    Ok(())
}

fn invalid_key_length(len: usize) -> CryptoError {
    CryptoError::CipherInit(format!(
        "invalid AES key length {len} (expected 16, 24 or 32 bytes)"
    ))
}

/// Encrypt an already padded buffer in place.
fn encrypt_blocks<C>(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<(), CryptoError>
where
    C: BlockEncryptMut + BlockCipher + KeyInit,
{
    let mut mode = cbc::Encryptor::<C>::new_from_slices(key, iv)
        .map_err(|e| CryptoError::CipherInit(e.to_string()))?;

    for block in buf.chunks_exact_mut(BLOCK_SIZE) {
        mode.encrypt_block_mut(GenericArray::from_mut_slice(block));
    }
    Ok(())
}

/// Decrypt a block-aligned buffer in place.
fn decrypt_blocks<C>(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<(), CryptoError>
where
    C: BlockDecryptMut + BlockCipher + KeyInit,
{
    let mut mode = cbc::Decryptor::<C>::new_from_slices(key, iv)
        .map_err(|e| CryptoError::CipherInit(e.to_string()))?;

    for block in buf.chunks_exact_mut(BLOCK_SIZE) {
        mode.decrypt_block_mut(GenericArray::from_mut_slice(block));
    }
    Ok(())
}
