//! Random initialization vectors.
//!
//! Bark reads the IV as text, so generated IVs are 16 alphanumeric
//! characters rather than 16 arbitrary bytes.

use crate::error::CryptoError;

/// Length of a generated IV in characters (one AES block).
pub const IV_LEN: usize = 16;

/// Alphabet IV characters are drawn from.
pub const IV_ALPHABET: &[u8; 62] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Largest multiple of the alphabet size that fits in a byte. Random bytes at
/// or above it are discarded so every character is equally likely.
const ACCEPT_BELOW: u8 = (256 / IV_ALPHABET.len() * IV_ALPHABET.len()) as u8;

/// Generate a fresh IV from the OS random source.
pub fn generate_iv() -> Result<String, CryptoError> {
    let mut iv = String::with_capacity(IV_LEN);
    let mut bytes = [0u8; IV_LEN * 2];

    while iv.len() < IV_LEN {
        getrandom::getrandom(&mut bytes).map_err(|e| CryptoError::RandomSource(e.to_string()))?;

        for &b in bytes.iter().filter(|&&b| b < ACCEPT_BELOW) {
            if iv.len() == IV_LEN {
                break;
            }
            iv.push(IV_ALPHABET[(b as usize) % IV_ALPHABET.len()] as char);
        }
    }

    Ok(iv)
}
