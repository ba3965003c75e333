//! Error types for bark-crypto.

use thiserror::Error;

/// Errors that can occur while encrypting a Bark payload.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The key cannot initialize AES (wrong length).
    #[error("cipher init failed: {0}")]
    CipherInit(String),

    /// CBC encryption or decryption could not run.
    #[error("encryption failed: {0}")]
    Encrypt(String),

    /// Padding is malformed after decryption.
    /// No details provided, a padding oracle must not learn more than this.
    #[error("invalid padding")]
    InvalidPadding,

    /// Ciphertext is not valid base64.
    #[error("invalid base64 ciphertext: {0}")]
    Decode(#[from] base64::DecodeError),

    /// The OS random source failed.
    #[error("random source failed: {0}")]
    RandomSource(String),
}
