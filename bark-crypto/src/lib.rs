//! # bark-crypto
//!
//! Payload encryption compatible with Bark's encrypted push mode.
//!
//! Bark decrypts `ciphertext` with a key and IV shared out of band:
//!
//! ```text
//! JSON payload → PKCS#7 pad → AES-CBC (key, iv) → base64 → {"ciphertext", "iv"}
//! ```
//!
//! The mode carries no authentication tag. That is what the Bark app
//! accepts, so the ciphertext gives confidentiality only.
//!
//! ## Example
//!
//! ```rust
//! use gotify_bark_crypto::{decrypt, encrypt, generate_iv, AesKey};
//!
//! # fn example() -> Result<(), gotify_bark_crypto::CryptoError> {
//! let key = AesKey::new("0123456789abcdef");
//! let iv = generate_iv()?;
//!
//! let ciphertext = encrypt(br#"{"title":"hi"}"#, &key, iv.as_bytes())?;
//! let plaintext = decrypt(&ciphertext, &key, iv.as_bytes())?;
//! assert_eq!(plaintext, br#"{"title":"hi"}"#);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod aes_cbc;
mod error;
mod iv;
mod padding;

pub use aes_cbc::{decrypt, encrypt, AesKey, BLOCK_SIZE};
pub use error::CryptoError;
pub use iv::{generate_iv, IV_ALPHABET, IV_LEN};
pub use padding::{pkcs7_pad, pkcs7_unpad};
