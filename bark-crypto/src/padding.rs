//! PKCS#7 padding.

use crate::error::CryptoError;

/// Pad `data` to a multiple of `block_size`.
///
/// Appends N bytes of value N, with N in `1..=block_size`. Block-aligned
/// input gets a full block of padding so the pad is always removable.
///
/// # Panics
///
/// Panics if `block_size` is 0 or greater than 255.
pub fn pkcs7_pad(data: &[u8], block_size: usize) -> Vec<u8> {
    assert!(
        (1..=255).contains(&block_size),
        "PKCS#7 block size must be 1..=255"
    );

    let pad = block_size - (data.len() % block_size);
    let mut padded = Vec::with_capacity(data.len() + pad);
    padded.extend_from_slice(data);
    padded.resize(data.len() + pad, pad as u8);
    padded
}

/// Strip PKCS#7 padding, returning the original data.
pub fn pkcs7_unpad(data: &[u8], block_size: usize) -> Result<&[u8], CryptoError> {
    if data.is_empty() || block_size == 0 || data.len() % block_size != 0 {
        return Err(CryptoError::InvalidPadding);
    }

    let pad = data[data.len() - 1] as usize;
    if pad == 0 || pad > block_size {
        return Err(CryptoError::InvalidPadding);
    }

    let (content, tail) = data.split_at(data.len() - pad);
    if tail.iter().any(|&b| b as usize != pad) {
        return Err(CryptoError::InvalidPadding);
    }

    Ok(content)
}
