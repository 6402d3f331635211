// Copyright (c) 2026 qpix-core contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Tier-B cipher: DES-CBC with PKCS#7 padding.
//!
//! Operates on tier A's base64 text. Output text is `base64(iv ‖ ciphertext)`.
//! There is no tag; a wrong key is caught by the padding check, the UTF-8
//! check, or tier A's authentication further down.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;

use crate::cipher::TierBKey;
use crate::error::QpixError;

type DesCbcEnc = cbc::Encryptor<des::Des>;
type DesCbcDec = cbc::Decryptor<des::Des>;

/// DES block size in bytes; also the IV length.
pub const BLOCK_LEN: usize = 8;

/// Encrypt tier-A text and return base64 text.
pub fn encrypt(tier_a_text: &str, key: &TierBKey) -> Result<String, QpixError> {
    let mut iv = [0u8; BLOCK_LEN];
    rand::thread_rng().fill_bytes(&mut iv);

    let ciphertext = DesCbcEnc::new_from_slices(key.as_bytes(), &iv)
        .map_err(|_| QpixError::Internal("invalid DES key or IV length".into()))?
        .encrypt_padded_vec_mut::<Pkcs7>(tier_a_text.as_bytes());

    let mut out = Vec::with_capacity(BLOCK_LEN + ciphertext.len());
    out.extend_from_slice(&iv);
    out.extend_from_slice(&ciphertext);
    Ok(STANDARD.encode(out))
}

/// Decrypt base64 text produced by [`encrypt`] back to tier-A text.
///
/// # Errors
/// [`QpixError::DecryptionFailed`] for invalid base64, a body that is empty
/// or not block-aligned, bad padding, or a non-UTF-8 result.
pub fn decrypt(text: &str, key: &TierBKey) -> Result<String, QpixError> {
    let raw = STANDARD.decode(text.trim()).map_err(|_| QpixError::DecryptionFailed)?;
    if raw.len() < 2 * BLOCK_LEN || raw.len() % BLOCK_LEN != 0 {
        return Err(QpixError::DecryptionFailed);
    }
    let (iv, ciphertext) = raw.split_at(BLOCK_LEN);

    let plaintext = DesCbcDec::new_from_slices(key.as_bytes(), iv)
        .map_err(|_| QpixError::Internal("invalid DES key or IV length".into()))?
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| QpixError::DecryptionFailed)?;

    String::from_utf8(plaintext).map_err(|_| QpixError::DecryptionFailed)
}
