// Copyright (c) 2026 qpix-core contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Tier-A cipher: AES-128-GCM-SIV.
//!
//! Output text is `base64(nonce ‖ ciphertext ‖ tag)`. GCM-SIV is a counter
//! mode, so arbitrary-length input needs no padding, and the 16-byte tag
//! rejects a wrong key outright instead of yielding garbage.

use aes_gcm_siv::aead::Aead;
use aes_gcm_siv::{Aes128GcmSiv, KeyInit, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::RngCore;

use crate::cipher::TierAKey;
use crate::error::QpixError;

/// AES-GCM-SIV nonce length in bytes.
pub const NONCE_LEN: usize = 12;
/// Authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Encrypt `plaintext` and return base64 text.
pub fn encrypt(plaintext: &[u8], key: &TierAKey) -> Result<String, QpixError> {
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);

    let cipher = Aes128GcmSiv::new_from_slice(key.as_bytes())
        .map_err(|_| QpixError::Internal("invalid AES-128 key length".into()))?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|_| QpixError::Internal("AES-GCM-SIV encryption failed".into()))?;

    let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&ciphertext);
    Ok(STANDARD.encode(out))
}

/// Decrypt base64 text produced by [`encrypt`].
///
/// # Errors
/// [`QpixError::DecryptionFailed`] for invalid base64, input too short to
/// hold a nonce and tag, or a failed authentication check.
pub fn decrypt(text: &str, key: &TierAKey) -> Result<Vec<u8>, QpixError> {
    let raw = STANDARD.decode(text.trim()).map_err(|_| QpixError::DecryptionFailed)?;
    if raw.len() < NONCE_LEN + TAG_LEN {
        return Err(QpixError::DecryptionFailed);
    }
    let (nonce_bytes, ciphertext) = raw.split_at(NONCE_LEN);

    let cipher = Aes128GcmSiv::new_from_slice(key.as_bytes())
        .map_err(|_| QpixError::Internal("invalid AES-128 key length".into()))?;
    cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| QpixError::DecryptionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(p: &str) -> TierAKey {
        TierAKey::derive(p).unwrap()
    }

    #[test]
    fn roundtrip() {
        let k = key("secret123");
        let text = encrypt(b"Hello, pixels!", &k).unwrap();
        assert_eq!(decrypt(&text, &k).unwrap(), b"Hello, pixels!");
    }

    #[test]
    fn empty_plaintext_roundtrip() {
        let k = key("pass");
        let text = encrypt(b"", &k).unwrap();
        assert_eq!(decrypt(&text, &k).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn wrong_key_fails() {
        let text = encrypt(b"secret", &key("correct")).unwrap();
        assert!(matches!(decrypt(&text, &key("wrong")), Err(QpixError::DecryptionFailed)));
    }

    #[test]
    fn output_is_base64_text() {
        let text = encrypt(&[0u8; 69], &key("k")).unwrap();
        assert!(text.bytes().all(|b| b.is_ascii_alphanumeric() || b"+/=".contains(&b)));
        assert_eq!(STANDARD.decode(&text).unwrap().len(), NONCE_LEN + 69 + TAG_LEN);
    }

    #[test]
    fn not_base64_fails() {
        assert!(matches!(decrypt("%%% not base64 %%%", &key("k")), Err(QpixError::DecryptionFailed)));
    }

    #[test]
    fn too_short_fails() {
        let text = STANDARD.encode([0u8; NONCE_LEN + TAG_LEN - 1]);
        assert!(matches!(decrypt(&text, &key("k")), Err(QpixError::DecryptionFailed)));
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let k = key("k");
        let mut raw = STANDARD.decode(encrypt(b"data", &k).unwrap()).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0x80;
        assert!(decrypt(&STANDARD.encode(raw), &k).is_err());
    }

    #[test]
    fn ciphertext_differs_per_encryption() {
        let k = key("pass");
        assert_ne!(encrypt(b"same", &k).unwrap(), encrypt(b"same", &k).unwrap());
    }
}
