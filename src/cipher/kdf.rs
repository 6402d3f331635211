// Copyright (c) 2026 qpix-core contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Passphrase → key derivation for both cipher layers.
//!
//! Argon2id with a fixed, per-tier salt. The output is deterministic given the
//! passphrase, so the decrypting side re-derives the same key without any
//! material carried in the ciphertext. Distinct salts keep the two tiers'
//! keys unrelated even when the same passphrase is used for both.

use argon2::Argon2;
use core::fmt;
use zeroize::Zeroizing;

use crate::error::QpixError;

/// Fixed salt for tier-A (AES-128) key derivation.
const TIER_A_SALT: &[u8; 16] = b"qpix-tier-a-v1\0\0";

/// Fixed salt for tier-B (DES) key derivation.
const TIER_B_SALT: &[u8; 16] = b"qpix-tier-b-v1\0\0";

/// AES-128 key length in bytes.
pub const TIER_A_KEY_LEN: usize = 16;
/// DES key length in bytes (parity bits included).
pub const TIER_B_KEY_LEN: usize = 8;

/// 128-bit key for the tier-A cipher. Zeroized on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct TierAKey(Zeroizing<[u8; TIER_A_KEY_LEN]>);

/// 64-bit key for the tier-B cipher. Zeroized on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct TierBKey(Zeroizing<[u8; TIER_B_KEY_LEN]>);

impl TierAKey {
    /// Derive the tier-A key from a passphrase.
    pub fn derive(passphrase: &str) -> Result<Self, QpixError> {
        let mut out = Zeroizing::new([0u8; TIER_A_KEY_LEN]);
        argon2_into(passphrase, TIER_A_SALT, &mut *out)?;
        Ok(Self(out))
    }

    pub fn as_bytes(&self) -> &[u8; TIER_A_KEY_LEN] {
        &self.0
    }
}

impl TierBKey {
    /// Derive the tier-B key from a passphrase.
    pub fn derive(passphrase: &str) -> Result<Self, QpixError> {
        let mut out = Zeroizing::new([0u8; TIER_B_KEY_LEN]);
        argon2_into(passphrase, TIER_B_SALT, &mut *out)?;
        Ok(Self(out))
    }

    pub fn as_bytes(&self) -> &[u8; TIER_B_KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for TierAKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TierAKey(..)")
    }
}

impl fmt::Debug for TierBKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TierBKey(..)")
    }
}

fn argon2_into(passphrase: &str, salt: &[u8], out: &mut [u8]) -> Result<(), QpixError> {
    Argon2::default()
        .hash_password_into(passphrase.as_bytes(), salt, out)
        .map_err(|e| QpixError::Internal(format!("key derivation failed: {e}")))
}
