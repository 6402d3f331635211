// Copyright (c) 2026 qpix-core contributors
// SPDX-License-Identifier: GPL-3.0-only

//! The two symmetric cipher layers.
//!
//! - **Tier A** ([`tier_a`]): AES-128-GCM-SIV over the serialized NEQR record.
//!   128-bit key, random 96-bit nonce prefixed to the ciphertext.
//! - **Tier B** ([`tier_b`]): DES-CBC with PKCS#7 padding over tier A's base64
//!   text. 64-bit key, random 64-bit IV prefixed to the ciphertext.
//!
//! Both layers output standard base64 so each stage hands text to the next.
//! Keys are derived independently ([`kdf`]) so one passphrase alone does not
//! open both layers.

pub mod kdf;
pub mod tier_a;
pub mod tier_b;

pub use kdf::{TierAKey, TierBKey};
