// Copyright (c) 2026 qpix-core contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the encode/encrypt/decrypt pipeline.
//!
//! [`QpixError`] covers every failure from input validation through both
//! cipher layers and record decoding. [`FailureKind`] collapses it into the
//! three categories a caller shows to a user.

use core::fmt;

use crate::pixels::PixelError;
use crate::store::StoreError;

/// Errors that can occur while encrypting or decrypting a pixel grid.
#[derive(Debug)]
pub enum QpixError {
    /// Missing or empty passphrase, ciphertext or image.
    InvalidInput(&'static str),
    /// The grid or image has the wrong shape or could not be read.
    Pixel(PixelError),
    /// A cipher layer could not authenticate or unpad its input.
    DecryptionFailed,
    /// The decrypted record failed its structural or CRC check.
    MalformedRecord,
    /// Artifact store failure.
    Store(StoreError),
    /// Anything else that should not happen.
    Internal(String),
}

/// User-facing failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request itself was incomplete or malformed.
    BadInput,
    /// Wrong passphrase or corrupted ciphertext.
    WrongKey,
    /// Something broke that a different key would not fix.
    Unexpected,
}

impl FailureKind {
    /// Fixed headline for the category. Does not vary with which cipher
    /// layer failed.
    pub fn headline(self) -> &'static str {
        match self {
            Self::BadInput => "Invalid input.",
            Self::WrongKey => "Decryption failed. The provided key may be incorrect or the file is corrupted.",
            Self::Unexpected => "Unexpected error.",
        }
    }
}

impl QpixError {
    /// Map the error to its user-facing category.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidInput(_) => FailureKind::BadInput,
            Self::Pixel(PixelError::PngEncode(_)) => FailureKind::Unexpected,
            Self::Pixel(_) => FailureKind::BadInput,
            Self::DecryptionFailed | Self::MalformedRecord => FailureKind::WrongKey,
            Self::Store(_) | Self::Internal(_) => FailureKind::Unexpected,
        }
    }

    /// Message suitable for showing to an end user.
    ///
    /// Key-related failures all produce the same text so the message does
    /// not reveal which passphrase was wrong.
    pub fn user_message(&self) -> String {
        match self.kind() {
            FailureKind::WrongKey => FailureKind::WrongKey.headline().to_string(),
            FailureKind::BadInput => format!("{} {self}", FailureKind::BadInput.headline()),
            FailureKind::Unexpected => format!("{} {self}", FailureKind::Unexpected.headline()),
        }
    }
}

impl fmt::Display for QpixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "{msg}"),
            Self::Pixel(e) => write!(f, "{e}"),
            Self::DecryptionFailed => write!(f, "decryption failed (wrong passphrase?)"),
            Self::MalformedRecord => write!(f, "decrypted record is malformed (wrong passphrase?)"),
            Self::Store(e) => write!(f, "artifact store: {e}"),
            Self::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for QpixError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Pixel(e) => Some(e),
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PixelError> for QpixError {
    fn from(e: PixelError) -> Self {
        Self::Pixel(e)
    }
}

impl From<StoreError> for QpixError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}
