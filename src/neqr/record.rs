// Copyright (c) 2026 qpix-core contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Byte serialization of an [`EncodedRecord`].
//!
//! This is the plaintext handed to the tier-A cipher:
//!
//! ```text
//! [1 byte ] entry count
//! [4×N    ] entries: position, red, green, blue
//! [4 bytes] CRC-32 of everything above (big-endian)
//! ```
//!
//! A 4×4 grid serializes to 69 bytes.

use crate::error::QpixError;
use crate::neqr::{EncodedRecord, NeqrEntry};
use crate::pixels::PIXEL_COUNT;

/// Bytes per serialized entry.
pub const ENTRY_LEN: usize = 4;
/// count(1) + crc(4).
pub const RECORD_OVERHEAD: usize = 1 + 4;
/// Serialized size of a full 4×4 record.
pub const RECORD_LEN: usize = RECORD_OVERHEAD + PIXEL_COUNT * ENTRY_LEN;

impl EncodedRecord {
    /// Serialize the record. The output length is `5 + 4 * len()`.
    ///
    /// # Errors
    /// [`QpixError::MalformedRecord`] if the record has more entries than the
    /// one-byte count can express.
    pub fn to_bytes(&self) -> Result<Vec<u8>, QpixError> {
        if self.len() > u8::MAX as usize {
            return Err(QpixError::MalformedRecord);
        }

        let mut out = Vec::with_capacity(RECORD_OVERHEAD + self.len() * ENTRY_LEN);
        out.push(self.len() as u8);
        for e in self.entries() {
            out.extend_from_slice(&[e.position, e.red, e.green, e.blue]);
        }
        let crc = crc32fast::hash(&out);
        out.extend_from_slice(&crc.to_be_bytes());
        Ok(out)
    }

    /// Parse a serialized record, verifying length and CRC.
    ///
    /// Position ordering is checked later by [`decode`](crate::neqr::decode).
    ///
    /// # Errors
    /// [`QpixError::MalformedRecord`] if the data is truncated, has trailing
    /// bytes, declares a count other than 16, or fails the CRC.
    pub fn from_bytes(data: &[u8]) -> Result<Self, QpixError> {
        if data.len() < RECORD_OVERHEAD {
            return Err(QpixError::MalformedRecord);
        }
        let count = data[0] as usize;
        if count != PIXEL_COUNT {
            return Err(QpixError::MalformedRecord);
        }
        let total = RECORD_OVERHEAD + count * ENTRY_LEN;
        if data.len() != total {
            return Err(QpixError::MalformedRecord);
        }

        let body = &data[..total - 4];
        let stored_crc = u32::from_be_bytes([data[total - 4], data[total - 3], data[total - 2], data[total - 1]]);
        if crc32fast::hash(body) != stored_crc {
            return Err(QpixError::MalformedRecord);
        }

        let entries = body[1..]
            .chunks_exact(ENTRY_LEN)
            .map(|c| NeqrEntry { position: c[0], red: c[1], green: c[2], blue: c[3] })
            .collect();
        Ok(EncodedRecord::from_entries(entries))
    }
}
