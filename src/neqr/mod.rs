// Copyright (c) 2026 qpix-core contributors
// SPDX-License-Identifier: GPL-3.0-only

//! NEQR-style pixel encoding.
//!
//! Each pixel becomes a `(position, red, green, blue)` entry, mirroring the
//! position register and color register of a Novel Enhanced Quantum
//! Representation. The position is redundant with traversal order; keeping it
//! lets [`decode`] validate structure without trusting the order.

pub mod record;

use crate::error::QpixError;
use crate::pixels::{PixelGrid, Rgb, PIXEL_COUNT};

/// One encoded pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeqrEntry {
    /// Row-major linear index, 0..16.
    pub position: u8,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl NeqrEntry {
    pub fn rgb(&self) -> Rgb {
        [self.red, self.green, self.blue]
    }
}

/// Flat, ordered encoding of a [`PixelGrid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRecord {
    entries: Vec<NeqrEntry>,
}

impl EncodedRecord {
    /// Wrap raw entries without validation. [`decode`] performs the checks.
    pub fn from_entries(entries: Vec<NeqrEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[NeqrEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Encode a grid in row-major order. Always yields 16 entries.
pub fn encode(grid: &PixelGrid) -> EncodedRecord {
    let entries = grid
        .pixels()
        .iter()
        .enumerate()
        .map(|(idx, &[red, green, blue])| NeqrEntry { position: idx as u8, red, green, blue })
        .collect();
    EncodedRecord { entries }
}

/// Rebuild a grid from an encoded record.
///
/// # Errors
/// [`QpixError::MalformedRecord`] unless the record holds exactly 16 entries
/// whose positions run 0, 1, ..., 15.
pub fn decode(record: &EncodedRecord) -> Result<PixelGrid, QpixError> {
    if record.len() != PIXEL_COUNT {
        return Err(QpixError::MalformedRecord);
    }
    let in_order = record
        .entries
        .iter()
        .enumerate()
        .all(|(idx, e)| e.position as usize == idx);
    if !in_order {
        return Err(QpixError::MalformedRecord);
    }
    let pixels: Vec<Rgb> = record.entries.iter().map(NeqrEntry::rgb).collect();
    PixelGrid::from_pixels(&pixels).map_err(|_| QpixError::MalformedRecord)
}
