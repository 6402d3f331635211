// Copyright (c) 2026 qpix-core contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Fixed-size RGB pixel grid.
//!
//! A [`PixelGrid`] is always exactly [`GRID_WIDTH`] × [`GRID_HEIGHT`] pixels
//! with three 8-bit channels each. The shape is enforced at construction, so
//! every function that takes a `&PixelGrid` can rely on it.

pub mod error;
pub mod image_io;

pub use error::PixelError;

/// Grid width in pixels.
pub const GRID_WIDTH: usize = 4;
/// Grid height in pixels.
pub const GRID_HEIGHT: usize = 4;
/// Total pixel count.
pub const PIXEL_COUNT: usize = GRID_WIDTH * GRID_HEIGHT;
/// Channels per pixel (R, G, B).
pub const CHANNELS: usize = 3;
/// Length of the raw byte form: 16 pixels × 3 channels.
pub const RAW_LEN: usize = PIXEL_COUNT * CHANNELS;

/// One RGB pixel.
pub type Rgb = [u8; CHANNELS];

/// An immutable 4×4 RGB image stored in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelGrid {
    pixels: [Rgb; PIXEL_COUNT],
}

impl PixelGrid {
    /// Build a grid from exactly 16 pixels in row-major order.
    pub fn from_pixels(pixels: &[Rgb]) -> Result<Self, PixelError> {
        let pixels: [Rgb; PIXEL_COUNT] = pixels
            .try_into()
            .map_err(|_| PixelError::WrongShape { expected: PIXEL_COUNT, actual: pixels.len() })?;
        Ok(Self { pixels })
    }

    /// Build a grid from 48 interleaved RGB bytes (row-major).
    pub fn from_raw(bytes: &[u8]) -> Result<Self, PixelError> {
        if bytes.len() != RAW_LEN {
            return Err(PixelError::WrongShape { expected: RAW_LEN, actual: bytes.len() });
        }
        let mut pixels = [[0u8; CHANNELS]; PIXEL_COUNT];
        for (px, chunk) in pixels.iter_mut().zip(bytes.chunks_exact(CHANNELS)) {
            px.copy_from_slice(chunk);
        }
        Ok(Self { pixels })
    }

    /// Build a grid from rows of pixels. Requires 4 rows of 4 pixels.
    pub fn from_rows(rows: &[Vec<Rgb>]) -> Result<Self, PixelError> {
        if rows.len() != GRID_HEIGHT {
            return Err(PixelError::WrongShape { expected: GRID_HEIGHT, actual: rows.len() });
        }
        if let Some(row) = rows.iter().find(|r| r.len() != GRID_WIDTH) {
            return Err(PixelError::WrongShape { expected: GRID_WIDTH, actual: row.len() });
        }
        let flat: Vec<Rgb> = rows.iter().flatten().copied().collect();
        Self::from_pixels(&flat)
    }

    /// A grid where every pixel has the same color.
    pub fn filled(color: Rgb) -> Self {
        Self { pixels: [color; PIXEL_COUNT] }
    }

    /// Pixel at (`row`, `col`). Panics if out of range.
    pub fn get(&self, row: usize, col: usize) -> Rgb {
        assert!(row < GRID_HEIGHT && col < GRID_WIDTH, "pixel ({row}, {col}) out of range");
        self.pixels[row * GRID_WIDTH + col]
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> &[Rgb; PIXEL_COUNT] {
        &self.pixels
    }

    /// Iterate over every channel value (R, G, B of pixel 0, then pixel 1, ...).
    pub fn channels(&self) -> impl Iterator<Item = u8> + '_ {
        self.pixels.iter().flat_map(|px| px.iter().copied())
    }

    /// The 48-byte raw form accepted by [`PixelGrid::from_raw`].
    pub fn to_raw(&self) -> Vec<u8> {
        self.channels().collect()
    }

    /// Return a copy with pixel (`row`, `col`) replaced. Panics if out of range.
    pub fn with_pixel(mut self, row: usize, col: usize, color: Rgb) -> Self {
        assert!(row < GRID_HEIGHT && col < GRID_WIDTH, "pixel ({row}, {col}) out of range");
        self.pixels[row * GRID_WIDTH + col] = color;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_roundtrip() {
        let bytes: Vec<u8> = (0..RAW_LEN as u8).collect();
        let grid = PixelGrid::from_raw(&bytes).unwrap();
        assert_eq!(grid.get(0, 0), [0, 1, 2]);
        assert_eq!(grid.get(3, 3), [45, 46, 47]);
        assert_eq!(grid.to_raw(), bytes);
    }

    #[test]
    fn wrong_pixel_count_rejected() {
        let result = PixelGrid::from_pixels(&[[0, 0, 0]; 15]);
        assert!(matches!(result, Err(PixelError::WrongShape { expected: 16, actual: 15 })));
    }

    #[test]
    fn wrong_raw_length_rejected() {
        assert!(PixelGrid::from_raw(&[0u8; 47]).is_err());
        assert!(PixelGrid::from_raw(&[0u8; 49]).is_err());
    }

    #[test]
    fn ragged_rows_rejected() {
        let mut rows = vec![vec![[1, 2, 3]; 4]; 4];
        rows[2].pop();
        assert!(PixelGrid::from_rows(&rows).is_err());
        assert!(PixelGrid::from_rows(&rows[..3]).is_err());
    }

    #[test]
    fn rows_are_row_major() {
        let rows: Vec<Vec<Rgb>> = (0..4u8)
            .map(|r| (0..4u8).map(|c| [r, c, 0]).collect())
            .collect();
        let grid = PixelGrid::from_rows(&rows).unwrap();
        assert_eq!(grid.pixels()[6], [1, 2, 0]);
        assert_eq!(grid.get(1, 2), [1, 2, 0]);
    }

    #[test]
    fn with_pixel_leaves_original() {
        let black = PixelGrid::filled([0, 0, 0]);
        let red = black.with_pixel(0, 0, [255, 0, 0]);
        assert_eq!(black.get(0, 0), [0, 0, 0]);
        assert_eq!(red.get(0, 0), [255, 0, 0]);
    }
}
