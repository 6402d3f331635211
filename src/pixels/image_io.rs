// Copyright (c) 2026 qpix-core contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Conversion between image files and [`PixelGrid`].
//!
//! Loading decodes any supported format (PNG, JPEG), drops alpha and resizes
//! to exactly 4×4 with a triangle filter. Rendering produces an 8-bit RGB PNG.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::imageops::FilterType;
use image::{ImageFormat, RgbImage};

use super::{PixelError, PixelGrid, Rgb, GRID_HEIGHT, GRID_WIDTH, PIXEL_COUNT};

/// Decode an image file and downsample it to a 4×4 grid.
pub fn grid_from_image_bytes(bytes: &[u8]) -> Result<PixelGrid, PixelError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| PixelError::UnreadableImage(e.to_string()))?;
    let rgb = img.to_rgb8();
    let small = if rgb.width() as usize == GRID_WIDTH && rgb.height() as usize == GRID_HEIGHT {
        rgb
    } else {
        image::imageops::resize(&rgb, GRID_WIDTH as u32, GRID_HEIGHT as u32, FilterType::Triangle)
    };
    let pixels: Vec<Rgb> = small.pixels().map(|p| p.0).collect();
    PixelGrid::from_pixels(&pixels)
}

/// Render a grid as a 4×4 RGB image.
pub fn grid_to_image(grid: &PixelGrid) -> RgbImage {
    let mut img = RgbImage::new(GRID_WIDTH as u32, GRID_HEIGHT as u32);
    for (idx, px) in img.pixels_mut().enumerate().take(PIXEL_COUNT) {
        px.0 = grid.pixels()[idx];
    }
    img
}

/// Encode a grid as PNG bytes.
pub fn grid_to_png(grid: &PixelGrid) -> Result<Vec<u8>, PixelError> {
    let mut out = Cursor::new(Vec::new());
    grid_to_image(grid)
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| PixelError::PngEncode(e.to_string()))?;
    Ok(out.into_inner())
}

/// Encode a grid as a base64 PNG, suitable for an inline `data:` preview.
pub fn grid_to_png_base64(grid: &PixelGrid) -> Result<String, PixelError> {
    Ok(STANDARD.encode(grid_to_png(grid)?))
}
