// Copyright (c) 2026 qpix-core contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Reconstruction quality metrics between two pixel grids.
//!
//! All three metrics run over the 48 channel values in `f64`, so differences
//! of `u8` values never wrap.

use core::fmt;

use crate::pixels::PixelGrid;

/// Peak value of an 8-bit channel.
pub const MAX_PIXEL_VALUE: f64 = 255.0;

fn diffs<'a>(a: &'a PixelGrid, b: &'a PixelGrid) -> impl Iterator<Item = f64> + 'a {
    a.channels().zip(b.channels()).map(|(x, y)| x as f64 - y as f64)
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}

/// Mean squared error over all channel values.
pub fn mse(a: &PixelGrid, b: &PixelGrid) -> f64 {
    mean(diffs(a, b).map(|d| d * d))
}

/// Mean absolute error over all channel values.
pub fn mae(a: &PixelGrid, b: &PixelGrid) -> f64 {
    mean(diffs(a, b).map(f64::abs))
}

/// Peak signal-to-noise ratio in dB with an 8-bit peak.
///
/// Identical grids give `f64::INFINITY`.
pub fn psnr(a: &PixelGrid, b: &PixelGrid) -> f64 {
    psnr_with_max(a, b, MAX_PIXEL_VALUE)
}

/// PSNR with an explicit peak value: `10 · log10(max² / mse)`.
pub fn psnr_with_max(a: &PixelGrid, b: &PixelGrid, max_val: f64) -> f64 {
    let m = mse(a, b);
    if m == 0.0 {
        return f64::INFINITY;
    }
    10.0 * (max_val * max_val / m).log10()
}

/// MSE, MAE and PSNR between a reference grid and its reconstruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsResult {
    pub mse: f64,
    pub mae: f64,
    /// Decibels, or `+inf` for a perfect reconstruction.
    pub psnr_db: f64,
}

impl MetricsResult {
    pub fn compute(reference: &PixelGrid, reconstructed: &PixelGrid) -> Self {
        Self {
            mse: mse(reference, reconstructed),
            mae: mae(reference, reconstructed),
            psnr_db: psnr(reference, reconstructed),
        }
    }

    /// True when every channel matched.
    pub fn is_lossless(&self) -> bool {
        self.mse == 0.0
    }
}

impl fmt::Display for MetricsResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MSE={:.6} MAE={:.6} ", self.mse, self.mae)?;
        if self.psnr_db.is_infinite() {
            write!(f, "PSNR=inf dB")
        } else {
            write!(f, "PSNR={:.6} dB", self.psnr_db)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_grids() {
        let g = PixelGrid::filled([10, 200, 30]);
        assert_eq!(mse(&g, &g), 0.0);
        assert_eq!(mae(&g, &g), 0.0);
        assert_eq!(psnr(&g, &g), f64::INFINITY);
    }

    #[test]
    fn black_vs_white() {
        let black = PixelGrid::filled([0, 0, 0]);
        let white = PixelGrid::filled([255, 255, 255]);
        assert_eq!(mse(&black, &white), 65025.0);
        assert_eq!(mae(&black, &white), 255.0);
        assert!(psnr(&black, &white).abs() < 1e-12);
    }

    #[test]
    fn single_channel_difference() {
        let a = PixelGrid::filled([0, 0, 0]);
        let b = a.with_pixel(0, 0, [255, 0, 0]);
        assert!((mse(&a, &b) - 65025.0 / 48.0).abs() < 1e-9);
        assert!((mae(&a, &b) - 255.0 / 48.0).abs() < 1e-9);
        let expected = 10.0 * (48.0f64).log10();
        assert!((psnr(&a, &b) - expected).abs() < 1e-9);
    }

    #[test]
    fn no_underflow_when_second_is_larger() {
        let a = PixelGrid::filled([1, 1, 1]);
        let b = PixelGrid::filled([3, 3, 3]);
        assert_eq!(mse(&a, &b), 4.0);
        assert_eq!(mae(&a, &b), 2.0);
    }

    #[test]
    fn custom_peak() {
        let a = PixelGrid::filled([0, 0, 0]);
        let b = PixelGrid::filled([1, 1, 1]);
        assert!((psnr_with_max(&a, &b, 1.0)).abs() < 1e-12);
    }

    #[test]
    fn display_rounds_and_prints_inf() {
        let g = PixelGrid::filled([5, 5, 5]);
        let m = MetricsResult::compute(&g, &g);
        assert!(m.is_lossless());
        assert_eq!(m.to_string(), "MSE=0.000000 MAE=0.000000 PSNR=inf dB");
    }
}
