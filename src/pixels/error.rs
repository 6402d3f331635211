// Copyright (c) 2026 qpix-core contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Error types for pixel grid construction and image I/O.

use std::fmt;

/// Errors that can occur while building a [`PixelGrid`](super::PixelGrid)
/// or converting it to and from an image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixelError {
    /// Input does not have the fixed 4×4×3 shape.
    WrongShape { expected: usize, actual: usize },
    /// The image bytes could not be decoded.
    UnreadableImage(String),
    /// The grid could not be encoded as PNG.
    PngEncode(String),
}

impl fmt::Display for PixelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongShape { expected, actual } => {
                write!(f, "wrong grid shape: expected {expected} elements, got {actual}")
            }
            Self::UnreadableImage(msg) => write!(f, "unreadable image: {msg}"),
            Self::PngEncode(msg) => write!(f, "PNG encoding failed: {msg}"),
        }
    }
}

impl std::error::Error for PixelError {}
