// Copyright (c) 2026 qpix-core contributors
// SPDX-License-Identifier: GPL-3.0-only

//! # qpix-core
//!
//! Encodes a 4×4 RGB image into an NEQR-style `(position, r, g, b)` record,
//! encrypts it under two independent cipher layers, and reverses the chain
//! with reconstruction metrics:
//!
//! - **Tier A**: AES-128-GCM-SIV over the serialized record.
//! - **Tier B**: DES-CBC (PKCS#7) over tier A's base64 text.
//!
//! Both keys come from passphrases via Argon2id with per-tier salts. After
//! decryption, MSE / MAE / PSNR are computed against the original grid when
//! the artifact store still holds it for that ciphertext.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use qpix_core::{Passphrases, Pipeline, PipelineConfig, PixelGrid, MemoryStore};
//!
//! let pipeline = Pipeline::new(MemoryStore::new(), PipelineConfig::default());
//! let pass = Passphrases::new("keyA", "keyB");
//! let sealed = pipeline.encrypt(&PixelGrid::filled([0, 0, 0]), &pass).unwrap();
//! let opened = pipeline.decrypt(&sealed.ciphertext, &pass).unwrap();
//! assert_eq!(opened.metrics.unwrap().psnr_db, f64::INFINITY);
//! ```

pub mod cipher;
pub mod error;
pub mod metrics;
pub mod neqr;
pub mod pipeline;
pub mod pixels;
pub mod store;

pub use error::{FailureKind, QpixError};
pub use metrics::{mae, mse, psnr, psnr_with_max, MetricsResult};
pub use neqr::{decode, encode, EncodedRecord, NeqrEntry};
pub use pipeline::{session_id, Decrypted, Passphrases, Pipeline, PipelineConfig, Sealed};
pub use pixels::{PixelError, PixelGrid, Rgb, GRID_HEIGHT, GRID_WIDTH, PIXEL_COUNT};
pub use store::{ArtifactStore, FsStore, MemoryStore, StoreError};
