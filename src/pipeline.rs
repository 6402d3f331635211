// Copyright (c) 2026 qpix-core contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Encrypt / decrypt orchestration.
//!
//! Encrypt: passphrase check → key derivation → NEQR encode → tier A →
//! tier B. Decrypt runs the same chain backwards and, when the reference grid
//! for this ciphertext is on hand, computes [`MetricsResult`].
//!
//! Artifacts are scoped to a session id derived from the final ciphertext,
//! so concurrent encryptions never overwrite each other's reference grid:
//!
//! ```text
//! sessions/<id>/reference.rgb     48 raw bytes of the original grid
//! sessions/<id>/tier_a_input.bin  serialized NEQR record (diagnostic)
//! sessions/<id>/ciphertext.txt    final tier-B text
//! sessions/<id>/decrypted.png     reconstructed image
//! ```

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::cipher::{tier_a, tier_b, TierAKey, TierBKey};
use crate::error::QpixError;
use crate::metrics::MetricsResult;
use crate::neqr::{self, EncodedRecord};
use crate::pixels::{image_io, PixelGrid};
use crate::store::{ArtifactStore, StoreError};

/// Hex length of a session id (16 bytes of SHA-256).
pub const SESSION_ID_LEN: usize = 32;

const REFERENCE_FILE: &str = "reference.rgb";
const DIAGNOSTIC_FILE: &str = "tier_a_input.bin";
const CIPHERTEXT_FILE: &str = "ciphertext.txt";
const DECRYPTED_FILE: &str = "decrypted.png";

/// The two passphrases, one per cipher tier.
#[derive(Clone)]
pub struct Passphrases {
    tier_a: String,
    tier_b: String,
}

impl Passphrases {
    pub fn new(tier_a: impl Into<String>, tier_b: impl Into<String>) -> Self {
        Self { tier_a: tier_a.into(), tier_b: tier_b.into() }
    }

    /// Use one passphrase for both tiers. The per-tier salts still give
    /// unrelated keys.
    pub fn single(passphrase: impl Into<String>) -> Self {
        let p = passphrase.into();
        Self { tier_a: p.clone(), tier_b: p }
    }

    fn validate(&self) -> Result<(), QpixError> {
        if self.tier_a.is_empty() {
            return Err(QpixError::InvalidInput("tier-A passphrase cannot be empty"));
        }
        if self.tier_b.is_empty() {
            return Err(QpixError::InvalidInput("tier-B passphrase cannot be empty"));
        }
        Ok(())
    }

    fn derive_keys(&self) -> Result<(TierAKey, TierBKey), QpixError> {
        self.validate()?;
        Ok((TierAKey::derive(&self.tier_a)?, TierBKey::derive(&self.tier_b)?))
    }
}

impl std::fmt::Debug for Passphrases {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Passphrases(..)")
    }
}

/// Which artifacts the pipeline persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Keep the original grid so a later decrypt can report metrics.
    pub persist_reference: bool,
    /// Keep the serialized record that entered tier A.
    pub persist_diagnostics: bool,
    /// Keep the final ciphertext and the reconstructed PNG.
    pub persist_outputs: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { persist_reference: true, persist_diagnostics: true, persist_outputs: true }
    }
}

/// Result of a successful encryption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    /// Tier-B base64 text. This is the whole transport format.
    pub ciphertext: String,
    /// Session id the artifacts were stored under.
    pub session: String,
}

/// Result of a successful decryption.
#[derive(Debug, Clone, PartialEq)]
pub struct Decrypted {
    pub grid: PixelGrid,
    /// `None` when no reference grid exists for this ciphertext.
    pub metrics: Option<MetricsResult>,
    pub session: String,
}

impl Decrypted {
    /// Base64 PNG of the reconstructed grid.
    pub fn preview_png_base64(&self) -> Result<String, QpixError> {
        Ok(image_io::grid_to_png_base64(&self.grid)?)
    }
}

/// Session id for a ciphertext: first 16 bytes of SHA-256, lowercase hex.
pub fn session_id(ciphertext: &str) -> String {
    let digest = Sha256::digest(ciphertext.trim().as_bytes());
    hex::encode(&digest[..SESSION_ID_LEN / 2])
}

fn artifact_key(session: &str, file: &str) -> String {
    format!("sessions/{session}/{file}")
}

/// Encrypt/decrypt orchestrator over an artifact store.
#[derive(Debug)]
pub struct Pipeline<S> {
    store: S,
    config: PipelineConfig,
}

impl<S: ArtifactStore> Pipeline<S> {
    pub fn new(store: S, config: PipelineConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Encrypt a grid under both tiers.
    ///
    /// Artifacts are written only after every stage has succeeded, and either
    /// all of them land or none do.
    ///
    /// # Errors
    /// - [`QpixError::InvalidInput`] for an empty passphrase (before any
    ///   key derivation).
    /// - [`QpixError::Store`] if an artifact cannot be written.
    pub fn encrypt(&self, grid: &PixelGrid, passphrases: &Passphrases) -> Result<Sealed, QpixError> {
        let (key_a, key_b) = passphrases.derive_keys()?;

        let record = neqr::encode(grid);
        let record_bytes = record.to_bytes()?;
        debug!(entries = record.len(), bytes = record_bytes.len(), "grid encoded");

        let tier_a_text = tier_a::encrypt(&record_bytes, &key_a)?;
        debug!(len = tier_a_text.len(), "tier A sealed");
        let ciphertext = tier_b::encrypt(&tier_a_text, &key_b)?;
        debug!(len = ciphertext.len(), "tier B sealed");

        let session = session_id(&ciphertext);
        let raw = grid.to_raw();
        // Reference goes last: its presence marks a complete session.
        let mut pending: Vec<(&str, &[u8])> = Vec::with_capacity(3);
        if self.config.persist_diagnostics {
            pending.push((DIAGNOSTIC_FILE, record_bytes.as_slice()));
        }
        if self.config.persist_outputs {
            pending.push((CIPHERTEXT_FILE, ciphertext.as_bytes()));
        }
        if self.config.persist_reference {
            pending.push((REFERENCE_FILE, &raw[..]));
        }
        self.write_all_or_none(&session, &pending)?;

        info!(%session, "image encrypted");
        Ok(Sealed { ciphertext, session })
    }

    /// Write every artifact of a session, or none of them.
    ///
    /// On failure the artifacts already written are removed before the
    /// write error is returned.
    fn write_all_or_none(&self, session: &str, artifacts: &[(&str, &[u8])]) -> Result<(), QpixError> {
        for (done, (file, bytes)) in artifacts.iter().enumerate() {
            if let Err(e) = self.store.write(&artifact_key(session, file), bytes) {
                warn!(session, file, error = %e, "artifact write failed, rolling back");
                for (written, _) in &artifacts[..done] {
                    if let Err(undo) = self.store.remove(&artifact_key(session, written)) {
                        warn!(session, file = written, error = %undo, "rollback could not remove artifact");
                    }
                }
                return Err(e.into());
            }
        }
        Ok(())
    }

    /// Delete every artifact stored for `session`.
    ///
    /// Artifacts are never pruned automatically; long-running callers use
    /// this once a session is no longer needed. Missing artifacts are
    /// skipped, so calling it twice is harmless.
    ///
    /// # Errors
    /// [`QpixError::Store`] if an artifact exists but cannot be removed.
    pub fn forget(&self, session: &str) -> Result<(), QpixError> {
        for file in [REFERENCE_FILE, DIAGNOSTIC_FILE, CIPHERTEXT_FILE, DECRYPTED_FILE] {
            self.store.remove(&artifact_key(session, file))?;
        }
        info!(session, "session artifacts removed");
        Ok(())
    }

    /// Load an image file, downsample it to 4×4 and encrypt it.
    pub fn encrypt_image(&self, image_bytes: &[u8], passphrases: &Passphrases) -> Result<Sealed, QpixError> {
        passphrases.validate()?;
        if image_bytes.is_empty() {
            return Err(QpixError::InvalidInput("image cannot be empty"));
        }
        let grid = image_io::grid_from_image_bytes(image_bytes)?;
        self.encrypt(&grid, passphrases)
    }

    /// Decrypt a tier-B ciphertext back to a grid.
    ///
    /// Metrics are attached when the reference grid stored at encryption
    /// time is still available; a missing reference is not an error.
    ///
    /// # Errors
    /// - [`QpixError::InvalidInput`] for an empty passphrase or ciphertext.
    /// - [`QpixError::DecryptionFailed`] / [`QpixError::MalformedRecord`]
    ///   for a wrong key or corrupted ciphertext, regardless of tier.
    /// - [`QpixError::Store`] / [`QpixError::Internal`] for anything else.
    pub fn decrypt(&self, ciphertext: &str, passphrases: &Passphrases) -> Result<Decrypted, QpixError> {
        passphrases.validate()?;
        if ciphertext.trim().is_empty() {
            return Err(QpixError::InvalidInput("ciphertext cannot be empty"));
        }
        let (key_a, key_b) = passphrases.derive_keys()?;

        let tier_a_text = tier_b::decrypt(ciphertext, &key_b)?;
        let record_bytes = tier_a::decrypt(&tier_a_text, &key_a)?;
        let record = EncodedRecord::from_bytes(&record_bytes)?;
        let grid = neqr::decode(&record)?;
        debug!("grid reconstructed");

        let session = session_id(ciphertext);
        let metrics = self.load_reference(&session)?.map(|reference| MetricsResult::compute(&reference, &grid));
        match &metrics {
            Some(m) => info!(%session, %m, "image decrypted"),
            None => info!(%session, "image decrypted, no reference for metrics"),
        }

        if self.config.persist_outputs {
            let png = image_io::grid_to_png(&grid)?;
            self.store.write(&artifact_key(&session, DECRYPTED_FILE), &png)?;
        }

        Ok(Decrypted { grid, metrics, session })
    }

    fn load_reference(&self, session: &str) -> Result<Option<PixelGrid>, QpixError> {
        match self.store.read(&artifact_key(session, REFERENCE_FILE)) {
            Ok(raw) => {
                let grid = PixelGrid::from_raw(&raw)
                    .map_err(|e| QpixError::Internal(format!("stored reference grid is corrupt: {e}")))?;
                Ok(Some(grid))
            }
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => {
                warn!(session, error = %e, "reference grid unreadable");
                Err(e.into())
            }
        }
    }
}
