// Copyright (c) 2026 qpix-core contributors
// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use qpix_core::{Passphrases, PipelineConfig};

#[derive(Parser)]
#[command(name = "qpix", about = "Encrypt a 4x4 NEQR pixel image under AES-128 then DES")]
pub struct Cli {
    /// Directory for session artifacts (reference grid, ciphertext, PNG)
    #[arg(long, env = "QPIX_STORE_DIR", default_value = "qpix-artifacts", global = true)]
    pub store_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args)]
pub struct KeyArgs {
    /// Passphrase for both tiers (used when --key-a / --key-b are absent)
    #[arg(long, env = "QPIX_KEY", hide_env_values = true)]
    pub key: Option<String>,

    /// Tier-A (AES-128) passphrase
    #[arg(long, env = "QPIX_KEY_A", hide_env_values = true)]
    pub key_a: Option<String>,

    /// Tier-B (DES) passphrase
    #[arg(long, env = "QPIX_KEY_B", hide_env_values = true)]
    pub key_b: Option<String>,
}

impl KeyArgs {
    /// Per-tier keys fall back to `--key`, then to empty (rejected later by
    /// the pipeline as invalid input).
    pub fn passphrases(&self) -> Passphrases {
        let shared = self.key.clone().unwrap_or_default();
        Passphrases::new(
            self.key_a.clone().unwrap_or_else(|| shared.clone()),
            self.key_b.clone().unwrap_or(shared),
        )
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Downsample an image to 4x4 and encrypt it
    Encrypt {
        /// Input image (PNG or JPEG)
        image: PathBuf,
        /// Where to write the ciphertext text
        #[arg(long, short, default_value = "final_encrypted.txt")]
        out: PathBuf,
        /// Do not keep the original grid for later metrics
        #[arg(long)]
        no_reference: bool,
        #[command(flatten)]
        keys: KeyArgs,
    },
    /// Decrypt a ciphertext file and report reconstruction metrics
    Decrypt {
        /// Ciphertext text file produced by `encrypt`
        ciphertext: PathBuf,
        /// Where to write the reconstructed 4x4 PNG
        #[arg(long, short, default_value = "decrypted.png")]
        out: PathBuf,
        #[command(flatten)]
        keys: KeyArgs,
    },
}

impl Command {
    pub fn pipeline_config(&self) -> PipelineConfig {
        match self {
            Command::Encrypt { no_reference, .. } => PipelineConfig {
                persist_reference: !no_reference,
                ..PipelineConfig::default()
            },
            Command::Decrypt { .. } => PipelineConfig::default(),
        }
    }
}
