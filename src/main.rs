// Copyright (c) 2026 qpix-core contributors
// SPDX-License-Identifier: GPL-3.0-only

mod cli;

use std::process::ExitCode;

use clap::Parser;
use qpix_core::pixels::image_io;
use qpix_core::{FsStore, Pipeline, QpixError};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let store = FsStore::open(&cli.store_dir)?;
    let pipeline = Pipeline::new(store, cli.command.pipeline_config());

    match run(&pipeline, &cli.command) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            tracing::debug!(error = ?e, "operation failed");
            eprintln!("{}", e.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run(pipeline: &Pipeline<FsStore>, command: &Command) -> Result<(), QpixError> {
    match command {
        Command::Encrypt { image, out, keys, .. } => {
            let bytes = std::fs::read(image).map_err(|_| QpixError::InvalidInput("cannot read image file"))?;
            let sealed = pipeline.encrypt_image(&bytes, &keys.passphrases())?;
            std::fs::write(out, &sealed.ciphertext)
                .map_err(|e| QpixError::Internal(format!("cannot write {}: {e}", out.display())))?;
            println!("Image encrypted successfully with AES + DES!");
            println!("ciphertext: {}", out.display());
            println!("session:    {}", sealed.session);
        }
        Command::Decrypt { ciphertext, out, keys } => {
            let bytes = std::fs::read(ciphertext)
                .map_err(|_| QpixError::InvalidInput("cannot read ciphertext file"))?;
            // Non-UTF-8 input cannot be our base64 text.
            let text = String::from_utf8(bytes).map_err(|_| QpixError::DecryptionFailed)?;
            let opened = pipeline.decrypt(&text, &keys.passphrases())?;
            std::fs::write(out, image_io::grid_to_png(&opened.grid)?)
                .map_err(|e| QpixError::Internal(format!("cannot write {}: {e}", out.display())))?;
            println!("Image decrypted successfully (DES + AES)!");
            println!("image:   {}", out.display());
            match opened.metrics {
                Some(m) => println!("metrics: {m}"),
                None => println!("metrics: unavailable (no reference for this ciphertext)"),
            }
        }
    }
    Ok(())
}
