// Copyright (c) 2026 qpix-core contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Round-trip integration tests for the encrypt/decrypt pipeline.

use proptest::prelude::*;
use qpix_core::cipher::{tier_a, tier_b, TierAKey, TierBKey};
use qpix_core::{
    mse, FailureKind, MemoryStore, Passphrases, Pipeline, PipelineConfig, PixelGrid, QpixError,
};

fn pipeline() -> Pipeline<MemoryStore> {
    Pipeline::new(MemoryStore::new(), PipelineConfig::default())
}

fn gradient() -> PixelGrid {
    let raw: Vec<u8> = (0..48u8).map(|i| i.wrapping_mul(37)).collect();
    PixelGrid::from_raw(&raw).unwrap()
}

#[test]
fn all_black_roundtrip_is_lossless() {
    let p = pipeline();
    let black = PixelGrid::filled([0, 0, 0]);
    let pass = Passphrases::new("keyA", "keyB");

    let sealed = p.encrypt(&black, &pass).unwrap();
    let opened = p.decrypt(&sealed.ciphertext, &pass).unwrap();

    assert_eq!(opened.grid, black);
    assert!(opened.grid.channels().all(|c| c == 0));
    let m = opened.metrics.expect("reference was stored at encryption");
    assert_eq!(m.mse, 0.0);
    assert_eq!(m.mae, 0.0);
    assert_eq!(m.psnr_db, f64::INFINITY);
}

#[test]
fn wrong_second_passphrase_fails() {
    let p = pipeline();
    let grid = PixelGrid::filled([0, 0, 0]).with_pixel(0, 0, [255, 0, 0]);
    let sealed = p.encrypt(&grid, &Passphrases::new("a", "b")).unwrap();

    match p.decrypt(&sealed.ciphertext, &Passphrases::new("a", "wrong")) {
        Err(e) => assert_eq!(e.kind(), FailureKind::WrongKey),
        Ok(opened) => assert!(mse(&opened.grid, &grid) > 0.0),
    }
}

#[test]
fn wrong_first_passphrase_fails() {
    let p = pipeline();
    let sealed = p.encrypt(&gradient(), &Passphrases::new("a", "b")).unwrap();
    let err = p.decrypt(&sealed.ciphertext, &Passphrases::new("nope", "b")).unwrap_err();
    assert!(matches!(err, QpixError::DecryptionFailed));
}

#[test]
fn empty_passphrase_rejected_before_crypto() {
    let p = pipeline();
    // Garbage ciphertext: a crypto attempt would report DecryptionFailed.
    for pass in [Passphrases::new("", "b"), Passphrases::new("a", ""), Passphrases::single("")] {
        let err = p.decrypt("not-a-ciphertext", &pass).unwrap_err();
        assert!(matches!(err, QpixError::InvalidInput(_)), "got {err:?}");
        assert_eq!(err.kind(), FailureKind::BadInput);
    }
}

#[test]
fn empty_ciphertext_rejected() {
    let err = pipeline().decrypt("  \n", &Passphrases::single("k")).unwrap_err();
    assert!(matches!(err, QpixError::InvalidInput(_)));
}

#[test]
fn fresh_store_has_no_metrics() {
    let pass = Passphrases::new("keyA", "keyB");
    let grid = gradient();
    let sealed = pipeline().encrypt(&grid, &pass).unwrap();

    // A different pipeline with an empty store, as after a restart.
    let opened = pipeline().decrypt(&sealed.ciphertext, &pass).unwrap();
    assert_eq!(opened.grid, grid);
    assert!(opened.metrics.is_none());
    assert!(opened.preview_png_base64().unwrap().starts_with("iVBORw0KGgo"));
}

#[test]
fn concurrent_sessions_keep_their_own_reference() {
    let p = pipeline();
    let pass = Passphrases::single("shared");
    let first = PixelGrid::filled([10, 10, 10]);
    let second = PixelGrid::filled([200, 200, 200]);

    let sealed_first = p.encrypt(&first, &pass).unwrap();
    let sealed_second = p.encrypt(&second, &pass).unwrap();
    assert_ne!(sealed_first.session, sealed_second.session);

    let opened = p.decrypt(&sealed_first.ciphertext, &pass).unwrap();
    assert_eq!(opened.grid, first);
    assert!(opened.metrics.unwrap().is_lossless());
}

#[test]
fn tier_failures_report_identically() {
    let p = pipeline();
    let sealed = p.encrypt(&gradient(), &Passphrases::new("a", "b")).unwrap();

    let tier_a_err = p.decrypt(&sealed.ciphertext, &Passphrases::new("x", "b")).unwrap_err();
    let tier_b_err = p.decrypt(&sealed.ciphertext, &Passphrases::new("a", "x")).unwrap_err();

    assert_eq!(tier_a_err.kind(), FailureKind::WrongKey);
    assert_eq!(tier_b_err.kind(), FailureKind::WrongKey);
    assert_eq!(tier_a_err.user_message(), tier_b_err.user_message());
}

#[test]
fn valid_ciphers_over_bad_record_report_as_wrong_key() {
    // Both layers decrypt fine, but the plaintext is not a record.
    let pass = Passphrases::new("a", "b");
    let inner = tier_a::encrypt(b"not a record", &TierAKey::derive("a").unwrap()).unwrap();
    let outer = tier_b::encrypt(&inner, &TierBKey::derive("b").unwrap()).unwrap();

    let err = pipeline().decrypt(&outer, &pass).unwrap_err();
    assert!(matches!(err, QpixError::MalformedRecord));
    let tier_err = pipeline().decrypt(&outer, &Passphrases::new("a", "c")).unwrap_err();
    assert_eq!(err.user_message(), tier_err.user_message());
}

#[test]
fn tampered_ciphertext_fails() {
    let p = pipeline();
    let pass = Passphrases::single("k");
    let sealed = p.encrypt(&gradient(), &pass).unwrap();

    let mut chars: Vec<char> = sealed.ciphertext.chars().collect();
    let mid = chars.len() / 2;
    chars[mid] = if chars[mid] == 'A' { 'B' } else { 'A' };
    let tampered: String = chars.into_iter().collect();

    let err = p.decrypt(&tampered, &pass).unwrap_err();
    assert_eq!(err.kind(), FailureKind::WrongKey);
}

#[test]
fn ciphertext_with_trailing_newline_decrypts() {
    let p = pipeline();
    let pass = Passphrases::single("k");
    let sealed = p.encrypt(&gradient(), &pass).unwrap();
    let opened = p.decrypt(&format!("{}\n", sealed.ciphertext), &pass).unwrap();
    assert_eq!(opened.grid, gradient());
    assert!(opened.metrics.is_some());
}

#[test]
fn same_grid_encrypts_differently() {
    let p = pipeline();
    let pass = Passphrases::single("k");
    let a = p.encrypt(&gradient(), &pass).unwrap();
    let b = p.encrypt(&gradient(), &pass).unwrap();
    assert_ne!(a.ciphertext, b.ciphertext);
}

proptest! {
    // Each case runs four Argon2 derivations.
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn roundtrip_identity(
        raw in proptest::collection::vec(any::<u8>(), 48),
        pa in "[a-zA-Z0-9]{1,12}",
        pb in "[a-zA-Z0-9]{1,12}",
    ) {
        let grid = PixelGrid::from_raw(&raw).unwrap();
        let p = pipeline();
        let pass = Passphrases::new(pa, pb);
        let sealed = p.encrypt(&grid, &pass).unwrap();
        let opened = p.decrypt(&sealed.ciphertext, &pass).unwrap();
        prop_assert_eq!(opened.grid, grid);
        prop_assert!(opened.metrics.unwrap().is_lossless());
    }
}
