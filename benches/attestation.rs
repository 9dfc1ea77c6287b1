//! Benchmarks for attestation signing and verification.
//!
//! Every outgoing request signs a fresh attestation, so signing sits on the
//! hot path of every service call.

// Criterion macros generate items without docs - this is expected for benchmarks
// Benchmarks use expect/unwrap for simplicity - panics are acceptable in benchmarks
#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used)]

use bravozero::{AttestationClaims, PersonaAuthenticator, verify_attestation};
use criterion::{Criterion, criterion_group, criterion_main};
use secrecy::SecretSlice;
use std::hint::black_box;

fn authenticator() -> PersonaAuthenticator {
    let seed: Vec<u8> = (0u8..32).collect();
    PersonaAuthenticator::from_parts("bench-agent", Some(&SecretSlice::from(seed)), None).unwrap()
}

fn bench_create_attestation(c: &mut Criterion) {
    let auth = authenticator();
    let mut group = c.benchmark_group("create_attestation");

    group.bench_function("no_action", |b| {
        b.iter(|| black_box(auth.create_attestation(None).unwrap()));
    });
    group.bench_function("with_action", |b| {
        b.iter(|| black_box(auth.create_attestation(Some("write_file")).unwrap()));
    });

    group.finish();
}

fn bench_canonical_json(c: &mut Criterion) {
    let claims = AttestationClaims::new("bench-agent", 1_700_000_000, Some("read_file"));
    c.bench_function("canonical_json", |b| {
        b.iter(|| black_box(claims.to_canonical_json().unwrap()));
    });
}

fn bench_verify(c: &mut Criterion) {
    let auth = authenticator();
    let public_key = auth.public_key();
    let header = auth.create_attestation(Some("read_file")).unwrap();

    c.bench_function("verify_attestation", |b| {
        b.iter(|| black_box(verify_attestation(black_box(&header), &public_key).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_create_attestation,
    bench_canonical_json,
    bench_verify
);
criterion_main!(benches);
