//! Property-based tests.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Signed attestations verify and round-trip their claims
//! - Tampered payloads never verify
//! - Canonical claim JSON has sorted keys
//! - Memory type parsing is case-insensitive
//! - Environment names other than the exact table keys resolve to production

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use bravozero::{
    Attestation, AttestationClaims, Environment, MemoryType, PersonaAuthenticator,
    verify_attestation,
};
use proptest::prelude::*;
use secrecy::SecretSlice;

fn authenticator(seed: [u8; 32], agent_id: &str) -> PersonaAuthenticator {
    PersonaAuthenticator::from_parts(agent_id, Some(&SecretSlice::from(seed.to_vec())), None)
        .unwrap()
}

// ============================================================================
// Attestations
// ============================================================================

proptest! {
    /// Property: any signed claims verify against the signer's public key.
    #[test]
    fn prop_signed_claims_verify(
        seed in any::<[u8; 32]>(),
        agent_id in "[a-zA-Z0-9_-]{1,40}",
        timestamp in any::<u64>(),
        action in proptest::option::of("[a-z_]{1,20}"),
    ) {
        let auth = authenticator(seed, &agent_id);
        let claims = AttestationClaims::new(agent_id.clone(), timestamp, action.as_deref());
        let header = auth.sign_claims(&claims).unwrap().encode().unwrap();

        let verified = verify_attestation(&header, &auth.public_key()).unwrap();
        prop_assert_eq!(verified, claims);
    }

    /// Property: flipping any payload byte breaks verification.
    #[test]
    fn prop_tampered_payload_fails(
        seed in any::<[u8; 32]>(),
        index in any::<prop::sample::Index>(),
    ) {
        let auth = authenticator(seed, "agent");
        let attestation = auth
            .sign_claims(&AttestationClaims::new("agent", 1_700_000_000, None))
            .unwrap();

        let mut payload = attestation.payload_bytes().unwrap();
        let i = index.index(payload.len());
        payload[i] ^= 0x01;
        let signature = attestation.signature().unwrap().to_bytes();
        let tampered = Attestation::new(&payload, &signature).encode().unwrap();

        prop_assert!(verify_attestation(&tampered, &auth.public_key()).is_err());
    }

    /// Property: canonical JSON keys are in sorted order.
    #[test]
    fn prop_canonical_json_sorted(
        agent_id in "[a-z]{1,10}",
        timestamp in any::<u64>(),
        action in proptest::option::of("[a-z]{1,10}"),
    ) {
        let json = AttestationClaims::new(agent_id, timestamp, action.as_deref())
            .to_canonical_json()
            .unwrap();
        let value: serde_json::Map<String, serde_json::Value> =
            serde_json::from_slice(&json).unwrap();
        let text = String::from_utf8(json).unwrap();

        let mut positions: Vec<usize> = value
            .keys()
            .map(|k| text.find(&format!("\"{k}\":")).unwrap())
            .collect();
        let original = positions.clone();
        positions.sort_unstable();
        let mut keys: Vec<&String> = value.keys().collect();
        keys.sort();
        prop_assert_eq!(original, positions);
        prop_assert_eq!(keys.len(), if action.is_some() { 4 } else { 3 });
    }
}

// ============================================================================
// Parsing
// ============================================================================

proptest! {
    /// Property: memory type names parse regardless of case.
    #[test]
    fn prop_memory_type_case_insensitive(
        name in prop::sample::select(vec!["episodic", "semantic", "procedural", "working"]),
    ) {
        let lower = MemoryType::parse(name);
        prop_assert!(lower.is_some());
        prop_assert_eq!(MemoryType::parse(&name.to_uppercase()), lower);
        prop_assert_eq!(lower.unwrap().as_str(), name);
    }

    /// Property: unknown environment names fall back to production.
    #[test]
    fn prop_unknown_environment_is_production(name in "[a-zA-Z ]{0,20}") {
        prop_assume!(name != "staging" && name != "development");
        prop_assert_eq!(Environment::parse(&name), Environment::Production);
    }
}
