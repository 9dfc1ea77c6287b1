//! PERSONA attestation format.
//!
//! An attestation is a JSON object `{payload, signature, algorithm}` whose
//! `payload` is the canonical JSON encoding of [`AttestationClaims`] and whose
//! `signature` is the Ed25519 signature over exactly those bytes. Both are
//! base64 encoded, and the whole object is base64 encoded again to form the
//! `X-Persona-Attestation` header value.

use crate::{Error, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use ed25519_dalek::{PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH, Signature, VerifyingKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The only signature algorithm attestations use.
pub const ALGORITHM: &str = "Ed25519";

/// Claims signed by an attestation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationClaims {
    /// The PERSONA agent identifier.
    pub agent_id: String,
    /// Unix timestamp (seconds) at signing time.
    pub timestamp: u64,
    /// `<timestamp>-<random base36 suffix>`.
    pub nonce: String,
    /// The intended action, when one was supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl AttestationClaims {
    /// Builds claims for `agent_id` at `timestamp` with a fresh nonce.
    ///
    /// An empty action is treated as absent.
    #[must_use]
    pub fn new(agent_id: impl Into<String>, timestamp: u64, action: Option<&str>) -> Self {
        Self {
            agent_id: agent_id.into(),
            timestamp,
            nonce: generate_nonce(timestamp),
            action: action.filter(|a| !a.is_empty()).map(str::to_string),
        }
    }

    /// Encodes the claims as compact JSON with keys sorted lexicographically.
    ///
    /// The byte output is what gets signed, so it must not depend on field
    /// declaration order or on the map representation `serde_json` was built
    /// with.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_canonical_json(&self) -> Result<Vec<u8>> {
        let value = serde_json::to_value(self).map_err(|e| encode_error(&e))?;
        let sorted: BTreeMap<String, serde_json::Value> = match value {
            serde_json::Value::Object(map) => map.into_iter().collect(),
            _ => BTreeMap::new(),
        };
        serde_json::to_vec(&sorted).map_err(|e| encode_error(&e))
    }
}

/// A signed attestation, as carried (base64 encoded) in a request header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestation {
    /// Base64 of the canonical claims JSON.
    pub payload: String,
    /// Base64 of the Ed25519 signature over the payload bytes.
    pub signature: String,
    /// Always `Ed25519`.
    pub algorithm: String,
}

impl Attestation {
    /// Builds an attestation from raw payload and signature bytes.
    #[must_use]
    pub fn new(payload: &[u8], signature: &[u8]) -> Self {
        Self {
            payload: STANDARD.encode(payload),
            signature: STANDARD.encode(signature),
            algorithm: ALGORITHM.to_string(),
        }
    }

    /// Encodes the attestation as a header value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn encode(&self) -> Result<String> {
        let json = serde_json::to_vec(self).map_err(|e| encode_error(&e))?;
        Ok(STANDARD.encode(json))
    }

    /// Decodes an attestation from a header value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] if the value is not base64 encoded
    /// attestation JSON.
    pub fn decode(header: &str) -> Result<Self> {
        let json = STANDARD
            .decode(header.trim())
            .map_err(|e| auth_error(format!("attestation is not base64: {e}")))?;
        serde_json::from_slice(&json)
            .map_err(|e| auth_error(format!("attestation is not valid JSON: {e}")))
    }

    /// Returns the decoded payload bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] if the payload is not base64.
    pub fn payload_bytes(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.payload)
            .map_err(|e| auth_error(format!("payload is not base64: {e}")))
    }

    /// Returns the decoded signature.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] if the signature is not 64 base64
    /// encoded bytes.
    pub fn signature(&self) -> Result<Signature> {
        let bytes = STANDARD
            .decode(&self.signature)
            .map_err(|e| auth_error(format!("signature is not base64: {e}")))?;
        let bytes: [u8; SIGNATURE_LENGTH] = bytes.try_into().map_err(|b: Vec<u8>| {
            auth_error(format!(
                "signature is {} bytes, expected {SIGNATURE_LENGTH}",
                b.len()
            ))
        })?;
        Ok(Signature::from_bytes(&bytes))
    }
}

/// Verifies an `X-Persona-Attestation` header value against a base64 public key.
///
/// Returns the signed claims on success.
///
/// # Errors
///
/// Returns [`Error::Authentication`] if the header cannot be decoded, the
/// algorithm is not Ed25519, the public key is malformed, or the signature
/// does not verify.
pub fn verify_attestation(header: &str, public_key: &str) -> Result<AttestationClaims> {
    let attestation = Attestation::decode(header)?;
    if attestation.algorithm != ALGORITHM {
        return Err(auth_error(format!(
            "unsupported algorithm '{}'",
            attestation.algorithm
        )));
    }

    let key_bytes = STANDARD
        .decode(public_key.trim())
        .map_err(|e| auth_error(format!("public key is not base64: {e}")))?;
    let key_bytes: [u8; PUBLIC_KEY_LENGTH] = key_bytes
        .try_into()
        .map_err(|_| auth_error(format!("public key must be {PUBLIC_KEY_LENGTH} bytes")))?;
    let verifying_key = VerifyingKey::from_bytes(&key_bytes)
        .map_err(|e| auth_error(format!("invalid public key: {e}")))?;

    let payload = attestation.payload_bytes()?;
    let signature = attestation.signature()?;
    verifying_key
        .verify_strict(&payload, &signature)
        .map_err(|e| auth_error(format!("signature verification failed: {e}")))?;

    serde_json::from_slice(&payload).map_err(|e| auth_error(format!("invalid claims: {e}")))
}

/// Generates a nonce of the form `<timestamp>-<base36 random>`.
///
/// Uniqueness is best effort; the suffix carries 64 random-ish bits.
pub(crate) fn generate_nonce(timestamp: u64) -> String {
    let (high, low) = uuid::Uuid::new_v4().as_u64_pair();
    format!("{timestamp}-{}", to_base36(high ^ low))
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::with_capacity(13);
    while value > 0 {
        // value % 36 < 36, so the index is always in bounds
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

fn auth_error(message: String) -> Error {
    Error::Authentication {
        message,
        details: None,
    }
}

fn encode_error(e: &serde_json::Error) -> Error {
    Error::OperationFailed {
        operation: "encode_attestation".to_string(),
        cause: e.to_string(),
    }
}
