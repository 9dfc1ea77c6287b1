//! PERSONA authentication.
//!
//! [`PersonaAuthenticator`] holds an agent's Ed25519 signing key and produces
//! the signed attestations attached to outbound requests as the
//! `X-Persona-Attestation` header.

mod attestation;
mod key;

pub use attestation::{ALGORITHM, Attestation, AttestationClaims, verify_attestation};
pub use key::{load_pem_file, parse_pem, signing_key_from_bytes};

use crate::{Error, Result, current_timestamp};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use ed25519_dalek::{Signer, SigningKey};
use secrecy::{ExposeSecret, SecretSlice};
use std::fmt;
use std::path::{Path, PathBuf};

/// Where an authenticator's private key comes from.
pub enum KeySource {
    /// Raw key bytes: a 32-byte seed or a 64-byte keypair.
    Bytes(SecretSlice<u8>),
    /// Path to a PEM file containing a `PRIVATE KEY` block.
    PemFile(PathBuf),
}

impl fmt::Debug for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(_) => f.write_str("KeySource::Bytes([REDACTED])"),
            Self::PemFile(path) => f.debug_tuple("KeySource::PemFile").field(path).finish(),
        }
    }
}

/// Signs PERSONA attestations for one agent.
pub struct PersonaAuthenticator {
    agent_id: String,
    signing_key: SigningKey,
}

impl PersonaAuthenticator {
    /// Creates an authenticator for `agent_id` from the given key source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyParse`] if the key cannot be loaded.
    pub fn new(agent_id: impl Into<String>, source: KeySource) -> Result<Self> {
        let signing_key = match source {
            KeySource::Bytes(bytes) => signing_key_from_bytes(bytes.expose_secret(), "raw bytes")?,
            KeySource::PemFile(path) => load_pem_file(&path)?,
        };
        Ok(Self {
            agent_id: agent_id.into(),
            signing_key,
        })
    }

    /// Creates an authenticator from optional raw bytes and an optional path.
    ///
    /// Raw bytes take precedence over the path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if neither is supplied, or
    /// [`Error::KeyParse`] if the key cannot be loaded.
    pub fn from_parts(
        agent_id: impl Into<String>,
        private_key: Option<&SecretSlice<u8>>,
        private_key_path: Option<&Path>,
    ) -> Result<Self> {
        let agent_id = agent_id.into();
        if let Some(bytes) = private_key {
            let signing_key = signing_key_from_bytes(bytes.expose_secret(), "raw bytes")?;
            return Ok(Self {
                agent_id,
                signing_key,
            });
        }
        match private_key_path {
            Some(path) => Self::new(agent_id, KeySource::PemFile(path.to_path_buf())),
            None => Err(Error::Configuration(
                "either a private key path or private key bytes is required".to_string(),
            )),
        }
    }

    /// Returns the agent identifier this authenticator signs for.
    #[must_use]
    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// Creates a signed attestation, base64 encoded for use as a header value.
    ///
    /// Each call uses the current time and a fresh nonce, so no two
    /// attestations are identical.
    ///
    /// # Errors
    ///
    /// Returns an error if the claims cannot be encoded.
    pub fn create_attestation(&self, action: Option<&str>) -> Result<String> {
        let claims = AttestationClaims::new(&self.agent_id, current_timestamp(), action);
        self.sign_claims(&claims)?.encode()
    }

    /// Signs the given claims.
    ///
    /// # Errors
    ///
    /// Returns an error if the claims cannot be encoded.
    pub fn sign_claims(&self, claims: &AttestationClaims) -> Result<Attestation> {
        let payload = claims.to_canonical_json()?;
        let signature = self.signing_key.sign(&payload);
        Ok(Attestation::new(&payload, &signature.to_bytes()))
    }

    /// Returns the base64 encoded Ed25519 public key.
    #[must_use]
    pub fn public_key(&self) -> String {
        STANDARD.encode(self.signing_key.verifying_key().as_bytes())
    }
}

impl fmt::Debug for PersonaAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersonaAuthenticator")
            .field("agent_id", &self.agent_id)
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}
