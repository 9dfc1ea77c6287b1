//! Service clients.
//!
//! One typed client per remote service. Each wraps a shared transport that
//! attaches credentials and, when configured, a fresh PERSONA attestation to
//! every request.
//!
//! | Client | Base path |
//! |--------|-----------|
//! | [`ConstitutionClient`] | `/v1/constitution` |
//! | [`MemoryClient`] | `/v1/memory` |
//! | [`BridgeClient`] | `/v1/bridge` |

mod bridge;
mod constitution;
mod memory;
mod transport;

pub use bridge::BridgeClient;
pub use constitution::ConstitutionClient;
pub use memory::MemoryClient;
pub use transport::{ATTESTATION_HEADER, DEFAULT_RETRY_AFTER_SECS, USER_AGENT};

use crate::auth::PersonaAuthenticator;
use crate::config::DEFAULT_TIMEOUT_MS;
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;

/// Configuration shared by the service clients.
#[derive(Debug)]
pub struct ServiceConfig {
    /// API base URL, without the service path.
    pub base_url: String,
    /// API key for authentication.
    pub api_key: SecretString,
    /// PERSONA agent identifier.
    pub agent_id: String,
    /// Signs attestations when present.
    pub authenticator: Option<Arc<PersonaAuthenticator>>,
    /// Request timeout in milliseconds (0 disables the timeout).
    pub timeout_ms: u64,
}

impl ServiceConfig {
    /// Creates a configuration without an authenticator.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        agent_id: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: SecretString::from(api_key.into()),
            agent_id: agent_id.into(),
            authenticator: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Attaches an authenticator.
    #[must_use]
    pub fn with_authenticator(mut self, authenticator: Arc<PersonaAuthenticator>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    /// Sets the request timeout in milliseconds.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Builds an async HTTP client with the configured timeout.
#[must_use]
pub fn build_http_client(timeout_ms: u64) -> reqwest::Client {
    let mut builder = reqwest::Client::builder();
    if timeout_ms > 0 {
        builder = builder.timeout(Duration::from_millis(timeout_ms));
    }

    builder.build().unwrap_or_else(|err| {
        tracing::warn!("Failed to build HTTP client: {err}");
        reqwest::Client::new()
    })
}
