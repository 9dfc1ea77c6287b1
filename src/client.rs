//! Unified client facade.

use crate::auth::PersonaAuthenticator;
use crate::config::ClientConfig;
use crate::services::{BridgeClient, ConstitutionClient, MemoryClient, ServiceConfig};
use crate::Result;
use secrecy::{ExposeSecret, SecretString};
use std::sync::{Arc, OnceLock};

/// Entry point to the Bravo Zero services.
///
/// Owns the credentials, an optional [`PersonaAuthenticator`] and one shared
/// HTTP connection pool. Service clients are created on first access and
/// reused afterwards.
///
/// # Example
///
/// ```no_run
/// use bravozero::{BravoZeroClient, ClientConfig, EvaluateRequest};
///
/// # async fn run() -> bravozero::Result<()> {
/// let client = BravoZeroClient::new(
///     ClientConfig::new("api-key", "agent-1").with_private_key_path("agent.pem"),
/// )?;
/// let result = client
///     .constitution()
///     .evaluate(EvaluateRequest::new("read_file"))
///     .await?;
/// println!("{}", result.decision);
/// # Ok(())
/// # }
/// ```
pub struct BravoZeroClient {
    base_url: String,
    api_key: SecretString,
    agent_id: String,
    timeout_ms: u64,
    authenticator: Option<Arc<PersonaAuthenticator>>,
    http: reqwest::Client,
    constitution: OnceLock<ConstitutionClient>,
    memory: OnceLock<MemoryClient>,
    bridge: OnceLock<BridgeClient>,
}

impl BravoZeroClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Configuration`] if the API key or agent id is
    /// empty, or [`crate::Error::KeyParse`] if a configured key cannot be
    /// loaded.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let authenticator = if config.has_private_key() {
            Some(Arc::new(PersonaAuthenticator::from_parts(
                config.agent_id.clone(),
                config.private_key.as_ref(),
                config.private_key_path.as_deref(),
            )?))
        } else {
            None
        };

        let base_url = config.resolved_base_url();
        tracing::debug!(
            base_url = %base_url,
            agent_id = %config.agent_id,
            signing = authenticator.is_some(),
            "Created Bravo Zero client"
        );

        Ok(Self {
            base_url,
            http: crate::services::build_http_client(config.timeout_ms),
            api_key: config.api_key,
            agent_id: config.agent_id,
            timeout_ms: config.timeout_ms,
            authenticator,
            constitution: OnceLock::new(),
            memory: OnceLock::new(),
            bridge: OnceLock::new(),
        })
    }

    /// Creates a client from `BRAVOZERO_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing or the key is
    /// invalid.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Returns the constitution client.
    pub fn constitution(&self) -> &ConstitutionClient {
        self.constitution.get_or_init(|| {
            ConstitutionClient::with_http_client(self.service_config(), self.http.clone())
        })
    }

    /// Returns the memory client.
    pub fn memory(&self) -> &MemoryClient {
        self.memory
            .get_or_init(|| MemoryClient::with_http_client(self.service_config(), self.http.clone()))
    }

    /// Returns the bridge client.
    pub fn bridge(&self) -> &BridgeClient {
        self.bridge
            .get_or_init(|| BridgeClient::with_http_client(self.service_config(), self.http.clone()))
    }

    /// Returns the resolved base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the agent id.
    #[must_use]
    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// Returns the authenticator, if a private key was configured.
    #[must_use]
    pub fn authenticator(&self) -> Option<&PersonaAuthenticator> {
        self.authenticator.as_deref()
    }

    fn service_config(&self) -> ServiceConfig {
        let mut config = ServiceConfig::new(
            self.base_url.clone(),
            self.api_key.expose_secret().to_string(),
            self.agent_id.clone(),
        )
        .with_timeout_ms(self.timeout_ms);
        if let Some(authenticator) = &self.authenticator {
            config = config.with_authenticator(Arc::clone(authenticator));
        }
        config
    }
}

impl std::fmt::Debug for BravoZeroClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BravoZeroClient")
            .field("base_url", &self.base_url)
            .field("agent_id", &self.agent_id)
            .field("signing", &self.authenticator.is_some())
            .finish_non_exhaustive()
    }
}
