//! Configuration management.
//!
//! A [`ClientConfig`] can be built in code, read from environment variables,
//! or loaded from a TOML file with environment variables layered on top.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `BRAVOZERO_API_KEY` | `api_key` |
//! | `BRAVOZERO_AGENT_ID` | `agent_id` |
//! | `BRAVOZERO_PRIVATE_KEY_PATH` | `private_key_path` |
//! | `BRAVOZERO_BASE_URL` | `base_url` |
//! | `BRAVOZERO_ENVIRONMENT` | `environment` |
//! | `BRAVOZERO_TIMEOUT_MS` | `timeout_ms` |

mod environment;

pub use environment::Environment;

use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretSlice, SecretString};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "BRAVOZERO_API_KEY";
/// Environment variable holding the agent id.
pub const ENV_AGENT_ID: &str = "BRAVOZERO_AGENT_ID";
/// Environment variable holding the PEM private key path.
pub const ENV_PRIVATE_KEY_PATH: &str = "BRAVOZERO_PRIVATE_KEY_PATH";
/// Environment variable overriding the base URL.
pub const ENV_BASE_URL: &str = "BRAVOZERO_BASE_URL";
/// Environment variable selecting the environment.
pub const ENV_ENVIRONMENT: &str = "BRAVOZERO_ENVIRONMENT";
/// Environment variable setting the request timeout in milliseconds.
pub const ENV_TIMEOUT_MS: &str = "BRAVOZERO_TIMEOUT_MS";

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Configuration for [`crate::BravoZeroClient`].
#[derive(Debug)]
pub struct ClientConfig {
    /// API key for authentication.
    pub api_key: SecretString,
    /// PERSONA agent identifier.
    pub agent_id: String,
    /// Path to an Ed25519 PEM private key for signing.
    pub private_key_path: Option<PathBuf>,
    /// Raw private key bytes (alternative to the path).
    pub private_key: Option<SecretSlice<u8>>,
    /// Explicit base URL; overrides the environment table.
    pub base_url: Option<String>,
    /// Deployment environment.
    pub environment: Environment,
    /// Request timeout in milliseconds (0 disables the timeout).
    pub timeout_ms: u64,
    /// Logging settings from the config file.
    pub logging: LoggingSettings,
}

/// Logging section of the config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `bravozero=debug`.
    pub level: Option<String>,
    /// Output format: `pretty` or `json`.
    pub format: Option<String>,
    /// Log file path; logs go to stderr when unset.
    pub file: Option<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// API key.
    pub api_key: Option<String>,
    /// Agent id.
    pub agent_id: Option<String>,
    /// PEM private key path.
    pub private_key_path: Option<String>,
    /// Base URL override.
    pub base_url: Option<String>,
    /// Environment name.
    pub environment: Option<String>,
    /// Request timeout in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Logging settings.
    pub logging: Option<LoggingSettings>,
}

impl ClientConfig {
    /// Creates a configuration with the given credentials and defaults.
    #[must_use]
    pub fn new(api_key: impl Into<String>, agent_id: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            agent_id: agent_id.into(),
            private_key_path: None,
            private_key: None,
            base_url: None,
            environment: Environment::default(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            logging: LoggingSettings::default(),
        }
    }

    /// Sets the PEM private key path.
    #[must_use]
    pub fn with_private_key_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.private_key_path = Some(path.into());
        self
    }

    /// Sets raw private key bytes.
    #[must_use]
    pub fn with_private_key(mut self, key: Vec<u8>) -> Self {
        self.private_key = Some(SecretSlice::from(key));
        self
    }

    /// Overrides the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the environment.
    #[must_use]
    pub const fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Sets the request timeout in milliseconds.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Returns true if a private key (bytes or path) is configured.
    #[must_use]
    pub const fn has_private_key(&self) -> bool {
        self.private_key.is_some() || self.private_key_path.is_some()
    }

    /// Returns the effective base URL without a trailing slash.
    ///
    /// An explicit override wins over the environment table.
    #[must_use]
    pub fn resolved_base_url(&self) -> String {
        self.base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| self.environment.base_url())
            .trim_end_matches('/')
            .to_string()
    }

    /// Checks that the API key and agent id are present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] naming the missing field.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(Error::Configuration("API key required".to_string()));
        }
        if self.agent_id.trim().is_empty() {
            return Err(Error::Configuration("Agent ID required".to_string()));
        }
        Ok(())
    }

    /// Builds a configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the API key or agent id is unset.
    pub fn from_env() -> Result<Self> {
        let config = Self::new("", "").with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file, then applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("failed to read {}: {e}", path.display()))
        })?;
        let file: ConfigFile = toml::from_str(&contents).map_err(|e| {
            Error::Configuration(format!("failed to parse {}: {e}", path.display()))
        })?;
        Ok(Self::from_config_file(file).with_env_overrides())
    }

    /// Loads configuration from the default location, falling back to the
    /// environment.
    ///
    /// Checks `<config dir>/bravozero/config.toml` (platform specific) and
    /// then `~/.config/bravozero/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but is invalid.
    pub fn load_default() -> Result<Self> {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Ok(Self::new("", "").with_env_overrides());
        };

        let candidates = [
            base_dirs.config_dir().join("bravozero").join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join("bravozero")
                .join("config.toml"),
        ];
        for path in &candidates {
            if path.exists() {
                return Self::load_from_file(path);
            }
        }

        Ok(Self::new("", "").with_env_overrides())
    }

    /// Applies overrides from process environment variables.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary variable lookup.
    ///
    /// Empty values are ignored; an unparsable timeout is ignored.
    #[must_use]
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(api_key) = get(ENV_API_KEY) {
            self.api_key = SecretString::from(api_key);
        }
        if let Some(agent_id) = get(ENV_AGENT_ID) {
            self.agent_id = agent_id;
        }
        if let Some(path) = get(ENV_PRIVATE_KEY_PATH) {
            self.private_key_path = Some(PathBuf::from(path));
        }
        if let Some(base_url) = get(ENV_BASE_URL) {
            self.base_url = Some(base_url);
        }
        if let Some(environment) = get(ENV_ENVIRONMENT) {
            self.environment = Environment::parse(&environment);
        }
        if let Some(timeout_ms) = get(ENV_TIMEOUT_MS).and_then(|v| v.trim().parse().ok()) {
            self.timeout_ms = timeout_ms;
        }
        self
    }

    /// Converts a `ConfigFile` to `ClientConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::new(
            file.api_key.unwrap_or_default(),
            file.agent_id.unwrap_or_default(),
        );
        config.private_key_path = file.private_key_path.map(PathBuf::from);
        config.base_url = file.base_url;
        if let Some(environment) = file.environment {
            config.environment = Environment::parse(&environment);
        }
        if let Some(timeout_ms) = file.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("key", "agent");
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert!(!config.has_private_key());
        assert_eq!(config.resolved_base_url(), "https://api.bravozero.ai");
    }

    #[test]
    fn test_base_url_override_wins() {
        let config = ClientConfig::new("key", "agent")
            .with_environment(Environment::Staging)
            .with_base_url("http://127.0.0.1:9000/");
        assert_eq!(config.resolved_base_url(), "http://127.0.0.1:9000");

        let config = ClientConfig::new("key", "agent").with_environment(Environment::Staging);
        assert_eq!(config.resolved_base_url(), "https://api.staging.bravozero.ai");
    }

    #[test]
    fn test_validate_missing_fields() {
        assert!(matches!(
            ClientConfig::new("", "agent").validate(),
            Err(Error::Configuration(msg)) if msg == "API key required"
        ));
        assert!(matches!(
            ClientConfig::new("key", " ").validate(),
            Err(Error::Configuration(msg)) if msg == "Agent ID required"
        ));
        assert!(ClientConfig::new("key", "agent").validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::new("file-key", "file-agent").with_overrides(lookup(&[
            (ENV_API_KEY, "env-key"),
            (ENV_ENVIRONMENT, "development"),
            (ENV_TIMEOUT_MS, "5000"),
            (ENV_PRIVATE_KEY_PATH, "/keys/agent.pem"),
        ]));

        assert_eq!(config.api_key.expose_secret(), "env-key");
        assert_eq!(config.agent_id, "file-agent");
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.timeout_ms, 5000);
        assert_eq!(
            config.private_key_path.as_deref(),
            Some(Path::new("/keys/agent.pem"))
        );
        assert!(config.has_private_key());
    }

    #[test]
    fn test_overrides_ignore_empty_and_invalid() {
        let config = ClientConfig::new("key", "agent")
            .with_overrides(lookup(&[(ENV_AGENT_ID, ""), (ENV_TIMEOUT_MS, "soon")]));
        assert_eq!(config.agent_id, "agent");
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
api_key = "toml-key"
agent_id = "toml-agent"
environment = "staging"
timeout_ms = 1500

[logging]
level = "bravozero=debug"
format = "json"
"#
        )
        .unwrap();

        let config = ClientConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.agent_id, "toml-agent");
        assert_eq!(config.environment, Environment::Staging);
        assert_eq!(config.timeout_ms, 1500);
        assert_eq!(config.logging.format.as_deref(), Some("json"));
    }

    #[test]
    fn test_load_from_file_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timeout_ms = \"not a number\"").unwrap();
        assert!(matches!(
            ClientConfig::load_from_file(file.path()),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = ClientConfig::new("super-secret-key", "agent").with_private_key(vec![1; 32]);
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret-key"));
    }
}
