//! Deployment environments and their base URLs.

use std::fmt;

/// A Bravo Zero deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Environment {
    /// Production (`https://api.bravozero.ai`).
    #[default]
    Production,
    /// Staging (`https://api.staging.bravozero.ai`).
    Staging,
    /// Local development (`http://localhost:8080`).
    Development,
}

impl Environment {
    /// Parses an environment name.
    ///
    /// Only the exact lowercase names `staging` and `development` select a
    /// non-production environment; anything else resolves to production.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "staging" => Self::Staging,
            "development" => Self::Development,
            _ => Self::Production,
        }
    }

    /// Returns the environment name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Staging => "staging",
            Self::Development => "development",
        }
    }

    /// Returns the API base URL for this environment.
    #[must_use]
    pub const fn base_url(&self) -> &'static str {
        match self {
            Self::Production => "https://api.bravozero.ai",
            Self::Staging => "https://api.staging.bravozero.ai",
            Self::Development => "http://localhost:8080",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
