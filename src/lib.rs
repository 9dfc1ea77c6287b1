//! # Bravo Zero
//!
//! Client SDK for the Bravo Zero "Breaking the Limits" services.
//!
//! The crate wraps three remote services behind typed, asynchronous clients:
//!
//! - **Constitution**: governance and alignment enforcement (`permit`/`deny`/`escalate`)
//! - **Memory**: the Trace Manifold persistent memory store
//! - **Bridge**: virtual file system and repository access
//!
//! Every request carries the caller's API key and agent id. When a private
//! key is configured, each request additionally carries a freshly signed
//! Ed25519 PERSONA attestation.
//!
//! ## Example
//!
//! ```rust,ignore
//! use bravozero::{BravoZeroClient, ClientConfig, EvaluateRequest, RecordRequest};
//!
//! let client = BravoZeroClient::new(ClientConfig::new("your-api-key", "your-agent-id"))?;
//!
//! let result = client
//!     .constitution()
//!     .evaluate(EvaluateRequest::new("read_file"))
//!     .await?;
//!
//! let memory = client
//!     .memory()
//!     .record(RecordRequest::new("User prefers Rust"))
//!     .await?;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod models;
pub mod observability;
pub mod services;

// Re-exports for convenience
pub use auth::{Attestation, AttestationClaims, KeySource, PersonaAuthenticator, verify_attestation};
pub use client::BravoZeroClient;
pub use config::{ClientConfig, Environment};
pub use models::{
    AppliedRule, ConsolidationState, CreateEdgeRequest, Decision, DirectoryListing, Edge,
    EvaluateRequest, EvaluationPriority, EvaluationResult, FileInfo, ListFilesOptions, Memory,
    MemoryQueryResult, MemoryType, MemoryUpdate, OmegaScore, OmegaTrend, QueryRequest,
    RecordRequest, RelatedOptions, Rule, RuleFilter, RulePriority, SyncStatus, ValuesDatabase,
};
pub use services::{BridgeClient, ConstitutionClient, MemoryClient, ServiceConfig};

/// Structured detail attached to an error, usually the JSON error body.
pub type ErrorDetails = serde_json::Map<String, serde_json::Value>;

/// Error type for Bravo Zero operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `Configuration` | Missing API key, agent id or key source; unreadable config file |
/// | `KeyParse` | PEM markers absent, bad base64, key material of the wrong size |
/// | `Authentication` | An attestation fails to decode or verify |
/// | `RateLimit` | A service answered `429 Too Many Requests` |
/// | `ConstitutionDenied` | The constitution service decided `deny` |
/// | `Api` | The constitution service answered with another non-2xx status |
/// | `Memory` | The memory service answered with a non-2xx status |
/// | `Bridge` | The bridge service answered with a non-2xx status |
/// | `OperationFailed` | Transport failures, undecodable bodies, I/O errors |
#[derive(Debug, ThisError)]
pub enum Error {
    /// The client was configured incorrectly.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Private key material could not be loaded.
    #[error("failed to parse private key from {source_name}: {cause}")]
    KeyParse {
        /// Where the key came from (a file path or `raw bytes`).
        source_name: String,
        /// The underlying cause.
        cause: String,
    },

    /// An attestation could not be decoded or verified.
    #[error("authentication failed: {message}")]
    Authentication {
        /// Human readable message.
        message: String,
        /// Optional structured detail.
        details: Option<ErrorDetails>,
    },

    /// The service is rate limiting this caller.
    ///
    /// No retry is attempted; callers decide whether to wait `retry_after`
    /// seconds and try again.
    #[error("rate limit exceeded (retry after {retry_after}s)")]
    RateLimit {
        /// Seconds to wait, from the `Retry-After` header (default 60).
        retry_after: u64,
        /// Optional structured detail.
        details: Option<ErrorDetails>,
    },

    /// The constitution service denied the evaluated action.
    #[error("action denied by constitution: {reasoning}")]
    ConstitutionDenied {
        /// The denial reasoning returned by the service.
        reasoning: String,
        /// The full evaluation result.
        result: Box<models::EvaluationResult>,
    },

    /// The constitution service returned an error status.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or `HTTP <status>`.
        message: String,
        /// Parsed JSON error body, if any.
        details: Option<ErrorDetails>,
    },

    /// The memory service returned an error status.
    #[error("memory service error: {message}")]
    Memory {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or `HTTP <status>`.
        message: String,
        /// Parsed JSON error body, if any.
        details: Option<ErrorDetails>,
    },

    /// The bridge service returned an error status.
    #[error("bridge service error: {message}")]
    Bridge {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or `HTTP <status>`.
        message: String,
        /// Parsed JSON error body, if any.
        details: Option<ErrorDetails>,
    },

    /// An operation failed.
    ///
    /// Raised when:
    /// - The HTTP request could not be sent (connect, timeout, TLS)
    /// - A success response body could not be decoded
    /// - Local I/O fails
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl Error {
    /// Returns the structured detail map, if the variant carries one.
    #[must_use]
    pub const fn details(&self) -> Option<&ErrorDetails> {
        match self {
            Self::Authentication { details, .. }
            | Self::RateLimit { details, .. }
            | Self::Api { details, .. }
            | Self::Memory { details, .. }
            | Self::Bridge { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    /// Returns the rate-limit delay in seconds for [`Error::RateLimit`].
    #[must_use]
    pub const fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimit { retry_after, .. } => Some(*retry_after),
            _ => None,
        }
    }

    /// Returns the HTTP status code for service errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimit { .. } => Some(429),
            Self::Api { status, .. } | Self::Memory { status, .. } | Self::Bridge { status, .. } => {
                Some(*status)
            },
            _ => None,
        }
    }
}

/// Result type alias for Bravo Zero operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Returns the current Unix timestamp in seconds.
///
/// Falls back to 0 if the system clock is before the Unix epoch.
#[must_use]
pub fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
