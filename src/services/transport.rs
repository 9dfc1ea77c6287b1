//! Request helper shared by the service clients.

use super::ServiceConfig;
use crate::auth::PersonaAuthenticator;
use crate::{Error, ErrorDetails, Result};
use reqwest::header::{
    ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, RETRY_AFTER, USER_AGENT as UA,
};
use reqwest::{Method, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// `User-Agent` sent with every JSON request.
pub const USER_AGENT: &str = concat!("bravozero-rust/", env!("CARGO_PKG_VERSION"));

/// Header carrying the signed PERSONA attestation.
pub const ATTESTATION_HEADER: &str = "x-persona-attestation";

/// Delay reported for a 429 without a usable `Retry-After` header.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

const API_KEY_HEADER: &str = "x-api-key";
const AGENT_ID_HEADER: &str = "x-agent-id";

/// Which remote service a transport talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ServiceKind {
    Constitution,
    Memory,
    Bridge,
}

impl ServiceKind {
    pub(crate) const fn name(self) -> &'static str {
        match self {
            Self::Constitution => "constitution",
            Self::Memory => "memory",
            Self::Bridge => "bridge",
        }
    }

    const fn base_path(self) -> &'static str {
        match self {
            Self::Constitution => "/v1/constitution",
            Self::Memory => "/v1/memory",
            Self::Bridge => "/v1/bridge",
        }
    }

    /// Maps a non-2xx status to this service's error variant.
    fn status_error(self, status: u16, message: String, details: Option<ErrorDetails>) -> Error {
        match self {
            Self::Constitution => Error::Api {
                status,
                message,
                details,
            },
            Self::Memory => Error::Memory {
                status,
                message,
                details,
            },
            Self::Bridge => Error::Bridge {
                status,
                message,
                details,
            },
        }
    }
}

/// Sends requests to one service and applies the uniform status handling.
pub(crate) struct ServiceTransport {
    kind: ServiceKind,
    http: reqwest::Client,
    endpoint: String,
    api_key: SecretString,
    agent_id: String,
    authenticator: Option<Arc<PersonaAuthenticator>>,
}

impl ServiceTransport {
    pub(crate) fn new(kind: ServiceKind, config: ServiceConfig, http: reqwest::Client) -> Self {
        let endpoint = format!(
            "{}{}",
            config.base_url.trim_end_matches('/'),
            kind.base_path()
        );
        Self {
            kind,
            http,
            endpoint,
            api_key: config.api_key,
            agent_id: config.agent_id,
            authenticator: config.authenticator,
        }
    }

    pub(crate) fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub(crate) fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends a GET and decodes the JSON response.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .send(Method::GET, segments, query, None::<&()>)
            .await?;
        self.decode(response).await
    }

    /// Sends a JSON body with `method` and decodes the JSON response.
    pub(crate) async fn send_json<B, T>(&self, method: Method, segments: &[&str], body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(method, segments, &[], Some(body)).await?;
        self.decode(response).await
    }

    /// Sends a DELETE; the response body is ignored.
    pub(crate) async fn delete(&self, segments: &[&str], query: &[(&str, String)]) -> Result<()> {
        self.send(Method::DELETE, segments, query, None::<&()>)
            .await
            .map(drop)
    }

    /// Sends a GET in binary mode and returns the raw body.
    ///
    /// Only a bare status check applies: no `Content-Type`, no `User-Agent`,
    /// no 429 handling and no error body parsing.
    pub(crate) async fn get_bytes(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<Vec<u8>> {
        let url = self.url(segments)?;
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/octet-stream"));
        self.insert_identity_headers(&mut headers)?;

        tracing::debug!(service = self.kind.name(), %url, "Sending binary request");

        let mut request = self.http.get(url).headers(headers);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send().await.map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(
                service = self.kind.name(),
                status = %status,
                "Service returned error status for binary request"
            );
            return Err(self.kind.status_error(
                status.as_u16(),
                format!("HTTP {}", status.as_u16()),
                None,
            ));
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| self.operation_error("read_body", &e))
    }

    async fn send<B>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<reqwest::Response>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(segments)?;
        let headers = self.json_headers()?;

        tracing::debug!(service = self.kind.name(), %method, %url, "Sending request");

        let mut request = self.http.request(method, url).headers(headers);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            let payload =
                serde_json::to_vec(body).map_err(|e| self.operation_error("encode_body", &e))?;
            request = request.body(payload);
        }

        let response = request.send().await.map_err(|e| self.transport_error(&e))?;
        self.check_status(response).await
    }

    /// Builds the URL for `segments` below the service endpoint.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.endpoint).map_err(|e| {
            Error::Configuration(format!("invalid base URL '{}': {e}", self.endpoint))
        })?;
        url.path_segments_mut()
            .map_err(|()| {
                Error::Configuration(format!("base URL '{}' cannot have a path", self.endpoint))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn json_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(UA, HeaderValue::from_static(USER_AGENT));
        self.insert_identity_headers(&mut headers)?;
        Ok(headers)
    }

    /// Inserts the API key, agent id, and (if configured) a fresh attestation.
    fn insert_identity_headers(&self, headers: &mut HeaderMap) -> Result<()> {
        headers.insert(
            HeaderName::from_static(API_KEY_HEADER),
            header_value("X-API-Key", self.api_key.expose_secret())?,
        );
        headers.insert(
            HeaderName::from_static(AGENT_ID_HEADER),
            header_value("X-Agent-ID", &self.agent_id)?,
        );

        if let Some(authenticator) = &self.authenticator {
            let attestation = authenticator.create_attestation(None)?;
            headers.insert(
                HeaderName::from_static(ATTESTATION_HEADER),
                header_value("X-Persona-Attestation", &attestation)?,
            );
        }
        Ok(())
    }

    /// Turns 429 and other non-2xx responses into errors.
    async fn check_status(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = parse_retry_after(response.headers());
            tracing::warn!(
                service = self.kind.name(),
                retry_after = retry_after,
                "Rate limit exceeded"
            );
            return Err(Error::RateLimit {
                retry_after,
                details: None,
            });
        }

        if status.is_success() {
            return Ok(response);
        }

        let (message, details) = self.read_error_body(status, response).await;
        tracing::error!(
            service = self.kind.name(),
            status = %status,
            message = %message,
            "Service returned error status"
        );
        Err(self.kind.status_error(status.as_u16(), message, details))
    }

    /// Extracts `message` from a JSON error body.
    ///
    /// Falls back to `HTTP <status>` when the body is empty, not JSON, or has
    /// no `message`; such failures are logged and otherwise ignored.
    async fn read_error_body(
        &self,
        status: StatusCode,
        response: reqwest::Response,
    ) -> (String, Option<ErrorDetails>) {
        let fallback = format!("HTTP {}", status.as_u16());

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(service = self.kind.name(), error = %e, "Failed to read error body");
                return (fallback, None);
            },
        };

        match serde_json::from_slice::<serde_json::Value>(&body) {
            Ok(serde_json::Value::Object(details)) => {
                let message = details
                    .get("message")
                    .and_then(serde_json::Value::as_str)
                    .filter(|m| !m.is_empty())
                    .map_or(fallback, str::to_string);
                (message, Some(details))
            },
            Ok(_) => (fallback, None),
            Err(e) => {
                tracing::debug!(
                    service = self.kind.name(),
                    error = %e,
                    "Error body is not JSON"
                );
                (fallback, None)
            },
        }
    }

    async fn decode<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let body = response
            .bytes()
            .await
            .map_err(|e| self.operation_error("read_body", &e))?;
        serde_json::from_slice(&body).map_err(|e| {
            tracing::error!(
                service = self.kind.name(),
                error = %e,
                "Failed to parse service response"
            );
            self.operation_error("parse_response", &e)
        })
    }

    fn transport_error(&self, e: &reqwest::Error) -> Error {
        let error_kind = if e.is_timeout() {
            "timeout"
        } else if e.is_connect() {
            "connect"
        } else if e.is_request() {
            "request"
        } else {
            "unknown"
        };
        tracing::error!(
            service = self.kind.name(),
            error = %e,
            error_kind = error_kind,
            is_timeout = e.is_timeout(),
            is_connect = e.is_connect(),
            "Request failed"
        );
        Error::OperationFailed {
            operation: format!("{}_request", self.kind.name()),
            cause: format!("{error_kind} error: {e}"),
        }
    }

    fn operation_error(&self, operation: &str, e: &dyn std::fmt::Display) -> Error {
        Error::OperationFailed {
            operation: format!("{}_{operation}", self.kind.name()),
            cause: e.to_string(),
        }
    }
}

/// Reads `Retry-After` as whole seconds, defaulting to 60.
///
/// Only the leading digits count, so `12.5` and `12 seconds` both give 12.
fn parse_retry_after(headers: &HeaderMap) -> u64 {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            let v = v.trim_start();
            let end = v.find(|c: char| !c.is_ascii_digit()).unwrap_or(v.len());
            v[..end].parse::<u64>().ok()
        })
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| Error::Configuration(format!("{name} contains characters not allowed in a header")))
}
