//! Constitution service client.

use super::ServiceConfig;
use super::transport::{ServiceKind, ServiceTransport};
use crate::models::{
    Decision, EvaluateRequest, EvaluationPriority, EvaluationResult, OmegaScore, Rule, RuleFilter,
    ValuesDatabase,
};
use crate::{Error, Result};
use reqwest::Method;
use serde::Serialize;
use tracing::instrument;

/// Wire body for `POST /evaluate`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EvaluateBody<'a> {
    agent_id: &'a str,
    action: &'a str,
    context: &'a serde_json::Map<String, serde_json::Value>,
    priority: EvaluationPriority,
}

/// Client for the constitution service.
///
/// Evaluates proposed actions against the constitution and exposes the
/// global Omega score, the rule set and the values database.
pub struct ConstitutionClient {
    transport: ServiceTransport,
}

impl ConstitutionClient {
    /// Creates a client with its own HTTP connection pool.
    #[must_use]
    pub fn new(config: ServiceConfig) -> Self {
        let http = super::build_http_client(config.timeout_ms);
        Self::with_http_client(config, http)
    }

    /// Creates a client that shares an existing HTTP client.
    #[must_use]
    pub fn with_http_client(config: ServiceConfig, http: reqwest::Client) -> Self {
        Self {
            transport: ServiceTransport::new(ServiceKind::Constitution, config, http),
        }
    }

    /// Evaluates an action.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConstitutionDenied`] when the decision is `deny`.
    /// `permit` and `escalate` are returned as values.
    #[instrument(skip(self, request), fields(operation = "evaluate", action = %request.action))]
    pub async fn evaluate(&self, request: EvaluateRequest) -> Result<EvaluationResult> {
        let body = EvaluateBody {
            agent_id: self.transport.agent_id(),
            action: &request.action,
            context: &request.context,
            priority: request.priority,
        };
        let result: EvaluationResult = self
            .transport
            .send_json(Method::POST, &["evaluate"], &body)
            .await?;

        tracing::debug!(
            decision = %result.decision,
            confidence = result.confidence,
            "Evaluation completed"
        );

        if result.decision == Decision::Deny {
            return Err(Error::ConstitutionDenied {
                reasoning: result.reasoning.clone(),
                result: Box::new(result),
            });
        }
        Ok(result)
    }

    /// Fetches the current Omega score.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_omega(&self) -> Result<OmegaScore> {
        self.transport.get(&["omega"], &[]).await
    }

    /// Lists rules, optionally filtered.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_rules(&self, filter: &RuleFilter) -> Result<Vec<Rule>> {
        self.transport.get(&["rules"], &filter.to_query()).await
    }

    /// Fetches one rule.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_rule(&self, rule_id: &str) -> Result<Rule> {
        self.transport.get(&["rules", rule_id], &[]).await
    }

    /// Fetches the values database.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_values(&self) -> Result<ValuesDatabase> {
        self.transport.get(&["values"], &[]).await
    }

    /// Returns the service endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }
}
