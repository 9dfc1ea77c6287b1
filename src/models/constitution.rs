//! Constitution service types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A policy verdict for a proposed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// The action may proceed.
    Permit,
    /// The action is refused.
    Deny,
    /// The action needs human review.
    Escalate,
}

impl Decision {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Permit => "permit",
            Self::Deny => "deny",
            Self::Escalate => "escalate",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority of an evaluation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationPriority {
    /// Regular priority.
    #[default]
    Normal,
    /// Elevated priority.
    High,
    /// Highest priority.
    Critical,
}

impl EvaluationPriority {
    /// Parses a priority name, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Some(Self::Normal),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

/// Priority of a constitution rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RulePriority {
    /// Critical rule.
    Critical,
    /// High priority rule.
    High,
    /// Medium priority rule.
    Medium,
    /// Low priority rule.
    Low,
}

impl RulePriority {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Parses a priority name, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "critical" => Some(Self::Critical),
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

impl fmt::Display for RulePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of the global Omega score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OmegaTrend {
    /// Alignment is improving.
    Improving,
    /// Alignment is stable.
    #[default]
    Stable,
    /// Alignment is degrading.
    Degrading,
}

/// Request to evaluate an action.
#[derive(Debug, Clone, Default)]
pub struct EvaluateRequest {
    /// Action to evaluate.
    pub action: String,
    /// Additional context for the evaluation.
    pub context: serde_json::Map<String, serde_json::Value>,
    /// Request priority.
    pub priority: EvaluationPriority,
}

impl EvaluateRequest {
    /// Creates a request for `action` with empty context and normal priority.
    #[must_use]
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Default::default()
        }
    }

    /// Replaces the evaluation context.
    #[must_use]
    pub fn with_context(mut self, context: serde_json::Map<String, serde_json::Value>) -> Self {
        self.context = context;
        self
    }

    /// Adds a single context entry.
    #[must_use]
    pub fn with_context_value(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: EvaluationPriority) -> Self {
        self.priority = priority;
        self
    }
}

/// A rule that took part in an evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedRule {
    /// Rule identifier.
    pub rule_id: String,
    /// Rule name.
    pub name: String,
    /// Whether the rule's condition matched.
    pub matched: bool,
    /// The rule's contribution to the final score.
    pub contribution: f64,
}

/// Outcome of evaluating an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    /// Server-assigned request identifier.
    #[serde(default)]
    pub request_id: String,
    /// The verdict.
    pub decision: Decision,
    /// Confidence in the verdict (0.0 to 1.0).
    pub confidence: f64,
    /// Alignment score of the action.
    pub alignment_score: f64,
    /// Rules considered during evaluation.
    #[serde(default)]
    pub applied_rules: Vec<AppliedRule>,
    /// Free-text reasoning.
    #[serde(default)]
    pub reasoning: String,
    /// When the evaluation happened.
    pub evaluated_at: DateTime<Utc>,
}

/// Snapshot of the global Omega alignment score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OmegaScore {
    /// The scalar score.
    pub omega: f64,
    /// Named components of the score.
    #[serde(default)]
    pub components: BTreeMap<String, f64>,
    /// Direction of travel.
    #[serde(default)]
    pub trend: OmegaTrend,
    /// When the snapshot was taken.
    pub timestamp: DateTime<Utc>,
}

/// A constitution rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Rule identifier.
    pub id: String,
    /// Rule name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Category.
    #[serde(default)]
    pub category: String,
    /// Priority.
    pub priority: RulePriority,
    /// Condition expression, evaluated server-side.
    pub condition: String,
    /// Verdict when the condition matches.
    pub action: Decision,
    /// Whether the rule is active.
    pub active: bool,
}

/// Filters for listing rules.
#[derive(Debug, Clone, Default)]
pub struct RuleFilter {
    /// Only rules in this category.
    pub category: Option<String>,
    /// Only rules with this priority.
    pub priority: Option<RulePriority>,
}

impl RuleFilter {
    /// Creates an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Filters by priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: RulePriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Returns the filter as query parameters, omitting unset fields.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            params.push(("category", category.to_string()));
        }
        if let Some(priority) = self.priority {
            params.push(("priority", priority.as_str().to_string()));
        }
        params
    }
}

/// The constitution's values database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuesDatabase {
    /// Version of the values set.
    pub version: String,
    /// The values themselves.
    #[serde(default)]
    pub values: serde_json::Map<String, serde_json::Value>,
    /// When the values were last changed.
    pub last_updated: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_evaluation_result_defaults() {
        let result: EvaluationResult = serde_json::from_value(json!({
            "decision": "escalate",
            "confidence": 0.7,
            "alignmentScore": 0.4,
            "evaluatedAt": "2025-01-15T10:30:00Z"
        }))
        .unwrap();

        assert_eq!(result.decision, Decision::Escalate);
        assert!(result.applied_rules.is_empty());
        assert_eq!(result.reasoning, "");
        assert_eq!(result.request_id, "");
        assert_eq!(result.evaluated_at.to_rfc3339(), "2025-01-15T10:30:00+00:00");
    }

    #[test]
    fn test_applied_rule_wire_names() {
        let rule: AppliedRule = serde_json::from_value(json!({
            "ruleId": "r-1",
            "name": "no-secrets",
            "matched": true,
            "contribution": -0.25
        }))
        .unwrap();
        assert_eq!(rule.rule_id, "r-1");
        assert!(rule.matched);
    }

    #[test]
    fn test_omega_defaults() {
        let omega: OmegaScore = serde_json::from_value(json!({
            "omega": 0.91,
            "timestamp": "2025-01-15T10:30:00Z"
        }))
        .unwrap();
        assert!(omega.components.is_empty());
        assert_eq!(omega.trend, OmegaTrend::Stable);
    }

    #[test]
    fn test_rule_filter_query() {
        assert!(RuleFilter::new().to_query().is_empty());

        let params = RuleFilter::new()
            .with_category("safety")
            .with_priority(RulePriority::Critical)
            .to_query();
        assert_eq!(
            params,
            vec![
                ("category", "safety".to_string()),
                ("priority", "critical".to_string())
            ]
        );
    }

    #[test]
    fn test_evaluate_request_builder() {
        let request = EvaluateRequest::new("read_file")
            .with_context_value("path", "/src/main.rs")
            .with_priority(EvaluationPriority::High);
        assert_eq!(request.action, "read_file");
        assert_eq!(request.context["path"], json!("/src/main.rs"));
        assert_eq!(request.priority, EvaluationPriority::High);
        assert_eq!(EvaluateRequest::new("x").priority, EvaluationPriority::Normal);
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!(EvaluationPriority::parse("HIGH"), Some(EvaluationPriority::High));
        assert_eq!(EvaluationPriority::parse("urgent"), None);
        assert_eq!(RulePriority::parse("Low"), Some(RulePriority::Low));
    }
}
