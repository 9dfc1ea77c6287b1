//! Memory service types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Importance applied when a caller does not supply one.
pub const DEFAULT_IMPORTANCE: f64 = 0.5;

/// Strength applied when the service omits one.
pub const DEFAULT_STRENGTH: f64 = 1.0;

/// Edge strength applied when a caller or the service omits one.
pub const DEFAULT_EDGE_STRENGTH: f64 = 0.5;

/// Default maximum number of query results.
pub const DEFAULT_QUERY_LIMIT: u32 = 10;

/// Default minimum relevance for query results.
pub const DEFAULT_MIN_RELEVANCE: f64 = 0.5;

/// Kind of stored memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryType {
    /// Events and experiences.
    Episodic,
    /// Facts and knowledge.
    #[default]
    Semantic,
    /// Skills and procedures.
    Procedural,
    /// Short-lived working context.
    Working,
}

impl MemoryType {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Episodic => "episodic",
            Self::Semantic => "semantic",
            Self::Procedural => "procedural",
            Self::Working => "working",
        }
    }

    /// Parses a memory type name, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "episodic" => Some(Self::Episodic),
            "semantic" => Some(Self::Semantic),
            "procedural" => Some(Self::Procedural),
            "working" => Some(Self::Working),
            _ => None,
        }
    }
}

impl fmt::Display for MemoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a memory in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsolidationState {
    /// Recently written or accessed.
    #[default]
    Active,
    /// Being consolidated.
    Consolidating,
    /// Consolidated into long-term storage.
    Consolidated,
    /// Losing strength.
    Decaying,
    /// Rarely accessed.
    Dormant,
}

const fn default_importance() -> f64 {
    DEFAULT_IMPORTANCE
}

const fn default_strength() -> f64 {
    DEFAULT_STRENGTH
}

const fn default_edge_strength() -> f64 {
    DEFAULT_EDGE_STRENGTH
}

/// A stored memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    /// Unique identifier.
    pub id: String,
    /// The memory content.
    pub content: String,
    /// Kind of memory.
    pub memory_type: MemoryType,
    /// Importance (0.0 to 1.0).
    #[serde(default = "default_importance")]
    pub importance: f64,
    /// Current strength.
    #[serde(default = "default_strength")]
    pub strength: f64,
    /// Lifecycle state.
    #[serde(default)]
    pub consolidation_state: ConsolidationState,
    /// Namespace; the memory client fills in the agent id when absent.
    #[serde(default)]
    pub namespace: String,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last access time.
    pub last_accessed_at: DateTime<Utc>,
    /// Number of accesses.
    #[serde(default)]
    pub access_count: u64,
    /// Embedding vector, when the service returns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f64>>,
    /// Free-form metadata.
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// A memory matched by a query, with its relevance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryQueryResult {
    /// The matched memory.
    pub memory: Memory,
    /// Relevance of the match.
    pub relevance: f64,
}

/// A directed relation between two memories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Source memory id.
    pub source_id: String,
    /// Target memory id.
    pub target_id: String,
    /// Relationship label.
    pub relationship: String,
    /// Strength (0.0 to 1.0).
    #[serde(default = "default_edge_strength")]
    pub strength: f64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// When the edge was last reinforced.
    pub last_strengthened_at: DateTime<Utc>,
}

/// Request to record a new memory.
#[derive(Debug, Clone, Default)]
pub struct RecordRequest {
    /// The memory content.
    pub content: String,
    /// Kind of memory (default semantic).
    pub memory_type: Option<MemoryType>,
    /// Importance (default 0.5).
    pub importance: Option<f64>,
    /// Namespace (default: the caller's agent id).
    pub namespace: Option<String>,
    /// Tags.
    pub tags: Vec<String>,
    /// Free-form metadata.
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl RecordRequest {
    /// Creates a request recording `content` with all defaults.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    /// Sets the memory type.
    #[must_use]
    pub const fn with_memory_type(mut self, memory_type: MemoryType) -> Self {
        self.memory_type = Some(memory_type);
        self
    }

    /// Sets the importance.
    #[must_use]
    pub const fn with_importance(mut self, importance: f64) -> Self {
        self.importance = Some(importance);
        self
    }

    /// Sets the namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Request to query memories by semantic similarity.
#[derive(Debug, Clone, Default)]
pub struct QueryRequest {
    /// The query text.
    pub query: String,
    /// Maximum number of results (default 10).
    pub limit: Option<u32>,
    /// Minimum relevance (default 0.5).
    pub min_relevance: Option<f64>,
    /// Only these memory types.
    pub memory_types: Option<Vec<MemoryType>>,
    /// Only this namespace.
    pub namespace: Option<String>,
    /// Only memories with these tags.
    pub tags: Option<Vec<String>>,
}

impl QueryRequest {
    /// Creates a query with all defaults.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Sets the result limit.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the minimum relevance.
    #[must_use]
    pub const fn with_min_relevance(mut self, min_relevance: f64) -> Self {
        self.min_relevance = Some(min_relevance);
        self
    }

    /// Restricts the memory types.
    #[must_use]
    pub fn with_memory_types(mut self, memory_types: Vec<MemoryType>) -> Self {
        self.memory_types = Some(memory_types);
        self
    }

    /// Restricts the namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Restricts the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }
}

/// Partial update of a memory. Only supplied fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUpdate {
    /// New content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// New importance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<f64>,
    /// Replacement tags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Replacement metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl MemoryUpdate {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets the importance.
    #[must_use]
    pub const fn with_importance(mut self, importance: f64) -> Self {
        self.importance = Some(importance);
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Sets the metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: serde_json::Map<String, serde_json::Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Returns true if no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.content.is_none()
            && self.importance.is_none()
            && self.tags.is_none()
            && self.metadata.is_none()
    }
}

/// Request to connect two memories.
#[derive(Debug, Clone, Default)]
pub struct CreateEdgeRequest {
    /// Source memory id.
    pub source_id: String,
    /// Target memory id.
    pub target_id: String,
    /// Relationship label.
    pub relationship: String,
    /// Strength (default 0.5).
    pub strength: Option<f64>,
}

impl CreateEdgeRequest {
    /// Creates an edge request with default strength.
    #[must_use]
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        relationship: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            relationship: relationship.into(),
            strength: None,
        }
    }

    /// Sets the strength.
    #[must_use]
    pub const fn with_strength(mut self, strength: f64) -> Self {
        self.strength = Some(strength);
        self
    }
}

/// Filters for related-memory lookups.
#[derive(Debug, Clone, Default)]
pub struct RelatedOptions {
    /// Only edges with this relationship.
    pub relationship: Option<String>,
    /// Only edges at least this strong.
    pub min_strength: Option<f64>,
    /// Maximum number of results.
    pub limit: Option<u32>,
}

impl RelatedOptions {
    /// Creates options with no filters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by relationship.
    #[must_use]
    pub fn with_relationship(mut self, relationship: impl Into<String>) -> Self {
        self.relationship = Some(relationship.into());
        self
    }

    /// Filters by minimum strength.
    #[must_use]
    pub const fn with_min_strength(mut self, min_strength: f64) -> Self {
        self.min_strength = Some(min_strength);
        self
    }

    /// Limits the number of results.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns the options as query parameters, omitting unset fields.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(relationship) = self.relationship.as_deref().filter(|r| !r.is_empty()) {
            params.push(("relationship", relationship.to_string()));
        }
        if let Some(min_strength) = self.min_strength {
            params.push(("minStrength", min_strength.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}
