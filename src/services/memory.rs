//! Memory service client.
//!
//! Records, queries and links agent memories. Query results carry the
//! service's `relevance`; related-memory results carry the edge strength in
//! the same field.

use super::ServiceConfig;
use super::transport::{ServiceKind, ServiceTransport};
use crate::Result;
use crate::models::{
    CreateEdgeRequest, DEFAULT_EDGE_STRENGTH, DEFAULT_IMPORTANCE, DEFAULT_MIN_RELEVANCE,
    DEFAULT_QUERY_LIMIT, Edge, Memory, MemoryQueryResult, MemoryType, MemoryUpdate, QueryRequest,
    RecordRequest, RelatedOptions,
};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordBody<'a> {
    content: &'a str,
    memory_type: MemoryType,
    importance: f64,
    namespace: &'a str,
    tags: &'a [String],
    metadata: &'a serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryBody<'a> {
    query: &'a str,
    limit: u32,
    min_relevance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    memory_types: Option<&'a [MemoryType]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<&'a [String]>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EdgeBody<'a> {
    source_id: &'a str,
    target_id: &'a str,
    relationship: &'a str,
    strength: f64,
}

#[derive(Debug, Deserialize)]
struct Results<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ScoredMemory {
    memory: Memory,
    relevance: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelatedMemory {
    memory: Memory,
    edge_strength: f64,
}

/// Client for the memory service.
pub struct MemoryClient {
    transport: ServiceTransport,
}

impl MemoryClient {
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
            transport: ServiceTransport::new(ServiceKind::Memory, config, http),
        }
    }

    /// Records a new memory.
    ///
    /// Unset fields default to a semantic memory with importance 0.5 in the
    /// agent's own namespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, request), fields(operation = "memory_record"))]
    pub async fn record(&self, request: RecordRequest) -> Result<Memory> {
        let body = RecordBody {
            content: &request.content,
            memory_type: request.memory_type.unwrap_or_default(),
            importance: request.importance.unwrap_or(DEFAULT_IMPORTANCE),
            namespace: request
                .namespace
                .as_deref()
                .unwrap_or_else(|| self.transport.agent_id()),
            tags: &request.tags,
            metadata: &request.metadata,
        };
        let memory = self
            .transport
            .send_json(Method::POST, &["record"], &body)
            .await?;
        Ok(self.with_namespace(memory))
    }

    /// Queries memories by semantic similarity.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, request), fields(operation = "memory_query"))]
    pub async fn query(&self, request: QueryRequest) -> Result<Vec<MemoryQueryResult>> {
        let body = QueryBody {
            query: &request.query,
            limit: request.limit.unwrap_or(DEFAULT_QUERY_LIMIT),
            min_relevance: request.min_relevance.unwrap_or(DEFAULT_MIN_RELEVANCE),
            memory_types: request.memory_types.as_deref(),
            namespace: request.namespace.as_deref(),
            tags: request.tags.as_deref(),
        };
        let response: Results<ScoredMemory> = self
            .transport
            .send_json(Method::POST, &["query"], &body)
            .await?;

        tracing::debug!(results = response.results.len(), "Memory query completed");

        Ok(response
            .results
            .into_iter()
            .map(|r| MemoryQueryResult {
                memory: self.with_namespace(r.memory),
                relevance: r.relevance,
            })
            .collect())
    }

    /// Fetches a memory by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get(&self, memory_id: &str) -> Result<Memory> {
        let memory = self.transport.get(&[memory_id], &[]).await?;
        Ok(self.with_namespace(memory))
    }

    /// Applies a partial update to a memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update(&self, memory_id: &str, update: &MemoryUpdate) -> Result<Memory> {
        let memory = self
            .transport
            .send_json(Method::PATCH, &[memory_id], update)
            .await?;
        Ok(self.with_namespace(memory))
    }

    /// Deletes a memory. Returns `true` once the service accepts the delete.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete(&self, memory_id: &str) -> Result<bool> {
        self.transport.delete(&[memory_id], &[]).await?;
        Ok(true)
    }

    /// Connects two memories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, request), fields(operation = "memory_create_edge", relationship = %request.relationship))]
    pub async fn create_edge(&self, request: CreateEdgeRequest) -> Result<Edge> {
        let body = EdgeBody {
            source_id: &request.source_id,
            target_id: &request.target_id,
            relationship: &request.relationship,
            strength: request.strength.unwrap_or(DEFAULT_EDGE_STRENGTH),
        };
        self.transport
            .send_json(Method::POST, &["edges"], &body)
            .await
    }

    /// Fetches memories linked to `memory_id`.
    ///
    /// The returned `relevance` is the strength of the connecting edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_related(
        &self,
        memory_id: &str,
        options: &RelatedOptions,
    ) -> Result<Vec<MemoryQueryResult>> {
        let response: Results<RelatedMemory> = self
            .transport
            .get(&[memory_id, "related"], &options.to_query())
            .await?;

        Ok(response
            .results
            .into_iter()
            .map(|r| MemoryQueryResult {
                memory: self.with_namespace(r.memory),
                relevance: r.edge_strength,
            })
            .collect())
    }

    fn with_namespace(&self, mut memory: Memory) -> Memory {
        if memory.namespace.is_empty() {
            memory.namespace = self.transport.agent_id().to_string();
        }
        memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_body_skips_unset_filters() {
        let body = QueryBody {
            query: "rust",
            limit: DEFAULT_QUERY_LIMIT,
            min_relevance: DEFAULT_MIN_RELEVANCE,
            memory_types: None,
            namespace: None,
            tags: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"query": "rust", "limit": 10, "minRelevance": 0.5})
        );
    }

    #[test]
    fn test_query_body_includes_filters() {
        let types = [MemoryType::Episodic, MemoryType::Working];
        let tags = vec!["a".to_string()];
        let body = QueryBody {
            query: "q",
            limit: 3,
            min_relevance: 0.1,
            memory_types: Some(&types),
            namespace: Some("team"),
            tags: Some(&tags),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["memoryTypes"], json!(["episodic", "working"]));
        assert_eq!(value["namespace"], json!("team"));
        assert_eq!(value["tags"], json!(["a"]));
    }

    #[test]
    fn test_missing_results_is_empty() {
        let response: Results<ScoredMemory> = serde_json::from_value(json!({})).unwrap();
        assert!(response.results.is_empty());
    }
}
