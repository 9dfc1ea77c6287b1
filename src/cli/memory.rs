//! Memory commands.

use super::{CommandResult, parse_list, write_json};
use crate::BravoZeroClient;
use crate::models::{
    CreateEdgeRequest, MemoryType, QueryRequest, RecordRequest, RelatedOptions,
};
use std::io::Write;

/// Arguments for `memory record`.
#[derive(Debug, Clone, Default)]
pub struct RecordArgs {
    /// Content to record.
    pub content: String,
    /// Memory type name.
    pub memory_type: Option<String>,
    /// Importance (0.0 to 1.0).
    pub importance: Option<f64>,
    /// Namespace; defaults to the agent id.
    pub namespace: Option<String>,
    /// Comma-separated tags.
    pub tags: Option<String>,
}

impl RecordArgs {
    fn into_request(self) -> Result<RecordRequest, Box<dyn std::error::Error>> {
        let mut request = RecordRequest::new(self.content);
        if let Some(name) = self.memory_type {
            let memory_type =
                MemoryType::parse(&name).ok_or_else(|| format!("unknown memory type: {name}"))?;
            request = request.with_memory_type(memory_type);
        }
        if let Some(importance) = self.importance {
            request = request.with_importance(importance);
        }
        if let Some(namespace) = self.namespace {
            request = request.with_namespace(namespace);
        }
        if let Some(tags) = self.tags {
            request = request.with_tags(parse_list(&tags));
        }
        Ok(request)
    }
}

/// Records a memory.
///
/// # Errors
///
/// Returns an error if the memory type is unknown or the request fails.
pub async fn cmd_memory_record<W: Write>(
    client: &BravoZeroClient,
    args: RecordArgs,
    writer: &mut W,
) -> CommandResult {
    let memory = client.memory().record(args.into_request()?).await?;
    write_json(writer, &memory)
}

/// Queries memories.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn cmd_memory_query<W: Write>(
    client: &BravoZeroClient,
    query: String,
    limit: Option<u32>,
    min_relevance: Option<f64>,
    writer: &mut W,
) -> CommandResult {
    let mut request = QueryRequest::new(query);
    if let Some(limit) = limit {
        request = request.with_limit(limit);
    }
    if let Some(min_relevance) = min_relevance {
        request = request.with_min_relevance(min_relevance);
    }
    let results = client.memory().query(request).await?;
    write_json(writer, &results)
}

/// Shows a memory.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn cmd_memory_get<W: Write>(
    client: &BravoZeroClient,
    id: &str,
    writer: &mut W,
) -> CommandResult {
    let memory = client.memory().get(id).await?;
    write_json(writer, &memory)
}

/// Deletes a memory.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn cmd_memory_delete<W: Write>(
    client: &BravoZeroClient,
    id: &str,
    writer: &mut W,
) -> CommandResult {
    let deleted = client.memory().delete(id).await?;
    write_json(writer, &serde_json::json!({ "id": id, "deleted": deleted }))
}

/// Connects two memories.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn cmd_memory_link<W: Write>(
    client: &BravoZeroClient,
    request: CreateEdgeRequest,
    writer: &mut W,
) -> CommandResult {
    let edge = client.memory().create_edge(request).await?;
    write_json(writer, &edge)
}

/// Lists memories linked to a memory.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn cmd_memory_related<W: Write>(
    client: &BravoZeroClient,
    id: &str,
    options: &RelatedOptions,
    writer: &mut W,
) -> CommandResult {
    let results = client.memory().get_related(id, options).await?;
    write_json(writer, &results)
}
