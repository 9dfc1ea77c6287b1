//! Data models for the Bravo Zero services.
//!
//! Entities are transient value objects materialized from response bodies.
//! Optional fields the services may omit carry `serde` defaults, so parsing a
//! response applies the documented defaults in one place.

mod bridge;
mod constitution;
mod memory;

pub(crate) use bridge::DirectoryListingResponse;
pub use bridge::{DirectoryListing, FileInfo, ListFilesOptions, SyncStatus};
pub use constitution::{
    AppliedRule, Decision, EvaluateRequest, EvaluationPriority, EvaluationResult, OmegaScore,
    OmegaTrend, Rule, RuleFilter, RulePriority, ValuesDatabase,
};
pub use memory::{
    ConsolidationState, CreateEdgeRequest, DEFAULT_EDGE_STRENGTH, DEFAULT_IMPORTANCE,
    DEFAULT_MIN_RELEVANCE, DEFAULT_QUERY_LIMIT, DEFAULT_STRENGTH, Edge, Memory, MemoryQueryResult,
    MemoryType, MemoryUpdate, QueryRequest, RecordRequest, RelatedOptions,
};
