//! Bridge service types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata about a file or directory on the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    /// Full path.
    pub path: String,
    /// File name.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Whether this is a directory.
    pub is_directory: bool,
    /// Last modification time.
    pub modified_at: DateTime<Utc>,
    /// Creation time, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Permissions string.
    #[serde(default)]
    pub permissions: String,
}

/// Contents of a directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryListing {
    /// Directory path.
    pub path: String,
    /// Entries, in service order.
    pub files: Vec<FileInfo>,
    /// Total number of entries.
    pub total_count: u64,
}

/// Directory listing as sent by the service, before defaults are applied.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DirectoryListingResponse {
    #[serde(default)]
    path: String,
    #[serde(default)]
    files: Vec<FileInfo>,
    #[serde(default)]
    total_count: Option<u64>,
}

impl From<DirectoryListingResponse> for DirectoryListing {
    fn from(response: DirectoryListingResponse) -> Self {
        let total_count = response
            .total_count
            .unwrap_or_else(|| response.files.len() as u64);
        Self {
            path: response.path,
            files: response.files,
            total_count,
        }
    }
}

/// Synchronization state of a bridge path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    /// The path.
    pub path: String,
    /// Whether the path is in sync.
    #[serde(default)]
    pub synced: bool,
    /// Last successful sync, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync_at: Option<DateTime<Utc>>,
    /// Number of changes not yet synced.
    #[serde(default)]
    pub pending_changes: u64,
}

/// Options for listing files.
#[derive(Debug, Clone, Default)]
pub struct ListFilesOptions {
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Glob-style filter.
    pub pattern: Option<String>,
}

impl ListFilesOptions {
    /// Creates options for a flat, unfiltered listing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lists recursively.
    #[must_use]
    pub const fn recursive(mut self) -> Self {
        self.recursive = true;
        self
    }

    /// Filters entries with a glob-style pattern.
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Returns the query parameters for listing `path`.
    #[must_use]
    pub fn to_query(&self, path: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![("path", path.to_string())];
        if self.recursive {
            params.push(("recursive", "true".to_string()));
        }
        if let Some(pattern) = self.pattern.as_deref().filter(|p| !p.is_empty()) {
            params.push(("pattern", pattern.to_string()));
        }
        params
    }
}
