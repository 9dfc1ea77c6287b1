//! Bridge (virtual filesystem) service client.

use super::ServiceConfig;
use super::transport::{ServiceKind, ServiceTransport};
use crate::Result;
use crate::models::{
    DirectoryListing, DirectoryListingResponse, FileInfo, ListFilesOptions, SyncStatus,
};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Path used by sync operations when none is given.
const ROOT_PATH: &str = "/";

#[derive(Debug, Deserialize)]
struct FileContent {
    content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WriteFileBody<'a> {
    path: &'a str,
    content: &'a str,
    create_dirs: bool,
}

#[derive(Debug, Serialize)]
struct SyncBody<'a> {
    path: &'a str,
}

fn path_query(path: &str) -> [(&'static str, String); 1] {
    [("path", path.to_string())]
}

/// Client for the bridge service.
pub struct BridgeClient {
    transport: ServiceTransport,
}

impl BridgeClient {
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
            transport: ServiceTransport::new(ServiceKind::Bridge, config, http),
        }
    }

    /// Lists the entries under `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, options), fields(operation = "bridge_list_files"))]
    pub async fn list_files(
        &self,
        path: &str,
        options: &ListFilesOptions,
    ) -> Result<DirectoryListing> {
        let response: DirectoryListingResponse = self
            .transport
            .get(&["files"], &options.to_query(path))
            .await?;
        Ok(response.into())
    }

    /// Reads a file as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn read_file(&self, path: &str) -> Result<String> {
        let response: FileContent = self.transport.get(&["file"], &path_query(path)).await?;
        Ok(response.content)
    }

    /// Reads a file as raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Bridge`] with message `HTTP <status>` on any
    /// non-2xx response.
    pub async fn read_file_bytes(&self, path: &str) -> Result<Vec<u8>> {
        self.transport
            .get_bytes(&["file", "bytes"], &path_query(path))
            .await
    }

    /// Writes a text file. Missing parent directories are created unless
    /// `create_dirs` is `Some(false)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, content), fields(operation = "bridge_write_file", bytes = content.len()))]
    pub async fn write_file(
        &self,
        path: &str,
        content: &str,
        create_dirs: Option<bool>,
    ) -> Result<FileInfo> {
        let body = WriteFileBody {
            path,
            content,
            create_dirs: create_dirs.unwrap_or(true),
        };
        self.transport.send_json(Method::PUT, &["file"], &body).await
    }

    /// Deletes a file. Returns `true` once the service accepts the delete.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_file(&self, path: &str) -> Result<bool> {
        self.transport.delete(&["file"], &path_query(path)).await?;
        Ok(true)
    }

    /// Fetches metadata for a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_file_info(&self, path: &str) -> Result<FileInfo> {
        self.transport
            .get(&["file", "info"], &path_query(path))
            .await
    }

    /// Triggers synchronization of `path` (default `/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(operation = "bridge_sync"))]
    pub async fn sync(&self, path: Option<&str>) -> Result<SyncStatus> {
        let body = SyncBody {
            path: path.unwrap_or(ROOT_PATH),
        };
        self.transport.send_json(Method::POST, &["sync"], &body).await
    }

    /// Fetches the sync status of `path` (default `/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_sync_status(&self, path: Option<&str>) -> Result<SyncStatus> {
        self.transport
            .get(&["sync", "status"], &path_query(path.unwrap_or(ROOT_PATH)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_write_body_wire_format() {
        let body = WriteFileBody {
            path: "/notes.md",
            content: "hello",
            create_dirs: true,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"path": "/notes.md", "content": "hello", "createDirs": true})
        );
    }

    #[test]
    fn test_path_query() {
        assert_eq!(path_query("/a b"), [("path", "/a b".to_string())]);
    }
}
