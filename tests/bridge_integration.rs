//! Bridge client integration tests.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic, dead_code)]

mod common;

use bravozero::{BridgeClient, Error, ListFilesOptions};
use common::{MockResponse, MockServer, TEST_AGENT_ID, TEST_API_KEY, file_json};
use serde_json::json;

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

// ============================================================================
// Listing and reading
// ============================================================================

mod read {
    use super::*;

    #[tokio::test]
    async fn test_list_files_total_count_falls_back_to_len() {
        let server = MockServer::start(MockResponse::ok(&json!({
            "path": "/src",
            "files": [file_json("/src/a.rs"), file_json("/src/b.rs"), file_json("/src/c.rs")]
        })))
        .await;
        let client = BridgeClient::new(server.service_config());

        let listing = client
            .list_files("/src", &ListFilesOptions::new())
            .await
            .unwrap();
        assert_eq!(listing.total_count, 3);
        assert_eq!(listing.files[1].name, "b.rs");

        let request = server.last_request();
        assert_eq!(request.path(), "/v1/bridge/files");
        assert_eq!(request.query_pairs(), pairs(&[("path", "/src")]));
    }

    #[tokio::test]
    async fn test_list_files_options() {
        let server = MockServer::start(MockResponse::ok(&json!({
            "path": "/",
            "files": [],
            "totalCount": 0
        })))
        .await;
        let client = BridgeClient::new(server.service_config());

        client
            .list_files("/", &ListFilesOptions::new().recursive().with_pattern("*.md"))
            .await
            .unwrap();
        assert_eq!(
            server.last_request().query_pairs(),
            pairs(&[("path", "/"), ("recursive", "true"), ("pattern", "*.md")])
        );
    }

    #[tokio::test]
    async fn test_read_file_returns_content() {
        let server = MockServer::start(MockResponse::ok(&json!({"content": "# Title\n"}))).await;
        let client = BridgeClient::new(server.service_config());

        let content = client.read_file("/docs/a b.md").await.unwrap();
        assert_eq!(content, "# Title\n");

        let request = server.last_request();
        assert_eq!(request.path(), "/v1/bridge/file");
        assert_eq!(request.query_pairs(), pairs(&[("path", "/docs/a b.md")]));
    }

    #[tokio::test]
    async fn test_read_file_bytes() {
        let payload = [0u8, 159, 146, 150, 255];
        let server = MockServer::start(MockResponse::bytes(200, &payload)).await;
        let client = BridgeClient::new(server.service_config());

        let bytes = client.read_file_bytes("/bin/blob").await.unwrap();
        assert_eq!(bytes, payload);

        let request = server.last_request();
        assert_eq!(request.path(), "/v1/bridge/file/bytes");
        assert_eq!(request.header("accept"), Some("application/octet-stream"));
        assert_eq!(request.header("x-api-key"), Some(TEST_API_KEY));
        assert_eq!(request.header("x-agent-id"), Some(TEST_AGENT_ID));
        assert!(request.header("content-type").is_none());
    }

    #[tokio::test]
    async fn test_read_file_bytes_error_ignores_body() {
        let server = MockServer::start(
            MockResponse::json(429, &json!({"message": "busy"})).with_header("retry-after", "5"),
        )
        .await;
        let client = BridgeClient::new(server.service_config());

        let err = client.read_file_bytes("/x").await.unwrap_err();
        assert!(matches!(
            &err,
            Error::Bridge { status: 429, message, details: None } if message == "HTTP 429"
        ));
    }

    #[tokio::test]
    async fn test_get_file_info() {
        let server = MockServer::start(MockResponse::ok(&file_json("/src/main.rs"))).await;
        let client = BridgeClient::new(server.service_config());

        let info = client.get_file_info("/src/main.rs").await.unwrap();
        assert_eq!(info.size, 42);
        assert_eq!(info.permissions, "rw-r--r--");
        assert_eq!(server.last_request().path(), "/v1/bridge/file/info");
    }
}

// ============================================================================
// Writing and sync
// ============================================================================

mod write {
    use super::*;

    #[tokio::test]
    async fn test_write_file_creates_dirs_by_default() {
        let server = MockServer::start(MockResponse::ok(&file_json("/notes/today.md"))).await;
        let client = BridgeClient::new(server.service_config());

        let info = client
            .write_file("/notes/today.md", "hello", None)
            .await
            .unwrap();
        assert_eq!(info.name, "today.md");

        let request = server.last_request();
        assert_eq!(request.method, "PUT");
        assert_eq!(request.path(), "/v1/bridge/file");
        assert_eq!(
            request.json(),
            json!({"path": "/notes/today.md", "content": "hello", "createDirs": true})
        );
    }

    #[tokio::test]
    async fn test_write_file_without_create_dirs() {
        let server = MockServer::start(MockResponse::ok(&file_json("/a.md"))).await;
        let client = BridgeClient::new(server.service_config());

        client.write_file("/a.md", "x", Some(false)).await.unwrap();
        assert_eq!(server.last_request().json()["createDirs"], json!(false));
    }

    #[tokio::test]
    async fn test_delete_file() {
        let server = MockServer::start(MockResponse::text(204, "")).await;
        let client = BridgeClient::new(server.service_config());

        assert!(client.delete_file("/tmp/x").await.unwrap());
        let request = server.last_request();
        assert_eq!(request.method, "DELETE");
        assert_eq!(request.query_pairs(), pairs(&[("path", "/tmp/x")]));
    }

    #[tokio::test]
    async fn test_sync_defaults_to_root() {
        let server = MockServer::start(MockResponse::ok(&json!({
            "path": "/",
            "synced": true,
            "lastSyncAt": "2025-01-15T10:30:00Z",
            "pendingChanges": 0
        })))
        .await;
        let client = BridgeClient::new(server.service_config());

        let status = client.sync(None).await.unwrap();
        assert!(status.synced);
        assert!(status.last_sync_at.is_some());

        let request = server.last_request();
        assert_eq!(request.method, "POST");
        assert_eq!(request.path(), "/v1/bridge/sync");
        assert_eq!(request.json(), json!({"path": "/"}));
    }

    #[tokio::test]
    async fn test_sync_status_path() {
        let server = MockServer::start(MockResponse::ok(&json!({
            "path": "/src",
            "synced": false,
            "pendingChanges": 4
        })))
        .await;
        let client = BridgeClient::new(server.service_config());

        let status = client.get_sync_status(Some("/src")).await.unwrap();
        assert_eq!(status.pending_changes, 4);
        assert!(status.last_sync_at.is_none());

        let request = server.last_request();
        assert_eq!(request.path(), "/v1/bridge/sync/status");
        assert_eq!(request.query_pairs(), pairs(&[("path", "/src")]));
    }

    #[tokio::test]
    async fn test_forbidden_is_bridge_error() {
        let server =
            MockServer::start(MockResponse::json(403, &json!({"message": "outside sandbox"})))
                .await;
        let client = BridgeClient::new(server.service_config());

        let err = client.write_file("/etc/passwd", "x", None).await.unwrap_err();
        assert!(matches!(
            &err,
            Error::Bridge { status: 403, message, .. } if message == "outside sandbox"
        ));
        assert_eq!(err.to_string(), "bridge service error: outside sandbox");
    }
}
