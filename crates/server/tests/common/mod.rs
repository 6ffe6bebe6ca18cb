//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock TMDB, translation and image services injected, backed by a
//! SQLite store and media root in a temporary directory.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use cinevault_core::{
    config::{DatabaseConfig, IngestConfig, LocaleConfig, MediaConfig, ServerConfig, TranslatorConfig},
    external_catalog::TmdbConfig,
    testing::{MockExternalCatalog, MockImageFetcher, MockTranslator},
    Config, ContentStore, FsMediaStore, IngestOrchestrator, MediaStore, SqliteContentStore,
};
use cinevault_server::state::AppState;

/// Re-export fixtures for test convenience
pub use cinevault_core::testing::fixtures;

/// Test fixture for API testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_create_content() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture.post("/api/v1/content", json!({
///         "kind": "movie",
///         "title": "Matris"
///     })).await;
///
///     assert_eq!(response.status, 201);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock TMDB catalog - configure detail/season/search responses
    pub catalog: Arc<MockExternalCatalog>,
    /// Mock translator - identity unless a mapping is added
    pub translator: Arc<MockTranslator>,
    /// Mock image CDN
    pub images: Arc<MockImageFetcher>,
    /// Direct store access for seeding and assertions
    pub store: Arc<SqliteContentStore>,
    /// Media root inside the temp dir
    pub media_root: PathBuf,
    /// Temporary directory for test database and media
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Response with raw body bytes and headers
#[derive(Debug)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let media_root = temp_dir.path().join("media");

        let catalog = Arc::new(MockExternalCatalog::new());
        let translator = Arc::new(MockTranslator::new());
        let images = Arc::new(MockImageFetcher::new());

        let config = Config {
            tmdb: TmdbConfig::with_api_key("test-secret-key"),
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            database: DatabaseConfig {
                path: db_path.clone(),
            },
            media: MediaConfig {
                root: media_root.clone(),
            },
            translator: TranslatorConfig::default(),
            locales: LocaleConfig::default(),
            ingest: IngestConfig::default(),
        };

        let store =
            Arc::new(SqliteContentStore::new(&db_path).expect("Failed to create content store"));
        let media: Arc<dyn MediaStore> = Arc::new(FsMediaStore::new(&media_root));

        let ingest = Arc::new(IngestOrchestrator::new(
            catalog.clone(),
            translator.clone(),
            images.clone(),
            store.clone(),
            Arc::clone(&media),
            config.locales.clone(),
            &config.ingest,
        ));

        let state = Arc::new(AppState::new(
            config,
            ingest,
            Arc::clone(&store) as Arc<dyn ContentStore>,
            media,
        ));

        let router = cinevault_server::api::create_router(state);

        Self {
            router,
            catalog,
            translator,
            images,
            store,
            media_root,
            temp_dir,
        }
    }

    /// Register The Matrix (603) in the mock catalog.
    pub async fn add_matrix(&self) {
        self.catalog
            .add_details(
                cinevault_core::ContentKind::Movie,
                603,
                "en-US",
                fixtures::movie_details(603, "The Matrix", "1999-03-30"),
            )
            .await;
    }

    /// Write a file under the media root.
    pub fn write_media(&self, relative_path: &str, bytes: &[u8]) {
        let path = self.media_root.join(relative_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create media dir");
        }
        std::fs::write(path, bytes).expect("Failed to write media file");
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a GET request with extra headers and keep the raw response.
    pub async fn get_raw(&self, path: &str, headers: &[(&str, &str)]) -> RawResponse {
        let mut builder = Request::builder().method("GET").uri(path);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = builder.body(Body::empty()).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        RawResponse {
            status,
            headers,
            body,
        }
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
