//! TMDB (The Movie Database) API client.
//!
//! TMDB requires an API key for access.
//! Rate limits are generous (around 40 requests per second).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use super::types::{ContentKind, RawRecord, SearchHit};
use super::{ExternalCatalog, ExternalCatalogError};
use crate::metrics;

/// Sub-resources appended to detail requests.
pub const APPEND_TO_RESPONSE: &str = "credits,videos,images,translations,keywords,similar";

/// TMDB API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    /// TMDB API key (required).
    pub api_key: String,
    /// Base URL (default: https://api.themoviedb.org/3).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Image base URL for posters/backdrops.
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl TmdbConfig {
    /// Config with default URLs and the given key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_timeout() -> u32 {
    30
}

/// TMDB API client.
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    /// Create a new TMDB client.
    pub fn new(config: TmdbConfig) -> Result<Self, ExternalCatalogError> {
        if config.api_key.is_empty() {
            return Err(ExternalCatalogError::NotConfigured(
                "TMDB API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    /// GET `{base_url}/{endpoint}` and return the decoded JSON object.
    ///
    /// The API key is added to every request. Failures are logged here and
    /// returned as a typed error; a partially decoded body is never returned.
    pub async fn fetch(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<RawRecord, ExternalCatalogError> {
        let url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));

        debug!("TMDB request: endpoint='{}', params={:?}", endpoint, params);

        let result = self.fetch_inner(&url, endpoint, params).await;
        let operation = operation_label(endpoint);
        metrics::record_external("tmdb", operation, result.is_ok());

        if let Err(ref e) = result {
            error!("TMDB request to {} failed: {}", endpoint, e);
        }

        result
    }

    async fn fetch_inner(
        &self,
        url: &str,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<RawRecord, ExternalCatalogError> {
        let response = self
            .client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let response = check_status(response, endpoint).await?;

        let value: Value = response.json().await.map_err(|e| {
            ExternalCatalogError::ParseError(format!("Failed to parse {} response: {}", endpoint, e))
        })?;

        if !value.is_object() {
            return Err(ExternalCatalogError::ParseError(format!(
                "Expected a JSON object from {}",
                endpoint
            )));
        }

        Ok(RawRecord::new(value))
    }
}

/// Map HTTP status codes onto catalog errors.
async fn check_status(response: Response, what: &str) -> Result<Response, ExternalCatalogError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == 401 {
        return Err(ExternalCatalogError::NotConfigured(
            "Invalid TMDB API key".to_string(),
        ));
    }
    if status == 404 {
        return Err(ExternalCatalogError::NotFound(what.to_string()));
    }
    if status == 429 {
        return Err(ExternalCatalogError::RateLimitExceeded);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ExternalCatalogError::ApiError {
        status: status.as_u16(),
        message: body,
    })
}

/// Metric label for an endpoint ("search/movie" -> "search").
fn operation_label(endpoint: &str) -> &'static str {
    let endpoint = endpoint.trim_start_matches('/');
    if endpoint.starts_with("search/") {
        "search"
    } else if endpoint.contains("/season/") {
        "season"
    } else {
        "details"
    }
}

#[async_trait]
impl ExternalCatalog for TmdbClient {
    async fn search(
        &self,
        kind: ContentKind,
        query: &str,
        language: &str,
    ) -> Result<Vec<SearchHit>, ExternalCatalogError> {
        let endpoint = format!("search/{}", kind.tmdb_segment());
        let record = self
            .fetch(&endpoint, &[("query", query), ("language", language)])
            .await?;

        let response: TmdbSearchResponse = serde_json::from_value(record.into_value())
            .map_err(|e| {
                ExternalCatalogError::ParseError(format!(
                    "Failed to parse {} search response: {}",
                    kind, e
                ))
            })?;

        Ok(response.results.into_iter().map(Into::into).collect())
    }

    async fn details(
        &self,
        kind: ContentKind,
        tmdb_id: u32,
        language: &str,
    ) -> Result<RawRecord, ExternalCatalogError> {
        let endpoint = format!("{}/{}", kind.tmdb_segment(), tmdb_id);
        self.fetch(
            &endpoint,
            &[
                ("language", language),
                ("append_to_response", APPEND_TO_RESPONSE),
            ],
        )
        .await
    }

    async fn season(
        &self,
        tmdb_id: u32,
        season_number: u32,
        language: &str,
    ) -> Result<RawRecord, ExternalCatalogError> {
        let endpoint = format!("tv/{}/season/{}", tmdb_id, season_number);
        self.fetch(&endpoint, &[("language", language)]).await
    }
}

// ============================================================================
// TMDB API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse {
    #[serde(default)]
    results: Vec<TmdbSearchResult>,
}

/// Movie and TV search results share one shape apart from title/date names.
#[derive(Debug, Deserialize)]
struct TmdbSearchResult {
    id: u32,
    title: Option<String>,
    name: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    overview: Option<String>,
}

impl From<TmdbSearchResult> for SearchHit {
    fn from(r: TmdbSearchResult) -> Self {
        Self {
            id: r.id,
            title: r.title.or(r.name).unwrap_or_default(),
            release_date: r.release_date.or(r.first_air_date),
            overview: r.overview,
        }
    }
}
