//! Mock external catalog for testing.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::external_catalog::{
    ContentKind, ExternalCatalog, ExternalCatalogError, RawRecord, SearchHit,
};

/// A recorded catalog query for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCatalogQuery {
    Search {
        kind: ContentKind,
        query: String,
        language: String,
    },
    Details {
        kind: ContentKind,
        tmdb_id: u32,
        language: String,
    },
    Season {
        tmdb_id: u32,
        season_number: u32,
        language: String,
    },
}

/// Mock implementation of the ExternalCatalog trait.
///
/// Detail and season records are raw JSON keyed by locale, so tests can
/// hand it whatever shape (or malformed shape) they need. Anything not
/// configured comes back as `NotFound`; unknown searches return no hits.
///
/// # Example
///
/// ```rust,ignore
/// use cinevault_core::testing::{MockExternalCatalog, fixtures};
///
/// let catalog = MockExternalCatalog::new();
/// catalog
///     .add_details(ContentKind::Movie, 603, "en-US", fixtures::movie_details(603, "The Matrix", "1999-03-30"))
///     .await;
/// ```
#[derive(Debug)]
pub struct MockExternalCatalog {
    /// Detail records by (kind, id, locale).
    details: Arc<RwLock<HashMap<(ContentKind, u32, String), Value>>>,
    /// Season records by (series id, season number, locale).
    seasons: Arc<RwLock<HashMap<(u32, u32, String), Value>>>,
    /// Search hits by (kind, query).
    searches: Arc<RwLock<HashMap<(ContentKind, String), Vec<SearchHit>>>>,
    /// Detail ids that always fail.
    failing_details: Arc<RwLock<HashSet<(ContentKind, u32)>>>,
    /// Seasons that always fail.
    failing_seasons: Arc<RwLock<HashSet<(u32, u32)>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<RecordedCatalogQuery>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<ExternalCatalogError>>>,
}

impl Default for MockExternalCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExternalCatalog {
    /// Create a new empty mock external catalog.
    pub fn new() -> Self {
        Self {
            details: Arc::new(RwLock::new(HashMap::new())),
            seasons: Arc::new(RwLock::new(HashMap::new())),
            searches: Arc::new(RwLock::new(HashMap::new())),
            failing_details: Arc::new(RwLock::new(HashSet::new())),
            failing_seasons: Arc::new(RwLock::new(HashSet::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    // =========================================================================
    // Records
    // =========================================================================

    /// Add a detail record for one locale.
    pub async fn add_details(&self, kind: ContentKind, tmdb_id: u32, locale: &str, record: Value) {
        self.details
            .write()
            .await
            .insert((kind, tmdb_id, locale.to_string()), record);
    }

    /// Add a season record for one locale.
    pub async fn add_season(&self, tmdb_id: u32, season_number: u32, locale: &str, record: Value) {
        self.seasons
            .write()
            .await
            .insert((tmdb_id, season_number, locale.to_string()), record);
    }

    /// Set the hits returned for an exact query.
    pub async fn add_search_results(&self, kind: ContentKind, query: &str, hits: Vec<SearchHit>) {
        self.searches
            .write()
            .await
            .insert((kind, query.to_string()), hits);
    }

    /// Make every detail fetch of this id fail.
    pub async fn fail_details(&self, kind: ContentKind, tmdb_id: u32) {
        self.failing_details.write().await.insert((kind, tmdb_id));
    }

    /// Make every fetch of this season fail.
    pub async fn fail_season(&self, tmdb_id: u32, season_number: u32) {
        self.failing_seasons
            .write()
            .await
            .insert((tmdb_id, season_number));
    }

    // =========================================================================
    // Query Recording
    // =========================================================================

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<RecordedCatalogQuery> {
        self.queries.read().await.clone()
    }

    /// Get the number of queries performed.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    // =========================================================================
    // Error Injection
    // =========================================================================

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: ExternalCatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Clear any pending error.
    pub async fn clear_next_error(&self) {
        *self.next_error.write().await = None;
    }

    async fn take_error(&self) -> Option<ExternalCatalogError> {
        self.next_error.write().await.take()
    }

    async fn record(&self, query: RecordedCatalogQuery) {
        self.queries.write().await.push(query);
    }
}

fn unavailable() -> ExternalCatalogError {
    ExternalCatalogError::ApiError {
        status: 500,
        message: "mock failure".to_string(),
    }
}

#[async_trait]
impl ExternalCatalog for MockExternalCatalog {
    async fn search(
        &self,
        kind: ContentKind,
        query: &str,
        language: &str,
    ) -> Result<Vec<SearchHit>, ExternalCatalogError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.record(RecordedCatalogQuery::Search {
            kind,
            query: query.to_string(),
            language: language.to_string(),
        })
        .await;

        Ok(self
            .searches
            .read()
            .await
            .get(&(kind, query.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn details(
        &self,
        kind: ContentKind,
        tmdb_id: u32,
        language: &str,
    ) -> Result<RawRecord, ExternalCatalogError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.record(RecordedCatalogQuery::Details {
            kind,
            tmdb_id,
            language: language.to_string(),
        })
        .await;

        if self.failing_details.read().await.contains(&(kind, tmdb_id)) {
            return Err(unavailable());
        }

        self.details
            .read()
            .await
            .get(&(kind, tmdb_id, language.to_string()))
            .cloned()
            .map(RawRecord::new)
            .ok_or_else(|| {
                ExternalCatalogError::NotFound(format!("{} {} ({}) not found", kind, tmdb_id, language))
            })
    }

    async fn season(
        &self,
        tmdb_id: u32,
        season_number: u32,
        language: &str,
    ) -> Result<RawRecord, ExternalCatalogError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.record(RecordedCatalogQuery::Season {
            tmdb_id,
            season_number,
            language: language.to_string(),
        })
        .await;

        if self
            .failing_seasons
            .read()
            .await
            .contains(&(tmdb_id, season_number))
        {
            return Err(unavailable());
        }

        self.seasons
            .read()
            .await
            .get(&(tmdb_id, season_number, language.to_string()))
            .cloned()
            .map(RawRecord::new)
            .ok_or_else(|| {
                ExternalCatalogError::NotFound(format!(
                    "Season {} of series {} not found",
                    season_number, tmdb_id
                ))
            })
    }
}
