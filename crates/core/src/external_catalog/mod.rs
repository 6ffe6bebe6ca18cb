//! External catalog integration for TMDB.
//!
//! This module provides the HTTP client for the metadata API, the image
//! fetcher for its CDN, and the two-locale bundle fetch used by ingestion.

mod images;
mod tmdb;
mod types;

pub use images::{ImageFetcher, TmdbImageFetcher};
pub use tmdb::{TmdbClient, TmdbConfig, APPEND_TO_RESPONSE};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::LocaleConfig;

/// Errors that can occur when interacting with external catalogs.
#[derive(Debug, Error)]
pub enum ExternalCatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// Resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Trait for movie/series metadata catalogs.
#[async_trait]
pub trait ExternalCatalog: Send + Sync {
    /// Free-text search. Hits come back in relevance order.
    async fn search(
        &self,
        kind: ContentKind,
        query: &str,
        language: &str,
    ) -> Result<Vec<SearchHit>, ExternalCatalogError>;

    /// Full detail record for one locale, with credits, videos and
    /// translations appended.
    async fn details(
        &self,
        kind: ContentKind,
        tmdb_id: u32,
        language: &str,
    ) -> Result<RawRecord, ExternalCatalogError>;

    /// Season detail including its episode list.
    async fn season(
        &self,
        tmdb_id: u32,
        season_number: u32,
        language: &str,
    ) -> Result<RawRecord, ExternalCatalogError>;
}

/// Fetch one record in both configured locales.
///
/// Returns `None` when the primary locale record cannot be fetched. A failed
/// or empty secondary fetch leaves `secondary` empty instead.
pub async fn fetch_bundle(
    catalog: &dyn ExternalCatalog,
    kind: ContentKind,
    tmdb_id: u32,
    locales: &LocaleConfig,
) -> Option<MultilangBundle> {
    let primary = match catalog.details(kind, tmdb_id, &locales.primary).await {
        Ok(record) if record.is_object() => record,
        Ok(_) => {
            warn!(kind = %kind, tmdb_id, "Primary record is not an object");
            return None;
        }
        Err(e) => {
            warn!(
                kind = %kind,
                tmdb_id,
                locale = %locales.primary,
                error = %e,
                "Failed to fetch primary record"
            );
            return None;
        }
    };

    let secondary = match catalog.details(kind, tmdb_id, &locales.secondary).await {
        Ok(record) if record.is_object() => Some(record),
        Ok(_) => None,
        Err(e) => {
            debug!(
                kind = %kind,
                tmdb_id,
                locale = %locales.secondary,
                error = %e,
                "Secondary record unavailable"
            );
            None
        }
    };

    Some(MultilangBundle {
        kind,
        external_id: tmdb_id,
        primary,
        secondary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockExternalCatalog;
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_bundle_both_locales() {
        let catalog = MockExternalCatalog::new();
        catalog
            .add_details(ContentKind::Movie, 603, "en-US", json!({"title": "The Matrix"}))
            .await;
        catalog
            .add_details(ContentKind::Movie, 603, "az-AZ", json!({"title": "Matris"}))
            .await;

        let bundle = fetch_bundle(&catalog, ContentKind::Movie, 603, &LocaleConfig::default())
            .await
            .unwrap();

        assert_eq!(bundle.external_id, 603);
        assert_eq!(bundle.primary.str_field("title"), Some("The Matrix"));
        assert_eq!(
            bundle.secondary.as_ref().and_then(|s| s.str_field("title")),
            Some("Matris")
        );
    }

    #[tokio::test]
    async fn test_fetch_bundle_missing_secondary_is_empty() {
        let catalog = MockExternalCatalog::new();
        catalog
            .add_details(ContentKind::Movie, 603, "en-US", json!({"title": "The Matrix"}))
            .await;

        let bundle = fetch_bundle(&catalog, ContentKind::Movie, 603, &LocaleConfig::default())
            .await
            .unwrap();

        assert!(bundle.secondary.is_none());
    }

    #[tokio::test]
    async fn test_fetch_bundle_primary_failure_is_absent() {
        let catalog = MockExternalCatalog::new();
        catalog
            .set_next_error(ExternalCatalogError::ApiError {
                status: 503,
                message: "unavailable".to_string(),
            })
            .await;

        let bundle = fetch_bundle(&catalog, ContentKind::Series, 1396, &LocaleConfig::default()).await;
        assert!(bundle.is_none());
    }
}
