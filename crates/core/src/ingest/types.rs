//! Types for the ingestion orchestrator.

use serde::Serialize;
use thiserror::Error;

use crate::content::{ContentRecord, ContentStoreError};
use crate::external_catalog::ContentKind;
use crate::media::MediaError;

/// Errors that can occur during ingestion.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The external catalog could not provide the record.
    #[error("external catalog unavailable: {0}")]
    Unavailable(String),

    /// Record has neither an external id nor a title to search for.
    #[error("content {0} has no TMDB id and no original title")]
    MissingIdentifier(i64),

    /// Content record not found.
    #[error("content not found: {0}")]
    ContentNotFound(i64),

    /// Content store error.
    #[error("content store error: {0}")]
    Store(#[from] ContentStoreError),

    /// Media write error.
    #[error("media error: {0}")]
    Media(#[from] MediaError),
}

/// Result of one successful ingestion call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum IngestOutcome {
    /// Record written.
    Updated(IngestSummary),
    /// Title search returned no hits.
    NotFound { query: String },
}

impl IngestOutcome {
    pub fn summary(&self) -> Option<&IngestSummary> {
        match self {
            IngestOutcome::Updated(summary) => Some(summary),
            IngestOutcome::NotFound { .. } => None,
        }
    }
}

/// What an ingestion wrote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestSummary {
    pub content_id: i64,
    pub kind: ContentKind,
    pub tmdb_id: u32,
    pub slug: String,
    pub title: String,
    /// Whether the record was created by this ingestion.
    pub created: bool,
    pub genres: usize,
    pub countries: usize,
    pub actors: usize,
    pub directors: usize,
    pub seasons: usize,
    pub episodes: usize,
    pub poster_saved: bool,
    pub backdrop_saved: bool,
}

/// Per-item status in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchItemStatus {
    Updated,
    NotFound,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchItem {
    pub content_id: i64,
    pub status: BatchItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Outcome of a batch ingestion.
///
/// `failed` includes the `not_found` items.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub updated: usize,
    pub failed: usize,
    pub not_found: usize,
    pub items: Vec<BatchItem>,
}

impl BatchReport {
    pub(crate) fn push(&mut self, item: BatchItem) {
        match item.status {
            BatchItemStatus::Updated => self.updated += 1,
            BatchItemStatus::NotFound => {
                self.not_found += 1;
                self.failed += 1;
            }
            BatchItemStatus::Failed => self.failed += 1,
        }
        self.items.push(item);
    }
}

/// A record created through the orchestrator, with the ingestion it
/// triggered when it carried an external id.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedContent {
    pub content: ContentRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingest: Option<IngestOutcome>,
    /// Set when ingestion ran and failed; the record itself was kept.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingest_error: Option<String>,
}
