//! Ingestion API handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use cinevault_core::{BatchReport, ContentKind, ContentStoreError, IngestError, IngestOutcome};

use super::handlers::ErrorResponse;
use crate::state::AppState;

/// Maximum number of records in one batch request
const MAX_BATCH: usize = 500;

/// Request body for a title search ingestion
#[derive(Debug, Deserialize)]
pub struct SearchIngestBody {
    pub title: String,
    pub kind: ContentKind,
}

/// Request body for a batch ingestion
#[derive(Debug, Deserialize)]
pub struct BatchIngestBody {
    pub content_ids: Vec<i64>,
}

/// Map an ingestion error onto an HTTP status.
pub fn error_response(error: IngestError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &error {
        IngestError::Unavailable(_) => StatusCode::BAD_GATEWAY,
        IngestError::MissingIdentifier(_) => StatusCode::UNPROCESSABLE_ENTITY,
        IngestError::ContentNotFound(_) => StatusCode::NOT_FOUND,
        IngestError::Store(ContentStoreError::NotFound(_)) => StatusCode::NOT_FOUND,
        IngestError::Store(ContentStoreError::Conflict(_)) => StatusCode::CONFLICT,
        IngestError::Store(_) | IngestError::Media(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    ErrorResponse::with_status(status, error.to_string())
}

/// A `NotFound` outcome is reported as 404 with the outcome as body.
fn outcome_response(outcome: IngestOutcome) -> (StatusCode, Json<IngestOutcome>) {
    let status = match outcome {
        IngestOutcome::Updated(_) => StatusCode::OK,
        IngestOutcome::NotFound { .. } => StatusCode::NOT_FOUND,
    };
    (status, Json(outcome))
}

/// POST /api/v1/content/{id}/ingest
pub async fn ingest_content(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<IngestOutcome>), impl IntoResponse> {
    state
        .ingest()
        .ingest_content(id)
        .await
        .map(outcome_response)
        .map_err(error_response)
}

/// POST /api/v1/ingest/{kind}/{tmdb_id}
pub async fn ingest_by_id(
    State(state): State<Arc<AppState>>,
    Path((kind, tmdb_id)): Path<(String, u32)>,
) -> Result<(StatusCode, Json<IngestOutcome>), impl IntoResponse> {
    let kind: ContentKind = match kind.parse() {
        Ok(kind) => kind,
        Err(e) => return Err(ErrorResponse::with_status(StatusCode::BAD_REQUEST, e)),
    };

    state
        .ingest()
        .ingest_by_id(tmdb_id, kind)
        .await
        .map(outcome_response)
        .map_err(error_response)
}

/// POST /api/v1/ingest/search
pub async fn ingest_by_search(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SearchIngestBody>,
) -> Result<(StatusCode, Json<IngestOutcome>), impl IntoResponse> {
    let title = body.title.trim();
    if title.is_empty() {
        return Err(ErrorResponse::with_status(
            StatusCode::BAD_REQUEST,
            "title must not be empty",
        ));
    }

    state
        .ingest()
        .ingest_by_title_search(title, body.kind)
        .await
        .map(outcome_response)
        .map_err(error_response)
}

/// POST /api/v1/ingest/batch
///
/// Always 200 once started; per-item results are in the report.
pub async fn ingest_batch(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BatchIngestBody>,
) -> Result<Json<BatchReport>, impl IntoResponse> {
    if body.content_ids.len() > MAX_BATCH {
        return Err(ErrorResponse::with_status(
            StatusCode::BAD_REQUEST,
            format!("at most {} records per batch", MAX_BATCH),
        ));
    }

    info!(count = body.content_ids.len(), "Batch ingestion requested");
    Ok(Json(state.ingest().ingest_batch(&body.content_ids).await))
}
