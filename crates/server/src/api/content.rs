//! Content record API handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use cinevault_core::{
    content::{ContentDetail, NewContent},
    ingest::CreatedContent,
    ContentKind, ContentStoreError,
};

use super::handlers::ErrorResponse;
use super::ingest::error_response;
use crate::state::AppState;

/// Request body for creating a content record
#[derive(Debug, Deserialize)]
pub struct CreateContentBody {
    pub kind: ContentKind,
    pub title: String,
    pub original_title: Option<String>,
    pub tmdb_id: Option<u32>,
    /// Video path relative to the media root
    pub video_file: Option<String>,
}

impl From<CreateContentBody> for NewContent {
    fn from(body: CreateContentBody) -> Self {
        Self {
            kind: body.kind,
            title: body.title,
            original_title: body.original_title.filter(|t| !t.trim().is_empty()),
            tmdb_id: body.tmdb_id,
            video_file: body.video_file.filter(|v| !v.trim().is_empty()),
        }
    }
}

/// POST /api/v1/content
///
/// Create a record. Records carrying a TMDB id are ingested before the
/// response is sent.
pub async fn create_content(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateContentBody>,
) -> Result<(StatusCode, Json<CreatedContent>), impl IntoResponse> {
    if body.title.trim().is_empty() {
        return Err(ErrorResponse::with_status(
            StatusCode::BAD_REQUEST,
            "title must not be empty",
        ));
    }

    match state.ingest().create_content(body.into()).await {
        Ok(created) => Ok((StatusCode::CREATED, Json(created))),
        Err(e) => Err(error_response(e)),
    }
}

/// GET /api/v1/content/{id}
///
/// Record with relations, seasons and episodes.
pub async fn get_content(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ContentDetail>, impl IntoResponse> {
    match state.store().get_detail(id) {
        Ok(detail) => Ok(Json(detail)),
        Err(ContentStoreError::NotFound(_)) => Err(ErrorResponse::with_status(
            StatusCode::NOT_FOUND,
            format!("Content not found: {}", id),
        )),
        Err(e) => Err(ErrorResponse::with_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            e.to_string(),
        )),
    }
}
