//! Video streaming handlers.
//!
//! Files are served through `ServeFile`, which handles `Range` requests,
//! conditional headers and content types.

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::debug;
use cinevault_core::{ContentKind, ContentStoreError};

use super::handlers::ErrorResponse;
use crate::state::AppState;

type ErrorReply = (StatusCode, Json<ErrorResponse>);

/// GET /api/v1/video/movies/{slug}
pub async fn stream_movie(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    request: Request,
) -> Result<Response, ErrorReply> {
    let record = state
        .store()
        .find_by_slug(ContentKind::Movie, &slug)
        .map_err(store_error)?
        .ok_or_else(|| not_found(format!("Movie not found: {}", slug)))?;

    let video_file = record
        .video_file
        .ok_or_else(|| not_found(format!("No video for movie: {}", slug)))?;

    serve(&state, &video_file, request).await
}

/// GET /api/v1/video/series/{slug}/{season}/{episode}
///
/// Season and episode are the stored zero-based numbers.
pub async fn stream_episode(
    State(state): State<Arc<AppState>>,
    Path((slug, season, episode)): Path<(String, u32, u32)>,
    request: Request,
) -> Result<Response, ErrorReply> {
    let record = state
        .store()
        .find_by_slug(ContentKind::Series, &slug)
        .map_err(store_error)?
        .ok_or_else(|| not_found(format!("Series not found: {}", slug)))?;

    let video_file = state
        .store()
        .find_episode(record.id, season, episode)
        .map_err(store_error)?
        .and_then(|e| e.video_file)
        .ok_or_else(|| {
            not_found(format!(
                "No video for {} season {} episode {}",
                slug, season, episode
            ))
        })?;

    serve(&state, &video_file, request).await
}

async fn serve(state: &AppState, video_file: &str, request: Request) -> Result<Response, ErrorReply> {
    let path = state
        .media()
        .resolve(video_file)
        .map_err(|e| ErrorResponse::with_status(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    debug!(path = %path.display(), "Serving video");

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().replace('"', ""))
        .unwrap_or_default();

    let response = match ServeFile::new(&path).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };

    let mut response = response.map(Body::new).into_response();
    if response.status().is_success() {
        if let Ok(value) = HeaderValue::from_str(&format!("inline; filename=\"{}\"", file_name)) {
            response
                .headers_mut()
                .insert(header::CONTENT_DISPOSITION, value);
        }
    }
    Ok(response)
}

fn not_found(message: String) -> ErrorReply {
    ErrorResponse::with_status(StatusCode::NOT_FOUND, message)
}

fn store_error(e: ContentStoreError) -> ErrorReply {
    ErrorResponse::with_status(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
