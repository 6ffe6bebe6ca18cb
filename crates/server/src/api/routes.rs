use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{content, handlers, ingest, middleware::metrics_middleware, video};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health, config and metrics
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::get_metrics))
        // Content records
        .route("/content", post(content::create_content))
        .route("/content/{id}", get(content::get_content))
        .route("/content/{id}/ingest", post(ingest::ingest_content))
        // Ingestion
        .route("/ingest/search", post(ingest::ingest_by_search))
        .route("/ingest/batch", post(ingest::ingest_batch))
        .route("/ingest/{kind}/{tmdb_id}", post(ingest::ingest_by_id))
        // Video streaming
        .route("/video/movies/{slug}", get(video::stream_movie))
        .route(
            "/video/series/{slug}/{season}/{episode}",
            get(video::stream_episode),
        )
        .layer(middleware::from_fn(metrics_middleware))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
}
