use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinevault_core::{
    create_translator, load_config, validate_config, ContentStore, ExternalCatalog,
    FsMediaStore, ImageFetcher, IngestOrchestrator, MediaStore, SqliteContentStore, TmdbClient,
    TmdbImageFetcher, Translator,
};
use cinevault_server::{api::create_router, state::AppState};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("CINEVAULT_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Database path: {:?}", config.database.path);
    info!("Media root: {:?}", config.media.root);
    info!(
        "Locales: {} (primary), {} (secondary)",
        config.locales.primary, config.locales.secondary
    );

    // Create SQLite content store
    let store: Arc<dyn ContentStore> = Arc::new(
        SqliteContentStore::new(&config.database.path)
            .context("Failed to create content store")?,
    );
    info!("Content store initialized");

    let media: Arc<dyn MediaStore> = Arc::new(FsMediaStore::new(&config.media.root));

    // External services
    info!("Initializing TMDB client");
    let catalog: Arc<dyn ExternalCatalog> = Arc::new(
        TmdbClient::new(config.tmdb.clone()).context("Failed to create TMDB client")?,
    );
    let images: Arc<dyn ImageFetcher> = Arc::new(
        TmdbImageFetcher::new(&config.tmdb).context("Failed to create image fetcher")?,
    );
    let translator: Arc<dyn Translator> = Arc::from(
        create_translator(&config.translator).context("Failed to create translator")?,
    );
    info!("Using translator: {}", translator.name());

    let ingest = Arc::new(IngestOrchestrator::new(
        catalog,
        translator,
        images,
        Arc::clone(&store),
        Arc::clone(&media),
        config.locales.clone(),
        &config.ingest,
    ));

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), ingest, store, media));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
