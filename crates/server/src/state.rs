use std::sync::Arc;

use cinevault_core::{Config, ContentStore, IngestOrchestrator, MediaStore, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    ingest: Arc<IngestOrchestrator>,
    store: Arc<dyn ContentStore>,
    media: Arc<dyn MediaStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        ingest: Arc<IngestOrchestrator>,
        store: Arc<dyn ContentStore>,
        media: Arc<dyn MediaStore>,
    ) -> Self {
        Self {
            config,
            ingest,
            store,
            media,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn ingest(&self) -> &IngestOrchestrator {
        self.ingest.as_ref()
    }

    pub fn store(&self) -> &dyn ContentStore {
        self.store.as_ref()
    }

    pub fn media(&self) -> &dyn MediaStore {
        self.media.as_ref()
    }
}
