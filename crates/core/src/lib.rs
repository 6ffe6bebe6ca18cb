pub mod config;
pub mod content;
pub mod external_catalog;
pub mod ingest;
pub mod media;
pub mod metrics;
pub mod normalizer;
pub mod testing;
pub mod text;
pub mod translator;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use content::{ContentStore, ContentStoreError, SqliteContentStore};
pub use external_catalog::{
    ContentKind, ExternalCatalog, ExternalCatalogError, ImageFetcher, TmdbClient,
    TmdbImageFetcher,
};
pub use ingest::{BatchReport, IngestError, IngestOrchestrator, IngestOutcome};
pub use media::{FsMediaStore, MediaError, MediaStore};
pub use normalizer::{CanonicalContent, ContentNormalizer};
pub use translator::{create_translator, TranslateError, Translator};
