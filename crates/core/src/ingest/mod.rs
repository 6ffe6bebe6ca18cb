//! Ingestion: fetch a movie or series from TMDB, normalize it and write it
//! with its images, related entities, seasons and episodes.
//!
//! The orchestrator is invoked explicitly, either for one external id, a
//! title search, existing records (singly or in batches) or right after
//! creating a record through [`IngestOrchestrator::create_content`].

mod orchestrator;
mod types;

pub use orchestrator::{local_rating, IngestOrchestrator};
pub use types::*;
