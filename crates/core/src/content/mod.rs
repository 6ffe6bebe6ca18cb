//! Content storage: movies, series, their seasons and episodes, and the
//! genre/country/person entities they link to.
//!
//! Related entities are looked up by natural key and created on first
//! encounter. Seasons and episodes are keyed by their zero-based number.

mod sqlite;
mod types;

pub use sqlite::SqliteContentStore;
pub use types::*;

use chrono::{DateTime, Utc};

use crate::external_catalog::ContentKind;

/// Trait for content storage.
pub trait ContentStore: Send + Sync {
    /// Insert a new record with a slug unique within its kind.
    fn create_content(&self, content: &NewContent) -> Result<ContentRecord, ContentStoreError>;

    fn get_content(&self, id: i64) -> Result<ContentRecord, ContentStoreError>;

    fn find_by_tmdb_id(
        &self,
        kind: ContentKind,
        tmdb_id: u32,
    ) -> Result<Option<ContentRecord>, ContentStoreError>;

    fn find_by_slug(
        &self,
        kind: ContentKind,
        slug: &str,
    ) -> Result<Option<ContentRecord>, ContentStoreError>;

    /// Attach an external id. Fails with `Conflict` when another record of
    /// the same kind already holds it.
    fn link_tmdb_id(&self, id: i64, tmdb_id: u32) -> Result<(), ContentStoreError>;

    /// Overwrite the scalar fields written by ingestion.
    fn update_content(&self, id: i64, update: &ContentUpdate) -> Result<(), ContentStoreError>;

    /// Set image paths; `None` leaves the stored path alone.
    fn set_images(
        &self,
        id: i64,
        poster: Option<&str>,
        backdrop: Option<&str>,
    ) -> Result<(), ContentStoreError>;

    fn mark_enriched(&self, id: i64, at: DateTime<Utc>) -> Result<(), ContentStoreError>;

    /// Attach (or clear) the local video file of a movie or an episode.
    fn set_video_file(
        &self,
        target: VideoTarget,
        video_file: Option<&str>,
    ) -> Result<(), ContentStoreError>;

    /// Genre by source-language name, if it exists.
    fn find_genre(&self, name: &str) -> Result<Option<Genre>, ContentStoreError>;

    /// Genre by source-language name. `name_translated` and `slug` are only
    /// used when the genre is created.
    fn get_or_create_genre(
        &self,
        name: &str,
        name_translated: &str,
        slug: &str,
    ) -> Result<Genre, ContentStoreError>;

    /// Country by derived code. `name` is only used on creation.
    fn get_or_create_country(&self, code: &str, name: &str) -> Result<Country, ContentStoreError>;

    /// Person by name. `role` is only used on creation.
    fn get_or_create_person(
        &self,
        name: &str,
        role: PersonRole,
    ) -> Result<Person, ContentStoreError>;

    /// Replace one relation set wholesale, keeping the given order.
    fn replace_relations(
        &self,
        content_id: i64,
        relation: RelationKind,
        ids: &[i64],
    ) -> Result<(), ContentStoreError>;

    /// Update or insert by `(content_id, season_number)`.
    fn upsert_season(
        &self,
        content_id: i64,
        season_number: u32,
        data: &SeasonData,
    ) -> Result<Season, ContentStoreError>;

    /// Update or insert by `(season_id, episode_number)`.
    fn upsert_episode(
        &self,
        season_id: i64,
        episode_number: u32,
        data: &EpisodeData,
    ) -> Result<Episode, ContentStoreError>;

    /// Episode by zero-based season and episode numbers.
    fn find_episode(
        &self,
        content_id: i64,
        season_number: u32,
        episode_number: u32,
    ) -> Result<Option<Episode>, ContentStoreError>;

    /// Record with relations, seasons and episodes.
    fn get_detail(&self, id: i64) -> Result<ContentDetail, ContentStoreError>;

    fn stats(&self) -> Result<StoreStats, ContentStoreError>;
}
