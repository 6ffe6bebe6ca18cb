//! Stored content records and related entities.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::external_catalog::ContentKind;

/// Errors from the content store.
#[derive(Debug, Error)]
pub enum ContentStoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Lifecycle of a content record with respect to the external catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkState {
    /// No external id yet.
    Unlinked,
    /// External id known, never ingested.
    Linked,
    /// Ingested at least once.
    Enriched,
}

/// Series production status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesStatus {
    Ongoing,
    Completed,
    Cancelled,
}

impl SeriesStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesStatus::Ongoing => "ongoing",
            SeriesStatus::Completed => "completed",
            SeriesStatus::Cancelled => "cancelled",
        }
    }

    /// Map a TMDB status string. Unknown strings map to `None`.
    pub fn from_tmdb(status: &str) -> Option<Self> {
        match status {
            "Returning Series" | "In Production" | "Planned" | "Pilot" => Some(SeriesStatus::Ongoing),
            "Ended" => Some(SeriesStatus::Completed),
            "Canceled" | "Cancelled" => Some(SeriesStatus::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for SeriesStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeriesStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ongoing" => Ok(SeriesStatus::Ongoing),
            "completed" => Ok(SeriesStatus::Completed),
            "cancelled" => Ok(SeriesStatus::Cancelled),
            other => Err(format!("unknown series status: {}", other)),
        }
    }
}

/// A stored movie or series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentRecord {
    pub id: i64,
    pub kind: ContentKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<u32>,
    pub slug: String,
    pub title: String,
    pub original_title: String,
    pub description: String,
    pub year: Option<i32>,
    pub duration_minutes: Option<u32>,
    /// Local 0-5 average.
    pub rating_avg: f64,
    pub trailer_url: String,
    /// Media-relative image paths.
    pub poster: Option<String>,
    pub backdrop: Option<String>,
    /// Media-relative path of the movie's video file.
    pub video_file: Option<String>,
    pub seasons_count: Option<u32>,
    pub series_status: Option<SeriesStatus>,
    pub enriched_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentRecord {
    pub fn link_state(&self) -> LinkState {
        match (self.tmdb_id, self.enriched_at) {
            (None, _) => LinkState::Unlinked,
            (Some(_), None) => LinkState::Linked,
            (Some(_), Some(_)) => LinkState::Enriched,
        }
    }
}

/// Input for creating a content record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContent {
    pub kind: ContentKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_file: Option<String>,
}

impl NewContent {
    pub fn new(kind: ContentKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            original_title: None,
            tmdb_id: None,
            video_file: None,
        }
    }

    pub fn with_tmdb_id(mut self, tmdb_id: u32) -> Self {
        self.tmdb_id = Some(tmdb_id);
        self
    }

    pub fn with_original_title(mut self, original_title: impl Into<String>) -> Self {
        self.original_title = Some(original_title.into());
        self
    }

    pub fn with_video_file(mut self, video_file: impl Into<String>) -> Self {
        self.video_file = Some(video_file.into());
        self
    }
}

/// Scalar fields written by ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentUpdate {
    pub title: String,
    pub original_title: String,
    pub description: String,
    pub year: Option<i32>,
    pub duration_minutes: Option<u32>,
    pub rating_avg: f64,
    pub trailer_url: String,
    pub seasons_count: Option<u32>,
    /// `None` keeps the stored status.
    pub series_status: Option<SeriesStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Genre {
    pub id: i64,
    /// Source-language name; the natural key.
    pub name: String,
    pub name_translated: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Country {
    pub id: i64,
    /// Three-letter derived code; the natural key.
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonRole {
    Actor,
    Director,
}

impl PersonRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonRole::Actor => "actor",
            PersonRole::Director => "director",
        }
    }
}

impl FromStr for PersonRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "actor" => Ok(PersonRole::Actor),
            "director" => Ok(PersonRole::Director),
            other => Err(format!("unknown person role: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    pub id: i64,
    /// The natural key.
    pub name: String,
    /// Role at creation time; later encounters do not change it.
    pub role: PersonRole,
}

/// Many-to-many relation sets of a content record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    Genres,
    Countries,
    Actors,
    Directors,
}

impl RelationKind {
    pub(crate) fn table(&self) -> (&'static str, &'static str) {
        match self {
            RelationKind::Genres => ("content_genres", "genre_id"),
            RelationKind::Countries => ("content_countries", "country_id"),
            RelationKind::Actors => ("content_actors", "person_id"),
            RelationKind::Directors => ("content_directors", "person_id"),
        }
    }
}

/// Owner of a local video file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoTarget {
    Content(i64),
    Episode(i64),
}


/// A stored season. Numbers are zero-based.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Season {
    pub id: i64,
    pub content_id: i64,
    pub season_number: u32,
    /// `season_number + 1`, for display.
    pub display_number: u32,
    pub title: String,
    pub description: String,
    pub poster: Option<String>,
    pub release_date: Option<NaiveDate>,
}

/// Season fields written by ingestion. A `None` poster keeps the stored one.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonData {
    pub title: String,
    pub description: String,
    pub poster: Option<String>,
    pub release_date: Option<NaiveDate>,
}

/// A stored episode. Numbers are zero-based.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Episode {
    pub id: i64,
    pub season_id: i64,
    pub episode_number: u32,
    /// `episode_number + 1`, for display.
    pub display_number: u32,
    pub title: String,
    pub description: String,
    pub duration_minutes: Option<u32>,
    pub release_date: Option<NaiveDate>,
    pub video_file: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeData {
    pub title: String,
    pub description: String,
    pub duration_minutes: Option<u32>,
    pub release_date: Option<NaiveDate>,
}

/// A season with its episodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonDetail {
    #[serde(flatten)]
    pub season: Season,
    pub episodes: Vec<Episode>,
}

/// A content record with every relation loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentDetail {
    #[serde(flatten)]
    pub record: ContentRecord,
    pub link_state: LinkState,
    pub genres: Vec<Genre>,
    pub countries: Vec<Country>,
    pub actors: Vec<Person>,
    pub directors: Vec<Person>,
    pub seasons: Vec<SeasonDetail>,
}

/// Row counts per table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub content: u64,
    pub genres: u64,
    pub countries: u64,
    pub persons: u64,
    pub seasons: u64,
    pub episodes: u64,
}
