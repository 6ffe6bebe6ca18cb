//! Canonical, locale-resolved content records.

use chrono::NaiveDate;
use serde::Serialize;

use crate::external_catalog::ContentKind;

/// One movie or series, normalized and resolved into the secondary locale.
///
/// Every field is always present; missing source data shows up as an empty
/// string, an empty list or `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalContent {
    pub kind: ContentKind,
    pub external_id: u32,
    /// Title in the secondary locale.
    pub title: String,
    pub original_title: String,
    /// Overview in the secondary locale.
    pub description: String,
    pub year: Option<i32>,
    pub duration_minutes: Option<u32>,
    /// Genre names as the primary locale spells them.
    pub genre_names: Vec<String>,
    /// Production country names, translated.
    pub country_names: Vec<String>,
    /// Billed cast in billing order, translated.
    pub cast_names: Vec<String>,
    pub director_names: Vec<String>,
    /// Relative image paths on the CDN; not downloaded yet.
    pub poster_path: String,
    pub backdrop_path: String,
    /// Source vote average on a 0-10 scale.
    pub rating: f64,
    pub trailer_url: String,
    /// Series only.
    pub seasons_count: Option<u32>,
    /// Raw TMDB status string, series only.
    pub status: Option<String>,
    /// Series only; seasons in source order, specials excluded.
    pub seasons: Vec<CanonicalSeason>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalSeason {
    /// External (one-based) season number.
    pub season_number: u32,
    pub title: String,
    pub description: String,
    pub poster_path: String,
    pub release_date: Option<NaiveDate>,
    pub episodes: Vec<CanonicalEpisode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalEpisode {
    /// External (one-based) episode number.
    pub episode_number: u32,
    pub title: String,
    pub description: String,
    pub duration_minutes: Option<u32>,
    pub release_date: Option<NaiveDate>,
}

impl CanonicalContent {
    /// Number of episodes across all seasons.
    pub fn episode_count(&self) -> usize {
        self.seasons.iter().map(|s| s.episodes.len()).sum()
    }
}
