//! Content normalization.
//!
//! Turns a two-locale [`MultilangBundle`] into one [`CanonicalContent`]
//! resolved into the secondary locale. Missing or malformed source fields
//! degrade to defaults one at a time; only an unusable primary record makes
//! the whole result absent.

mod resolve;
mod types;

pub use resolve::{resolve_field, FieldSources, ResolutionStep, CONTENT_STEPS, NESTED_STEPS};
pub use types::{CanonicalContent, CanonicalEpisode, CanonicalSeason};

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::LocaleConfig;
use crate::external_catalog::{ContentKind, ExternalCatalog, MultilangBundle, RawRecord};
use crate::translator::{translate_or_original, Translator};
use resolve::{embedded_field, embedded_translation, names};

/// Prefix of YouTube watch URLs built from a video key.
pub const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Normalizes bundles, fetching season details for series as it goes.
pub struct ContentNormalizer {
    catalog: Arc<dyn ExternalCatalog>,
    translator: Arc<dyn Translator>,
    locales: LocaleConfig,
    max_cast: usize,
}

impl ContentNormalizer {
    pub fn new(
        catalog: Arc<dyn ExternalCatalog>,
        translator: Arc<dyn Translator>,
        locales: LocaleConfig,
        max_cast: usize,
    ) -> Self {
        Self {
            catalog,
            translator,
            locales,
            max_cast,
        }
    }

    /// Language code strings are translated into.
    fn target_language(&self) -> &str {
        self.locales.secondary_language()
    }

    /// Normalize a bundle. `None` only when the primary record is unusable.
    pub async fn normalize(&self, bundle: &MultilangBundle) -> Option<CanonicalContent> {
        let primary = &bundle.primary;
        if !primary.is_object() {
            warn!(
                kind = %bundle.kind,
                tmdb_id = bundle.external_id,
                "Primary record missing, cannot normalize"
            );
            return None;
        }

        let kind = bundle.kind;
        let language = self.target_language();
        let translator = self.translator.as_ref();
        let secondary = bundle.secondary.as_ref();
        let embedded = embedded_translation(primary, language);

        let title_key = kind.title_field();
        let title = resolve_field(
            CONTENT_STEPS,
            FieldSources {
                primary: primary.str_field(title_key).unwrap_or_default(),
                embedded: embedded_field(embedded, title_key),
                secondary: secondary.and_then(|s| s.str_field(title_key)),
            },
            translator,
            language,
        )
        .await;

        let description = resolve_field(
            CONTENT_STEPS,
            FieldSources {
                primary: primary.str_field("overview").unwrap_or_default(),
                embedded: embedded_field(embedded, "overview"),
                secondary: secondary.and_then(|s| s.str_field("overview")),
            },
            translator,
            language,
        )
        .await;

        // Billing slots are counted before blank names are dropped.
        let cast = primary.nested_array("credits", "cast");
        let cast_names = self
            .translate_all(names(&cast[..cast.len().min(self.max_cast)]))
            .await;

        let director_names = self.translate_all(directors(primary)).await;

        let country_names = self
            .translate_all(names(primary.array("production_countries")))
            .await;

        let genre_names = names(primary.array("genres"))
            .into_iter()
            .map(str::to_string)
            .collect();

        let (seasons_count, status, seasons) = match kind {
            ContentKind::Movie => (None, None, Vec::new()),
            ContentKind::Series => (
                Some(primary.u64_field("number_of_seasons").unwrap_or(0) as u32),
                primary.str_field("status").map(str::to_string),
                self.normalize_seasons(bundle.external_id, primary).await,
            ),
        };

        let duration_minutes = match kind {
            ContentKind::Movie => positive_minutes(primary.get("runtime")),
            ContentKind::Series => None,
        };

        let content = CanonicalContent {
            kind,
            external_id: bundle.external_id,
            title,
            original_title: primary
                .string_or_default(kind.original_title_field()),
            description,
            year: primary
                .str_field(kind.release_date_field())
                .and_then(parse_year),
            duration_minutes,
            genre_names,
            country_names,
            cast_names,
            director_names,
            poster_path: primary.string_or_default("poster_path"),
            backdrop_path: primary.string_or_default("backdrop_path"),
            rating: primary.f64_field("vote_average").unwrap_or(0.0),
            trailer_url: find_trailer(primary.nested_array("videos", "results")),
            seasons_count,
            status,
            seasons,
        };

        debug!(
            kind = %kind,
            tmdb_id = bundle.external_id,
            seasons = content.seasons.len(),
            episodes = content.episode_count(),
            "Normalized content"
        );

        Some(content)
    }

    async fn translate_all<'a>(&self, values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let mut out = Vec::new();
        for value in values {
            out.push(
                translate_or_original(self.translator.as_ref(), value, self.target_language())
                    .await,
            );
        }
        out
    }

    /// Fetch and normalize every regular season; specials and failed fetches
    /// are skipped.
    async fn normalize_seasons(&self, tmdb_id: u32, primary: &RawRecord) -> Vec<CanonicalSeason> {
        let mut seasons = Vec::new();

        for summary in primary.array("seasons") {
            let season_number = match summary.get("season_number").and_then(Value::as_u64) {
                Some(n) if n >= 1 => n as u32,
                _ => continue,
            };

            let detail = match self
                .catalog
                .season(tmdb_id, season_number, &self.locales.primary)
                .await
            {
                Ok(detail) => detail,
                Err(e) => {
                    warn!(
                        tmdb_id,
                        season = season_number,
                        "Skipping season, detail fetch failed: {}",
                        e
                    );
                    continue;
                }
            };

            let summary_poster = summary
                .get("poster_path")
                .and_then(Value::as_str)
                .unwrap_or_default();

            seasons.push(self.normalize_season(season_number, &detail, summary_poster).await);
        }

        seasons
    }

    async fn normalize_season(
        &self,
        season_number: u32,
        detail: &RawRecord,
        summary_poster: &str,
    ) -> CanonicalSeason {
        let default_title = format!("Season {}", season_number);
        let title = self
            .resolve_nested(detail.str_field("name").unwrap_or(&default_title))
            .await;
        let description = self
            .resolve_nested(detail.str_field("overview").unwrap_or_default())
            .await;

        let mut episodes = Vec::new();
        for episode in detail.array("episodes") {
            if let Some(episode) = self.normalize_episode(episode).await {
                episodes.push(episode);
            }
        }

        CanonicalSeason {
            season_number,
            title,
            description,
            poster_path: detail
                .str_field("poster_path")
                .unwrap_or(summary_poster)
                .to_string(),
            release_date: parse_date(detail.str_field("air_date")),
            episodes,
        }
    }

    /// Episodes without a usable number cannot be keyed and are dropped.
    async fn normalize_episode(&self, episode: &Value) -> Option<CanonicalEpisode> {
        let episode = RawRecord::new(episode.clone());
        let episode_number = match episode.u64_field("episode_number") {
            Some(n) if n >= 1 => n as u32,
            _ => {
                debug!("Skipping episode without a number");
                return None;
            }
        };

        let default_title = format!("Episode {}", episode_number);
        let title = self
            .resolve_nested(episode.str_field("name").unwrap_or(&default_title))
            .await;
        let description = self
            .resolve_nested(episode.str_field("overview").unwrap_or_default())
            .await;

        Some(CanonicalEpisode {
            episode_number,
            title,
            description,
            duration_minutes: positive_minutes(episode.get("runtime")),
            release_date: parse_date(episode.str_field("air_date")),
        })
    }

    async fn resolve_nested(&self, primary: &str) -> String {
        resolve_field(
            NESTED_STEPS,
            FieldSources {
                primary,
                ..Default::default()
            },
            self.translator.as_ref(),
            self.target_language(),
        )
        .await
    }
}

/// Year from the leading segment of a release date ("2021-07-09" -> 2021).
pub fn parse_year(date: &str) -> Option<i32> {
    let head = date.split('-').next()?.trim();
    if head.is_empty() || !head.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    head.parse().ok()
}

/// First YouTube trailer's watch URL, or "".
pub fn find_trailer(videos: &[Value]) -> String {
    videos
        .iter()
        .find(|v| {
            v.get("type").and_then(Value::as_str) == Some("Trailer")
                && v.get("site").and_then(Value::as_str) == Some("YouTube")
        })
        .and_then(|v| v.get("key").and_then(Value::as_str))
        .filter(|key| !key.is_empty())
        .map(|key| format!("{}{}", YOUTUBE_WATCH_URL, key))
        .unwrap_or_default()
}

/// Names of crew members whose job is "Director".
fn directors(record: &RawRecord) -> Vec<&str> {
    record
        .nested_array("credits", "crew")
        .iter()
        .filter(|p| p.get("job").and_then(Value::as_str) == Some("Director"))
        .filter_map(|p| p.get("name").and_then(Value::as_str))
        .filter(|name| !name.is_empty())
        .collect()
}

/// Runtime in minutes; 0 and missing both mean unknown.
fn positive_minutes(value: Option<&Value>) -> Option<u32> {
    value
        .and_then(Value::as_u64)
        .filter(|m| *m > 0)
        .map(|m| m as u32)
}

fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    value.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}
