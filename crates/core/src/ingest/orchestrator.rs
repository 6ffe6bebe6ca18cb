//! The ingestion orchestrator.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::types::{
    BatchItem, BatchItemStatus, BatchReport, CreatedContent, IngestError, IngestOutcome,
    IngestSummary,
};
use crate::config::{IngestConfig, LocaleConfig};
use crate::content::{
    ContentRecord, ContentStore, ContentStoreError, ContentUpdate, EpisodeData, NewContent, PersonRole,
    RelationKind, SeasonData, SeriesStatus,
};
use crate::external_catalog::{fetch_bundle, ContentKind, ExternalCatalog, ImageFetcher};
use crate::media::{backdrop_path, poster_path, season_poster_path, MediaStore};
use crate::metrics;
use crate::normalizer::{CanonicalContent, CanonicalSeason, ContentNormalizer};
use crate::text::{country_code, slugify};
use crate::translator::{translate_or_original, Translator};

/// Source ratings are 0-10, stored ratings 0-5 with one decimal.
pub fn local_rating(vote_average: f64) -> f64 {
    (vote_average / 2.0 * 10.0).round() / 10.0
}

/// Fetches, normalizes and stores movies and series.
///
/// Every network call of one ingestion is awaited in sequence; nothing
/// here locks against concurrent ingestion of the same id.
pub struct IngestOrchestrator {
    catalog: Arc<dyn ExternalCatalog>,
    translator: Arc<dyn Translator>,
    images: Arc<dyn ImageFetcher>,
    store: Arc<dyn ContentStore>,
    media: Arc<dyn MediaStore>,
    normalizer: ContentNormalizer,
    locales: LocaleConfig,
}

impl IngestOrchestrator {
    pub fn new(
        catalog: Arc<dyn ExternalCatalog>,
        translator: Arc<dyn Translator>,
        images: Arc<dyn ImageFetcher>,
        store: Arc<dyn ContentStore>,
        media: Arc<dyn MediaStore>,
        locales: LocaleConfig,
        config: &IngestConfig,
    ) -> Self {
        let normalizer = ContentNormalizer::new(
            Arc::clone(&catalog),
            Arc::clone(&translator),
            locales.clone(),
            config.max_cast,
        );
        Self {
            catalog,
            translator,
            images,
            store,
            media,
            normalizer,
            locales,
        }
    }

    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    /// Ingest one record by its external id, creating the local record if
    /// none of this kind holds the id yet.
    pub async fn ingest_by_id(
        &self,
        tmdb_id: u32,
        kind: ContentKind,
    ) -> Result<IngestOutcome, IngestError> {
        let started = Instant::now();
        let result = self.ingest(tmdb_id, kind).await;

        metrics::INGEST_DURATION
            .with_label_values(&[kind.as_str()])
            .observe(started.elapsed().as_secs_f64());
        let label = if result.is_ok() { "updated" } else { "failed" };
        metrics::INGEST_ATTEMPTS
            .with_label_values(&[kind.as_str(), label])
            .inc();

        match &result {
            Ok(summary) => info!(
                kind = %kind,
                tmdb_id,
                content_id = summary.content_id,
                created = summary.created,
                seasons = summary.seasons,
                episodes = summary.episodes,
                "Ingested content"
            ),
            Err(e) => warn!(kind = %kind, tmdb_id, error = %e, "Ingestion failed"),
        }

        result.map(IngestOutcome::Updated)
    }

    /// Search the primary locale for `title` and ingest the first hit.
    pub async fn ingest_by_title_search(
        &self,
        title: &str,
        kind: ContentKind,
    ) -> Result<IngestOutcome, IngestError> {
        match self.search_first(title, kind).await? {
            Some(tmdb_id) => self.ingest_by_id(tmdb_id, kind).await,
            None => Ok(self.not_found(title, kind)),
        }
    }

    /// Ingest an existing record. Unlinked records are linked through a
    /// title search first.
    pub async fn ingest_content(&self, content_id: i64) -> Result<IngestOutcome, IngestError> {
        let record = self.load(content_id)?;

        let tmdb_id = match record.tmdb_id {
            Some(id) => id,
            None => {
                if record.original_title.trim().is_empty() {
                    return Err(IngestError::MissingIdentifier(content_id));
                }
                let Some(id) = self.search_first(&record.original_title, record.kind).await?
                else {
                    return Ok(self.not_found(&record.original_title, record.kind));
                };
                self.store.link_tmdb_id(content_id, id)?;
                info!(content_id, tmdb_id = id, "Linked content by title search");
                id
            }
        };

        self.ingest_by_id(tmdb_id, record.kind).await
    }

    /// Ingest several records. Item failures are counted, never raised.
    pub async fn ingest_batch(&self, content_ids: &[i64]) -> BatchReport {
        let mut report = BatchReport::default();

        for &content_id in content_ids {
            let item = match self.ingest_content(content_id).await {
                Ok(IngestOutcome::Updated(summary)) => BatchItem {
                    content_id,
                    status: BatchItemStatus::Updated,
                    tmdb_id: Some(summary.tmdb_id),
                    message: None,
                },
                Ok(IngestOutcome::NotFound { query }) => BatchItem {
                    content_id,
                    status: BatchItemStatus::NotFound,
                    tmdb_id: None,
                    message: Some(format!("no TMDB match for '{}'", query)),
                },
                Err(e) => {
                    warn!(content_id, error = %e, "Batch item failed");
                    BatchItem {
                        content_id,
                        status: BatchItemStatus::Failed,
                        tmdb_id: None,
                        message: Some(e.to_string()),
                    }
                }
            };
            report.push(item);
        }

        info!(
            updated = report.updated,
            failed = report.failed,
            not_found = report.not_found,
            "Batch ingestion finished"
        );
        report
    }

    /// Create a record and, when it carries an external id, ingest it
    /// right away. An ingestion failure keeps the created record.
    pub async fn create_content(&self, content: NewContent) -> Result<CreatedContent, IngestError> {
        let record = self.store.create_content(&content)?;
        info!(content_id = record.id, kind = %record.kind, slug = %record.slug, "Created content");

        let Some(tmdb_id) = record.tmdb_id else {
            return Ok(CreatedContent {
                content: record,
                ingest: None,
                ingest_error: None,
            });
        };

        let (ingest, ingest_error) = match self.ingest_by_id(tmdb_id, record.kind).await {
            Ok(outcome) => (Some(outcome), None),
            Err(e) => (None, Some(e.to_string())),
        };

        Ok(CreatedContent {
            content: self.load(record.id)?,
            ingest,
            ingest_error,
        })
    }

    fn load(&self, content_id: i64) -> Result<ContentRecord, IngestError> {
        match self.store.get_content(content_id) {
            Ok(record) => Ok(record),
            Err(ContentStoreError::NotFound(_)) => Err(IngestError::ContentNotFound(content_id)),
            Err(e) => Err(e.into()),
        }
    }

    fn not_found(&self, query: &str, kind: ContentKind) -> IngestOutcome {
        info!(kind = %kind, query, "No TMDB match");
        metrics::INGEST_ATTEMPTS
            .with_label_values(&[kind.as_str(), "not_found"])
            .inc();
        IngestOutcome::NotFound {
            query: query.to_string(),
        }
    }

    async fn search_first(
        &self,
        title: &str,
        kind: ContentKind,
    ) -> Result<Option<u32>, IngestError> {
        let hits = self
            .catalog
            .search(kind, title, &self.locales.primary)
            .await
            .map_err(|e| IngestError::Unavailable(format!("search for '{}': {}", title, e)))?;
        Ok(hits.first().map(|hit| hit.id))
    }

    async fn ingest(&self, tmdb_id: u32, kind: ContentKind) -> Result<IngestSummary, IngestError> {
        let bundle = fetch_bundle(self.catalog.as_ref(), kind, tmdb_id, &self.locales)
            .await
            .ok_or_else(|| IngestError::Unavailable(format!("{} {}", kind, tmdb_id)))?;
        let canonical = self.normalizer.normalize(&bundle).await.ok_or_else(|| {
            IngestError::Unavailable(format!("{} {} could not be normalized", kind, tmdb_id))
        })?;

        let (record, created) = match self.store.find_by_tmdb_id(kind, tmdb_id)? {
            Some(record) => (record, false),
            None => {
                let new = NewContent::new(kind, canonical.title.clone())
                    .with_tmdb_id(tmdb_id)
                    .with_original_title(canonical.original_title.clone());
                (self.store.create_content(&new)?, true)
            }
        };
        let content_id = record.id;

        self.store.update_content(
            content_id,
            &ContentUpdate {
                title: canonical.title.clone(),
                original_title: canonical.original_title.clone(),
                description: canonical.description.clone(),
                year: canonical.year,
                duration_minutes: canonical.duration_minutes,
                rating_avg: local_rating(canonical.rating),
                trailer_url: canonical.trailer_url.clone(),
                seasons_count: canonical.seasons_count,
                series_status: canonical.status.as_deref().and_then(SeriesStatus::from_tmdb),
            },
        )?;

        let poster = self
            .save_image(&canonical.poster_path, &poster_path(tmdb_id))
            .await?;
        let backdrop = self
            .save_image(&canonical.backdrop_path, &backdrop_path(tmdb_id))
            .await?;
        self.store
            .set_images(content_id, poster.as_deref(), backdrop.as_deref())?;

        let relations = self.write_relations(content_id, &canonical).await?;

        let mut seasons = 0;
        let mut episodes = 0;
        for season in &canonical.seasons {
            episodes += self.write_season(content_id, tmdb_id, season).await?;
            seasons += 1;
        }

        self.store.mark_enriched(content_id, Utc::now())?;
        let record = self.store.get_content(content_id)?;

        Ok(IngestSummary {
            content_id,
            kind,
            tmdb_id,
            slug: record.slug,
            title: record.title,
            created,
            genres: relations.genres,
            countries: relations.countries,
            actors: relations.actors,
            directors: relations.directors,
            seasons,
            episodes,
            poster_saved: poster.is_some(),
            backdrop_saved: backdrop.is_some(),
        })
    }

    /// Download `source` and store it at `destination`. A failed download
    /// skips the image; a failed write is an error.
    async fn save_image(
        &self,
        source: &str,
        destination: &str,
    ) -> Result<Option<String>, IngestError> {
        if source.is_empty() {
            return Ok(None);
        }
        let Some(bytes) = self.images.download(source).await else {
            debug!(source, "Image not downloaded, keeping current one");
            return Ok(None);
        };
        Ok(Some(self.media.save(destination, &bytes).await?))
    }

    async fn write_relations(
        &self,
        content_id: i64,
        canonical: &CanonicalContent,
    ) -> Result<RelationCounts, IngestError> {
        let language = self.locales.secondary_language();

        let mut genre_ids = Vec::with_capacity(canonical.genre_names.len());
        for name in &canonical.genre_names {
            // Only a new genre needs its translated name.
            let genre = match self.store.find_genre(name)? {
                Some(genre) => genre,
                None => {
                    let translated =
                        translate_or_original(self.translator.as_ref(), name, language).await;
                    self.store
                        .get_or_create_genre(name, &translated, &slugify(name))?
                }
            };
            genre_ids.push(genre.id);
        }

        let mut country_ids = Vec::with_capacity(canonical.country_names.len());
        for name in &canonical.country_names {
            let code = country_code(name);
            if code.is_empty() {
                debug!(country = %name, "No country code derivable, skipping");
                continue;
            }
            country_ids.push(self.store.get_or_create_country(&code, name)?.id);
        }

        let actor_ids = self.persons(&canonical.cast_names, PersonRole::Actor)?;
        let director_ids = self.persons(&canonical.director_names, PersonRole::Director)?;

        self.store
            .replace_relations(content_id, RelationKind::Genres, &genre_ids)?;
        self.store
            .replace_relations(content_id, RelationKind::Countries, &country_ids)?;
        self.store
            .replace_relations(content_id, RelationKind::Actors, &actor_ids)?;
        self.store
            .replace_relations(content_id, RelationKind::Directors, &director_ids)?;

        Ok(RelationCounts {
            genres: genre_ids.len(),
            countries: country_ids.len(),
            actors: actor_ids.len(),
            directors: director_ids.len(),
        })
    }

    fn persons(&self, names: &[String], role: PersonRole) -> Result<Vec<i64>, IngestError> {
        names
            .iter()
            .filter(|name| !name.trim().is_empty())
            .map(|name| Ok(self.store.get_or_create_person(name, role)?.id))
            .collect()
    }

    /// Upsert one season and its episodes; returns the episode count.
    async fn write_season(
        &self,
        content_id: i64,
        tmdb_id: u32,
        season: &CanonicalSeason,
    ) -> Result<usize, IngestError> {
        let number = season.season_number.saturating_sub(1);
        let poster = self
            .save_image(&season.poster_path, &season_poster_path(tmdb_id, number))
            .await?;

        let stored = self.store.upsert_season(
            content_id,
            number,
            &SeasonData {
                title: season.title.clone(),
                description: season.description.clone(),
                poster,
                release_date: season.release_date,
            },
        )?;
        metrics::EPISODES_UPSERTED
            .with_label_values(&["season"])
            .inc();

        for episode in &season.episodes {
            self.store.upsert_episode(
                stored.id,
                episode.episode_number.saturating_sub(1),
                &EpisodeData {
                    title: episode.title.clone(),
                    description: episode.description.clone(),
                    duration_minutes: episode.duration_minutes,
                    release_date: episode.release_date,
                },
            )?;
        }
        metrics::EPISODES_UPSERTED
            .with_label_values(&["episode"])
            .inc_by(season.episodes.len() as u64);

        Ok(season.episodes.len())
    }
}

struct RelationCounts {
    genres: usize,
    countries: usize,
    actors: usize,
    directors: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::SqliteContentStore;
    use crate::external_catalog::{ExternalCatalogError, SearchHit};
    use crate::media::FsMediaStore;
    use crate::testing::{fixtures, MockExternalCatalog, MockImageFetcher, MockTranslator};
    use tempfile::TempDir;

    struct Harness {
        catalog: Arc<MockExternalCatalog>,
        images: Arc<MockImageFetcher>,
        store: Arc<SqliteContentStore>,
        orchestrator: IngestOrchestrator,
        media_dir: TempDir,
    }

    fn harness() -> Harness {
        let catalog = Arc::new(MockExternalCatalog::new());
        let translator = Arc::new(MockTranslator::new());
        let images = Arc::new(MockImageFetcher::new());
        let store = Arc::new(SqliteContentStore::in_memory().unwrap());
        let media_dir = TempDir::new().unwrap();
        let media = Arc::new(FsMediaStore::new(media_dir.path()));

        let orchestrator = IngestOrchestrator::new(
            catalog.clone(),
            translator,
            images.clone(),
            store.clone(),
            media,
            LocaleConfig::default(),
            &IngestConfig::default(),
        );

        Harness {
            catalog,
            images,
            store,
            orchestrator,
            media_dir,
        }
    }

    async fn add_movie(h: &Harness, id: u32, title: &str) {
        h.catalog
            .add_details(
                ContentKind::Movie,
                id,
                "en-US",
                fixtures::movie_details(id, title, "1999-03-30"),
            )
            .await;
    }

    async fn add_series(h: &Harness) {
        h.catalog
            .add_details(
                ContentKind::Series,
                1396,
                "en-US",
                fixtures::series_details(1396, "Breaking Bad", 2),
            )
            .await;
        h.catalog
            .add_season(1396, 1, "en-US", fixtures::season_details(1, 3))
            .await;
        h.catalog
            .add_season(1396, 2, "en-US", fixtures::season_details(2, 2))
            .await;
    }

    #[test]
    fn test_local_rating() {
        assert_eq!(local_rating(8.2), 4.1);
        assert_eq!(local_rating(7.25), 3.6);
        assert_eq!(local_rating(0.0), 0.0);
        assert_eq!(local_rating(10.0), 5.0);
    }

    #[tokio::test]
    async fn test_ingest_movie_creates_record() {
        let h = harness();
        add_movie(&h, 603, "The Matrix").await;

        let outcome = h
            .orchestrator
            .ingest_by_id(603, ContentKind::Movie)
            .await
            .unwrap();
        let summary = outcome.summary().unwrap();

        assert!(summary.created);
        assert_eq!(summary.slug, "the-matrix");
        assert_eq!(summary.genres, 2);
        assert_eq!(summary.directors, 2);
        assert!(summary.poster_saved);

        let detail = h.store.get_detail(summary.content_id).unwrap();
        assert_eq!(detail.record.rating_avg, 4.1);
        assert_eq!(detail.record.year, Some(1999));
        assert_eq!(detail.record.duration_minutes, Some(136));
        assert_eq!(detail.record.poster.as_deref(), Some("posters/poster_603.jpg"));
        assert!(detail.record.enriched_at.is_some());
        assert_eq!(detail.countries[0].code, "UNI");
        assert_eq!(detail.actors[0].name, "Keanu Reeves");
        assert!(h.media_dir.path().join("posters/poster_603.jpg").exists());
    }

    #[tokio::test]
    async fn test_ingest_is_idempotent() {
        let h = harness();
        add_movie(&h, 603, "The Matrix").await;

        let first = h
            .orchestrator
            .ingest_by_id(603, ContentKind::Movie)
            .await
            .unwrap();
        let second = h
            .orchestrator
            .ingest_by_id(603, ContentKind::Movie)
            .await
            .unwrap();

        let first = first.summary().unwrap();
        let second = second.summary().unwrap();
        assert_eq!(first.content_id, second.content_id);
        assert!(!second.created);
        assert_eq!(first.slug, second.slug);

        let stats = h.store.stats().unwrap();
        assert_eq!(stats.content, 1);
        assert_eq!(stats.genres, 2);
    }

    #[tokio::test]
    async fn test_ingest_unavailable() {
        let h = harness();
        let result = h.orchestrator.ingest_by_id(42, ContentKind::Movie).await;
        assert!(matches!(result, Err(IngestError::Unavailable(_))));
        assert_eq!(h.store.stats().unwrap().content, 0);
    }

    #[tokio::test]
    async fn test_failed_image_download_is_skipped() {
        let h = harness();
        add_movie(&h, 603, "The Matrix").await;
        h.images.fail_path("/poster_603.jpg").await;

        let outcome = h
            .orchestrator
            .ingest_by_id(603, ContentKind::Movie)
            .await
            .unwrap();
        let summary = outcome.summary().unwrap();

        assert!(!summary.poster_saved);
        let record = h.store.get_content(summary.content_id).unwrap();
        assert!(record.poster.is_none());
    }

    #[tokio::test]
    async fn test_series_seasons_are_zero_based() {
        let h = harness();
        add_series(&h).await;

        let outcome = h
            .orchestrator
            .ingest_by_id(1396, ContentKind::Series)
            .await
            .unwrap();
        let summary = outcome.summary().unwrap();
        assert_eq!(summary.seasons, 2);
        assert_eq!(summary.episodes, 5);

        let detail = h.store.get_detail(summary.content_id).unwrap();
        assert_eq!(detail.record.series_status, Some(SeriesStatus::Completed));
        assert_eq!(detail.record.seasons_count, Some(2));

        let numbers: Vec<u32> = detail.seasons.iter().map(|s| s.season.season_number).collect();
        assert_eq!(numbers, vec![0, 1]);
        assert_eq!(detail.seasons[0].season.display_number, 1);
        assert_eq!(detail.seasons[0].episodes.len(), 3);
        assert_eq!(detail.seasons[0].episodes[0].episode_number, 0);

        let episode = h
            .store
            .find_episode(summary.content_id, 1, 1)
            .unwrap()
            .unwrap();
        assert_eq!(episode.display_number, 2);
    }

    #[tokio::test]
    async fn test_title_search_not_found() {
        let h = harness();
        let outcome = h
            .orchestrator
            .ingest_by_title_search("Nothing Like This", ContentKind::Movie)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            IngestOutcome::NotFound {
                query: "Nothing Like This".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_title_search_takes_first_hit() {
        let h = harness();
        add_movie(&h, 603, "The Matrix").await;
        h.catalog.add_search_results(
            ContentKind::Movie,
            "matrix",
            vec![
                SearchHit {
                    id: 603,
                    title: "The Matrix".to_string(),
                    release_date: None,
                    overview: None,
                },
                SearchHit {
                    id: 604,
                    title: "The Matrix Reloaded".to_string(),
                    release_date: None,
                    overview: None,
                },
            ],
        )
        .await;

        let outcome = h
            .orchestrator
            .ingest_by_title_search("matrix", ContentKind::Movie)
            .await
            .unwrap();
        assert_eq!(outcome.summary().unwrap().tmdb_id, 603);
    }

    #[tokio::test]
    async fn test_search_failure_is_unavailable() {
        let h = harness();
        h.catalog
            .set_next_error(ExternalCatalogError::RateLimitExceeded)
            .await;

        let result = h
            .orchestrator
            .ingest_by_title_search("matrix", ContentKind::Movie)
            .await;
        assert!(matches!(result, Err(IngestError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_ingest_content_links_by_search() {
        let h = harness();
        add_movie(&h, 603, "The Matrix").await;
        h.catalog.add_search_results(
            ContentKind::Movie,
            "The Matrix",
            vec![SearchHit {
                id: 603,
                title: "The Matrix".to_string(),
                release_date: None,
                overview: None,
            }],
        )
        .await;
        let record = h
            .store
            .create_content(
                &NewContent::new(ContentKind::Movie, "Matris").with_original_title("The Matrix"),
            )
            .unwrap();

        let outcome = h.orchestrator.ingest_content(record.id).await.unwrap();
        let summary = outcome.summary().unwrap();

        assert_eq!(summary.content_id, record.id);
        assert!(!summary.created);
        assert_eq!(summary.slug, "matris");
        assert_eq!(h.store.get_content(record.id).unwrap().tmdb_id, Some(603));
    }

    #[tokio::test]
    async fn test_ingest_content_without_identifier() {
        let h = harness();
        let record = h
            .store
            .create_content(&NewContent::new(ContentKind::Movie, "Untitled"))
            .unwrap();

        let result = h.orchestrator.ingest_content(record.id).await;
        assert!(matches!(result, Err(IngestError::MissingIdentifier(id)) if id == record.id));
    }

    #[tokio::test]
    async fn test_ingest_content_missing_record() {
        let h = harness();
        let result = h.orchestrator.ingest_content(999).await;
        assert!(matches!(result, Err(IngestError::ContentNotFound(999))));
    }

    #[tokio::test]
    async fn test_batch_continues_after_failures() {
        let h = harness();
        add_movie(&h, 603, "The Matrix").await;
        add_movie(&h, 604, "The Matrix Reloaded").await;

        let a = h
            .store
            .create_content(&NewContent::new(ContentKind::Movie, "A").with_tmdb_id(603))
            .unwrap();
        let b = h
            .store
            .create_content(&NewContent::new(ContentKind::Movie, "B").with_tmdb_id(999))
            .unwrap();
        let c = h
            .store
            .create_content(&NewContent::new(ContentKind::Movie, "C").with_tmdb_id(604))
            .unwrap();
        let d = h
            .store
            .create_content(&NewContent::new(ContentKind::Movie, "D").with_original_title("Nope"))
            .unwrap();

        let report = h
            .orchestrator
            .ingest_batch(&[a.id, b.id, c.id, d.id])
            .await;

        assert_eq!(report.updated, 2);
        assert_eq!(report.failed, 2);
        assert_eq!(report.not_found, 1);
        assert_eq!(report.items[1].status, BatchItemStatus::Failed);
        assert_eq!(report.items[3].status, BatchItemStatus::NotFound);
    }

    #[tokio::test]
    async fn test_create_content_runs_ingestion() {
        let h = harness();
        add_movie(&h, 603, "The Matrix").await;

        let created = h
            .orchestrator
            .create_content(NewContent::new(ContentKind::Movie, "Matris").with_tmdb_id(603))
            .await
            .unwrap();

        assert!(created.ingest_error.is_none());
        assert!(created.content.enriched_at.is_some());
        assert_eq!(created.content.slug, "matris");
        assert_eq!(created.content.title, "The Matrix");
    }

    #[tokio::test]
    async fn test_create_content_keeps_record_when_ingestion_fails() {
        let h = harness();

        let created = h
            .orchestrator
            .create_content(NewContent::new(ContentKind::Movie, "Lost").with_tmdb_id(1))
            .await
            .unwrap();

        assert!(created.ingest.is_none());
        assert!(created.ingest_error.is_some());
        assert!(created.content.enriched_at.is_none());
        assert_eq!(h.store.stats().unwrap().content, 1);
    }

    #[tokio::test]
    async fn test_create_content_without_id_skips_ingestion() {
        let h = harness();

        let created = h
            .orchestrator
            .create_content(NewContent::new(ContentKind::Series, "Local Show"))
            .await
            .unwrap();

        assert!(created.ingest.is_none());
        assert!(created.ingest_error.is_none());
        assert_eq!(h.catalog.query_count().await, 0);
    }
}
