//! SQLite-backed content store implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use super::{
    ContentDetail, ContentRecord, ContentStore, ContentStoreError, ContentUpdate, Country,
    Episode, EpisodeData, Genre, NewContent, Person, PersonRole, RelationKind, Season,
    SeasonData, SeasonDetail, StoreStats, VideoTarget,
};
use crate::external_catalog::ContentKind;
use crate::text::slugify;

const CONTENT_COLUMNS: &str = "id, kind, tmdb_id, slug, title, original_title, description, \
     year, duration_minutes, rating_avg, trailer_url, poster, backdrop, video_file, \
     seasons_count, series_status, enriched_at, created_at, updated_at";

const SEASON_COLUMNS: &str =
    "id, content_id, season_number, title, description, poster, release_date";

const EPISODE_COLUMNS: &str = "id, season_id, episode_number, title, description, \
     duration_minutes, release_date, video_file";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite-backed content store.
pub struct SqliteContentStore {
    conn: Mutex<Connection>,
}

impl SqliteContentStore {
    /// Create a new SQLite content store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, ContentStoreError> {
        let conn = Connection::open(path).map_err(db_err)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite content store (useful for testing).
    pub fn in_memory() -> Result<Self, ContentStoreError> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), ContentStoreError> {
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS content (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                kind TEXT NOT NULL,
                tmdb_id INTEGER,
                slug TEXT NOT NULL,
                title TEXT NOT NULL,
                original_title TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT '',
                year INTEGER,
                duration_minutes INTEGER,
                rating_avg REAL NOT NULL DEFAULT 0,
                trailer_url TEXT NOT NULL DEFAULT '',
                poster TEXT,
                backdrop TEXT,
                video_file TEXT,
                seasons_count INTEGER,
                series_status TEXT,
                enriched_at TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE(kind, slug)
            );

            -- One record per external id and kind
            CREATE UNIQUE INDEX IF NOT EXISTS idx_content_tmdb
                ON content(kind, tmdb_id) WHERE tmdb_id IS NOT NULL;

            CREATE TABLE IF NOT EXISTS genres (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                name_translated TEXT NOT NULL DEFAULT '',
                slug TEXT NOT NULL DEFAULT ''
            );

            CREATE TABLE IF NOT EXISTS countries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                code TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS persons (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                role TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS content_genres (
                content_id INTEGER NOT NULL REFERENCES content(id) ON DELETE CASCADE,
                genre_id INTEGER NOT NULL REFERENCES genres(id),
                position INTEGER NOT NULL,
                PRIMARY KEY (content_id, genre_id)
            );

            CREATE TABLE IF NOT EXISTS content_countries (
                content_id INTEGER NOT NULL REFERENCES content(id) ON DELETE CASCADE,
                country_id INTEGER NOT NULL REFERENCES countries(id),
                position INTEGER NOT NULL,
                PRIMARY KEY (content_id, country_id)
            );

            CREATE TABLE IF NOT EXISTS content_actors (
                content_id INTEGER NOT NULL REFERENCES content(id) ON DELETE CASCADE,
                person_id INTEGER NOT NULL REFERENCES persons(id),
                position INTEGER NOT NULL,
                PRIMARY KEY (content_id, person_id)
            );

            CREATE TABLE IF NOT EXISTS content_directors (
                content_id INTEGER NOT NULL REFERENCES content(id) ON DELETE CASCADE,
                person_id INTEGER NOT NULL REFERENCES persons(id),
                position INTEGER NOT NULL,
                PRIMARY KEY (content_id, person_id)
            );

            CREATE TABLE IF NOT EXISTS seasons (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                content_id INTEGER NOT NULL REFERENCES content(id) ON DELETE CASCADE,
                season_number INTEGER NOT NULL,
                title TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT '',
                poster TEXT,
                release_date TEXT,
                UNIQUE(content_id, season_number)
            );

            CREATE TABLE IF NOT EXISTS episodes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                season_id INTEGER NOT NULL REFERENCES seasons(id) ON DELETE CASCADE,
                episode_number INTEGER NOT NULL,
                title TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT '',
                duration_minutes INTEGER,
                release_date TEXT,
                video_file TEXT,
                UNIQUE(season_id, episode_number)
            );
            "#,
        )
        .map_err(db_err)?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, ContentStoreError> {
        self.conn
            .lock()
            .map_err(|_| ContentStoreError::Database("connection lock poisoned".to_string()))
    }

    fn load_content(conn: &Connection, id: i64) -> Result<ContentRecord, ContentStoreError> {
        conn.query_row(
            &format!("SELECT {} FROM content WHERE id = ?1", CONTENT_COLUMNS),
            params![id],
            Self::row_to_content,
        )
        .optional()
        .map_err(db_err)?
        .ok_or_else(|| ContentStoreError::NotFound(format!("content {}", id)))
    }

    fn slug_taken(conn: &Connection, kind: ContentKind, slug: &str) -> Result<bool, ContentStoreError> {
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM content WHERE kind = ?1 AND slug = ?2)",
            params![kind.as_str(), slug],
            |row| row.get(0),
        )
        .map_err(db_err)
    }

    /// `base`, or `base-1`, `base-2`, ... whichever is free first.
    fn unique_slug(conn: &Connection, kind: ContentKind, base: &str) -> Result<String, ContentStoreError> {
        let mut candidate = base.to_string();
        let mut suffix = 1;
        while Self::slug_taken(conn, kind, &candidate)? {
            candidate = format!("{}-{}", base, suffix);
            suffix += 1;
        }
        Ok(candidate)
    }

    fn load_season(
        conn: &Connection,
        content_id: i64,
        season_number: u32,
    ) -> Result<Season, ContentStoreError> {
        conn.query_row(
            &format!(
                "SELECT {} FROM seasons WHERE content_id = ?1 AND season_number = ?2",
                SEASON_COLUMNS
            ),
            params![content_id, season_number],
            Self::row_to_season,
        )
        .map_err(db_err)
    }

    fn load_episodes(conn: &Connection, season_id: i64) -> Result<Vec<Episode>, ContentStoreError> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM episodes WHERE season_id = ?1 ORDER BY episode_number",
                EPISODE_COLUMNS
            ))
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![season_id], Self::row_to_episode)
            .map_err(db_err)?;
        collect_rows(rows)
    }

    fn load_genres(conn: &Connection, content_id: i64) -> Result<Vec<Genre>, ContentStoreError> {
        let mut stmt = conn
            .prepare(
                "SELECT g.id, g.name, g.name_translated, g.slug
                 FROM genres g JOIN content_genres cg ON cg.genre_id = g.id
                 WHERE cg.content_id = ?1 ORDER BY cg.position",
            )
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![content_id], Self::row_to_genre)
            .map_err(db_err)?;
        collect_rows(rows)
    }

    fn load_countries(conn: &Connection, content_id: i64) -> Result<Vec<Country>, ContentStoreError> {
        let mut stmt = conn
            .prepare(
                "SELECT c.id, c.code, c.name
                 FROM countries c JOIN content_countries cc ON cc.country_id = c.id
                 WHERE cc.content_id = ?1 ORDER BY cc.position",
            )
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![content_id], Self::row_to_country)
            .map_err(db_err)?;
        collect_rows(rows)
    }

    fn load_persons(
        conn: &Connection,
        content_id: i64,
        relation: RelationKind,
    ) -> Result<Vec<Person>, ContentStoreError> {
        let (table, _) = relation.table();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT p.id, p.name, p.role
                 FROM persons p JOIN {} r ON r.person_id = p.id
                 WHERE r.content_id = ?1 ORDER BY r.position",
                table
            ))
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![content_id], Self::row_to_person)
            .map_err(db_err)?;
        collect_rows(rows)
    }

    fn count(conn: &Connection, table: &str) -> Result<u64, ContentStoreError> {
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
            .map_err(db_err)?;
        Ok(count as u64)
    }

    fn row_to_content(row: &rusqlite::Row) -> rusqlite::Result<ContentRecord> {
        let kind_str: String = row.get(1)?;
        let kind: ContentKind = kind_str
            .parse()
            .map_err(|e: String| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, e.into()))?;

        let status_str: Option<String> = row.get(15)?;
        let enriched_at: Option<String> = row.get(16)?;
        let created_at: String = row.get(17)?;
        let updated_at: String = row.get(18)?;

        Ok(ContentRecord {
            id: row.get(0)?,
            kind,
            tmdb_id: row.get(2)?,
            slug: row.get(3)?,
            title: row.get(4)?,
            original_title: row.get(5)?,
            description: row.get(6)?,
            year: row.get(7)?,
            duration_minutes: row.get(8)?,
            rating_avg: row.get(9)?,
            trailer_url: row.get(10)?,
            poster: row.get(11)?,
            backdrop: row.get(12)?,
            video_file: row.get(13)?,
            seasons_count: row.get(14)?,
            series_status: status_str.and_then(|s| s.parse().ok()),
            enriched_at: enriched_at.as_deref().map(parse_time),
            created_at: parse_time(&created_at),
            updated_at: parse_time(&updated_at),
        })
    }

    fn row_to_genre(row: &rusqlite::Row) -> rusqlite::Result<Genre> {
        Ok(Genre {
            id: row.get(0)?,
            name: row.get(1)?,
            name_translated: row.get(2)?,
            slug: row.get(3)?,
        })
    }

    fn row_to_country(row: &rusqlite::Row) -> rusqlite::Result<Country> {
        Ok(Country {
            id: row.get(0)?,
            code: row.get(1)?,
            name: row.get(2)?,
        })
    }

    fn row_to_person(row: &rusqlite::Row) -> rusqlite::Result<Person> {
        let role_str: String = row.get(2)?;
        let role: PersonRole = role_str
            .parse()
            .map_err(|e: String| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, e.into()))?;
        Ok(Person {
            id: row.get(0)?,
            name: row.get(1)?,
            role,
        })
    }

    fn row_to_season(row: &rusqlite::Row) -> rusqlite::Result<Season> {
        let season_number: u32 = row.get(2)?;
        let release_date: Option<String> = row.get(6)?;
        Ok(Season {
            id: row.get(0)?,
            content_id: row.get(1)?,
            season_number,
            display_number: season_number + 1,
            title: row.get(3)?,
            description: row.get(4)?,
            poster: row.get(5)?,
            release_date: parse_date(release_date.as_deref()),
        })
    }

    fn row_to_episode(row: &rusqlite::Row) -> rusqlite::Result<Episode> {
        let episode_number: u32 = row.get(2)?;
        let release_date: Option<String> = row.get(6)?;
        Ok(Episode {
            id: row.get(0)?,
            season_id: row.get(1)?,
            episode_number,
            display_number: episode_number + 1,
            title: row.get(3)?,
            description: row.get(4)?,
            duration_minutes: row.get(5)?,
            release_date: parse_date(release_date.as_deref()),
            video_file: row.get(7)?,
        })
    }
}

impl ContentStore for SqliteContentStore {
    fn create_content(&self, content: &NewContent) -> Result<ContentRecord, ContentStoreError> {
        let conn = self.conn()?;

        let original_title = content.original_title.clone().unwrap_or_default();
        let mut base = slugify(&content.title);
        if base.is_empty() {
            base = slugify(&original_title);
        }
        if base.is_empty() {
            base = content.kind.as_str().to_string();
        }
        let slug = Self::unique_slug(&conn, content.kind, &base)?;

        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO content (kind, tmdb_id, slug, title, original_title, video_file, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            params![
                content.kind.as_str(),
                content.tmdb_id,
                slug,
                content.title,
                original_title,
                content.video_file,
                now,
            ],
        )
        .map_err(|e| {
            write_err(e, || {
                format!(
                    "{} with TMDB id {:?} already exists",
                    content.kind, content.tmdb_id
                )
            })
        })?;

        Self::load_content(&conn, conn.last_insert_rowid())
    }

    fn get_content(&self, id: i64) -> Result<ContentRecord, ContentStoreError> {
        let conn = self.conn()?;
        Self::load_content(&conn, id)
    }

    fn find_by_tmdb_id(
        &self,
        kind: ContentKind,
        tmdb_id: u32,
    ) -> Result<Option<ContentRecord>, ContentStoreError> {
        let conn = self.conn()?;
        conn.query_row(
            &format!(
                "SELECT {} FROM content WHERE kind = ?1 AND tmdb_id = ?2",
                CONTENT_COLUMNS
            ),
            params![kind.as_str(), tmdb_id],
            Self::row_to_content,
        )
        .optional()
        .map_err(db_err)
    }

    fn find_by_slug(
        &self,
        kind: ContentKind,
        slug: &str,
    ) -> Result<Option<ContentRecord>, ContentStoreError> {
        let conn = self.conn()?;
        conn.query_row(
            &format!(
                "SELECT {} FROM content WHERE kind = ?1 AND slug = ?2",
                CONTENT_COLUMNS
            ),
            params![kind.as_str(), slug],
            Self::row_to_content,
        )
        .optional()
        .map_err(db_err)
    }

    fn link_tmdb_id(&self, id: i64, tmdb_id: u32) -> Result<(), ContentStoreError> {
        let conn = self.conn()?;
        let updated = conn
            .execute(
                "UPDATE content SET tmdb_id = ?1, updated_at = ?2 WHERE id = ?3",
                params![tmdb_id, Utc::now().to_rfc3339(), id],
            )
            .map_err(|e| {
                write_err(e, || {
                    format!("TMDB id {} is already linked to another record", tmdb_id)
                })
            })?;

        if updated == 0 {
            return Err(ContentStoreError::NotFound(format!("content {}", id)));
        }
        Ok(())
    }

    fn update_content(&self, id: i64, update: &ContentUpdate) -> Result<(), ContentStoreError> {
        let conn = self.conn()?;
        let updated = conn
            .execute(
                "UPDATE content SET
                    title = ?1,
                    original_title = ?2,
                    description = ?3,
                    year = ?4,
                    duration_minutes = ?5,
                    rating_avg = ?6,
                    trailer_url = ?7,
                    seasons_count = ?8,
                    series_status = COALESCE(?9, series_status),
                    updated_at = ?10
                 WHERE id = ?11",
                params![
                    update.title,
                    update.original_title,
                    update.description,
                    update.year,
                    update.duration_minutes,
                    update.rating_avg,
                    update.trailer_url,
                    update.seasons_count,
                    update.series_status.map(|s| s.as_str()),
                    Utc::now().to_rfc3339(),
                    id,
                ],
            )
            .map_err(db_err)?;

        if updated == 0 {
            return Err(ContentStoreError::NotFound(format!("content {}", id)));
        }
        Ok(())
    }

    fn set_images(
        &self,
        id: i64,
        poster: Option<&str>,
        backdrop: Option<&str>,
    ) -> Result<(), ContentStoreError> {
        let conn = self.conn()?;
        let updated = conn
            .execute(
                "UPDATE content SET
                    poster = COALESCE(?1, poster),
                    backdrop = COALESCE(?2, backdrop),
                    updated_at = ?3
                 WHERE id = ?4",
                params![poster, backdrop, Utc::now().to_rfc3339(), id],
            )
            .map_err(db_err)?;

        if updated == 0 {
            return Err(ContentStoreError::NotFound(format!("content {}", id)));
        }
        Ok(())
    }

    fn mark_enriched(&self, id: i64, at: DateTime<Utc>) -> Result<(), ContentStoreError> {
        let conn = self.conn()?;
        let at = at.to_rfc3339();
        let updated = conn
            .execute(
                "UPDATE content SET enriched_at = ?1, updated_at = ?1 WHERE id = ?2",
                params![at, id],
            )
            .map_err(db_err)?;

        if updated == 0 {
            return Err(ContentStoreError::NotFound(format!("content {}", id)));
        }
        Ok(())
    }

    fn set_video_file(
        &self,
        target: VideoTarget,
        video_file: Option<&str>,
    ) -> Result<(), ContentStoreError> {
        let conn = self.conn()?;
        let updated = match target {
            VideoTarget::Content(id) => conn.execute(
                "UPDATE content SET video_file = ?1, updated_at = ?2 WHERE id = ?3",
                params![video_file, Utc::now().to_rfc3339(), id],
            ),
            VideoTarget::Episode(id) => conn.execute(
                "UPDATE episodes SET video_file = ?1 WHERE id = ?2",
                params![video_file, id],
            ),
        }
        .map_err(db_err)?;

        if updated == 0 {
            return Err(ContentStoreError::NotFound(format!("{:?}", target)));
        }
        Ok(())
    }

    fn find_genre(&self, name: &str) -> Result<Option<Genre>, ContentStoreError> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, name, name_translated, slug FROM genres WHERE name = ?1",
            params![name],
            Self::row_to_genre,
        )
        .optional()
        .map_err(db_err)
    }

    fn get_or_create_genre(
        &self,
        name: &str,
        name_translated: &str,
        slug: &str,
    ) -> Result<Genre, ContentStoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO genres (name, name_translated, slug) VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO NOTHING",
            params![name, name_translated, slug],
        )
        .map_err(db_err)?;

        conn.query_row(
            "SELECT id, name, name_translated, slug FROM genres WHERE name = ?1",
            params![name],
            Self::row_to_genre,
        )
        .map_err(db_err)
    }

    fn get_or_create_country(&self, code: &str, name: &str) -> Result<Country, ContentStoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO countries (code, name) VALUES (?1, ?2) ON CONFLICT(code) DO NOTHING",
            params![code, name],
        )
        .map_err(db_err)?;

        conn.query_row(
            "SELECT id, code, name FROM countries WHERE code = ?1",
            params![code],
            Self::row_to_country,
        )
        .map_err(db_err)
    }

    fn get_or_create_person(
        &self,
        name: &str,
        role: PersonRole,
    ) -> Result<Person, ContentStoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO persons (name, role) VALUES (?1, ?2) ON CONFLICT(name) DO NOTHING",
            params![name, role.as_str()],
        )
        .map_err(db_err)?;

        conn.query_row(
            "SELECT id, name, role FROM persons WHERE name = ?1",
            params![name],
            Self::row_to_person,
        )
        .map_err(db_err)
    }

    fn replace_relations(
        &self,
        content_id: i64,
        relation: RelationKind,
        ids: &[i64],
    ) -> Result<(), ContentStoreError> {
        let mut conn = self.conn()?;
        let (table, column) = relation.table();

        let tx = conn.transaction().map_err(db_err)?;
        tx.execute(
            &format!("DELETE FROM {} WHERE content_id = ?1", table),
            params![content_id],
        )
        .map_err(db_err)?;

        for (position, id) in ids.iter().enumerate() {
            // Duplicates keep their first position.
            tx.execute(
                &format!(
                    "INSERT OR IGNORE INTO {} (content_id, {}, position) VALUES (?1, ?2, ?3)",
                    table, column
                ),
                params![content_id, id, position as i64],
            )
            .map_err(db_err)?;
        }

        tx.commit().map_err(db_err)
    }

    fn upsert_season(
        &self,
        content_id: i64,
        season_number: u32,
        data: &SeasonData,
    ) -> Result<Season, ContentStoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO seasons (content_id, season_number, title, description, poster, release_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(content_id, season_number) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                poster = COALESCE(excluded.poster, seasons.poster),
                release_date = excluded.release_date",
            params![
                content_id,
                season_number,
                data.title,
                data.description,
                data.poster,
                format_date(data.release_date),
            ],
        )
        .map_err(db_err)?;

        Self::load_season(&conn, content_id, season_number)
    }

    fn upsert_episode(
        &self,
        season_id: i64,
        episode_number: u32,
        data: &EpisodeData,
    ) -> Result<Episode, ContentStoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO episodes (season_id, episode_number, title, description, duration_minutes, release_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(season_id, episode_number) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                duration_minutes = excluded.duration_minutes,
                release_date = excluded.release_date",
            params![
                season_id,
                episode_number,
                data.title,
                data.description,
                data.duration_minutes,
                format_date(data.release_date),
            ],
        )
        .map_err(db_err)?;

        conn.query_row(
            &format!(
                "SELECT {} FROM episodes WHERE season_id = ?1 AND episode_number = ?2",
                EPISODE_COLUMNS
            ),
            params![season_id, episode_number],
            Self::row_to_episode,
        )
        .map_err(db_err)
    }

    fn find_episode(
        &self,
        content_id: i64,
        season_number: u32,
        episode_number: u32,
    ) -> Result<Option<Episode>, ContentStoreError> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT e.id, e.season_id, e.episode_number, e.title, e.description,
                    e.duration_minutes, e.release_date, e.video_file
             FROM episodes e JOIN seasons s ON e.season_id = s.id
             WHERE s.content_id = ?1 AND s.season_number = ?2 AND e.episode_number = ?3",
            params![content_id, season_number, episode_number],
            Self::row_to_episode,
        )
        .optional()
        .map_err(db_err)
    }

    fn get_detail(&self, id: i64) -> Result<ContentDetail, ContentStoreError> {
        let conn = self.conn()?;
        let record = Self::load_content(&conn, id)?;

        let seasons = {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {} FROM seasons WHERE content_id = ?1 ORDER BY season_number",
                    SEASON_COLUMNS
                ))
                .map_err(db_err)?;
            let rows = stmt
                .query_map(params![id], Self::row_to_season)
                .map_err(db_err)?;
            collect_rows(rows)?
        };

        let mut season_details = Vec::with_capacity(seasons.len());
        for season in seasons {
            let episodes = Self::load_episodes(&conn, season.id)?;
            season_details.push(SeasonDetail { season, episodes });
        }

        Ok(ContentDetail {
            link_state: record.link_state(),
            genres: Self::load_genres(&conn, id)?,
            countries: Self::load_countries(&conn, id)?,
            actors: Self::load_persons(&conn, id, RelationKind::Actors)?,
            directors: Self::load_persons(&conn, id, RelationKind::Directors)?,
            seasons: season_details,
            record,
        })
    }

    fn stats(&self) -> Result<StoreStats, ContentStoreError> {
        let conn = self.conn()?;
        Ok(StoreStats {
            content: Self::count(&conn, "content")?,
            genres: Self::count(&conn, "genres")?,
            countries: Self::count(&conn, "countries")?,
            persons: Self::count(&conn, "persons")?,
            seasons: Self::count(&conn, "seasons")?,
            episodes: Self::count(&conn, "episodes")?,
        })
    }
}

fn db_err(e: rusqlite::Error) -> ContentStoreError {
    ContentStoreError::Database(e.to_string())
}

/// Constraint violations become `Conflict`, everything else `Database`.
fn write_err(e: rusqlite::Error, conflict: impl FnOnce() -> String) -> ContentStoreError {
    match e {
        rusqlite::Error::SqliteFailure(ref err, _) if err.code == ErrorCode::ConstraintViolation => {
            ContentStoreError::Conflict(conflict())
        }
        other => db_err(other),
    }
}

fn collect_rows<T>(
    rows: impl Iterator<Item = rusqlite::Result<T>>,
) -> Result<Vec<T>, ContentStoreError> {
    rows.collect::<rusqlite::Result<Vec<T>>>().map_err(db_err)
}

fn parse_time(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn parse_date(s: Option<&str>) -> Option<NaiveDate> {
    s.and_then(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok())
}

fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(DATE_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{LinkState, SeriesStatus};
    use tempfile::tempdir;

    fn store() -> SqliteContentStore {
        SqliteContentStore::in_memory().unwrap()
    }

    fn season_data(title: &str) -> SeasonData {
        SeasonData {
            title: title.to_string(),
            description: String::new(),
            poster: None,
            release_date: NaiveDate::from_ymd_opt(2008, 1, 20),
        }
    }

    fn episode_data(title: &str) -> EpisodeData {
        EpisodeData {
            title: title.to_string(),
            description: String::new(),
            duration_minutes: Some(47),
            release_date: None,
        }
    }

    #[test]
    fn test_create_and_get_content() {
        let store = store();
        let created = store
            .create_content(&NewContent::new(ContentKind::Movie, "The Matrix").with_tmdb_id(603))
            .unwrap();

        assert_eq!(created.slug, "the-matrix");
        assert_eq!(created.tmdb_id, Some(603));
        assert_eq!(created.link_state(), LinkState::Linked);

        let fetched = store.get_content(created.id).unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn test_get_missing_content() {
        let result = store().get_content(42);
        assert!(matches!(result, Err(ContentStoreError::NotFound(_))));
    }

    #[test]
    fn test_slugs_unique_per_kind() {
        let store = store();
        let first = store
            .create_content(&NewContent::new(ContentKind::Movie, "Dune"))
            .unwrap();
        let second = store
            .create_content(&NewContent::new(ContentKind::Movie, "Dune"))
            .unwrap();
        let third = store
            .create_content(&NewContent::new(ContentKind::Movie, "Dune"))
            .unwrap();
        let series = store
            .create_content(&NewContent::new(ContentKind::Series, "Dune"))
            .unwrap();

        assert_eq!(first.slug, "dune");
        assert_eq!(second.slug, "dune-1");
        assert_eq!(third.slug, "dune-2");
        assert_eq!(series.slug, "dune");
    }

    #[test]
    fn test_slug_falls_back_to_kind() {
        let store = store();
        let created = store
            .create_content(&NewContent::new(ContentKind::Series, "Тьма"))
            .unwrap();
        assert_eq!(created.slug, "series");
    }

    #[test]
    fn test_duplicate_tmdb_id_conflicts() {
        let store = store();
        store
            .create_content(&NewContent::new(ContentKind::Movie, "A").with_tmdb_id(1))
            .unwrap();
        let other = store
            .create_content(&NewContent::new(ContentKind::Movie, "B"))
            .unwrap();

        let result = store.link_tmdb_id(other.id, 1);
        assert!(matches!(result, Err(ContentStoreError::Conflict(_))));

        // Same id under another kind is fine.
        store
            .create_content(&NewContent::new(ContentKind::Series, "A").with_tmdb_id(1))
            .unwrap();
    }

    #[test]
    fn test_find_by_tmdb_id_and_slug() {
        let store = store();
        let created = store
            .create_content(&NewContent::new(ContentKind::Series, "Dark").with_tmdb_id(70523))
            .unwrap();

        let by_id = store.find_by_tmdb_id(ContentKind::Series, 70523).unwrap();
        assert_eq!(by_id.map(|c| c.id), Some(created.id));
        assert!(store.find_by_tmdb_id(ContentKind::Movie, 70523).unwrap().is_none());

        let by_slug = store.find_by_slug(ContentKind::Series, "dark").unwrap();
        assert_eq!(by_slug.map(|c| c.id), Some(created.id));
    }

    #[test]
    fn test_update_and_enrich() {
        let store = store();
        let created = store
            .create_content(&NewContent::new(ContentKind::Series, "Dark").with_tmdb_id(70523))
            .unwrap();

        let update = ContentUpdate {
            title: "Qaranlıq".to_string(),
            original_title: "Dark".to_string(),
            description: "Təsvir".to_string(),
            year: Some(2017),
            duration_minutes: None,
            rating_avg: 4.2,
            trailer_url: String::new(),
            seasons_count: Some(3),
            series_status: Some(SeriesStatus::Completed),
        };
        store.update_content(created.id, &update).unwrap();
        store.mark_enriched(created.id, Utc::now()).unwrap();

        let record = store.get_content(created.id).unwrap();
        assert_eq!(record.title, "Qaranlıq");
        assert_eq!(record.slug, "dark");
        assert_eq!(record.year, Some(2017));
        assert_eq!(record.series_status, Some(SeriesStatus::Completed));
        assert_eq!(record.link_state(), LinkState::Enriched);

        // A missing status keeps the stored one.
        let update = ContentUpdate {
            series_status: None,
            ..update
        };
        store.update_content(created.id, &update).unwrap();
        let record = store.get_content(created.id).unwrap();
        assert_eq!(record.series_status, Some(SeriesStatus::Completed));
    }

    #[test]
    fn test_set_images_keeps_existing() {
        let store = store();
        let created = store
            .create_content(&NewContent::new(ContentKind::Movie, "Heat"))
            .unwrap();

        store
            .set_images(created.id, Some("posters/poster_949.jpg"), None)
            .unwrap();
        store
            .set_images(created.id, None, Some("backdrops/backdrop_949.jpg"))
            .unwrap();

        let record = store.get_content(created.id).unwrap();
        assert_eq!(record.poster.as_deref(), Some("posters/poster_949.jpg"));
        assert_eq!(record.backdrop.as_deref(), Some("backdrops/backdrop_949.jpg"));
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let store = store();

        assert!(store.find_genre("Drama").unwrap().is_none());
        let drama = store.get_or_create_genre("Drama", "Dram", "drama").unwrap();
        assert_eq!(store.find_genre("Drama").unwrap(), Some(drama.clone()));
        let again = store.get_or_create_genre("Drama", "Other", "other").unwrap();
        assert_eq!(drama, again);
        assert_eq!(again.name_translated, "Dram");

        let usa = store.get_or_create_country("AME", "Amerika").unwrap();
        assert_eq!(store.get_or_create_country("AME", "Amerikа 2").unwrap(), usa);

        let keanu = store
            .get_or_create_person("Keanu Reeves", PersonRole::Actor)
            .unwrap();
        let as_director = store
            .get_or_create_person("Keanu Reeves", PersonRole::Director)
            .unwrap();
        assert_eq!(keanu.id, as_director.id);
        assert_eq!(as_director.role, PersonRole::Actor);

        let stats = store.stats().unwrap();
        assert_eq!(stats.genres, 1);
        assert_eq!(stats.countries, 1);
        assert_eq!(stats.persons, 1);
    }

    #[test]
    fn test_replace_relations_wholesale() {
        let store = store();
        let content = store
            .create_content(&NewContent::new(ContentKind::Movie, "Alien"))
            .unwrap();
        let horror = store.get_or_create_genre("Horror", "Qorxu", "horror").unwrap();
        let scifi = store
            .get_or_create_genre("Science Fiction", "Elmi fantastika", "science-fiction")
            .unwrap();

        store
            .replace_relations(content.id, RelationKind::Genres, &[scifi.id, horror.id])
            .unwrap();
        let detail = store.get_detail(content.id).unwrap();
        let names: Vec<&str> = detail.genres.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Science Fiction", "Horror"]);

        store
            .replace_relations(content.id, RelationKind::Genres, &[horror.id])
            .unwrap();
        let detail = store.get_detail(content.id).unwrap();
        assert_eq!(detail.genres.len(), 1);
        assert_eq!(detail.genres[0].name, "Horror");
        assert_eq!(store.stats().unwrap().genres, 2);
    }

    #[test]
    fn test_replace_relations_ignores_duplicates() {
        let store = store();
        let content = store
            .create_content(&NewContent::new(ContentKind::Movie, "Alien"))
            .unwrap();
        let usa = store.get_or_create_country("AME", "Amerika").unwrap();

        store
            .replace_relations(content.id, RelationKind::Countries, &[usa.id, usa.id])
            .unwrap();
        assert_eq!(store.get_detail(content.id).unwrap().countries.len(), 1);
    }

    #[test]
    fn test_upsert_season_and_episode() {
        let store = store();
        let content = store
            .create_content(&NewContent::new(ContentKind::Series, "Breaking Bad"))
            .unwrap();

        let season = store.upsert_season(content.id, 0, &season_data("Mövsüm 1")).unwrap();
        assert_eq!(season.season_number, 0);
        assert_eq!(season.display_number, 1);

        let mut with_poster = season_data("Mövsüm 1");
        with_poster.poster = Some("seasons/s1_poster_1396.jpg".to_string());
        store.upsert_season(content.id, 0, &with_poster).unwrap();

        let renamed = store.upsert_season(content.id, 0, &season_data("Birinci mövsüm")).unwrap();
        assert_eq!(renamed.id, season.id);
        assert_eq!(renamed.title, "Birinci mövsüm");
        assert_eq!(renamed.poster.as_deref(), Some("seasons/s1_poster_1396.jpg"));

        let episode = store.upsert_episode(season.id, 0, &episode_data("Pilot")).unwrap();
        let again = store.upsert_episode(season.id, 0, &episode_data("Pilot (az)")).unwrap();
        assert_eq!(episode.id, again.id);
        assert_eq!(again.display_number, 1);
        assert_eq!(again.title, "Pilot (az)");

        let stats = store.stats().unwrap();
        assert_eq!(stats.seasons, 1);
        assert_eq!(stats.episodes, 1);
    }

    #[test]
    fn test_find_episode() {
        let store = store();
        let content = store
            .create_content(&NewContent::new(ContentKind::Series, "Dark"))
            .unwrap();
        let season = store.upsert_season(content.id, 1, &season_data("S2")).unwrap();
        store.upsert_episode(season.id, 3, &episode_data("E4")).unwrap();

        let found = store.find_episode(content.id, 1, 3).unwrap().unwrap();
        assert_eq!(found.title, "E4");
        assert!(store.find_episode(content.id, 0, 3).unwrap().is_none());
    }

    #[test]
    fn test_set_video_file() {
        let store = store();
        let content = store
            .create_content(&NewContent::new(ContentKind::Series, "Dark"))
            .unwrap();
        let season = store.upsert_season(content.id, 0, &season_data("S1")).unwrap();
        let episode = store.upsert_episode(season.id, 0, &episode_data("E1")).unwrap();

        store
            .set_video_file(VideoTarget::Episode(episode.id), Some("videos/dark/s1e1.mp4"))
            .unwrap();
        let found = store.find_episode(content.id, 0, 0).unwrap().unwrap();
        assert_eq!(found.video_file.as_deref(), Some("videos/dark/s1e1.mp4"));

        store
            .set_video_file(VideoTarget::Content(content.id), Some("videos/dark.mp4"))
            .unwrap();
        assert_eq!(
            store.get_content(content.id).unwrap().video_file.as_deref(),
            Some("videos/dark.mp4")
        );

        let missing = store.set_video_file(VideoTarget::Episode(999), None);
        assert!(matches!(missing, Err(ContentStoreError::NotFound(_))));
    }

    #[test]
    fn test_detail_orders_seasons_and_episodes() {
        let store = store();
        let content = store
            .create_content(&NewContent::new(ContentKind::Series, "Dark"))
            .unwrap();
        let s2 = store.upsert_season(content.id, 1, &season_data("S2")).unwrap();
        let s1 = store.upsert_season(content.id, 0, &season_data("S1")).unwrap();
        store.upsert_episode(s1.id, 1, &episode_data("E2")).unwrap();
        store.upsert_episode(s1.id, 0, &episode_data("E1")).unwrap();
        store.upsert_episode(s2.id, 0, &episode_data("E1")).unwrap();

        let detail = store.get_detail(content.id).unwrap();
        assert_eq!(detail.link_state, LinkState::Unlinked);
        assert_eq!(detail.seasons.len(), 2);
        assert_eq!(detail.seasons[0].season.title, "S1");
        let titles: Vec<&str> = detail.seasons[0]
            .episodes
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(titles, vec!["E1", "E2"]);
    }

    #[test]
    fn test_file_backed_store_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cinevault.db");

        let id = {
            let store = SqliteContentStore::new(&path).unwrap();
            store
                .create_content(&NewContent::new(ContentKind::Movie, "Heat"))
                .unwrap()
                .id
        };

        let reopened = SqliteContentStore::new(&path).unwrap();
        assert_eq!(reopened.get_content(id).unwrap().slug, "heat");
    }
}
