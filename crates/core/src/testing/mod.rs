//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the external seams (TMDB,
//! machine translation, image CDN) so ingestion can be exercised end to end
//! against an in-memory store without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use cinevault_core::testing::{fixtures, MockExternalCatalog, MockImageFetcher, MockTranslator};
//!
//! let catalog = MockExternalCatalog::new();
//! let translator = MockTranslator::new();
//! let images = MockImageFetcher::new();
//!
//! // Configure mock responses
//! catalog
//!     .add_details(ContentKind::Movie, 603, "en-US", fixtures::movie_details(603, "The Matrix", "1999-03-30"))
//!     .await;
//! translator.add("The Matrix", "az", "Matris").await;
//! ```

mod mock_external_catalog;
mod mock_image_fetcher;
mod mock_translator;

pub use mock_external_catalog::{MockExternalCatalog, RecordedCatalogQuery};
pub use mock_image_fetcher::MockImageFetcher;
pub use mock_translator::MockTranslator;

/// Test fixtures: raw TMDB-shaped JSON records.
pub mod fixtures {
    use serde_json::{json, Value};

    /// A movie detail record with credits, videos and an empty
    /// translations block.
    pub fn movie_details(tmdb_id: u32, title: &str, release_date: &str) -> Value {
        json!({
            "id": tmdb_id,
            "title": title,
            "original_title": title,
            "overview": format!("{} follows a hacker who learns the truth.", title),
            "release_date": release_date,
            "runtime": 136,
            "vote_average": 8.2,
            "poster_path": format!("/poster_{}.jpg", tmdb_id),
            "backdrop_path": format!("/backdrop_{}.jpg", tmdb_id),
            "genres": [
                { "id": 28, "name": "Action" },
                { "id": 878, "name": "Science Fiction" }
            ],
            "production_countries": [
                { "iso_3166_1": "US", "name": "United States of America" }
            ],
            "credits": {
                "cast": [
                    { "name": "Keanu Reeves", "character": "Neo", "order": 0 },
                    { "name": "Laurence Fishburne", "character": "Morpheus", "order": 1 },
                    { "name": "Carrie-Anne Moss", "character": "Trinity", "order": 2 }
                ],
                "crew": [
                    { "name": "Lana Wachowski", "job": "Director" },
                    { "name": "Joel Silver", "job": "Producer" },
                    { "name": "Lilly Wachowski", "job": "Director" }
                ]
            },
            "videos": {
                "results": [
                    { "type": "Teaser", "site": "YouTube", "key": format!("teaser{}", tmdb_id) },
                    { "type": "Trailer", "site": "YouTube", "key": format!("trailer{}", tmdb_id) }
                ]
            },
            "translations": { "translations": [] }
        })
    }

    /// A series detail record whose season list starts with specials
    /// (season 0) followed by seasons `1..=seasons`.
    pub fn series_details(tmdb_id: u32, name: &str, seasons: u32) -> Value {
        let mut summaries = vec![json!({
            "season_number": 0,
            "name": "Specials",
            "poster_path": "/specials.jpg"
        })];
        summaries.extend((1..=seasons).map(|n| {
            json!({
                "season_number": n,
                "name": format!("Season {}", n),
                "poster_path": format!("/season_{}_{}.jpg", tmdb_id, n)
            })
        }));

        json!({
            "id": tmdb_id,
            "name": name,
            "original_name": name,
            "overview": format!("{} is a drama series.", name),
            "first_air_date": "2008-01-20",
            "status": "Ended",
            "number_of_seasons": seasons,
            "vote_average": 8.9,
            "poster_path": format!("/poster_{}.jpg", tmdb_id),
            "backdrop_path": format!("/backdrop_{}.jpg", tmdb_id),
            "genres": [{ "id": 18, "name": "Drama" }, { "id": 80, "name": "Crime" }],
            "production_countries": [{ "iso_3166_1": "US", "name": "United States of America" }],
            "credits": {
                "cast": [
                    { "name": "Bryan Cranston", "order": 0 },
                    { "name": "Aaron Paul", "order": 1 }
                ],
                "crew": [{ "name": "Vince Gilligan", "job": "Director" }]
            },
            "videos": { "results": [] },
            "seasons": summaries
        })
    }

    /// A season detail record with `episodes` numbered from 1.
    pub fn season_details(season_number: u32, episodes: u32) -> Value {
        let list: Vec<Value> = (1..=episodes)
            .map(|e| {
                json!({
                    "episode_number": e,
                    "name": format!("Chapter {}", e),
                    "overview": format!("Episode {} of season {}.", e, season_number),
                    "runtime": 47,
                    "air_date": format!("{}-01-{:02}", 2007 + season_number, 19 + e.min(9))
                })
            })
            .collect();

        json!({
            "season_number": season_number,
            "name": format!("Season {}", season_number),
            "overview": format!("Season {} overview.", season_number),
            "air_date": format!("{}-01-20", 2007 + season_number),
            "episodes": list
        })
    }
}
