//! Media storage for downloaded images and local video files.
//!
//! Paths handed to and returned from a [`MediaStore`] are relative to the
//! media root and use `/` separators.

mod fs_store;

pub use fs_store::FsMediaStore;

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while writing media.
#[derive(Debug, Error)]
pub enum MediaError {
    /// Relative path escapes the media root or is absolute.
    #[error("Invalid media path: {0}")]
    InvalidPath(String),

    /// Failed to create a directory.
    #[error("Failed to create directory: {path}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the file.
    #[error("Failed to write {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where media bytes are kept.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Write `bytes` at `relative_path`, replacing any existing file.
    /// Returns the stored relative path.
    async fn save(&self, relative_path: &str, bytes: &[u8]) -> Result<String, MediaError>;

    /// Absolute location of a relative path, if it is a valid one.
    fn resolve(&self, relative_path: &str) -> Result<PathBuf, MediaError>;
}

/// Relative path of a content poster.
pub fn poster_path(tmdb_id: u32) -> String {
    format!("posters/poster_{}.jpg", tmdb_id)
}

/// Relative path of a content backdrop.
pub fn backdrop_path(tmdb_id: u32) -> String {
    format!("backdrops/backdrop_{}.jpg", tmdb_id)
}

/// Relative path of a season poster, named by the stored (zero-based)
/// season number.
pub fn season_poster_path(tmdb_id: u32, season_number: u32) -> String {
    format!("seasons/s{}_poster_{}.jpg", season_number, tmdb_id)
}

/// Validate a relative media path: non-empty, no root, no `..`.
pub fn check_relative(relative_path: &str) -> Result<&Path, MediaError> {
    let path = Path::new(relative_path);
    let valid = !relative_path.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));

    if valid {
        Ok(path)
    } else {
        Err(MediaError::InvalidPath(relative_path.to_string()))
    }
}
