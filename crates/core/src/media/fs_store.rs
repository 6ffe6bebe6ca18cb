//! File system media store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::{check_relative, MediaError, MediaStore};

/// Media store rooted at a directory on disk.
pub struct FsMediaStore {
    root: PathBuf,
}

impl FsMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes to a sibling `.part` file, then renames over the target so
    /// readers never see a half-written file.
    async fn write_atomic(destination: &Path, bytes: &[u8]) -> Result<(), MediaError> {
        let mut partial = destination.as_os_str().to_owned();
        partial.push(".part");
        let partial = PathBuf::from(partial);

        let write = async {
            let mut file = fs::File::create(&partial).await?;
            file.write_all(bytes).await?;
            file.flush().await?;
            fs::rename(&partial, destination).await
        };

        if let Err(source) = write.await {
            let _ = fs::remove_file(&partial).await;
            return Err(MediaError::WriteFailed {
                path: destination.to_path_buf(),
                source,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl MediaStore for FsMediaStore {
    async fn save(&self, relative_path: &str, bytes: &[u8]) -> Result<String, MediaError> {
        let destination = self.resolve(relative_path)?;

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| MediaError::DirectoryCreationFailed {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        Self::write_atomic(&destination, bytes).await?;
        debug!("Saved {} bytes to {}", bytes.len(), destination.display());

        Ok(relative_path.to_string())
    }

    fn resolve(&self, relative_path: &str) -> Result<PathBuf, MediaError> {
        Ok(self.root.join(check_relative(relative_path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_save_creates_directories() {
        let dir = tempdir().unwrap();
        let store = FsMediaStore::new(dir.path());

        let saved = store
            .save("posters/poster_603.jpg", b"jpeg-bytes")
            .await
            .unwrap();

        assert_eq!(saved, "posters/poster_603.jpg");
        let written = std::fs::read(dir.path().join("posters/poster_603.jpg")).unwrap();
        assert_eq!(written, b"jpeg-bytes");
        assert!(!dir.path().join("posters/poster_603.jpg.part").exists());
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let dir = tempdir().unwrap();
        let store = FsMediaStore::new(dir.path());

        store.save("backdrops/b.jpg", b"old").await.unwrap();
        store.save("backdrops/b.jpg", b"new").await.unwrap();

        let written = std::fs::read(dir.path().join("backdrops/b.jpg")).unwrap();
        assert_eq!(written, b"new");
    }

    #[tokio::test]
    async fn test_save_rejects_escaping_path() {
        let dir = tempdir().unwrap();
        let store = FsMediaStore::new(dir.path());

        let result = store.save("../outside.jpg", b"x").await;
        assert!(matches!(result, Err(MediaError::InvalidPath(_))));
    }

    #[test]
    fn test_resolve() {
        let store = FsMediaStore::new("/srv/media");
        assert_eq!(
            store.resolve("videos/heat.mp4").unwrap(),
            PathBuf::from("/srv/media/videos/heat.mp4")
        );
    }
}
