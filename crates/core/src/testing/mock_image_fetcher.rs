//! Mock image fetcher for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::external_catalog::ImageFetcher;

/// Mock implementation of the ImageFetcher trait.
///
/// Any non-empty path downloads as `image:{path}` unless marked failing.
#[derive(Debug, Default)]
pub struct MockImageFetcher {
    failing: Arc<RwLock<HashSet<String>>>,
    downloads: Arc<RwLock<Vec<String>>>,
}

impl MockImageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make downloads of this path fail.
    pub async fn fail_path(&self, path: &str) {
        self.failing.write().await.insert(path.to_string());
    }

    /// Paths requested so far, failed ones included.
    pub async fn downloads(&self) -> Vec<String> {
        self.downloads.read().await.clone()
    }
}

#[async_trait]
impl ImageFetcher for MockImageFetcher {
    async fn download(&self, relative_path: &str) -> Option<Vec<u8>> {
        if relative_path.is_empty() {
            return None;
        }
        self.downloads.write().await.push(relative_path.to_string());

        if self.failing.read().await.contains(relative_path) {
            return None;
        }
        Some(format!("image:{}", relative_path).into_bytes())
    }
}
