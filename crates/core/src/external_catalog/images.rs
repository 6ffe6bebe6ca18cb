//! Poster and backdrop downloads from the TMDB image CDN.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::tmdb::TmdbConfig;
use super::ExternalCatalogError;
use crate::metrics;

/// Downloads image bytes by the relative path the catalog returned.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Raw bytes, or `None` for an empty path or any failure.
    async fn download(&self, relative_path: &str) -> Option<Vec<u8>>;
}

/// Image fetcher against `{image_base_url}/original{path}`.
pub struct TmdbImageFetcher {
    client: Client,
    image_base_url: String,
}

impl TmdbImageFetcher {
    pub fn new(config: &TmdbConfig) -> Result<Self, ExternalCatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            image_base_url: config.image_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full-size image URL for a relative path.
    pub fn image_url(&self, relative_path: &str) -> String {
        let path = if relative_path.starts_with('/') {
            relative_path.to_string()
        } else {
            format!("/{}", relative_path)
        };
        format!("{}/original{}", self.image_base_url, path)
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ExternalCatalogError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExternalCatalogError::ApiError {
                status: status.as_u16(),
                message: format!("image download failed: {}", url),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl ImageFetcher for TmdbImageFetcher {
    async fn download(&self, relative_path: &str) -> Option<Vec<u8>> {
        if relative_path.is_empty() {
            return None;
        }

        let url = self.image_url(relative_path);
        debug!("Downloading image {}", url);

        let result = self.fetch_bytes(&url).await;
        metrics::record_external("image_cdn", "download", result.is_ok());

        match result {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!("Failed to download image {}: {}", url, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> TmdbImageFetcher {
        TmdbImageFetcher::new(&TmdbConfig::with_api_key("key")).unwrap()
    }

    #[test]
    fn test_image_url() {
        assert_eq!(
            fetcher().image_url("/abc.jpg"),
            "https://image.tmdb.org/t/p/original/abc.jpg"
        );
        assert_eq!(
            fetcher().image_url("abc.jpg"),
            "https://image.tmdb.org/t/p/original/abc.jpg"
        );
    }

    #[tokio::test]
    async fn test_empty_path_returns_none() {
        assert!(fetcher().download("").await.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_cdn_returns_none() {
        let mut config = TmdbConfig::with_api_key("key");
        config.image_base_url = "http://127.0.0.1:1/t/p".to_string();
        config.timeout_secs = 2;
        let fetcher = TmdbImageFetcher::new(&config).unwrap();

        assert!(fetcher.download("/poster.jpg").await.is_none());
    }
}
