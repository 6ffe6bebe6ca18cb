use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::external_catalog::TmdbConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub translator: TranslatorConfig,
    #[serde(default)]
    pub locales: LocaleConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("cinevault.db")
}

/// Where downloaded posters/backdrops and uploaded videos live.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaConfig {
    #[serde(default = "default_media_root")]
    pub root: PathBuf,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: default_media_root(),
        }
    }
}

fn default_media_root() -> PathBuf {
    PathBuf::from("media")
}

/// Machine translation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranslatorConfig {
    /// When disabled, strings are passed through untranslated.
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_translator_url")]
    pub base_url: String,
    #[serde(default = "default_translator_timeout")]
    pub timeout_secs: u32,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_translator_url(),
            timeout_secs: default_translator_timeout(),
        }
    }
}

fn default_translator_timeout() -> u32 {
    15
}

fn default_true() -> bool {
    true
}

fn default_translator_url() -> String {
    "https://translate.googleapis.com".to_string()
}

/// Locale pair used for ingestion.
///
/// The primary locale is the most complete one on TMDB and is the source of
/// truth; the secondary locale is the one the site displays.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct LocaleConfig {
    #[serde(default = "default_primary_locale")]
    pub primary: String,
    #[serde(default = "default_secondary_locale")]
    pub secondary: String,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            primary: default_primary_locale(),
            secondary: default_secondary_locale(),
        }
    }
}

impl LocaleConfig {
    /// Two-letter language code of the secondary locale ("az-AZ" -> "az").
    pub fn secondary_language(&self) -> &str {
        language_code(&self.secondary)
    }

    /// Two-letter language code of the primary locale.
    pub fn primary_language(&self) -> &str {
        language_code(&self.primary)
    }
}

fn language_code(locale: &str) -> &str {
    locale.split(['-', '_']).next().unwrap_or(locale)
}

fn default_primary_locale() -> String {
    "en-US".to_string()
}

fn default_secondary_locale() -> String {
    "az-AZ".to_string()
}

/// Ingestion tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestConfig {
    /// Number of billed cast members kept per title.
    #[serde(default = "default_max_cast")]
    pub max_cast: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_cast: default_max_cast(),
        }
    }
}

fn default_max_cast() -> usize {
    15
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub media: MediaConfig,
    pub tmdb: SanitizedTmdbConfig,
    pub translator: TranslatorConfig,
    pub locales: LocaleConfig,
    pub ingest: IngestConfig,
}

/// Sanitized TMDB config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTmdbConfig {
    pub base_url: String,
    pub image_base_url: String,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            media: config.media.clone(),
            tmdb: SanitizedTmdbConfig {
                base_url: config.tmdb.base_url.clone(),
                image_base_url: config.tmdb.image_base_url.clone(),
                api_key_configured: !config.tmdb.api_key.is_empty(),
                timeout_secs: config.tmdb.timeout_secs,
            },
            translator: config.translator.clone(),
            locales: config.locales.clone(),
            ingest: config.ingest.clone(),
        }
    }
}
