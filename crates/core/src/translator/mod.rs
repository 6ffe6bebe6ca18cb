//! Machine translation of single strings.
//!
//! Translation is best-effort enrichment: callers go through
//! [`translate_or_original`] or [`try_translate`], which never fail.

mod google;

pub use google::GoogleTranslator;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::config::TranslatorConfig;
use crate::metrics;

/// Error type for translation calls.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

/// Trait for translation services. One call per string.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Service name for logs and metrics.
    fn name(&self) -> &str;

    /// Translate `text` into the language `target` ("az", "ru", ...).
    async fn translate(&self, text: &str, target: &str) -> Result<String, TranslateError>;
}

/// Translator that returns its input. Used when translation is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughTranslator;

#[async_trait]
impl Translator for PassthroughTranslator {
    fn name(&self) -> &str {
        "passthrough"
    }

    async fn translate(&self, text: &str, _target: &str) -> Result<String, TranslateError> {
        Ok(text.to_string())
    }
}

/// Build the translator selected by config.
pub fn create_translator(config: &TranslatorConfig) -> Result<Box<dyn Translator>, TranslateError> {
    if config.enabled {
        Ok(Box::new(GoogleTranslator::new(config)?))
    } else {
        Ok(Box::new(PassthroughTranslator))
    }
}

/// Translate, or hand back the original text.
///
/// Empty input is returned unchanged without calling the service.
pub async fn translate_or_original(translator: &dyn Translator, text: &str, target: &str) -> String {
    try_translate(translator, text, target)
        .await
        .unwrap_or_else(|| text.to_string())
}

/// Translate, yielding `None` for empty input, a failed call, or an empty
/// result.
pub async fn try_translate(translator: &dyn Translator, text: &str, target: &str) -> Option<String> {
    if text.is_empty() || target.is_empty() {
        return None;
    }

    match translator.translate(text, target).await {
        Ok(translated) => {
            metrics::TRANSLATIONS.with_label_values(&["success"]).inc();
            Some(translated).filter(|t| !t.is_empty())
        }
        Err(e) => {
            metrics::TRANSLATIONS.with_label_values(&["error"]).inc();
            warn!(
                translator = translator.name(),
                language = target,
                "Translation failed, keeping original: {}",
                e
            );
            None
        }
    }
}
