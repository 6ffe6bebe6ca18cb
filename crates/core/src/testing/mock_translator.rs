//! Mock translator for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::translator::{TranslateError, Translator};

/// Mock implementation of the Translator trait.
///
/// Returns configured translations, the input text unchanged for anything
/// else, or always fails when built with [`MockTranslator::failing`].
#[derive(Debug)]
pub struct MockTranslator {
    /// Translations by (text, target).
    translations: Arc<RwLock<HashMap<(String, String), String>>>,
    /// Every (text, target) pair requested.
    calls: Arc<RwLock<Vec<(String, String)>>>,
    fail: bool,
}

impl Default for MockTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTranslator {
    /// Identity translator unless a mapping is configured.
    pub fn new() -> Self {
        Self {
            translations: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
            fail: false,
        }
    }

    /// Translator whose every call fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Configure a translation.
    pub async fn add(&self, text: &str, target: &str, translated: &str) {
        self.translations.write().await.insert(
            (text.to_string(), target.to_string()),
            translated.to_string(),
        );
    }

    /// Get all requested (text, target) pairs.
    pub async fn calls(&self) -> Vec<(String, String)> {
        self.calls.read().await.clone()
    }

    /// Get the number of translate calls.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn translate(&self, text: &str, target: &str) -> Result<String, TranslateError> {
        self.calls
            .write()
            .await
            .push((text.to_string(), target.to_string()));

        if self.fail {
            return Err(TranslateError::Http("mock translator offline".to_string()));
        }

        Ok(self
            .translations
            .read()
            .await
            .get(&(text.to_string(), target.to_string()))
            .cloned()
            .unwrap_or_else(|| text.to_string()))
    }
}
