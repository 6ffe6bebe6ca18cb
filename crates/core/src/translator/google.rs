//! Google Translate client using the public `translate_a/single` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{TranslateError, Translator};
use crate::config::TranslatorConfig;
use crate::metrics;

/// Google Translate client. Source language is auto-detected.
pub struct GoogleTranslator {
    client: reqwest::Client,
    api_base: String,
}

impl GoogleTranslator {
    pub fn new(config: &TranslatorConfig) -> Result<Self, TranslateError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| TranslateError::Http(e.to_string()))?;

        Ok(Self {
            client,
            api_base: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn request(&self, text: &str, target: &str) -> Result<String, TranslateError> {
        let response = self
            .client
            .get(format!("{}/translate_a/single", self.api_base))
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| TranslateError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let message = response.text().await.unwrap_or_default();
            return Err(TranslateError::Api { status, message });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TranslateError::InvalidResponse(e.to_string()))?;

        parse_translation(&body)
    }
}

/// Join the translated segments of a `translate_a/single` response.
///
/// The body is `[[["translated", "original", ...], ...], ...]`, one inner
/// array per sentence.
fn parse_translation(body: &Value) -> Result<String, TranslateError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslateError::InvalidResponse("missing sentence list".to_string()))?;

    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if text.is_empty() {
        return Err(TranslateError::InvalidResponse(
            "empty translation".to_string(),
        ));
    }

    Ok(text)
}

#[async_trait]
impl Translator for GoogleTranslator {
    fn name(&self) -> &str {
        "google"
    }

    async fn translate(&self, text: &str, target: &str) -> Result<String, TranslateError> {
        debug!("Translating {} chars into '{}'", text.len(), target);
        let result = self.request(text, target).await;
        metrics::record_external("translate", "translate", result.is_ok());
        result
    }
}
