//! Ordered resolution of a localized text field.

use serde_json::Value;

use crate::external_catalog::{non_empty_str, RawRecord};
use crate::translator::{try_translate, Translator};

/// One way of obtaining the secondary-locale value of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStep {
    /// The primary record's embedded `translations` entry for the language.
    Embedded,
    /// Machine translation of the primary value.
    Translated,
    /// The secondary-locale record's own value.
    Secondary,
    /// The primary value as-is.
    Fallback,
}

/// Steps for a content record's title and description.
pub const CONTENT_STEPS: &[ResolutionStep] = &[
    ResolutionStep::Embedded,
    ResolutionStep::Translated,
    ResolutionStep::Secondary,
    ResolutionStep::Fallback,
];

/// Steps for season and episode text, which has no embedded translations.
pub const NESTED_STEPS: &[ResolutionStep] = &[ResolutionStep::Translated, ResolutionStep::Fallback];

/// Candidate values of one field.
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldSources<'a> {
    pub primary: &'a str,
    pub embedded: Option<&'a str>,
    pub secondary: Option<&'a str>,
}

/// Run `steps` in order and return the first non-empty value, or "".
pub async fn resolve_field(
    steps: &[ResolutionStep],
    sources: FieldSources<'_>,
    translator: &dyn Translator,
    language: &str,
) -> String {
    for step in steps {
        let value = match step {
            ResolutionStep::Embedded => sources.embedded.map(str::to_string),
            ResolutionStep::Translated => try_translate(translator, sources.primary, language).await,
            ResolutionStep::Secondary => sources.secondary.map(str::to_string),
            ResolutionStep::Fallback => Some(sources.primary.to_string()),
        };

        if let Some(value) = value.filter(|v| !v.is_empty()) {
            return value;
        }
    }

    String::new()
}

/// The `data` object of the first embedded translation for `language`.
pub fn embedded_translation<'a>(record: &'a RawRecord, language: &str) -> Option<&'a Value> {
    record
        .nested_array("translations", "translations")
        .iter()
        .find(|t| t.get("iso_639_1").and_then(Value::as_str) == Some(language))
        .and_then(|t| t.get("data"))
}

/// Non-empty string `key` of an embedded translation.
pub fn embedded_field<'a>(data: Option<&'a Value>, key: &str) -> Option<&'a str> {
    non_empty_str(data.and_then(|d| d.get(key)))
}

/// Names from a list of `{ "name": ... }` objects, skipping blanks.
pub fn names(values: &[Value]) -> Vec<&str> {
    values
        .iter()
        .filter_map(|v| non_empty_str(v.get("name")))
        .collect()
}
