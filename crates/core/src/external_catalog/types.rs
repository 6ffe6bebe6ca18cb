//! Types for external catalog API responses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Movie or TV series. Selects endpoints and field names on TMDB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Movie,
    Series,
}

impl ContentKind {
    /// TMDB path segment ("movie" / "tv").
    pub fn tmdb_segment(&self) -> &'static str {
        match self {
            ContentKind::Movie => "movie",
            ContentKind::Series => "tv",
        }
    }

    /// Field holding the display title.
    pub fn title_field(&self) -> &'static str {
        match self {
            ContentKind::Movie => "title",
            ContentKind::Series => "name",
        }
    }

    /// Field holding the title in the original language.
    pub fn original_title_field(&self) -> &'static str {
        match self {
            ContentKind::Movie => "original_title",
            ContentKind::Series => "original_name",
        }
    }

    /// Field holding the first release date.
    pub fn release_date_field(&self) -> &'static str {
        match self {
            ContentKind::Movie => "release_date",
            ContentKind::Series => "first_air_date",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Movie => "movie",
            ContentKind::Series => "series",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" | "movies" => Ok(ContentKind::Movie),
            "series" | "tv" => Ok(ContentKind::Series),
            other => Err(format!("unknown content kind: {}", other)),
        }
    }
}

/// One raw TMDB response object for a single locale.
///
/// Kept as loose JSON: every accessor degrades to `None`/empty on a missing
/// or mistyped key instead of failing the whole record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRecord(Value);

impl RawRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Whether the record is a JSON object at all.
    pub fn is_object(&self) -> bool {
        self.0.is_object()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Non-empty string field.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        non_empty_str(self.0.get(key))
    }

    /// String field or "".
    pub fn string_or_default(&self, key: &str) -> String {
        self.str_field(key).unwrap_or_default().to_string()
    }

    pub fn u64_field(&self, key: &str) -> Option<u64> {
        self.0.get(key).and_then(Value::as_u64)
    }

    pub fn f64_field(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    /// Array field, or an empty slice when missing/mistyped.
    pub fn array(&self, key: &str) -> &[Value] {
        array_of(self.0.get(key))
    }

    /// Array nested one level down, e.g. `credits.cast` or `videos.results`.
    pub fn nested_array(&self, outer: &str, inner: &str) -> &[Value] {
        array_of(self.0.get(outer).and_then(|o| o.get(inner)))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for RawRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Non-empty string at `value`.
pub fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Array at `value`, or an empty slice.
pub fn array_of(value: Option<&Value>) -> &[Value] {
    value
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Both locale variants of one TMDB record.
#[derive(Debug, Clone, PartialEq)]
pub struct MultilangBundle {
    pub kind: ContentKind,
    pub external_id: u32,
    /// Primary locale record (the most complete one).
    pub primary: RawRecord,
    /// Secondary locale record; `None` when TMDB had nothing or the call failed.
    pub secondary: Option<RawRecord>,
}

/// A single search hit from `search/movie` or `search/tv`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    /// TMDB ID.
    pub id: u32,
    /// Title (movies) or name (series).
    pub title: String,
    /// Release / first air date (YYYY-MM-DD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
}
