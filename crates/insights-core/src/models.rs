use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Fallback category substituted for missing `country`, `rating`,
/// `duration` and `type` values. Groups and filters like any other value.
pub const UNKNOWN: &str = "Unknown";

/// Source columns the pipeline reads. A source missing any of them is
/// rejected before normalization.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "type",
    "date_added",
    "country",
    "rating",
    "duration",
    "listed_in",
];

/// Columns appended to every clean record during normalization.
pub const DERIVED_COLUMNS: [&str; 2] = ["year_added", "month_added"];

// ── ContentType ───────────────────────────────────────────────────────────────

/// Category of a catalog title.
///
/// Ordering is `Movie < TvShow < Unknown < Other`, which matches the
/// lexicographic order of the labels the source uses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ContentType {
    Movie,
    TvShow,
    /// The row had no type at all.
    Unknown,
    /// Any other label, kept verbatim.
    Other(String),
}

impl ContentType {
    /// Classify a raw `type` cell. Only the exact labels `"Movie"` and
    /// `"TV Show"` are recognised; absent or blank text maps to
    /// [`ContentType::Unknown`] and anything else is kept verbatim.
    pub fn from_raw(value: Option<&str>) -> Self {
        match value {
            None => ContentType::Unknown,
            Some(v) if v.trim().is_empty() => ContentType::Unknown,
            Some("Movie") => ContentType::Movie,
            Some("TV Show") => ContentType::TvShow,
            Some(other) => ContentType::Other(other.to_string()),
        }
    }

    /// Lenient parse of a user-typed selection: case-insensitive, and
    /// `"tv"` is accepted as a shorthand for `"TV Show"`.
    pub fn parse_selection(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "movie" => ContentType::Movie,
            "tv show" | "tv" => ContentType::TvShow,
            "unknown" => ContentType::Unknown,
            _ => ContentType::Other(trimmed.to_string()),
        }
    }

    /// Label as it appears in the source data.
    pub fn label(&self) -> &str {
        match self {
            ContentType::Movie => "Movie",
            ContentType::TvShow => "TV Show",
            ContentType::Unknown => UNKNOWN,
            ContentType::Other(label) => label,
        }
    }
}

/// Inverse of [`ContentType::label`], used when deserializing.
impl From<String> for ContentType {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Movie" => ContentType::Movie,
            "TV Show" => ContentType::TvShow,
            UNKNOWN => ContentType::Unknown,
            _ => ContentType::Other(label),
        }
    }
}

impl From<ContentType> for String {
    fn from(content_type: ContentType) -> Self {
        content_type.label().to_string()
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── RawRecord ─────────────────────────────────────────────────────────────────

/// One catalog row as read from the source.
///
/// Empty cells are `None`. Columns the pipeline does not interpret are kept
/// in `extra`, in source order, so that duplicate detection sees every field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub date_added: Option<String>,
    pub country: Option<String>,
    pub rating: Option<String>,
    pub duration: Option<String>,
    pub listed_in: Option<String>,
    #[serde(default)]
    pub extra: Vec<(String, String)>,
}

// ── CleanRecord ───────────────────────────────────────────────────────────────

/// A normalized catalog row. Always dated; categoricals are never absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanRecord {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub date_added: NaiveDate,
    pub year_added: i32,
    pub month_added: u32,
    pub country: String,
    pub rating: String,
    pub duration: String,
    /// Comma-separated genre tags, split only at aggregation time.
    pub listed_in: Option<String>,
    #[serde(default)]
    pub extra: Vec<(String, String)>,
}

impl CleanRecord {
    /// Individual genre tokens: split on commas, trimmed, blanks skipped.
    pub fn genres(&self) -> impl Iterator<Item = &str> {
        self.listed_in
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}

// ── FilterSpec ────────────────────────────────────────────────────────────────

/// Per-query selection applied before aggregation.
///
/// Empty `types` or `countries` select nothing; they are not wildcards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Inclusive lower bound on `year_added`.
    pub year_from: i32,
    /// Inclusive upper bound on `year_added`.
    pub year_to: i32,
    pub types: BTreeSet<ContentType>,
    pub countries: BTreeSet<String>,
}

impl FilterSpec {
    pub fn new<T, C, S>(year_range: (i32, i32), types: T, countries: C) -> Self
    where
        T: IntoIterator<Item = ContentType>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            year_from: year_range.0,
            year_to: year_range.1,
            types: types.into_iter().collect(),
            countries: countries.into_iter().map(Into::into).collect(),
        }
    }

    /// `true` when `record` passes all three predicates.
    pub fn matches(&self, record: &CleanRecord) -> bool {
        (self.year_from..=self.year_to).contains(&record.year_added)
            && self.types.contains(&record.content_type)
            && self.countries.contains(&record.country)
    }
}

// ── SummaryTable ──────────────────────────────────────────────────────────────

/// One `(key, count)` row of a summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryEntry<K> {
    pub key: K,
    pub count: usize,
}

/// Ordered key → count result of an aggregation, ready for a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SummaryTable<K> {
    pub entries: Vec<SummaryEntry<K>>,
}

impl<K> Default for SummaryTable<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K> SummaryTable<K> {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (K, usize)>) -> Self {
        Self {
            entries: pairs
                .into_iter()
                .map(|(key, count)| SummaryEntry { key, count })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts in the table.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SummaryEntry<K>> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|e| &e.key)
    }

    pub fn truncate(&mut self, n: usize) {
        self.entries.truncate(n);
    }
}

impl<K: PartialEq> SummaryTable<K> {
    /// Count recorded for `key`, if present.
    pub fn get(&self, key: &K) -> Option<usize> {
        self.entries.iter().find(|e| &e.key == key).map(|e| e.count)
    }
}

/// Key of the added-over-time trend table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrendKey {
    pub year: i32,
    #[serde(rename = "type")]
    pub content_type: ContentType,
}

impl fmt::Display for TrendKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.year, self.content_type)
    }
}

/// Equal-width histogram bucket over `[start, end)`; the last bucket of a
/// histogram also includes `end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
