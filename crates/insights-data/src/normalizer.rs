//! Raw-to-clean record normalization.
//!
//! Collapses duplicate rows, resolves `date_added`, drops rows without a
//! usable date and fills missing categoricals with the `"Unknown"`
//! sentinel. Every step is total: malformed input is absorbed, never raised.

use std::collections::HashSet;

use chrono::Datelike;
use insights_core::data_processors::DateProcessor;
use insights_core::models::{CleanRecord, ContentType, RawRecord, UNKNOWN};
use tracing::{debug, warn};

/// Clean records plus the counts the boundary layer reports.
#[derive(Debug, Clone, Default)]
pub struct NormalizeOutcome {
    /// Surviving records, in source order.
    pub records: Vec<CleanRecord>,
    /// Rows removed because `date_added` could not be resolved.
    pub dropped_count: usize,
    /// Exact duplicate rows collapsed before cleaning.
    pub duplicates_removed: usize,
    /// Rows handed to the normalizer.
    pub raw_count: usize,
}

impl NormalizeOutcome {
    /// Row count after duplicate removal; always
    /// `records.len() + dropped_count`.
    pub fn deduplicated_count(&self) -> usize {
        self.raw_count - self.duplicates_removed
    }
}

/// Stateless raw → clean transformation.
pub struct Normalizer;

impl Normalizer {
    /// Run the full normalization pipeline over `raw`.
    pub fn normalize(raw: impl IntoIterator<Item = RawRecord>) -> NormalizeOutcome {
        let raw: Vec<RawRecord> = raw.into_iter().collect();
        let raw_count = raw.len();

        let unique = Self::deduplicate(raw);
        let duplicates_removed = raw_count - unique.len();

        let mut records = Vec::with_capacity(unique.len());
        let mut dropped_count = 0usize;
        for row in unique {
            match Self::clean_record(row) {
                Some(record) => records.push(record),
                None => dropped_count += 1,
            }
        }

        if dropped_count > 0 {
            warn!(
                "{} rows have invalid or missing 'date_added' values and were dropped",
                dropped_count
            );
        }
        debug!(
            "Normalized {} rows: {} duplicates, {} dropped, {} kept",
            raw_count,
            duplicates_removed,
            dropped_count,
            records.len()
        );

        NormalizeOutcome {
            records,
            dropped_count,
            duplicates_removed,
            raw_count,
        }
    }

    /// Remove rows identical across all fields, keeping the first
    /// occurrence and the source order.
    pub fn deduplicate(raw: Vec<RawRecord>) -> Vec<RawRecord> {
        let mut seen: HashSet<&RawRecord> = HashSet::with_capacity(raw.len());
        let keep: Vec<bool> = raw.iter().map(|row| seen.insert(row)).collect();
        drop(seen);

        raw.into_iter()
            .zip(keep)
            .filter_map(|(row, first)| first.then_some(row))
            .collect()
    }

    /// Clean a single deduplicated row; `None` when it has no usable date.
    fn clean_record(raw: RawRecord) -> Option<CleanRecord> {
        let date_added = DateProcessor::parse(raw.date_added.as_deref())?;

        Some(CleanRecord {
            content_type: ContentType::from_raw(raw.content_type.as_deref()),
            year_added: date_added.year(),
            month_added: date_added.month(),
            date_added,
            country: fill_unknown(raw.country),
            rating: fill_unknown(raw.rating),
            duration: fill_unknown(raw.duration),
            listed_in: raw.listed_in,
            extra: raw.extra,
        })
    }
}

/// Replace an absent or blank categorical with the `"Unknown"` sentinel.
fn fill_unknown(value: Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => UNKNOWN.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw(content_type: &str, date: Option<&str>, country: Option<&str>) -> RawRecord {
        RawRecord {
            content_type: Some(content_type.to_string()),
            date_added: date.map(str::to_string),
            country: country.map(str::to_string),
            rating: Some("TV-MA".to_string()),
            duration: Some("90 min".to_string()),
            listed_in: Some("Dramas".to_string()),
            extra: vec![],
        }
    }

    // ── scenario ──────────────────────────────────────────────────────────────

    #[test]
    fn test_normalize_drops_undated_and_fills_unknown() {
        let rows = vec![
            RawRecord {
                content_type: Some("Movie".to_string()),
                date_added: Some("September 9, 2019".to_string()),
                country: Some(String::new()),
                rating: Some("PG".to_string()),
                duration: Some("90 min".to_string()),
                listed_in: Some("Comedies, Dramas".to_string()),
                extra: vec![],
            },
            RawRecord {
                content_type: Some("Movie".to_string()),
                date_added: Some("not a date".to_string()),
                country: Some("US".to_string()),
                rating: Some("PG".to_string()),
                duration: Some("Unknown".to_string()),
                listed_in: Some("Dramas".to_string()),
                extra: vec![],
            },
        ];

        let outcome = Normalizer::normalize(rows);

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.dropped_count, 1);
        let first = &outcome.records[0];
        assert_eq!(first.country, UNKNOWN);
        assert_eq!(first.year_added, 2019);
        assert_eq!(first.month_added, 9);
        assert_eq!(first.date_added, NaiveDate::from_ymd_opt(2019, 9, 9).unwrap());
    }

    // ── deduplication ─────────────────────────────────────────────────────────

    #[test]
    fn test_deduplicate_keeps_first_in_order() {
        let a = raw("Movie", Some("May 1, 2020"), Some("US"));
        let b = raw("TV Show", Some("May 2, 2020"), Some("IN"));
        let rows = vec![a.clone(), b.clone(), a.clone(), b.clone(), a.clone()];

        let unique = Normalizer::deduplicate(rows);
        assert_eq!(unique, vec![a, b]);
    }

    #[test]
    fn test_deduplicate_compares_extra_columns() {
        let mut a = raw("Movie", Some("May 1, 2020"), Some("US"));
        let mut b = a.clone();
        a.extra = vec![("title".to_string(), "First".to_string())];
        b.extra = vec![("title".to_string(), "Second".to_string())];

        let outcome = Normalizer::normalize(vec![a, b]);
        assert_eq!(outcome.duplicates_removed, 0);
        assert_eq!(outcome.records.len(), 2);
    }

    #[test]
    fn test_duplicates_counted_before_dropping() {
        let undated = raw("Movie", None, Some("US"));
        let dated = raw("Movie", Some("May 1, 2020"), Some("US"));
        let outcome = Normalizer::normalize(vec![undated.clone(), undated, dated]);

        assert_eq!(outcome.raw_count, 3);
        assert_eq!(outcome.duplicates_removed, 1);
        assert_eq!(outcome.dropped_count, 1);
        assert_eq!(outcome.records.len(), 1);
    }

    // ── properties ────────────────────────────────────────────────────────────

    #[test]
    fn test_clean_plus_dropped_equals_deduplicated() {
        let rows = vec![
            raw("Movie", Some("January 1, 2018"), Some("US")),
            raw("Movie", Some("January 1, 2018"), Some("US")),
            raw("Movie", Some(""), Some("US")),
            raw("TV Show", Some("   "), None),
            raw("TV Show", Some("2021-03-04"), None),
            raw("Movie", Some("garbage"), Some("IN")),
        ];
        let outcome = Normalizer::normalize(rows);

        assert_eq!(
            outcome.records.len() + outcome.dropped_count,
            outcome.deduplicated_count()
        );
        assert_eq!(outcome.deduplicated_count(), 5);
        assert_eq!(outcome.dropped_count, 3);
    }

    #[test]
    fn test_every_clean_record_has_consistent_date_fields() {
        let rows = vec![
            raw("Movie", Some("December 31, 2015"), Some("US")),
            raw("TV Show", Some("2020/02/29"), Some("JP")),
        ];
        let outcome = Normalizer::normalize(rows);

        for r in &outcome.records {
            assert_eq!(r.year_added, r.date_added.year());
            assert_eq!(r.month_added, r.date_added.month());
        }
    }

    #[test]
    fn test_order_preserved() {
        let rows = vec![
            raw("Movie", Some("May 3, 2020"), Some("C")),
            raw("Movie", None, Some("X")),
            raw("Movie", Some("May 1, 2020"), Some("A")),
            raw("Movie", Some("May 2, 2020"), Some("B")),
        ];
        let outcome = Normalizer::normalize(rows);
        let countries: Vec<&str> = outcome.records.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(countries, vec!["C", "A", "B"]);
    }

    // ── categorical fill ──────────────────────────────────────────────────────

    #[test]
    fn test_missing_categoricals_become_unknown() {
        let row = RawRecord {
            content_type: None,
            date_added: Some("March 1, 2021".to_string()),
            country: None,
            rating: Some("  ".to_string()),
            duration: None,
            listed_in: None,
            extra: vec![],
        };
        let outcome = Normalizer::normalize(vec![row]);
        let r = &outcome.records[0];

        assert_eq!(r.content_type, ContentType::Unknown);
        assert_eq!(r.country, UNKNOWN);
        assert_eq!(r.rating, UNKNOWN);
        assert_eq!(r.duration, UNKNOWN);
        assert!(r.listed_in.is_none());
    }

    #[test]
    fn test_present_categoricals_kept_verbatim() {
        let outcome = Normalizer::normalize(vec![raw(
            "Movie",
            Some("March 1, 2021"),
            Some("United States, India"),
        )]);
        assert_eq!(outcome.records[0].country, "United States, India");
    }

    #[test]
    fn test_unrecognised_type_labels_kept_verbatim() {
        let rows = vec![
            raw("movie", Some("March 1, 2021"), Some("US")),
            raw("TV", Some("March 2, 2021"), Some("US")),
            raw("Unknown", Some("March 3, 2021"), Some("US")),
            raw("TV Show", Some("March 4, 2021"), Some("US")),
        ];
        let outcome = Normalizer::normalize(rows);
        let types: Vec<&ContentType> = outcome.records.iter().map(|r| &r.content_type).collect();

        assert_eq!(
            types,
            vec![
                &ContentType::Other("movie".to_string()),
                &ContentType::Other("TV".to_string()),
                &ContentType::Other("Unknown".to_string()),
                &ContentType::TvShow,
            ]
        );
    }

    #[test]
    fn test_far_future_date_kept() {
        let outcome = Normalizer::normalize(vec![raw("Movie", Some("July 4, 2999"), Some("US"))]);
        assert_eq!(outcome.dropped_count, 0);
        assert_eq!(outcome.records[0].year_added, 2999);
    }

    #[test]
    fn test_normalize_empty_input() {
        let outcome = Normalizer::normalize(Vec::<RawRecord>::new());
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.dropped_count, 0);
        assert_eq!(outcome.raw_count, 0);
    }
}
