//! Filtering and chart-ready aggregation over clean catalog records.
//!
//! Every function here is pure: it borrows the records, never mutates them,
//! and returns an empty table for an empty input.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;

use insights_core::data_processors::DurationParser;
use insights_core::error::Result;
use insights_core::models::{
    CleanRecord, ContentType, FilterSpec, HistogramBucket, SummaryTable, TrendKey,
};
use serde::{Deserialize, Serialize};

/// Rows kept in the TV-show season table.
pub const SEASON_TABLE_LIMIT: usize = 10;

// ── TypeTotals ────────────────────────────────────────────────────────────────

/// Headline figures for a filtered record set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeTotals {
    pub total_titles: usize,
    pub movies: usize,
    pub tv_shows: usize,
    /// Distinct `country` values, `"Unknown"` included.
    pub countries: usize,
}

// ── CatalogAggregator ─────────────────────────────────────────────────────────

/// Stateless helper that filters and groups clean catalog records.
pub struct CatalogAggregator;

impl CatalogAggregator {
    /// Keep the records matching `spec`, in input order.
    ///
    /// An empty `types` or `countries` selection yields an empty result.
    /// Filtering an already-filtered set with the same spec is a no-op.
    pub fn filter<'a, I>(records: I, spec: &FilterSpec) -> Vec<&'a CleanRecord>
    where
        I: IntoIterator<Item = &'a CleanRecord>,
    {
        records.into_iter().filter(|r| spec.matches(r)).collect()
    }

    /// Title counts per content type, most frequent first.
    pub fn count_by_type<'a>(
        records: impl IntoIterator<Item = &'a CleanRecord>,
    ) -> SummaryTable<ContentType> {
        value_counts(records.into_iter().map(|r| r.content_type.clone()))
    }

    /// Title counts per `(year_added, type)`, ascending by year then type.
    ///
    /// Sparse: a year with no titles of a type has no entry for it.
    pub fn trend_by_year_and_type<'a>(
        records: impl IntoIterator<Item = &'a CleanRecord>,
    ) -> SummaryTable<TrendKey> {
        let mut map: BTreeMap<TrendKey, usize> = BTreeMap::new();
        for r in records {
            let key = TrendKey {
                year: r.year_added,
                content_type: r.content_type.clone(),
            };
            *map.entry(key).or_default() += 1;
        }
        SummaryTable::from_pairs(map)
    }

    /// The `n` most frequent countries; ties keep first-seen order.
    pub fn top_countries<'a>(
        records: impl IntoIterator<Item = &'a CleanRecord>,
        n: usize,
    ) -> SummaryTable<String> {
        let mut table = value_counts(records.into_iter().map(|r| r.country.clone()));
        table.truncate(n);
        table
    }

    /// Title counts for every rating, most frequent first.
    pub fn rating_distribution<'a>(
        records: impl IntoIterator<Item = &'a CleanRecord>,
    ) -> SummaryTable<String> {
        value_counts(records.into_iter().map(|r| r.rating.clone()))
    }

    /// The `n` most frequent genre tags.
    ///
    /// Each comma-separated token of `listed_in` is one observation, so a
    /// title listed under three genres counts once in each.
    pub fn top_genres<'a>(
        records: impl IntoIterator<Item = &'a CleanRecord>,
        n: usize,
    ) -> SummaryTable<String> {
        let mut table = value_counts(
            records
                .into_iter()
                .flat_map(|r| r.genres())
                .map(str::to_string),
        );
        table.truncate(n);
        table
    }

    /// Space-joined genre tokens of the records, for word-cloud rendering.
    pub fn genre_corpus<'a>(records: impl IntoIterator<Item = &'a CleanRecord>) -> String {
        records
            .into_iter()
            .flat_map(|r| r.genres())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Minutes of every movie in `records`, in order.
    ///
    /// `"Unknown"` counts as `0`. Any other value that is not `"<N> min"`
    /// fails the whole call.
    pub fn duration_minutes<'a>(
        records: impl IntoIterator<Item = &'a CleanRecord>,
    ) -> Result<Vec<u32>> {
        records
            .into_iter()
            .filter(|r| r.content_type == ContentType::Movie)
            .map(|r| DurationParser::movie(&r.duration).map(|d| d.magnitude()))
            .collect()
    }

    /// TV shows per season count, most frequent first, top
    /// [`SEASON_TABLE_LIMIT`]. `"Unknown"` counts as zero seasons.
    pub fn season_counts<'a>(
        records: impl IntoIterator<Item = &'a CleanRecord>,
    ) -> Result<SummaryTable<u32>> {
        let seasons = records
            .into_iter()
            .filter(|r| r.content_type == ContentType::TvShow)
            .map(|r| DurationParser::tv_show(&r.duration).map(|d| d.magnitude()))
            .collect::<Result<Vec<u32>>>()?;

        let mut table = value_counts(seasons);
        table.truncate(SEASON_TABLE_LIMIT);
        Ok(table)
    }

    /// Headline totals: all titles, movies, TV shows and distinct countries.
    pub fn type_totals<'a>(records: impl IntoIterator<Item = &'a CleanRecord>) -> TypeTotals {
        let mut totals = TypeTotals::default();
        let mut countries: HashSet<&str> = HashSet::new();
        for r in records {
            totals.total_titles += 1;
            match r.content_type {
                ContentType::Movie => totals.movies += 1,
                ContentType::TvShow => totals.tv_shows += 1,
                _ => {}
            }
            countries.insert(r.country.as_str());
        }
        totals.countries = countries.len();
        totals
    }

    /// Split `values` into `bins` equal-width buckets spanning
    /// `[min, max]`. The last bucket is closed on the right.
    ///
    /// When every value is equal a single bucket holds them all.
    pub fn minutes_histogram(values: &[u32], bins: usize) -> Vec<HistogramBucket> {
        let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) else {
            return Vec::new();
        };
        if bins == 0 {
            return Vec::new();
        }
        if min == max {
            return vec![HistogramBucket {
                start: f64::from(min),
                end: f64::from(max),
                count: values.len(),
            }];
        }

        let start = f64::from(min);
        let width = (f64::from(max) - start) / bins as f64;
        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = ((f64::from(v) - start) / width).floor() as usize;
            counts[idx.min(bins - 1)] += 1;
        }

        counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBucket {
                start: start + width * i as f64,
                end: start + width * (i + 1) as f64,
                count,
            })
            .collect()
    }
}

// ── Private ───────────────────────────────────────────────────────────────────

/// Count occurrences of each key, most frequent first; equal counts keep
/// the order in which keys were first seen.
fn value_counts<K, I>(keys: I) -> SummaryTable<K>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();

    for key in keys {
        match index.get(&key) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }

    // Stable sort keeps first-seen order within equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    SummaryTable::from_pairs(counts)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
