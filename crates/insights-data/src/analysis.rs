//! Catalog pipeline entry points.
//!
//! [`load_catalog`] reads and normalizes a full source into a
//! [`CatalogSnapshot`]; [`build_dashboard`] filters a snapshot and runs every
//! aggregation, returning a [`Dashboard`] ready for a renderer.

use chrono::Utc;
use insights_core::error::Result;
use insights_core::formatting::{format_count, render_counts, render_histogram, render_table};
use insights_core::models::{
    CleanRecord, ContentType, FilterSpec, HistogramBucket, SummaryTable, TrendKey,
    DERIVED_COLUMNS, REQUIRED_COLUMNS,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::aggregator::{CatalogAggregator, TypeTotals};
use crate::normalizer::Normalizer;
use crate::reader::RecordSource;

// ── CatalogSnapshot ───────────────────────────────────────────────────────────

/// Load diagnostics kept alongside the clean records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// ISO-8601 timestamp when the snapshot was built.
    pub loaded_at: String,
    /// Description of the source the rows came from.
    pub source: String,
    pub raw_rows: usize,
    pub duplicates_removed: usize,
    /// Rows removed because `date_added` could not be resolved.
    pub dropped_rows: usize,
    pub clean_rows: usize,
    /// Wall-clock seconds spent reading the source.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent normalizing.
    pub normalize_time_seconds: f64,
}

/// The normalized dataset, computed once and shared read-only.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub records: Vec<CleanRecord>,
    /// Column names of the clean dataset: core, carried-through, derived.
    pub columns: Vec<String>,
    pub metadata: SnapshotMetadata,
}

impl CatalogSnapshot {
    /// `(rows, columns)` of the clean dataset.
    pub fn shape(&self) -> (usize, usize) {
        (self.records.len(), self.columns.len())
    }

    pub fn dropped_count(&self) -> usize {
        self.metadata.dropped_rows
    }
}

/// Read every row of `source` and normalize it into a snapshot.
pub fn load_catalog(source: &dyn RecordSource) -> Result<CatalogSnapshot> {
    let description = source.describe();

    let load_start = std::time::Instant::now();
    let raw = source.read_records()?;
    let load_time = load_start.elapsed().as_secs_f64();

    let mut columns: Vec<String> = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
    if let Some(first) = raw.first() {
        columns.extend(first.extra.iter().map(|(name, _)| name.clone()));
    }
    columns.extend(DERIVED_COLUMNS.iter().map(|c| c.to_string()));

    let normalize_start = std::time::Instant::now();
    let outcome = Normalizer::normalize(raw);
    let normalize_time = normalize_start.elapsed().as_secs_f64();

    let metadata = SnapshotMetadata {
        loaded_at: Utc::now().to_rfc3339(),
        source: description,
        raw_rows: outcome.raw_count,
        duplicates_removed: outcome.duplicates_removed,
        dropped_rows: outcome.dropped_count,
        clean_rows: outcome.records.len(),
        load_time_seconds: load_time,
        normalize_time_seconds: normalize_time,
    };
    info!(
        "Loaded {} clean titles from {} in {:.3}s",
        metadata.clean_rows,
        metadata.source,
        load_time + normalize_time
    );

    Ok(CatalogSnapshot {
        records: outcome.records,
        columns,
        metadata,
    })
}

// ── Dashboard ─────────────────────────────────────────────────────────────────

/// Table sizes for [`build_dashboard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardOptions {
    pub top_countries: usize,
    pub top_genres: usize,
    pub histogram_bins: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            top_countries: 10,
            top_genres: 15,
            histogram_bins: 30,
        }
    }
}

/// Every summary of one filtered view of the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub filter: FilterSpec,
    /// `(rows, columns)` of the unfiltered clean dataset.
    pub dataset_shape: (usize, usize),
    /// Set when undated rows were excluded from the dataset.
    pub warning: Option<String>,
    pub totals: TypeTotals,
    pub type_distribution: SummaryTable<ContentType>,
    pub trend: SummaryTable<TrendKey>,
    pub top_countries: SummaryTable<String>,
    pub ratings: SummaryTable<String>,
    pub top_genres: SummaryTable<String>,
    pub genre_corpus: String,
    pub movie_minutes: Vec<HistogramBucket>,
    pub season_counts: SummaryTable<u32>,
}

/// Data-quality notice for `dropped` undated rows; `None` when nothing was
/// dropped.
pub fn missing_dates_warning(dropped: usize) -> Option<String> {
    (dropped > 0).then(|| {
        format!(
            "{} rows have invalid or missing 'date_added' values. They were skipped in time-based analysis.",
            dropped
        )
    })
}

/// Filter `snapshot` with `spec` and compute every summary.
///
/// Fails only when a duration value has an unexpected shape.
pub fn build_dashboard(
    snapshot: &CatalogSnapshot,
    spec: &FilterSpec,
    options: &DashboardOptions,
) -> Result<Dashboard> {
    let filtered = CatalogAggregator::filter(&snapshot.records, spec);
    debug!(
        "Filter kept {} of {} titles",
        filtered.len(),
        snapshot.records.len()
    );
    let view = || filtered.iter().copied();

    let minutes = CatalogAggregator::duration_minutes(view())?;
    let season_counts = CatalogAggregator::season_counts(view())?;

    Ok(Dashboard {
        filter: spec.clone(),
        dataset_shape: snapshot.shape(),
        warning: missing_dates_warning(snapshot.dropped_count()),
        totals: CatalogAggregator::type_totals(view()),
        type_distribution: CatalogAggregator::count_by_type(view()),
        trend: CatalogAggregator::trend_by_year_and_type(view()),
        top_countries: CatalogAggregator::top_countries(view(), options.top_countries),
        ratings: CatalogAggregator::rating_distribution(view()),
        top_genres: CatalogAggregator::top_genres(view(), options.top_genres),
        genre_corpus: CatalogAggregator::genre_corpus(view()),
        movie_minutes: CatalogAggregator::minutes_histogram(&minutes, options.histogram_bins),
        season_counts,
    })
}

impl Dashboard {
    /// Plain-text rendering: headline figures followed by one block per
    /// table.
    pub fn to_text(&self) -> String {
        let mut out = String::new();

        if let Some(warning) = &self.warning {
            out.push_str(&format!("WARNING: {}\n\n", warning));
        }
        out.push_str(&format!(
            "Dataset: {} rows x {} columns\n",
            format_count(self.dataset_shape.0),
            self.dataset_shape.1
        ));
        out.push_str(&format!(
            "Years {}-{}\n\n",
            self.filter.year_from, self.filter.year_to
        ));
        out.push_str(&format!(
            "Total titles: {}\nMovies: {}\nTV shows: {}\nCountries: {}\n\n",
            format_count(self.totals.total_titles),
            format_count(self.totals.movies),
            format_count(self.totals.tv_shows),
            format_count(self.totals.countries),
        ));

        let sections = [
            render_table("Content type", &self.type_distribution),
            render_counts("Titles added per year", &self.trend),
            render_table("Top countries", &self.top_countries),
            render_table("Ratings", &self.ratings),
            render_table("Top genres", &self.top_genres),
            render_histogram("Movie duration (minutes)", &self.movie_minutes),
            render_table("TV show seasons", &self.season_counts),
        ];
        out.push_str(&sections.join("\n"));
        out
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
