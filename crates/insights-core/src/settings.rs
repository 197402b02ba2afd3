use clap::Parser;
use std::path::PathBuf;

use crate::error::{InsightsError, Result};
use crate::models::ContentType;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Filterable summaries of a media title catalog
#[derive(Parser, Debug, Clone)]
#[command(
    name = "catalog-insights",
    about = "Filterable summaries of a media title catalog",
    version
)]
pub struct Settings {
    /// Catalog CSV file
    #[arg(
        long,
        env = "CATALOG_INSIGHTS_DATA",
        default_value = "netflix_titles.csv"
    )]
    pub data_file: PathBuf,

    /// First year (inclusive) of the date-added range
    #[arg(long)]
    pub year_from: Option<i32>,

    /// Last year (inclusive) of the date-added range
    #[arg(long)]
    pub year_to: Option<i32>,

    /// Content types to include (all when omitted; none when given without values)
    #[arg(long, num_args = 0..)]
    pub types: Option<Vec<String>>,

    /// Countries to include (top 5 when omitted; none when given without values)
    #[arg(long, num_args = 0..)]
    pub countries: Option<Vec<String>>,

    /// Number of countries in the top-countries table
    #[arg(long, default_value = "10")]
    pub top_countries: usize,

    /// Number of genres in the top-genres table
    #[arg(long, default_value = "15")]
    pub top_genres: usize,

    /// Number of buckets in the movie-duration histogram (1-500)
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u32).range(1..=500))]
    pub histogram_bins: u32,

    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and apply derived settings.
    pub fn load() -> Result<Self> {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but accepts an explicit argument list,
    /// enabling unit-testing without spawning subprocesses.
    pub fn load_from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let settings = Settings::parse_from(args);
        settings.validate()?;
        Ok(settings.resolve())
    }

    /// Explicit content-type selection, or `None` to use the default.
    pub fn content_types(&self) -> Option<Vec<ContentType>> {
        self.types
            .as_ref()
            .map(|labels| labels.iter().map(|l| ContentType::parse_selection(l)).collect())
    }

    /// Year range to filter on. A missing bound is taken from `fallback`,
    /// widened if needed so the range is never inverted.
    pub fn year_range(&self, fallback: (i32, i32)) -> (i32, i32) {
        match (self.year_from, self.year_to) {
            (Some(from), Some(to)) => (from, to),
            (Some(from), None) => (from, fallback.1.max(from)),
            (None, Some(to)) => (fallback.0.min(to), to),
            (None, None) => fallback,
        }
    }

    pub fn wants_json(&self) -> bool {
        self.format == "json"
    }

    fn validate(&self) -> Result<()> {
        if let (Some(from), Some(to)) = (self.year_from, self.year_to) {
            if from > to {
                return Err(InsightsError::Config(format!(
                    "--year-from ({}) must not exceed --year-to ({})",
                    from, to
                )));
            }
        }
        Ok(())
    }

    /// Apply the `--debug` flag.
    fn resolve(mut self) -> Self {
        if self.debug {
            self.log_level = "DEBUG".to_string();
        }
        self
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
