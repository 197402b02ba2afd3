use insights_core::models::FilterSpec;
use insights_core::settings::Settings;
use insights_data::analysis::DashboardOptions;
use insights_data::choices::FilterChoices;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name to a tracing filter directive.
/// Unrecognised names pass through unchanged.
pub fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber on stderr.
///
/// `log_level` is mapped to a [`tracing_subscriber::EnvFilter`] directive,
/// falling back to `"info"` if the directive does not parse.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()?;

    Ok(())
}

// ── Query assembly ─────────────────────────────────────────────────────────────

/// Build the filter for this run: explicit flags win, anything omitted
/// falls back to the dashboard defaults in `choices`.
pub fn filter_from_settings(settings: &Settings, choices: &FilterChoices) -> FilterSpec {
    let types = settings
        .content_types()
        .unwrap_or_else(|| choices.types.clone());
    let countries = settings
        .countries
        .clone()
        .unwrap_or_else(|| choices.default_countries.clone());

    FilterSpec::new(
        settings.year_range(choices.default_year_range),
        types,
        countries,
    )
}

pub fn dashboard_options(settings: &Settings) -> DashboardOptions {
    DashboardOptions {
        top_countries: settings.top_countries,
        top_genres: settings.top_genres,
        histogram_bins: settings.histogram_bins as usize,
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
