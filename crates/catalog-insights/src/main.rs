mod bootstrap;

use anyhow::Result;
use insights_core::settings::Settings;
use insights_data::analysis::build_dashboard;
use insights_data::choices::FilterChoices;
use insights_data::reader::CsvSource;
use insights_runtime::data_manager::DataManager;

fn main() -> Result<()> {
    let settings = Settings::load()?;

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Catalog Insights v{} starting", env!("CARGO_PKG_VERSION"));

    let mut manager = DataManager::new(CsvSource::new(&settings.data_file));
    let snapshot = manager.get_data()?;
    tracing::info!(
        source = %manager.source_description(),
        loads = manager.load_count(),
        rows = snapshot.records.len(),
        "catalog ready"
    );

    let choices = FilterChoices::from_records(&snapshot.records);
    let spec = bootstrap::filter_from_settings(&settings, &choices);
    tracing::debug!(
        "Filter: years {}-{}, {} types, {} countries",
        spec.year_from,
        spec.year_to,
        spec.types.len(),
        spec.countries.len()
    );

    let dashboard = build_dashboard(&snapshot, &spec, &bootstrap::dashboard_options(&settings))?;

    if let Some(age) = manager.cache_age() {
        tracing::debug!("Dashboard built {:.3}s after load", age.as_secs_f64());
    }

    if settings.wants_json() {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
    } else {
        print!("{}", dashboard.to_text());
    }

    Ok(())
}
