//! Selector options derived from the clean dataset.

use insights_core::models::{CleanRecord, ContentType, FilterSpec};
use serde::{Deserialize, Serialize};

use crate::aggregator::CatalogAggregator;

/// Year range selected before the user narrows it, clamped into the data.
pub const DEFAULT_YEAR_RANGE: (i32, i32) = (2010, 2020);

/// Countries offered as options.
pub const COUNTRY_OPTIONS: usize = 15;

/// Countries selected before the user narrows them.
pub const DEFAULT_COUNTRY_SELECTION: usize = 5;

/// Filter options offered to the user, and the starting selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterChoices {
    /// Smallest and largest `year_added`; `None` for an empty dataset.
    pub year_bounds: Option<(i32, i32)>,
    pub default_year_range: (i32, i32),
    /// Every distinct type, in first-seen order.
    pub types: Vec<ContentType>,
    /// Most frequent countries, most frequent first.
    pub countries: Vec<String>,
    pub default_countries: Vec<String>,
}

impl FilterChoices {
    pub fn from_records(records: &[CleanRecord]) -> Self {
        let year_bounds = records
            .iter()
            .map(|r| r.year_added)
            .fold(None, |acc: Option<(i32, i32)>, y| match acc {
                None => Some((y, y)),
                Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
            });

        let default_year_range = match year_bounds {
            Some(bounds) => clamp_range(DEFAULT_YEAR_RANGE, bounds),
            None => DEFAULT_YEAR_RANGE,
        };

        let mut types: Vec<ContentType> = Vec::new();
        for r in records {
            if !types.contains(&r.content_type) {
                types.push(r.content_type.clone());
            }
        }

        let countries: Vec<String> = CatalogAggregator::top_countries(records, COUNTRY_OPTIONS)
            .keys()
            .cloned()
            .collect();
        let default_countries = countries
            .iter()
            .take(DEFAULT_COUNTRY_SELECTION)
            .cloned()
            .collect();

        Self {
            year_bounds,
            default_year_range,
            types,
            countries,
            default_countries,
        }
    }

    /// The selection a fresh dashboard starts with: default years, every
    /// type and the default countries.
    pub fn default_filter(&self) -> FilterSpec {
        FilterSpec::new(
            self.default_year_range,
            self.types.iter().cloned(),
            self.default_countries.iter().cloned(),
        )
    }
}

/// Clamp both ends of `range` into `bounds`, keeping `start <= end`.
fn clamp_range(range: (i32, i32), bounds: (i32, i32)) -> (i32, i32) {
    let start = range.0.clamp(bounds.0, bounds.1);
    let end = range.1.clamp(bounds.0, bounds.1);
    (start, end.max(start))
}
