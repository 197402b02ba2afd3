//! Runtime layer for catalog insights.
//!
//! Holds the once-per-process cached catalog snapshot.

pub mod data_manager;

pub use insights_core as core;
pub use insights_data as data;
