//! Data layer for catalog insights.
//!
//! Reads catalog rows from a [`reader::RecordSource`], normalizes them into
//! clean records, and turns filtered views into chart-ready summary tables.

pub mod aggregator;
pub mod analysis;
pub mod choices;
pub mod normalizer;
pub mod reader;

pub use insights_core as core;
