//! Shared building blocks for catalog insights.
//!
//! Holds the record models, the error type, date and duration parsing,
//! command-line settings and plain-text formatting used by the data,
//! runtime and binary crates.

pub mod data_processors;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{InsightsError, Result};
