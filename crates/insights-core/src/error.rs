use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the catalog insights pipeline.
#[derive(Error, Debug)]
pub enum InsightsError {
    /// The catalog file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog file is not well-formed CSV.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The source lacks one or more columns the pipeline reads.
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// A duration is neither the `"Unknown"` sentinel nor in the shape its
    /// content type expects.
    #[error("Invalid duration for {content_type}: {value:?}")]
    InvalidDuration { content_type: String, value: String },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A dashboard could not be serialized.
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the insights crates.
pub type Result<T> = std::result::Result<T, InsightsError>;
