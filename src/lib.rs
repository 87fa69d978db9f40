//! Websift: a catalogue scraping pipeline
//!
//! This crate fetches HTML pages from a fixed set of target sites, extracts
//! structured records (books, products), persists them to SQLite, exports
//! them to CSV, and reports run outcomes.

pub mod config;
pub mod output;
pub mod records;
pub mod schedule;
pub mod scrape;
pub mod storage;

use thiserror::Error;

/// Main error type for Websift operations
#[derive(Debug, Error)]
pub enum SiftError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Store error: {0}")]
    Store(#[from] storage::StoreError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown scrape target: {0}")]
    UnknownTarget(String),

    #[error("No URLs configured for target: {0}")]
    TargetNotConfigured(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Websift operations
pub type Result<T> = std::result::Result<T, SiftError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use records::{BookRecord, ProductRecord, ScrapedBatch, Target};
pub use scrape::Pipeline;
pub use storage::{JobResult, JobStatus, RunStats, SqliteStore, Store};
