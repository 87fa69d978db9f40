//! Configuration module for Websift
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use websift::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Max retries: {}", config.scraper.max_retries);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, OutputConfig, ScheduleConfig, ScraperConfig, TargetEntry};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
