use serde::Deserialize;
use std::path::PathBuf;

use crate::records::Target;

/// Main configuration structure for Websift
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub scraper: ScraperConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(rename = "target", default)]
    pub targets: Vec<TargetEntry>,
}

impl Config {
    /// Returns the configured URL list for a target, if any
    pub fn urls_for(&self, target: Target) -> Option<&[String]> {
        self.targets
            .iter()
            .find(|entry| entry.name == target.as_str())
            .map(|entry| entry.urls.as_slice())
    }
}

/// Scraper behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// User-agent string sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Maximum fetch attempts per URL
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Politeness delay between consecutive requests (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Pause between consecutive jobs in a run (milliseconds)
    #[serde(rename = "job-pause-ms", default = "default_job_pause_ms")]
    pub job_pause_ms: u64,
}

fn default_job_pause_ms() -> u64 {
    2000
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory for CSV exports and the run report
    pub directory: String,

    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

impl OutputConfig {
    /// Path of the in-memory snapshot CSV for a target (`<target>.csv`)
    pub fn snapshot_path(&self, target: Target) -> PathBuf {
        PathBuf::from(&self.directory).join(format!("{}.csv", target.as_str()))
    }

    /// Path of the store-backed export CSV for a target (`<target>_latest.csv`)
    pub fn latest_path(&self, target: Target) -> PathBuf {
        PathBuf::from(&self.directory).join(format!("{}_latest.csv", target.as_str()))
    }

    /// Path of the run report, overwritten on every orchestrator run
    pub fn report_path(&self) -> PathBuf {
        PathBuf::from(&self.directory).join("scraping_report.txt")
    }
}

/// Scheduling configuration for the interval runner
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Hours between scheduled runs
    #[serde(rename = "interval-hours")]
    pub interval_hours: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { interval_hours: 24 }
    }
}

/// A scrape target with its URL list
#[derive(Debug, Clone, Deserialize)]
pub struct TargetEntry {
    /// Target name ("books" or "products")
    pub name: String,

    /// Page URLs to scrape for this target, in order
    pub urls: Vec<String>,
}
