//! Storage module for persisting scraped data
//!
//! This module handles all database operations for the pipeline, including:
//! - SQLite database initialization and schema management
//! - Appending scraped record batches
//! - The scrape-job log
//! - Store-backed CSV exports
//! - Aggregate run statistics

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{Store, StoreError, StoreResult};

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::records::Target;

/// Outcome status of a scrape job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Success,
    Failed,
}

impl JobStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "success" => Some(Self::Success),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// The structured outcome of one scrape job
///
/// Constructed once by the job runner when the job completes, appended to
/// the log store, and never mutated afterwards. `records_scraped` is the
/// count confirmed by the store, not the extraction count.
#[derive(Debug, Clone, PartialEq)]
pub struct JobResult {
    /// Target identifier as requested (unknown names are still logged)
    pub target: String,
    pub status: JobStatus,
    pub records_scraped: u64,
    pub error_message: Option<String>,
    /// RFC 3339 start timestamp
    pub started_at: String,
    /// RFC 3339 end timestamp
    pub finished_at: String,
    /// Always `finished - started`, clamped non-negative
    pub duration_seconds: f64,
}

impl JobResult {
    pub fn new(
        target: impl Into<String>,
        status: JobStatus,
        records_scraped: u64,
        error_message: Option<String>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let duration_seconds =
            (finished_at - started_at).num_milliseconds().max(0) as f64 / 1000.0;

        Self {
            target: target.into(),
            status,
            records_scraped,
            error_message,
            started_at: started_at.to_rfc3339(),
            finished_at: finished_at.to_rfc3339(),
            duration_seconds,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.status == JobStatus::Success
    }
}

/// Per-target aggregate counters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetStats {
    /// Total records persisted for this target across all runs
    pub total_records: u64,

    /// RFC 3339 timestamp of the most recent persisted record, if any
    pub last_scraped_at: Option<String>,
}

/// Aggregate statistics derived from the store
///
/// Recomputed on demand from the persisted tables and the job log; never
/// cached. `Default` is the empty stats used when computation fails.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub per_target: BTreeMap<Target, TargetStats>,

    /// Percentage of logged job runs with status `success`, two decimals
    pub success_rate: f64,

    /// Total number of logged job runs
    pub total_runs: u64,
}
