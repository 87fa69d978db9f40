//! Store trait consumed by the job runner and orchestrator

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::records::{ScrapedBatch, Target};
use crate::storage::{JobResult, RunStats};

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// The persistence operations the scrape engine relies on
///
/// The engine performs one logical write per job; no locking discipline
/// beyond the store's own transactional guarantees is assumed.
pub trait Store {
    /// Appends a batch of records to the target's table
    ///
    /// Returns the number of rows actually written; this count is
    /// authoritative for a job's `records_scraped`. An empty batch is
    /// written as nothing and returns 0.
    fn append_records(&mut self, batch: &ScrapedBatch) -> StoreResult<u64>;

    /// Appends one job outcome to the scrape log
    fn append_log_entry(&mut self, entry: &JobResult) -> StoreResult<()>;

    /// Exports a target's full table to a CSV file at `path`
    ///
    /// Returns the path written. The file is overwritten if present.
    fn export_table(&self, target: Target, path: &Path) -> StoreResult<PathBuf>;

    /// Computes aggregate statistics from the persisted tables and job log
    fn get_stats(&self) -> StoreResult<RunStats>;

    /// Total records persisted for a target
    fn count_records(&self, target: Target) -> StoreResult<u64>;

    /// Timestamp of the most recent persisted record for a target
    fn last_scraped_at(&self, target: Target) -> StoreResult<Option<String>>;

    /// Most recent job log entries, newest first
    fn recent_jobs(&self, limit: u32) -> StoreResult<Vec<JobResult>>;

    /// Total number of job log entries
    fn count_log_entries(&self) -> StoreResult<u64>;
}
