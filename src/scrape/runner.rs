//! Job runner: one target's scrape as a timed, logged unit of work

use chrono::Utc;
use std::path::Path;
use std::time::Duration;

use crate::config::Config;
use crate::output::write_snapshot_csv;
use crate::records::Target;
use crate::scrape::fetcher::{FetchConfig, Fetcher};
use crate::scrape::target::scrape_target;
use crate::storage::{JobResult, JobStatus, RunStats, SqliteStore, Store};
use crate::{Result, SiftError};

/// The engine context
///
/// Owns the HTTP fetcher, the store handle, and the configuration, and
/// passes them explicitly to each stage; there is no process-wide state.
pub struct Pipeline {
    fetcher: Fetcher,
    store: SqliteStore,
    config: Config,
}

impl Pipeline {
    /// Builds the pipeline: ensures the output directory exists, opens the
    /// store, and constructs the HTTP fetcher
    pub fn new(config: Config) -> Result<Self> {
        std::fs::create_dir_all(&config.output.directory)?;

        let store = SqliteStore::open(Path::new(&config.output.database_path))?;
        let fetcher = Fetcher::new(FetchConfig::from_scraper_config(&config.scraper))?;

        Ok(Self {
            fetcher,
            store,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs one scrape job for the named target
    ///
    /// The full lifecycle: capture start time, scrape, persist (the store's
    /// count is authoritative for records-scraped), export, then append
    /// exactly one log entry regardless of which branch was taken. An
    /// unknown or unconfigured target name routes through the failed
    /// branch. Returns whether the job succeeded.
    pub async fn run_job(&mut self, target_name: &str) -> bool {
        let started_at = Utc::now();
        tracing::info!("starting scrape job for {}", target_name);

        let outcome = self.execute_job(target_name).await;
        let finished_at = Utc::now();

        let entry = match &outcome {
            Ok(count) => JobResult::new(
                target_name,
                JobStatus::Success,
                *count,
                None,
                started_at,
                finished_at,
            ),
            Err(error) => JobResult::new(
                target_name,
                JobStatus::Failed,
                0,
                Some(error.to_string()),
                started_at,
                finished_at,
            ),
        };

        if let Err(error) = self.store.append_log_entry(&entry) {
            tracing::error!("failed to log job result for {}: {}", target_name, error);
        }

        match outcome {
            Ok(count) => {
                tracing::info!(
                    "completed scrape job for {}: saved {} records",
                    target_name,
                    count
                );
                true
            }
            Err(error) => {
                tracing::error!("scrape job failed for {}: {}", target_name, error);
                false
            }
        }
    }

    async fn execute_job(&mut self, target_name: &str) -> Result<u64> {
        let target: Target = target_name.parse()?;
        let urls = self
            .config
            .urls_for(target)
            .ok_or_else(|| SiftError::TargetNotConfigured(target_name.to_string()))?;

        let delay = Duration::from_millis(self.config.scraper.request_delay_ms);
        let batch = scrape_target(&self.fetcher, target, urls, delay).await;

        // The store's confirmed count, not the extraction count
        let saved = self.store.append_records(&batch)?;

        write_snapshot_csv(&batch, &self.config.output.snapshot_path(target))?;
        self.store
            .export_table(target, &self.config.output.latest_path(target))?;

        Ok(saved)
    }

    /// Exports every configured target's table from the store
    pub fn export_all(&self) -> Result<()> {
        for entry in &self.config.targets {
            let target: Target = entry.name.parse()?;
            self.store
                .export_table(target, &self.config.output.latest_path(target))?;
        }
        Ok(())
    }

    /// Aggregate statistics, recomputed from the store
    pub fn stats(&self) -> Result<RunStats> {
        Ok(self.store.get_stats()?)
    }
}
