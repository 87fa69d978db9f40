//! Run orchestrator: sequences all configured jobs and reports the run

use chrono::Utc;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::output::{format_report, write_report};
use crate::scrape::runner::Pipeline;
use crate::storage::RunStats;

impl Pipeline {
    /// Runs every configured target's job, in config order, sequentially
    ///
    /// A failed job never prevents subsequent jobs from running. After all
    /// jobs complete, aggregate statistics are queried (best-effort: errors
    /// degrade to empty stats) and the run report is written, printed, and
    /// overwritten in place. Returns the complete per-target pass/fail map.
    pub async fn run_all(&mut self) -> BTreeMap<String, bool> {
        tracing::info!("starting all scrape jobs");

        let names: Vec<String> = self
            .config()
            .targets
            .iter()
            .map(|entry| entry.name.clone())
            .collect();
        let pause = Duration::from_millis(self.config().scraper.job_pause_ms);

        let mut results = BTreeMap::new();

        for (i, name) in names.iter().enumerate() {
            let passed = self.run_job(name).await;
            results.insert(name.clone(), passed);

            if i + 1 < names.len() {
                tokio::time::sleep(pause).await;
            }
        }

        let stats = self.stats().unwrap_or_else(|error| {
            tracing::warn!("statistics unavailable, reporting defaults: {}", error);
            RunStats::default()
        });

        let report = format_report(Utc::now(), &results, &stats, self.config());
        let report_path = self.config().output.report_path();
        match write_report(&report_path, &report) {
            Ok(()) => tracing::info!("report written to {}", report_path.display()),
            Err(error) => tracing::error!("failed to write report: {}", error),
        }
        println!("{}", report);

        tracing::info!("all scrape jobs completed");
        results
    }
}
