//! Interval scheduler for automated scrape runs
//!
//! Runs the orchestrator immediately, then on a fixed cadence, until
//! interrupted with Ctrl-C. A run in progress always completes;
//! interruption takes effect between runs.

use std::time::Duration;

use crate::scrape::Pipeline;

/// Runs all configured jobs now and then every `interval`
pub async fn run_on_interval(pipeline: &mut Pipeline, interval: Duration) {
    loop {
        tracing::info!("==================================================");
        tracing::info!("starting scheduled scrape run");

        let results = pipeline.run_all().await;
        let succeeded = results.values().filter(|passed| **passed).count();
        tracing::info!(
            "scheduled run completed: {}/{} jobs succeeded",
            succeeded,
            results.len()
        );
        tracing::info!("next run in {:?}", interval);

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("scheduler stopped");
                return;
            }
        }
    }
}
