//! Run report generation
//!
//! A fixed-format text report, overwritten on every orchestrator run,
//! combining per-target pass/fail with aggregate store statistics.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use crate::config::Config;
use crate::records::Target;
use crate::storage::RunStats;
use crate::SiftError;

/// Formats the run report
pub fn format_report(
    generated_at: DateTime<Utc>,
    results: &BTreeMap<String, bool>,
    stats: &RunStats,
    config: &Config,
) -> String {
    let mut report = String::new();

    let _ = writeln!(report, "========================================");
    let _ = writeln!(report, "WEBSIFT - SCRAPE RUN REPORT");
    let _ = writeln!(report, "========================================");
    let _ = writeln!(
        report,
        "Generated: {}",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(report);

    let _ = writeln!(report, "JOB RESULTS:");
    for (target, passed) in results {
        let _ = writeln!(
            report,
            "  {}: {}",
            target,
            if *passed { "SUCCESS" } else { "FAILED" }
        );
    }
    let _ = writeln!(report);

    let _ = writeln!(report, "STORE STATISTICS:");
    for target in Target::ALL {
        if let Some(target_stats) = stats.per_target.get(&target) {
            let _ = writeln!(
                report,
                "  Total {}: {}",
                target, target_stats.total_records
            );
            let _ = writeln!(
                report,
                "  Last {} scrape: {}",
                target,
                target_stats.last_scraped_at.as_deref().unwrap_or("never")
            );
        }
    }
    let _ = writeln!(report, "  Logged runs: {}", stats.total_runs);
    let _ = writeln!(report, "  Overall success rate: {}%", stats.success_rate);
    let _ = writeln!(report);

    let _ = writeln!(report, "OUTPUT FILES:");
    for entry in &config.targets {
        if let Ok(target) = entry.name.parse::<Target>() {
            let _ = writeln!(report, "  {}", config.output.snapshot_path(target).display());
            let _ = writeln!(report, "  {}", config.output.latest_path(target).display());
        }
    }
    let _ = writeln!(report, "  {}", config.output.database_path);
    let _ = writeln!(report, "========================================");

    report
}

/// Writes the report, replacing any previous report at `path`
pub fn write_report(path: &Path, report: &str) -> Result<(), SiftError> {
    std::fs::write(path, report)?;
    Ok(())
}
