//! Stats display for the CLI

use crate::records::Target;
use crate::storage::RunStats;

/// Prints aggregate statistics to stdout in a formatted manner
pub fn print_run_stats(stats: &RunStats) {
    println!("=== Scrape Statistics ===\n");

    for target in Target::ALL {
        if let Some(target_stats) = stats.per_target.get(&target) {
            println!("{}:", target);
            println!("  Total records: {}", target_stats.total_records);
            println!(
                "  Last scraped: {}",
                target_stats.last_scraped_at.as_deref().unwrap_or("never")
            );
        }
    }

    println!();
    println!("Logged runs: {}", stats.total_runs);
    println!("Overall success rate: {:.2}%", stats.success_rate);
}
