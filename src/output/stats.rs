//! Run statistics display
//!
//! Formats the statistics record of a run for the end-of-run summary and for
//! `--stats`.

use crate::state::RunStatistics;
use std::fmt::Write;

/// Formats statistics as a human-readable block
pub fn format_statistics(stats: &RunStatistics) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "=== Crawl Statistics ===\n");

    let _ = writeln!(out, "Run:");
    let _ = writeln!(out, "  Status: {}", stats.status.to_db_string());
    let _ = writeln!(out, "  Started: {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        let _ = writeln!(out, "  Finished: {}", finished.to_rfc3339());
    }
    if let Some(duration) = stats.duration_seconds {
        let _ = writeln!(out, "  Duration: {:.1}s", duration);
    }
    let _ = writeln!(out, "  Batches: {}", stats.batches);
    let _ = writeln!(out, "  Config hash: {}", stats.config_hash);
    let _ = writeln!(out);

    let _ = writeln!(out, "Pages:");
    let _ = writeln!(out, "  Accepted: {}", stats.pages_accepted);
    if stats.pages_restored > 0 {
        let _ = writeln!(out, "    (restored from checkpoint: {})", stats.pages_restored);
    }
    let _ = writeln!(out, "  Rejected (below threshold): {}", stats.pages_rejected);
    let _ = writeln!(out, "  Failed: {}", stats.pages_failed);
    if stats.pages_not_found > 0 {
        let _ = writeln!(out, "    (not found: {})", stats.pages_not_found);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Content:");
    let _ = writeln!(out, "  Total words: {}", stats.total_words);
    let _ = writeln!(out, "  Average words per page: {:.0}", stats.average_words());
    let _ = writeln!(
        out,
        "  Relevant pages: {} ({:.1}%)",
        stats.relevant_pages,
        stats.relevant_ratio()
    );

    out
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &RunStatistics) {
    print!("{}", format_statistics(stats));
}
