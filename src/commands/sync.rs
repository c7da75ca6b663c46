//! `sync` command: pull remote updates into every checkout under a base directory

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::core::{list_targets, SyncStatistics};
use crate::sync::sync_all;

const PROGRESS_TEMPLATE: &str = "{bar:40} {pos}/{len}";
const PROGRESS_CHARS: &str = "##-";

/// Handles the checkout sync command
///
/// Enumeration errors abort the run; per-checkout failures are reported in
/// the outcome stream and never affect the exit status.
pub async fn handle_sync_command(base_dir: &Path, parallel: usize) -> Result<()> {
    let targets = list_targets(base_dir)?;
    if targets.is_empty() {
        eprintln!("No checkouts found in {}", base_dir.display());
        return Ok(());
    }

    let start_time = Instant::now();
    let progress = ProgressBar::new(targets.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template(PROGRESS_TEMPLATE)?
            .progress_chars(PROGRESS_CHARS),
    );

    // One line per checkout in completion order, printed above the bar so
    // both share stderr cleanly
    let mut statistics = SyncStatistics::new();
    let mut outcomes = sync_all(targets, parallel);
    let mut ordinal = 0usize;
    while let Some(outcome) = outcomes.recv().await {
        ordinal += 1;
        progress.println(format!("{:4} {}: {}", ordinal, outcome.name, outcome.describe()));
        progress.inc(1);
        statistics.record(&outcome);
    }
    progress.finish_and_clear();

    eprintln!("{}", statistics.generate_summary(start_time.elapsed()));
    let failure_report = statistics.generate_failure_report();
    if !failure_report.is_empty() {
        eprintln!("\n{failure_report}");
    }

    Ok(())
}
