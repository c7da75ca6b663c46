//! Target enumeration and run statistics

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;

use crate::sync::{RepoTarget, SyncOutcome};

/// Lists the immediate subdirectories of `base` as sync candidates
///
/// No recursion: every checkout is expected to sit directly under the base
/// directory. Entries that are not directories are skipped. Results come back
/// sorted by name so the work queue is loaded deterministically. Any read
/// error here is fatal to the whole run, unlike per-target sync failures.
pub fn list_targets(base: &Path) -> Result<Vec<RepoTarget>> {
    let entries =
        std::fs::read_dir(base).with_context(|| format!("read {}", base.display()))?;

    let mut targets = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("read {}", base.display()))?;
        let file_type = entry
            .file_type()
            .with_context(|| format!("stat {}", entry.path().display()))?;
        if file_type.is_dir() {
            targets.push(RepoTarget::from_path(entry.path()));
        }
    }
    targets.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(targets)
}

/// Statistics for tracking checkout synchronization results
#[derive(Clone, Default)]
pub struct SyncStatistics {
    pub updated: u32,
    pub unchanged: u32,
    pub failed: Vec<(String, String)>, // (repo_name, error_message)
}

impl SyncStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one outcome into the running counters
    pub fn record(&mut self, outcome: &SyncOutcome) {
        if outcome.is_failed() {
            self.failed
                .push((outcome.name.clone(), outcome.error.clone()));
        } else if outcome.old_ref == outcome.new_ref {
            self.unchanged += 1;
        } else {
            self.updated += 1;
        }
    }

    /// Generates the one-line completion summary
    pub fn generate_summary(&self, duration: Duration) -> String {
        let duration_secs = duration.as_secs_f64();

        if self.failed.is_empty() {
            format!(
                "✅ Completed in {:.1}s • {} updated • {} unchanged",
                duration_secs, self.updated, self.unchanged
            )
        } else {
            format!(
                "✅ Completed in {:.1}s • {} updated • {} unchanged • {} failed",
                duration_secs,
                self.updated,
                self.unchanged,
                self.failed.len()
            )
        }
    }

    /// Generates the detailed listing of failed checkouts, empty when none failed
    pub fn generate_failure_report(&self) -> String {
        if self.failed.is_empty() {
            return String::new();
        }

        let mut lines = vec![format!("🔴 FAILED REPOS ({})", self.failed.len())];
        for (i, (repo_name, error)) in self.failed.iter().enumerate() {
            let tree_char = if i == self.failed.len() - 1 {
                "└─"
            } else {
                "├─"
            };
            let first_line = error.lines().next().unwrap_or("");
            lines.push(format!("   {} {:20} # {}", tree_char, repo_name, first_line));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::SyncStatus;

    fn outcome(name: &str, old_ref: &str, new_ref: &str, error: &str) -> SyncOutcome {
        SyncOutcome {
            name: name.to_string(),
            status: if error.is_empty() {
                SyncStatus::Success
            } else {
                SyncStatus::Failed
            },
            old_ref: old_ref.to_string(),
            new_ref: new_ref.to_string(),
            error: error.to_string(),
        }
    }

    #[test]
    fn record_buckets_outcomes() {
        let mut stats = SyncStatistics::new();
        stats.record(&outcome("a", "abc", "def", ""));
        stats.record(&outcome("b", "abc", "abc", ""));
        stats.record(&outcome("c", "", "", "no git checkout found"));

        assert_eq!(stats.updated, 1);
        assert_eq!(stats.unchanged, 1);
        assert_eq!(stats.failed.len(), 1);
        assert_eq!(stats.failed[0].0, "c");
    }

    #[test]
    fn summary_mentions_failures_only_when_present() {
        let mut stats = SyncStatistics::new();
        stats.record(&outcome("a", "abc", "abc", ""));
        let clean = stats.generate_summary(Duration::from_secs(2));
        assert!(!clean.contains("failed"), "got: {clean}");

        stats.record(&outcome("b", "", "", "fetch: timeout"));
        let with_failure = stats.generate_summary(Duration::from_secs(2));
        assert!(with_failure.contains("1 failed"), "got: {with_failure}");
    }

    #[test]
    fn failure_report_uses_first_error_line() {
        let mut stats = SyncStatistics::new();
        stats.record(&outcome("a", "", "", "merge: exit 128\nfatal: not possible"));

        let report = stats.generate_failure_report();
        assert!(report.contains("merge: exit 128"));
        assert!(!report.contains("fatal: not possible"));
    }

    #[test]
    fn failure_report_empty_without_failures() {
        let stats = SyncStatistics::new();
        assert!(stats.generate_failure_report().is_empty());
    }
}
