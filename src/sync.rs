//! Bounded-concurrency checkout sync pipeline
//!
//! Candidate checkouts fan out to a fixed pool of worker tasks. Each worker
//! repeatedly claims the next unclaimed target from a shared queue, runs the
//! per-checkout git sequence, and pushes a structured outcome onto the result
//! channel. Outcomes arrive in completion order, not input order: sync time
//! varies per repository and reporting must not serialize fast checkouts
//! behind slow ones.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::git::{
    combined_output, run_git, GIT_FETCH_ARGS, GIT_MERGE_FF_ARGS, GIT_REMOTE_HEAD_ARGS,
    GIT_SHORT_HEAD_ARGS, GIT_WORKTREE_PRUNE_ARGS,
};

/// A directory believed to hold a working checkout
#[derive(Debug, Clone)]
pub struct RepoTarget {
    pub name: String,
    pub path: PathBuf,
}

impl RepoTarget {
    /// Builds a target from its path; the short name is the final path segment
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        Self { name, path }
    }
}

/// Whether a checkout synchronized cleanly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Success,
    Failed,
}

/// Result of attempting to synchronize one checkout
///
/// Either `status` is [`SyncStatus::Success`] and both refs are populated, or
/// it is [`SyncStatus::Failed`] and `error` carries the failing step's text
/// (`old_ref` stays populated when it was read before the failure).
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub name: String,
    pub status: SyncStatus,
    pub old_ref: String,
    pub new_ref: String,
    pub error: String,
}

impl SyncOutcome {
    fn success(name: String, old_ref: String, new_ref: String) -> Self {
        Self {
            name,
            status: SyncStatus::Success,
            old_ref,
            new_ref,
            error: String::new(),
        }
    }

    fn failure(name: String, old_ref: String, error: String) -> Self {
        Self {
            name,
            status: SyncStatus::Failed,
            old_ref,
            new_ref: String::new(),
            error,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == SyncStatus::Failed
    }

    /// Report line body: the error text on failure, the bare ref when nothing
    /// changed, the transition otherwise
    pub fn describe(&self) -> String {
        if self.is_failed() {
            self.error.clone()
        } else if self.old_ref == self.new_ref {
            self.new_ref.clone()
        } else {
            format!("{} -> {}", self.old_ref, self.new_ref)
        }
    }
}

/// Fans `targets` out to `parallel` worker tasks and returns the outcome channel
///
/// Exactly one outcome is produced per target, in completion order; the
/// channel closes once every worker has drained the queue and exited. A
/// failing target never aborts or delays its siblings.
///
/// # Panics
///
/// Panics when `parallel` is zero; callers pick a sane value (the CLI
/// defaults to 5).
pub fn sync_all(targets: Vec<RepoTarget>, parallel: usize) -> mpsc::Receiver<SyncOutcome> {
    assert!(parallel >= 1, "parallel must be at least 1");

    let (tx, rx) = mpsc::channel(targets.len().max(1));
    let queue = Arc::new(targets);
    let next = Arc::new(AtomicUsize::new(0));

    for _ in 0..parallel {
        let queue = Arc::clone(&queue);
        let next = Arc::clone(&next);
        let tx = tx.clone();
        tokio::spawn(async move {
            loop {
                let claimed = next.fetch_add(1, Ordering::Relaxed);
                let Some(target) = queue.get(claimed) else {
                    break;
                };
                if tx.send(sync_repo(target).await).await.is_err() {
                    // Receiver dropped, nothing left to report to
                    break;
                }
            }
        });
    }

    rx
}

/// Synchronizes a single checkout with its remote
///
/// Steps run strictly in order, each depending on the working tree state the
/// previous one left behind; the first failure short-circuits the rest and is
/// carried in the outcome. No retries.
pub async fn sync_repo(target: &RepoTarget) -> SyncOutcome {
    let name = target.name.clone();

    let Some(workdir) = resolve_workdir(&target.path) else {
        return SyncOutcome::failure(name, String::new(), "no git checkout found".to_string());
    };

    let old_ref = match git_step(&workdir, GIT_SHORT_HEAD_ARGS, "get old ref").await {
        Ok(r) => r,
        Err(e) => return SyncOutcome::failure(name, String::new(), e),
    };

    // origin/HEAD resolves to e.g. "origin/main"; the branch is the last segment
    let remote_head = match git_step(&workdir, GIT_REMOTE_HEAD_ARGS, "get remote default branch").await
    {
        Ok(r) => r,
        Err(e) => return SyncOutcome::failure(name, old_ref, e),
    };
    let default_branch = remote_head.rsplit('/').next().unwrap_or(&remote_head);

    if let Err(e) = git_step(
        &workdir,
        &["checkout", default_branch],
        "switch to default branch",
    )
    .await
    {
        return SyncOutcome::failure(name, old_ref, e);
    }

    if let Err(e) = git_step(&workdir, GIT_FETCH_ARGS, "fetch").await {
        return SyncOutcome::failure(name, old_ref, e);
    }

    if let Err(e) = git_step(&workdir, GIT_MERGE_FF_ARGS, "merge").await {
        return SyncOutcome::failure(name, old_ref, e);
    }

    if let Err(e) = git_step(&workdir, GIT_WORKTREE_PRUNE_ARGS, "prune worktrees").await {
        return SyncOutcome::failure(name, old_ref, e);
    }

    match git_step(&workdir, GIT_SHORT_HEAD_ARGS, "get new ref").await {
        Ok(new_ref) => SyncOutcome::success(name, old_ref, new_ref),
        Err(e) => SyncOutcome::failure(name, old_ref, e),
    }
}

/// Resolves the working directory for a target: a `default/` nested checkout
/// wins over the target directory itself
fn resolve_workdir(target: &Path) -> Option<PathBuf> {
    let nested = target.join("default");
    if nested.join(".git").exists() {
        return Some(nested);
    }
    if target.join(".git").exists() {
        return Some(target.to_path_buf());
    }
    None
}

/// Runs one git step, mapping any failure to a step-labelled error string
async fn git_step(workdir: &Path, args: &[&str], step: &str) -> Result<String, String> {
    match run_git(workdir, args).await {
        Ok((true, stdout, _)) => Ok(stdout),
        Ok((false, stdout, stderr)) => Err(format!("{step}: {}", combined_output(&stdout, &stderr))),
        Err(e) => Err(format!("{step}: {e}")),
    }
}
