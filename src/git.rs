//! Git subprocess plumbing
//!
//! Every repository operation goes through the `git` binary, invoked in the
//! checkout's working directory with captured output. Callers get the exit
//! status plus trimmed stdout/stderr and decide what a failure means.

use anyhow::Result;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

// Timeout constants
const GIT_OPERATION_TIMEOUT_SECS: u64 = 180; // 3 minutes per subprocess

// Git command arguments
pub const GIT_SHORT_HEAD_ARGS: &[&str] = &["rev-parse", "--short", "HEAD"];
pub const GIT_REMOTE_HEAD_ARGS: &[&str] = &["rev-parse", "--abbrev-ref", "origin/HEAD"];
pub const GIT_FETCH_ARGS: &[&str] = &[
    "fetch",
    "--tags",
    "--prune",
    "--prune-tags",
    "--force",
    "--jobs=10",
];
pub const GIT_MERGE_FF_ARGS: &[&str] = &["merge", "--ff-only", "--autostash"];
pub const GIT_WORKTREE_PRUNE_ARGS: &[&str] = &["worktree", "prune"];

/// Runs a git command in the specified directory with a timeout
/// Returns (success, stdout, stderr)
pub async fn run_git(path: &Path, args: &[&str]) -> Result<(bool, String, String)> {
    let timeout_duration = Duration::from_secs(GIT_OPERATION_TIMEOUT_SECS);

    let result = tokio::time::timeout(
        timeout_duration,
        Command::new("git").args(args).current_dir(path).output(),
    )
    .await;

    match result {
        Ok(Ok(output)) => Ok((
            output.status.success(),
            String::from_utf8_lossy(&output.stdout).trim().to_string(),
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        )),
        Ok(Err(e)) => Err(e.into()),
        Err(_) => Err(anyhow::anyhow!(
            "git operation timed out after {} seconds",
            GIT_OPERATION_TIMEOUT_SECS
        )),
    }
}

/// Runs a git command that is expected to succeed, bailing with the captured
/// output otherwise. Used by flows where any git failure aborts the operation.
pub async fn run_git_checked(path: &Path, args: &[&str], what: &str) -> Result<String> {
    let (success, stdout, stderr) = run_git(path, args).await?;
    if !success {
        anyhow::bail!("{}: {}", what, combined_output(&stdout, &stderr));
    }
    Ok(stdout)
}

/// Joins captured stdout and stderr into a single blob for error reporting
pub fn combined_output(stdout: &str, stderr: &str) -> String {
    match (stdout.is_empty(), stderr.is_empty()) {
        (_, true) => stdout.to_string(),
        (true, false) => stderr.to_string(),
        (false, false) => format!("{stdout}\n{stderr}"),
    }
}
