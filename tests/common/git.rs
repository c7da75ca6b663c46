//! Git testing utilities

use anyhow::Result;
use std::path::Path;
use std::process::Command;

/// Runs a git command, returning trimmed stdout and bailing on failure
pub fn git_output(path: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git").args(args).current_dir(path).output()?;
    if !output.status.success() {
        anyhow::bail!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Sets up a git repository with user config
pub fn setup_git_repo(path: &Path) -> Result<()> {
    let init_result = Command::new("git")
        .args(["init"])
        .current_dir(path)
        .output()?;

    if !init_result.status.success() {
        anyhow::bail!("Git not available - skipping test");
    }

    configure_git_user(path)?;
    Ok(())
}

/// Configures the test identity and disables commit signing
pub fn configure_git_user(path: &Path) -> Result<()> {
    Command::new("git")
        .args(["config", "user.name", "Test User"])
        .current_dir(path)
        .output()?;

    Command::new("git")
        .args(["config", "user.email", "test@example.com"])
        .current_dir(path)
        .output()?;

    Command::new("git")
        .args(["config", "commit.gpgsign", "false"])
        .current_dir(path)
        .output()?;

    Ok(())
}

/// Creates a test commit in the repository
pub fn create_test_commit(
    path: &Path,
    file_name: &str,
    content: &str,
    message: &str,
) -> Result<()> {
    std::fs::write(path.join(file_name), content)?;

    Command::new("git")
        .args(["add", file_name])
        .current_dir(path)
        .output()?;

    let commit_result = Command::new("git")
        .args(["commit", "-m", message])
        .current_dir(path)
        .output()?;

    if !commit_result.status.success() {
        anyhow::bail!(
            "Failed to create commit: {}",
            String::from_utf8_lossy(&commit_result.stderr)
        );
    }

    Ok(())
}

/// Creates an upstream repository with one commit at `path`
pub fn setup_upstream_repo(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    setup_git_repo(path)?;
    create_test_commit(path, "README.md", "# upstream", "Initial commit")?;
    Ok(())
}

/// Clones `upstream` into `checkout`; the clone gets an `origin/HEAD` and a
/// test identity for local commits
pub fn clone_repo(upstream: &Path, checkout: &Path) -> Result<()> {
    let upstream_path = upstream.to_string_lossy();
    let checkout_path = checkout.to_string_lossy();
    let result = Command::new("git")
        .args(["clone", upstream_path.as_ref(), checkout_path.as_ref()])
        .output()?;

    if !result.status.success() {
        anyhow::bail!(
            "Failed to clone: {}",
            String::from_utf8_lossy(&result.stderr)
        );
    }

    configure_git_user(checkout)?;
    Ok(())
}

/// Short HEAD revision of a checkout
pub fn short_head(path: &Path) -> Result<String> {
    git_output(path, &["rev-parse", "--short", "HEAD"])
}

/// Current branch name of a checkout
pub fn current_branch(path: &Path) -> Result<String> {
    git_output(path, &["rev-parse", "--abbrev-ref", "HEAD"])
}

/// Checks if git is available in the system
pub fn is_git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}
