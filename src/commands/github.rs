//! `github` command: reconcile local checkouts against hosted repository lists

use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use futures::stream::{self, StreamExt};

use crate::core::list_targets;
use crate::git::{combined_output, run_git};
use crate::github::{plan_reconcile, CloneTask, GithubClient, RemoteRepo};

const CLONE_CONCURRENT_LIMIT: usize = 5; // Clones are network-bound like syncs

/// Arguments for the reconciliation command
pub struct GithubArgs {
    pub users: Vec<String>,
    pub orgs: Vec<String>,
    pub archived: bool,
    pub prune: bool,
    pub dry_run: bool,
    pub worktree: bool,
    pub token_env: String,
}

/// Handles the hosted-account reconciliation command
pub async fn handle_github_command(base_dir: &Path, args: GithubArgs) -> Result<()> {
    let token = std::env::var(&args.token_env).unwrap_or_default();
    let client = GithubClient::new(token)?;

    let mut remote: Vec<RemoteRepo> = Vec::new();
    for user in &args.users {
        remote.extend(client.list_user_repos(user).await?);
    }
    for org in &args.orgs {
        remote.extend(client.list_org_repos(org).await?);
    }

    let local: HashSet<String> = list_targets(base_dir)?
        .into_iter()
        .map(|target| target.name)
        .collect();
    let plan = plan_reconcile(&remote, &local, args.archived);

    clone_missing(base_dir, &plan.to_clone, args.worktree, args.dry_run).await;

    if args.prune {
        for name in &plan.to_prune {
            let path = base_dir.join(name);
            let mut message = format!("rm -rf {name}");
            if !args.dry_run {
                if let Err(e) = std::fs::remove_dir_all(&path) {
                    message.push_str(&format!(": {e}"));
                }
            }
            eprintln!("{message}");
        }
    }

    Ok(())
}

/// Clones the missing repositories a few at a time, reporting each action as
/// it finishes
///
/// A failed clone is reported on its own line and never aborts the rest.
async fn clone_missing(base_dir: &Path, tasks: &[CloneTask], worktree: bool, dry_run: bool) {
    stream::iter(tasks)
        .map(|task| async move {
            let url = task.url();
            let destination = task.destination(worktree);
            let mut message = format!("git clone {url} {destination}");
            if !dry_run {
                match run_git(base_dir, &["clone", url.as_str(), destination.as_str()]).await {
                    Ok((true, _, _)) => {}
                    Ok((false, stdout, stderr)) => {
                        message.push_str(&format!(": {}", combined_output(&stdout, &stderr)));
                    }
                    Err(e) => message.push_str(&format!(": {e}")),
                }
            }
            message
        })
        .buffer_unordered(CLONE_CONCURRENT_LIMIT)
        .for_each(|message| async move {
            eprintln!("{message}");
        })
        .await;
}
