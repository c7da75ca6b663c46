//! repofleet: manage a local collection of git checkouts
//!
//! Scaffolds new repositories, syncs existing checkouts with their remotes in
//! parallel, and reconciles the local checkout set against a GitHub account.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use repofleet::commands::{github, last, new, sync};
use repofleet::config::Config;

#[derive(Parser)]
#[command(name = "repofleet", version, about = "Manage a local collection of git checkouts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pull remote updates into every checkout under the base directory
    Sync {
        /// Parallel syncs to run
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
        parallel: u32,

        /// Base directory holding the checkouts
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Create a new repository
    New {
        /// Repository name; a scratch name is allocated when omitted
        name: Option<String>,
    },
    /// Jump to the most recently created scratch repository
    Last,
    /// Reconcile the local checkout set with GitHub users or organizations
    Github {
        /// GitHub user to list (repeatable)
        #[arg(long = "user")]
        users: Vec<String>,

        /// GitHub organization to list (repeatable)
        #[arg(long = "org")]
        orgs: Vec<String>,

        /// Include archived repositories
        #[arg(long)]
        archived: bool,

        /// Remove checkouts not found on the remote
        #[arg(long)]
        prune: bool,

        /// Print actions instead of executing them
        #[arg(long)]
        dry_run: bool,

        /// Nest new clones under <repo>/default
        #[arg(long)]
        worktree: bool,

        /// Environment variable holding the GitHub token
        #[arg(long, default_value = "GH_TOKEN")]
        token_env: String,

        /// Base directory holding the checkouts
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Sync { parallel, dir } => {
            sync::handle_sync_command(&dir, parallel as usize).await
        }
        Commands::New { name } => new::handle_new_command(&config, name).await,
        Commands::Last => last::handle_last_command(&config),
        Commands::Github {
            users,
            orgs,
            archived,
            prune,
            dry_run,
            worktree,
            token_env,
            dir,
        } => {
            github::handle_github_command(
                &dir,
                github::GithubArgs {
                    users,
                    orgs,
                    archived,
                    prune,
                    dry_run,
                    worktree,
                    token_env,
                },
            )
            .await
        }
    }
}
