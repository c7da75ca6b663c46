//! `new` command: scaffold a repository and print where it landed

use anyhow::{Context, Result};

use crate::config::Config;
use crate::scaffold::{self, ScaffoldTemplates};

/// Handles the repository creation command
///
/// With an explicit name the repository is scaffolded under the current
/// directory; without one a counter-allocated scratch name goes under the
/// scratch directory.
pub async fn handle_new_command(config: &Config, name: Option<String>) -> Result<()> {
    let templates = ScaffoldTemplates::from_config(config)?;

    let (base, name) = match name {
        Some(name) => (
            std::env::current_dir().context("get current directory")?,
            name,
        ),
        None => {
            let counter_path = config.counter_path()?;
            let name = scaffold::next_scratch_name(&counter_path, &config.scratch_prefix)?;
            (config.scratch_dir()?, name)
        }
    };

    let repo_path = scaffold::create(&base, &name, config, &templates).await?;

    // stdout carries the cd line so a shell wrapper can eval it
    println!("cd {}", repo_path.display());
    Ok(())
}
