//! `last` command: jump to the most recently created scratch repository

use anyhow::Result;

use crate::config::Config;
use crate::scaffold::last_scratch;

/// Handles the last-scratch-repository command
pub fn handle_last_command(config: &Config) -> Result<()> {
    let scratch_dir = config.scratch_dir()?;
    let path = last_scratch(&scratch_dir, &config.scratch_prefix)?;

    // stdout carries the cd line so a shell wrapper can eval it
    println!("cd {}", path.display());
    Ok(())
}
