//! Ambient configuration
//!
//! Settings load from `<config_dir>/repofleet/config.toml` when present;
//! every field has a default so the file is optional. The loaded [`Config`]
//! is passed down to whatever needs it; nothing reads configuration at
//! global scope.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_SCRATCH_PREFIX: &str = "testrepo";
pub const DEFAULT_REMOTE_PREFIX: &str = "s:";

const CONFIG_DIR_NAME: &str = "repofleet";
const CONFIG_FILE_NAME: &str = "config.toml";
const COUNTER_FILE_NAME: &str = "scratch-version";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory scratch repositories are created in (default `~/tmp`)
    pub scratch_dir: Option<PathBuf>,
    /// Name prefix for counter-allocated scratch repositories
    pub scratch_prefix: String,
    /// Prefix prepended to a new repository's name to form its origin URL
    pub remote_prefix: String,
    /// Replacement LICENSE template path; the embedded default applies otherwise
    pub license_template: Option<PathBuf>,
    /// Replacement README template path; the embedded default applies otherwise
    pub readme_template: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scratch_dir: None,
            scratch_prefix: DEFAULT_SCRATCH_PREFIX.to_string(),
            remote_prefix: DEFAULT_REMOTE_PREFIX.to_string(),
            license_template: None,
            readme_template: None,
        }
    }
}

impl Config {
    /// Loads configuration from the standard location, falling back to defaults
    pub fn load() -> Result<Self> {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(Self::default());
        };
        Self::load_from(&config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from an explicit path; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(raw) => {
                toml::from_str(&raw).with_context(|| format!("parse {}", path.display()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("read {}", path.display())),
        }
    }

    /// Resolved scratch directory
    pub fn scratch_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.scratch_dir {
            return Ok(dir.clone());
        }
        dirs::home_dir()
            .map(|home| home.join("tmp"))
            .ok_or_else(|| anyhow!("could not determine home directory"))
    }

    /// Location of the scratch version counter file
    pub fn counter_path(&self) -> Result<PathBuf> {
        dirs::cache_dir()
            .map(|cache| cache.join(CONFIG_DIR_NAME).join(COUNTER_FILE_NAME))
            .ok_or_else(|| anyhow!("could not determine cache directory"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().expect("temp dir");
        let config = Config::load_from(&dir.path().join("config.toml")).expect("load");

        assert_eq!(config.scratch_prefix, DEFAULT_SCRATCH_PREFIX);
        assert_eq!(config.remote_prefix, DEFAULT_REMOTE_PREFIX);
        assert!(config.scratch_dir.is_none());
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "scratch_prefix = \"scratch\"\n").expect("write");

        let config = Config::load_from(&path).expect("load");
        assert_eq!(config.scratch_prefix, "scratch");
        assert_eq!(config.remote_prefix, DEFAULT_REMOTE_PREFIX);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "scratch_prefix = [not toml").expect("write");

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn explicit_scratch_dir_wins() {
        let config = Config {
            scratch_dir: Some(PathBuf::from("/srv/scratch")),
            ..Config::default()
        };
        assert_eq!(config.scratch_dir().expect("dir"), PathBuf::from("/srv/scratch"));
    }
}
