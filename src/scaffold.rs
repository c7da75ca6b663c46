//! Repository scaffolding
//!
//! Creates a fresh checkout: git init, an empty root commit, an origin
//! remote, and LICENSE/README files rendered from Tera templates. Scratch
//! repositories get counter-allocated names persisted in a plain integer
//! file under the cache directory.

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use tera::Tera;

use crate::config::Config;
use crate::git::run_git_checked;

// Embedded template defaults, overridable through config
const LICENSE_TEMPLATE: &str = include_str!("templates/license.tera");
const README_TEMPLATE: &str = include_str!("templates/readme.tera");

const LICENSE_TEMPLATE_NAME: &str = "license";
const README_TEMPLATE_NAME: &str = "readme";

/// LICENSE and README templates resolved from config overrides or the
/// embedded defaults, parsed once and injected into [`create`]
pub struct ScaffoldTemplates {
    tera: Tera,
}

impl ScaffoldTemplates {
    pub fn from_config(config: &Config) -> Result<Self> {
        let license = match &config.license_template {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("read license template {}", path.display()))?,
            None => LICENSE_TEMPLATE.to_string(),
        };
        let readme = match &config.readme_template {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("read readme template {}", path.display()))?,
            None => README_TEMPLATE.to_string(),
        };

        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (LICENSE_TEMPLATE_NAME, license.as_str()),
            (README_TEMPLATE_NAME, readme.as_str()),
        ])
        .context("parse scaffold templates")?;

        Ok(Self { tera })
    }

    fn render_license(&self, year: &str) -> Result<String> {
        let mut context = tera::Context::new();
        context.insert("year", year);
        self.tera
            .render(LICENSE_TEMPLATE_NAME, &context)
            .context("render license")
    }

    fn render_readme(&self, name: &str) -> Result<String> {
        let mut context = tera::Context::new();
        context.insert("name", name);
        self.tera
            .render(README_TEMPLATE_NAME, &context)
            .context("render readme")
    }
}

/// Reads, increments and writes back the scratch repository counter, returning
/// the allocated name
///
/// A missing counter file starts the sequence at 1; an unparsable one restarts
/// it rather than failing the command.
pub fn next_scratch_name(counter_path: &Path, prefix: &str) -> Result<String> {
    let current = match std::fs::read_to_string(counter_path) {
        Ok(raw) => raw.trim().parse::<u32>().unwrap_or(0),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => 0,
        Err(e) => {
            return Err(e).with_context(|| format!("read {}", counter_path.display()));
        }
    };
    let next = current + 1;

    if let Some(parent) = counter_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("mkdir {}", parent.display()))?;
    }
    std::fs::write(counter_path, next.to_string())
        .with_context(|| format!("write {}", counter_path.display()))?;

    Ok(format!("{prefix}{next:04}"))
}

/// Scaffolds a repository named `name` under `base`, returning the new
/// checkout's path
pub async fn create(
    base: &Path,
    name: &str,
    config: &Config,
    templates: &ScaffoldTemplates,
) -> Result<PathBuf> {
    let repo_path = base.join(name);
    std::fs::create_dir_all(&repo_path)
        .with_context(|| format!("mkdir {}", repo_path.display()))?;

    run_git_checked(&repo_path, &["init"], "git init").await?;
    run_git_checked(
        &repo_path,
        &["commit", "--allow-empty", "-m", "root-commit"],
        "git commit",
    )
    .await?;

    let remote = format!("{}{}", config.remote_prefix, name);
    run_git_checked(
        &repo_path,
        &["remote", "add", "origin", remote.as_str()],
        "git remote add",
    )
    .await?;

    let year = chrono::Local::now().format("%Y").to_string();
    let license_path = repo_path.join("LICENSE");
    std::fs::write(&license_path, templates.render_license(&year)?)
        .with_context(|| format!("write {}", license_path.display()))?;

    let readme_path = repo_path.join("README.md");
    std::fs::write(&readme_path, templates.render_readme(name)?)
        .with_context(|| format!("write {}", readme_path.display()))?;

    Ok(repo_path)
}

/// Finds the most recently allocated scratch repository, greatest by name
pub fn last_scratch(scratch_dir: &Path, prefix: &str) -> Result<PathBuf> {
    let entries = std::fs::read_dir(scratch_dir)
        .with_context(|| format!("read {}", scratch_dir.display()))?;

    let mut last: Option<String> = None;
    for entry in entries {
        let entry = entry.with_context(|| format!("read {}", scratch_dir.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(prefix) && last.as_deref().map_or(true, |l| name.as_str() > l) {
            last = Some(name);
        }
    }

    let last = last.ok_or_else(|| {
        anyhow!("no scratch repository found in {}", scratch_dir.display())
    })?;
    Ok(scratch_dir.join(last))
}
