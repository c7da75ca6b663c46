//! Integration tests for repository scaffolding

mod common;

use common::{git_output, is_git_available};
use repofleet::config::Config;
use repofleet::scaffold::{self, ScaffoldTemplates};
use tempfile::TempDir;

#[tokio::test]
async fn scaffold_creates_repo_with_root_commit_and_remote() {
    if !is_git_available() {
        eprintln!("Git not available, skipping test");
        return;
    }

    let base = TempDir::new().expect("temp dir");
    let config = Config::default();
    let templates = ScaffoldTemplates::from_config(&config).expect("templates");

    let repo_path = scaffold::create(base.path(), "demo", &config, &templates)
        .await
        .expect("create");

    assert_eq!(repo_path, base.path().join("demo"));
    assert!(repo_path.join(".git").exists());

    let log = git_output(&repo_path, &["log", "--oneline"]).expect("log");
    assert_eq!(log.lines().count(), 1);
    assert!(log.contains("root-commit"), "got: {log}");

    let remote = git_output(&repo_path, &["remote", "get-url", "origin"]).expect("remote");
    assert_eq!(remote, "s:demo");
}

#[tokio::test]
async fn scaffold_renders_license_and_readme() {
    if !is_git_available() {
        eprintln!("Git not available, skipping test");
        return;
    }

    let base = TempDir::new().expect("temp dir");
    let config = Config::default();
    let templates = ScaffoldTemplates::from_config(&config).expect("templates");

    let repo_path = scaffold::create(base.path(), "papers", &config, &templates)
        .await
        .expect("create");

    let license = std::fs::read_to_string(repo_path.join("LICENSE")).expect("license");
    assert!(license.contains("MIT License"));
    let year = chrono::Local::now().format("%Y").to_string();
    assert!(license.contains(&year), "license missing year {year}");

    let readme = std::fs::read_to_string(repo_path.join("README.md")).expect("readme");
    assert!(readme.contains("# papers"), "got: {readme}");
}

#[tokio::test]
async fn scaffold_honors_remote_prefix_from_config() {
    if !is_git_available() {
        eprintln!("Git not available, skipping test");
        return;
    }

    let base = TempDir::new().expect("temp dir");
    let config = Config {
        remote_prefix: "git@example.com:".to_string(),
        ..Config::default()
    };
    let templates = ScaffoldTemplates::from_config(&config).expect("templates");

    let repo_path = scaffold::create(base.path(), "widget", &config, &templates)
        .await
        .expect("create");

    let remote = git_output(&repo_path, &["remote", "get-url", "origin"]).expect("remote");
    assert_eq!(remote, "git@example.com:widget");
}
