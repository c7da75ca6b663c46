//! GitHub repository listing and local-set reconciliation
//!
//! A thin REST client lists the repositories of users and organizations;
//! [`plan_reconcile`] diffs that list against the local checkout names to
//! decide what to clone and what could be pruned.

use std::collections::{HashMap, HashSet};

use anyhow::{bail, Context, Result};
use reqwest::header;
use serde::Deserialize;

const API_BASE: &str = "https://api.github.com";
const PAGE_SIZE: usize = 100;
const USER_AGENT: &str = concat!("repofleet/", env!("CARGO_PKG_VERSION"));

/// A repository as reported by the hosted account
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteRepo {
    pub name: String,
    pub owner: RepoOwner,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoOwner {
    pub login: String,
}

/// Minimal GitHub REST client for repository listing
pub struct GithubClient {
    http: reqwest::Client,
    token: String,
}

impl GithubClient {
    /// Builds a client; an empty token lists public repositories only
    pub fn new(token: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("build http client")?;
        Ok(Self { http, token })
    }

    /// Lists every repository owned by a user
    pub async fn list_user_repos(&self, user: &str) -> Result<Vec<RemoteRepo>> {
        self.list_paged(&format!("{API_BASE}/users/{user}/repos"))
            .await
            .with_context(|| format!("list repos for user {user}"))
    }

    /// Lists every repository of an organization
    pub async fn list_org_repos(&self, org: &str) -> Result<Vec<RemoteRepo>> {
        self.list_paged(&format!("{API_BASE}/orgs/{org}/repos"))
            .await
            .with_context(|| format!("list repos for org {org}"))
    }

    /// Follows pages of 100 until a short page signals the end of the list
    async fn list_paged(&self, url: &str) -> Result<Vec<RemoteRepo>> {
        let mut all = Vec::new();
        for page in 1u32.. {
            let mut request = self
                .http
                .get(url)
                .query(&[
                    ("per_page", PAGE_SIZE.to_string()),
                    ("page", page.to_string()),
                ])
                .header(header::ACCEPT, "application/vnd.github+json");
            if !self.token.is_empty() {
                request = request.bearer_auth(&self.token);
            }

            let response = request
                .send()
                .await
                .with_context(|| format!("fetch page {page}"))?;
            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                bail!("page {page}: HTTP {status}: {}", api_error_message(&body));
            }

            let repos: Vec<RemoteRepo> = response
                .json()
                .await
                .with_context(|| format!("decode page {page}"))?;
            let short_page = repos.len() < PAGE_SIZE;
            all.extend(repos);
            if short_page {
                break;
            }
        }
        Ok(all)
    }
}

/// Extracts the `message` field from a GitHub error body, falling back to the
/// raw text
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

/// One clone action: repository `name` owned by `owner`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneTask {
    pub owner: String,
    pub name: String,
}

impl CloneTask {
    pub fn url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.name)
    }

    /// Clone destination, nested under `<name>/default` for worktree layouts
    pub fn destination(&self, worktree: bool) -> String {
        if worktree {
            format!("{}/default", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Actions needed to reconcile the local checkout set with the hosted list
#[derive(Debug, Default)]
pub struct ReconcilePlan {
    pub to_clone: Vec<CloneTask>,
    pub to_prune: Vec<String>,
}

/// Diffs the hosted repository list against local checkout names
///
/// Archived repositories are dropped unless `include_archived`. Both action
/// lists come back sorted (clones by owner then name, prunes by name) for
/// stable reporting; the first owner wins when two accounts share a
/// repository name.
pub fn plan_reconcile(
    remote: &[RemoteRepo],
    local: &HashSet<String>,
    include_archived: bool,
) -> ReconcilePlan {
    let mut hosted: HashMap<&str, &str> = HashMap::new();
    for repo in remote {
        if repo.archived && !include_archived {
            continue;
        }
        hosted.entry(repo.name.as_str()).or_insert(repo.owner.login.as_str());
    }

    let mut to_clone: Vec<CloneTask> = hosted
        .iter()
        .filter(|(name, _)| !local.contains(**name))
        .map(|(name, owner)| CloneTask {
            owner: (*owner).to_string(),
            name: (*name).to_string(),
        })
        .collect();
    to_clone.sort_by(|a, b| a.owner.cmp(&b.owner).then_with(|| a.name.cmp(&b.name)));

    let mut to_prune: Vec<String> = local
        .iter()
        .filter(|name| !hosted.contains_key(name.as_str()))
        .cloned()
        .collect();
    to_prune.sort();

    ReconcilePlan { to_clone, to_prune }
}
