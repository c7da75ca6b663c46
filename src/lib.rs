//! # repofleet
//!
//! `repofleet` manages a local collection of git checkouts: it scaffolds new
//! repositories, pulls remote updates into existing checkouts over a bounded
//! worker pool, and reconciles the local checkout set against the repository
//! list of a GitHub account. It powers the `repofleet` CLI tool.
//!
//! ## Example
//!
//! ```rust,no_run
//! use repofleet::core::list_targets;
//! use repofleet::sync::sync_all;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let targets = list_targets(std::path::Path::new("."))?;
//!     let mut outcomes = sync_all(targets, 5);
//!     while let Some(outcome) = outcomes.recv().await {
//!         eprintln!("{}: {}", outcome.name, outcome.describe());
//!     }
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod config;
pub mod core;
pub mod git;
pub mod github;
pub mod scaffold;
pub mod sync;
