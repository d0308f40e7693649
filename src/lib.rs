//! blamerank - attribute lint findings to the authors of the offending lines
//!
//! Issues from ESLint or Ruff are resolved to a contributor with `git blame`
//! under a bounded concurrency [`pipeline::Gate`], cached per file by
//! [`git::BlameService`], and folded into thread-safe aggregates that the
//! [`leaderboard`] module ranks. The [`metrics`] module adds history- and
//! content-based leaderboards (churn, bug density, debt, lines of code,
//! coverage, commit activity, spelling).
//!
//! ```no_run
//! use std::sync::Arc;
//! use blamerank::config::{IgnorePolicy, ProjectConfig};
//! use blamerank::git::{BlameService, SystemGit};
//! use blamerank::models::Issue;
//! use blamerank::pipeline::{Aggregator, AttributionPipeline, Gate};
//!
//! # fn main() -> anyhow::Result<()> {
//! let policy: Arc<dyn IgnorePolicy> = Arc::new(ProjectConfig::default());
//! let blame = Arc::new(BlameService::new(Arc::new(SystemGit::new("."))));
//! let gate = Arc::new(Gate::new(policy.concurrency_limit())?);
//! let aggregator = Arc::new(Aggregator::new(policy));
//!
//! let issues = vec![Issue::new("src/app.js", 12, "no-console", 2)];
//! let stats = AttributionPipeline::new(blame, gate, Arc::clone(&aggregator)).run(&issues)?;
//! println!("{}", stats.summary());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod git;
pub mod leaderboard;
pub mod linters;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod reporters;
