//! Git access
//!
//! All history and blame data comes from the `git` command line through the
//! [`GitRunner`] seam:
//!
//! - [`BlameService`] caches per-file line attribution for a run
//! - [`GitHistory`] reads tracked files and commit logs for the extractors
//!
//! # Example
//!
//! ```no_run
//! use blamerank::git::{BlameService, GitHistory, SystemGit};
//! use blamerank::pipeline::gate::Gate;
//! use std::sync::{Arc, Mutex};
//!
//! let git = Arc::new(SystemGit::new("/path/to/repo"));
//! GitHistory::new(git.clone()).validate().unwrap();
//!
//! let blame = BlameService::new(git);
//! let warnings = Mutex::new(Vec::<String>::new());
//! let index = blame.attribute("src/main.js", &Gate::default(), &warnings).unwrap();
//! println!("{} attributed lines", index.len());
//! ```

pub mod blame;
pub mod history;
pub mod runner;

pub use blame::{BlameError, BlameService, WarningSink};
pub use history::{CommitInfo, GitHistory};
pub use runner::{GitError, GitRunner, SystemGit};
