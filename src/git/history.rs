//! Repository queries over the git command line
//!
//! Repository discovery uses libgit2; everything that reads history shells
//! out through the [`GitRunner`] seam so tests can feed canned log output.

use chrono::{DateTime, TimeZone, Utc};
use git2::Repository;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::runner::{GitError, GitRunner};

/// Upper bound for whole-history `git log` walks
pub const LOG_TIMEOUT: Duration = Duration::from_secs(300);

/// Separates commit records in formatted log output
pub const RECORD_SEPARATOR: char = '\u{1e}';
/// Separates fields inside a commit header
pub const FIELD_SEPARATOR: char = '\u{1f}';

/// A commit as seen by the contributor leaderboards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub hash: String,
    pub author: String,
    pub author_email: String,
    pub timestamp: DateTime<Utc>,
    /// Number of parent commits (>1 for merges)
    pub parents: usize,
}

impl CommitInfo {
    pub fn is_merge(&self) -> bool {
        self.parents > 1
    }
}

/// Find the working-tree root of the repository containing `path`.
pub fn discover_root(path: &Path) -> Result<PathBuf, GitError> {
    let repo = Repository::discover(path)
        .map_err(|_| GitError::NotARepository(path.display().to_string()))?;
    let root = repo
        .workdir()
        .ok_or_else(|| GitError::NotARepository(format!("{} (bare repository)", path.display())))?
        .to_path_buf();
    debug!("Opened git repository at {}", root.display());
    Ok(root)
}

/// Check if a path is inside a git repository.
pub fn is_git_repo(path: &Path) -> bool {
    Repository::discover(path).is_ok()
}

/// History reader for one repository.
#[derive(Clone)]
pub struct GitHistory {
    runner: Arc<dyn GitRunner>,
}

impl GitHistory {
    pub fn new(runner: Arc<dyn GitRunner>) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> Arc<dyn GitRunner> {
        Arc::clone(&self.runner)
    }

    /// Confirm git works and the working directory is a repository.
    pub fn validate(&self) -> Result<(), GitError> {
        match self.runner.run(&["rev-parse", "--git-dir"], Some(Duration::from_secs(10))) {
            Ok(_) => Ok(()),
            Err(GitError::Failed { stderr, .. }) => Err(GitError::NotARepository(stderr)),
            Err(e) => Err(e),
        }
    }

    /// Paths tracked in the index, forward slashes
    pub fn tracked_files(&self) -> Result<HashSet<String>, GitError> {
        let output = self.runner.run(&["ls-files"], Some(LOG_TIMEOUT))?;
        let files: HashSet<String> = output
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| l.replace('\\', "/"))
            .collect();
        debug!("{} tracked files", files.len());
        Ok(files)
    }

    /// `git log --numstat` with empty commit headers.
    pub fn numstat_log(&self) -> Result<String, GitError> {
        self.runner
            .run(&["log", "--numstat", "--pretty=format:"], Some(LOG_TIMEOUT))
    }

    /// `git log --name-only` with one separator-delimited record per commit:
    /// `RS <hash> US <subject>` followed by the touched paths.
    pub fn name_only_log(&self) -> Result<String, GitError> {
        let format = format!("--pretty=format:{RECORD_SEPARATOR}%H{FIELD_SEPARATOR}%s");
        self.runner
            .run(&["log", "--name-only", &format], Some(LOG_TIMEOUT))
    }

    /// All commits reachable from HEAD, optionally limited to the last `since_days` days.
    pub fn commits(&self, since_days: Option<u32>) -> Result<Vec<CommitInfo>, GitError> {
        let format = format!(
            "--pretty=format:%H{sep}%an{sep}%ae{sep}%at{sep}%P",
            sep = FIELD_SEPARATOR
        );
        let since = since_days.map(|d| format!("--since={} days ago", d));
        let mut args = vec!["log", format.as_str()];
        if let Some(since) = since.as_deref() {
            args.push(since);
        }
        let output = self.runner.run(&args, Some(LOG_TIMEOUT))?;
        Ok(parse_commits(&output))
    }
}

/// Parse `hash US name US email US unix-time US parents` lines.
pub fn parse_commits(output: &str) -> Vec<CommitInfo> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split(FIELD_SEPARATOR);
            let hash = fields.next()?.trim();
            let author = fields.next()?.trim();
            let author_email = fields.next()?.trim();
            let secs: i64 = fields.next()?.trim().parse().ok()?;
            let parents = fields
                .next()
                .map(|p| p.split_whitespace().count())
                .unwrap_or(0);
            if hash.is_empty() || author_email.is_empty() {
                return None;
            }
            let timestamp = Utc.timestamp_opt(secs, 0).single()?;
            Some(CommitInfo {
                hash: hash.to_string(),
                author: author.to_string(),
                author_email: author_email.to_string(),
                timestamp,
                parents,
            })
        })
        .collect()
}
