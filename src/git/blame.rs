//! Git blame integration for line-level ownership
//!
//! [`BlameService`] runs `git blame --line-porcelain` once per file, caches
//! the parsed [`BlameIndex`] for the rest of the run and memoizes failures so
//! a file that could not be blamed is never retried.

use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use super::runner::{GitError, GitRunner};
use crate::models::{BlameIndex, BlameInfo};
use crate::pipeline::gate::Gate;

/// Upper bound for a single `git blame` invocation
pub const BLAME_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum BlameError {
    #[error("git blame failed for {path}: {source}")]
    Failed {
        path: String,
        #[source]
        source: GitError,
    },

    #[error("git blame previously failed for {path}: {reason}")]
    PreviouslyFailed { path: String, reason: String },
}

impl BlameError {
    pub fn path(&self) -> &str {
        match self {
            BlameError::Failed { path, .. } | BlameError::PreviouslyFailed { path, .. } => path,
        }
    }
}

/// Destination for non-fatal failure messages.
pub trait WarningSink: Send + Sync {
    fn push_warning(&self, message: String);
}

impl WarningSink for Mutex<Vec<String>> {
    fn push_warning(&self, message: String) {
        self.lock().expect("warning log lock poisoned").push(message);
    }
}

/// Terminal state of one file's attribution
#[derive(Debug)]
enum Outcome {
    Attributed(Arc<BlameIndex>),
    Failed(String),
}

/// Set once per path; callers racing on an uncached path wait on it.
type Slot = Arc<OnceLock<Outcome>>;

/// Per-run blame cache shared by every caller that needs line attribution.
pub struct BlameService {
    runner: Arc<dyn GitRunner>,
    timeout: Duration,
    slots: Mutex<HashMap<String, Slot>>,
}

impl BlameService {
    pub fn new(runner: Arc<dyn GitRunner>) -> Self {
        Self {
            runner,
            timeout: BLAME_TIMEOUT,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Blame `path`, holding a permit from `gate` while git runs.
    ///
    /// Failures are reported to `warnings` the first time only; later calls
    /// for the same path return [`BlameError::PreviouslyFailed`] without
    /// running git again.
    pub fn attribute(
        &self,
        path: &str,
        gate: &Gate,
        warnings: &dyn WarningSink,
    ) -> Result<Arc<BlameIndex>, BlameError> {
        let key = normalize_path(path);
        let slot = {
            let mut slots = self.slots.lock().expect("blame cache lock poisoned");
            Arc::clone(slots.entry(key.clone()).or_default())
        };

        let mut fresh_error: Option<GitError> = None;
        let outcome = slot.get_or_init(|| match self.blame_file(&key, gate) {
            Ok(index) => Outcome::Attributed(Arc::new(index)),
            Err(e) => {
                let reason = e.to_string();
                warn!("git blame failed for {}: {}", key, reason);
                warnings.push_warning(format!("git blame failed for {}: {}", key, reason));
                fresh_error = Some(e);
                Outcome::Failed(reason)
            }
        });

        match outcome {
            Outcome::Attributed(index) => Ok(Arc::clone(index)),
            Outcome::Failed(reason) => match fresh_error {
                Some(source) => Err(BlameError::Failed { path: key, source }),
                None => {
                    debug!("Skipping {} (blame previously failed)", key);
                    Err(BlameError::PreviouslyFailed {
                        path: key,
                        reason: reason.clone(),
                    })
                }
            },
        }
    }

    fn blame_file(&self, path: &str, gate: &Gate) -> Result<BlameIndex, GitError> {
        let _permit = gate.acquire();
        let output = self.runner.run(
            &["blame", "--line-porcelain", "--", path],
            Some(self.timeout),
        )?;
        let index = parse_porcelain(&output);
        debug!("Blamed {} ({} attributed lines)", path, index.len());
        Ok(index)
    }

    /// Number of files with a cached blame index
    pub fn cached_files(&self) -> usize {
        self.slots
            .lock()
            .expect("blame cache lock poisoned")
            .values()
            .filter(|slot| matches!(slot.get(), Some(Outcome::Attributed(_))))
            .count()
    }

    /// Paths whose blame failed, sorted
    pub fn failed_files(&self) -> Vec<String> {
        let slots = self.slots.lock().expect("blame cache lock poisoned");
        let mut failed: Vec<String> = slots
            .iter()
            .filter(|(_, slot)| matches!(slot.get(), Some(Outcome::Failed(_))))
            .map(|(path, _)| path.clone())
            .collect();
        failed.sort();
        failed
    }
}

/// Cache key form of a path: forward slashes only.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

fn header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9a-f]{40}(?:[0-9a-f]{24})? ").expect("valid regex"))
}

/// Parse `git blame --line-porcelain` output.
///
/// Records without an email or a line number are skipped.
pub fn parse_porcelain(output: &str) -> BlameIndex {
    let mut index = BlameIndex::new();
    let mut line_no: u32 = 0;
    let mut name = String::new();
    let mut email = String::new();

    for line in output.lines() {
        if line.starts_with('\t') {
            if !email.is_empty() && line_no > 0 {
                index.insert(line_no, BlameInfo::new(name.as_str(), email.as_str()));
            }
            name.clear();
            email.clear();
        } else if header_regex().is_match(line) {
            // <sha> <orig-line> <final-line> [<group-size>]
            line_no = line
                .split_whitespace()
                .nth(2)
                .and_then(|n| n.parse().ok())
                .unwrap_or(0);
        } else if let Some(rest) = line.strip_prefix("author-mail ") {
            email = rest.trim().trim_start_matches('<').trim_end_matches('>').to_string();
        } else if let Some(rest) = line.strip_prefix("author ") {
            name = rest.trim().to_string();
        }
    }

    index
}
