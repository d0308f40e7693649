//! Bug density: share of bug-fix commits among all commits touching a file

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;
use tracing::debug;

use crate::git::history::{FIELD_SEPARATOR, RECORD_SEPARATOR};
use crate::git::{GitError, GitHistory};
use crate::models::BugDensityEntry;

/// Files touched by fewer commits than this are not reported.
pub const MIN_COMMITS_FOR_DENSITY: usize = 5;

fn bug_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(fix|bug|issue|error|broken|crash|repair)").expect("valid regex")
    })
}

/// Whether a commit subject indicates a bug fix
pub fn is_bug_fix(subject: &str) -> bool {
    bug_regex().is_match(subject)
}

pub fn analyze(history: &GitHistory, tracked: &HashSet<String>) -> Result<Vec<BugDensityEntry>, GitError> {
    let output = history.name_only_log()?;
    let entries = parse_name_only_log(&output, tracked);
    debug!("Bug density computed for {} files", entries.len());
    Ok(entries)
}

#[derive(Default)]
struct Tally {
    total: usize,
    bug_fixes: usize,
}

/// Parse separator-delimited `git log --name-only` output.
///
/// Each record is `<hash> US <subject>` followed by the paths the commit
/// touched; a record is always read as a whole, so a file list can never be
/// credited to the neighbouring commit.
pub fn parse_name_only_log(output: &str, tracked: &HashSet<String>) -> Vec<BugDensityEntry> {
    let mut tallies: HashMap<&str, Tally> = HashMap::new();

    for record in output.split(RECORD_SEPARATOR) {
        let mut lines = record.lines();
        let Some(header) = lines.next() else {
            continue;
        };
        if header.trim().is_empty() {
            continue;
        }
        let subject = header.split_once(FIELD_SEPARATOR).map(|(_, s)| s).unwrap_or("");
        let bug_fix = is_bug_fix(subject);

        let files: HashSet<&str> = lines
            .map(str::trim)
            .filter(|f| !f.is_empty() && tracked.contains(*f))
            .collect();
        for file in files {
            let tally = tallies.entry(file).or_default();
            tally.total += 1;
            if bug_fix {
                tally.bug_fixes += 1;
            }
        }
    }

    let mut entries: Vec<BugDensityEntry> = tallies
        .into_iter()
        .filter(|(_, t)| t.total >= MIN_COMMITS_FOR_DENSITY)
        .map(|(path, t)| BugDensityEntry {
            path: path.to_string(),
            total_commits: t.total,
            bug_fixes: t.bug_fixes,
            bug_ratio: t.bug_fixes as f64 / t.total as f64 * 100.0,
        })
        .collect();
    entries.sort_by(|a, b| {
        b.bug_ratio
            .total_cmp(&a.bug_ratio)
            .then_with(|| b.total_commits.cmp(&a.total_commits))
            .then_with(|| a.path.cmp(&b.path))
    });
    entries
}
