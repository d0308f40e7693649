//! Code churn from `git log --numstat`

use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::git::{GitError, GitHistory};
use crate::models::ChurnEntry;

/// Churn for every tracked file, most frequently changed first.
pub fn analyze(history: &GitHistory, tracked: &HashSet<String>) -> Result<Vec<ChurnEntry>, GitError> {
    let output = history.numstat_log()?;
    let entries = parse_numstat(&output, tracked);
    debug!("Churn computed for {} files", entries.len());
    Ok(entries)
}

/// Fold `added<TAB>deleted<TAB>path` lines into per-file churn.
///
/// Binary entries (`-`) count as a change with no lines; untracked paths and
/// malformed lines are skipped.
pub fn parse_numstat(output: &str, tracked: &HashSet<String>) -> Vec<ChurnEntry> {
    let mut churn: HashMap<String, ChurnEntry> = HashMap::new();

    for line in output.lines() {
        let mut fields = line.splitn(3, '\t');
        let (Some(added), Some(deleted), Some(path)) = (fields.next(), fields.next(), fields.next())
        else {
            continue;
        };
        let (Some(added), Some(deleted)) = (line_count(added), line_count(deleted)) else {
            continue;
        };

        let path = renamed_path(path.trim());
        if !tracked.contains(&path) {
            continue;
        }

        let entry = churn.entry(path.clone()).or_insert_with(|| ChurnEntry {
            path,
            ..Default::default()
        });
        entry.changes += 1;
        entry.lines_added += added;
        entry.lines_deleted += deleted;
        entry.net_lines += added as i64 - deleted as i64;
    }

    let mut entries: Vec<ChurnEntry> = churn.into_values().collect();
    entries.sort_by(|a, b| b.changes.cmp(&a.changes).then_with(|| a.path.cmp(&b.path)));
    entries
}

fn line_count(field: &str) -> Option<u64> {
    match field.trim() {
        "-" => Some(0),
        n => n.parse().ok(),
    }
}

/// Destination path of a numstat rename (`old => new`, `dir/{a => b}/f`).
fn renamed_path(path: &str) -> String {
    if !path.contains(" => ") {
        return path.to_string();
    }
    if let (Some(open), Some(close)) = (path.find('{'), path.rfind('}')) {
        if open < close {
            let inner = &path[open + 1..close];
            let new = inner.split(" => ").nth(1).unwrap_or(inner);
            let joined = format!("{}{}{}", &path[..open], new, &path[close + 1..]);
            return joined.replace("//", "/");
        }
    }
    path.split(" => ").nth(1).unwrap_or(path).to_string()
}
