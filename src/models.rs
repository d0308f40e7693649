//! Core data models for blamerank
//!
//! These models are shared by the attribution pipeline, the derived-metric
//! extractors and the reporters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Severity level that marks an issue as an error; anything else is a warning.
pub const ERROR_SEVERITY: u8 = 2;

/// Contributor responsible for a single source line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlameInfo {
    /// Author display name
    pub name: String,
    /// Author email (without angle brackets)
    pub email: String,
}

impl BlameInfo {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Per-file mapping from 1-based line number to the contributor of that line.
///
/// Only attributable lines are present. Lines are kept in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlameIndex {
    lines: BTreeMap<u32, BlameInfo>,
}

impl BlameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, line: u32, info: BlameInfo) {
        self.lines.insert(line, info);
    }

    pub fn get(&self, line: u32) -> Option<&BlameInfo> {
        self.lines.get(&line)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &BlameInfo)> {
        self.lines.iter().map(|(line, info)| (*line, info))
    }

    /// Smallest attributed line at or after `line`, else the last attributed line.
    pub fn nearest_at_or_after(&self, line: u32) -> Option<u32> {
        self.lines
            .range(line..)
            .next()
            .or_else(|| self.lines.iter().next_back())
            .map(|(l, _)| *l)
    }
}

impl FromIterator<(u32, BlameInfo)> for BlameIndex {
    fn from_iter<T: IntoIterator<Item = (u32, BlameInfo)>>(iter: T) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}

/// A lint finding at a specific file and line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Path relative to the repository root, forward slashes
    pub file_path: String,
    /// 1-based line number
    pub line: u32,
    pub rule_id: String,
    /// 2 = error, anything else = warning
    pub severity: u8,
    #[serde(default)]
    pub message: String,
}

impl Issue {
    pub fn new(file_path: impl Into<String>, line: u32, rule_id: impl Into<String>, severity: u8) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            rule_id: rule_id.into(),
            severity,
            message: String::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == ERROR_SEVERITY
    }
}

/// Running tallies for one contributor, keyed by email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorStats {
    pub name: String,
    pub email: String,
    pub count: usize,
    pub rules: HashMap<String, usize>,
    pub files: HashMap<String, usize>,
    pub errors: usize,
    pub warnings: usize,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl AuthorStats {
    pub fn new(blame: &BlameInfo, now: DateTime<Utc>) -> Self {
        Self {
            name: blame.name.clone(),
            email: blame.email.clone(),
            count: 0,
            rules: HashMap::new(),
            files: HashMap::new(),
            errors: 0,
            warnings: 0,
            first_seen: now,
            last_seen: now,
        }
    }

    /// Rule with the highest count (ties broken alphabetically)
    pub fn top_rule(&self) -> Option<(&str, usize)> {
        top_entry(&self.rules)
    }
}

/// Running tallies for one file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileStats {
    pub path: String,
    pub count: usize,
    pub errors: usize,
    pub warnings: usize,
    pub rules: HashMap<String, usize>,
    pub authors: HashMap<String, usize>,
}

impl FileStats {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            ..Default::default()
        }
    }

    pub fn top_rule(&self) -> Option<(&str, usize)> {
        top_entry(&self.rules)
    }
}

/// Running tallies for one lint rule
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleStats {
    pub rule_id: String,
    pub count: usize,
    pub errors: usize,
    pub warnings: usize,
    pub authors: HashMap<String, usize>,
    pub files: HashMap<String, usize>,
}

impl RuleStats {
    pub fn new(rule_id: &str) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            ..Default::default()
        }
    }
}

fn top_entry(map: &HashMap<String, usize>) -> Option<(&str, usize)> {
    map.iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(k, v)| (k.as_str(), *v))
}

/// Commit churn for one tracked file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChurnEntry {
    pub path: String,
    /// Number of commits that touched the file
    pub changes: usize,
    pub lines_added: u64,
    pub lines_deleted: u64,
    pub net_lines: i64,
}

/// Share of bug-fix commits among all commits touching a file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BugDensityEntry {
    pub path: String,
    pub total_commits: usize,
    pub bug_fixes: usize,
    /// Percentage in [0, 100]
    pub bug_ratio: f64,
}

/// TODO/FIXME/HACK marker counts for one file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TechnicalDebtEntry {
    pub path: String,
    pub todos: usize,
    pub fixmes: usize,
    pub hacks: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinesOfCodeEntry {
    pub path: String,
    pub lines: usize,
    pub bytes: u64,
}

/// Test coverage for one source file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoverageEntry {
    pub path: String,
    pub lines_hit: u64,
    pub lines_found: u64,
    pub functions_hit: u64,
    pub functions_found: u64,
    pub branches_hit: u64,
    pub branches_found: u64,
}

impl CoverageEntry {
    pub fn line_coverage(&self) -> f64 {
        percentage(self.lines_hit, self.lines_found)
    }

    pub fn function_coverage(&self) -> f64 {
        percentage(self.functions_hit, self.functions_found)
    }

    pub fn branch_coverage(&self) -> f64 {
        percentage(self.branches_hit, self.branches_found)
    }
}

/// Hit/found percentage; an empty denominator counts as fully covered.
fn percentage(hit: u64, found: u64) -> f64 {
    if found == 0 {
        100.0
    } else {
        hit as f64 / found as f64 * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitCountEntry {
    pub name: String,
    pub email: String,
    pub commits: usize,
    pub merges: usize,
    pub first_commit: DateTime<Utc>,
    pub last_commit: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentContributorEntry {
    pub name: String,
    pub email: String,
    pub commits: usize,
    pub last_activity: DateTime<Utc>,
}

/// Spelling results for one file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpellingEntry {
    pub path: String,
    pub words_checked: usize,
    pub errors: usize,
    /// Errors per 100 words checked
    pub error_rate: f64,
    pub misspellings: HashMap<String, usize>,
    /// Likely corrections per misspelled word
    pub suggestions: HashMap<String, Vec<String>>,
}

/// Misspellings attributed to one contributor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpellingAuthorEntry {
    pub name: String,
    pub email: String,
    pub errors: usize,
    pub files: HashMap<String, usize>,
    pub misspellings: HashMap<String, usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(lines: &[u32]) -> BlameIndex {
        lines
            .iter()
            .map(|l| (*l, BlameInfo::new("A", "a@x")))
            .collect()
    }

    #[test]
    fn test_nearest_at_or_after() {
        let idx = index(&[5, 10, 20]);
        assert_eq!(idx.nearest_at_or_after(7), Some(10));
        assert_eq!(idx.nearest_at_or_after(10), Some(10));
        assert_eq!(idx.nearest_at_or_after(25), Some(20));
        assert_eq!(idx.nearest_at_or_after(3), Some(5));
    }

    #[test]
    fn test_nearest_on_empty_index() {
        assert_eq!(BlameIndex::new().nearest_at_or_after(1), None);
    }

    #[test]
    fn test_issue_severity() {
        assert!(Issue::new("a.js", 1, "no-console", 2).is_error());
        assert!(!Issue::new("a.js", 1, "no-console", 1).is_error());
        assert!(!Issue::new("a.js", 1, "no-console", 0).is_error());
    }

    #[test]
    fn test_top_rule_prefers_count_then_name() {
        let mut stats = FileStats::new("a.js");
        stats.rules.insert("semi".into(), 2);
        stats.rules.insert("eqeqeq".into(), 2);
        stats.rules.insert("quotes".into(), 1);
        assert_eq!(stats.top_rule(), Some(("eqeqeq", 2)));
    }

    #[test]
    fn test_coverage_percentages() {
        let entry = CoverageEntry {
            path: "a.js".into(),
            lines_hit: 3,
            lines_found: 4,
            ..Default::default()
        };
        assert!((entry.line_coverage() - 75.0).abs() < f64::EPSILON);
        assert!((entry.function_coverage() - 100.0).abs() < f64::EPSILON);
    }
}
