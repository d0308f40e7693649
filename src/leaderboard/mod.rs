//! Rankings built from an aggregate snapshot
//!
//! Every board sorts by count descending and breaks ties on its key, so two
//! runs over the same history print the same order.

use serde::Serialize;
use std::collections::HashMap;

use crate::models::{AuthorStats, FileStats, RuleStats};
use crate::pipeline::AggregateSnapshot;

/// Shown when an entity has no rules recorded
const NO_RULE: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorEntry {
    pub name: String,
    pub email: String,
    pub count: usize,
    pub errors: usize,
    pub warnings: usize,
    pub files: usize,
    pub top_rule: String,
    pub top_rule_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub path: String,
    pub count: usize,
    pub errors: usize,
    pub warnings: usize,
    pub authors: usize,
    pub top_rule: String,
    pub top_rule_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleEntry {
    pub rule_id: String,
    pub count: usize,
    pub errors: usize,
    pub warnings: usize,
    pub authors: usize,
    pub files: usize,
}

/// Run-wide totals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_issues: usize,
    pub authors: usize,
    pub files: usize,
    pub rules: usize,
    pub errors: usize,
    pub warnings: usize,
    /// Entries in the warning log (failed attributions and the like)
    pub warning_count: usize,
}

pub fn authors(stats: &HashMap<String, AuthorStats>, top: usize) -> Vec<AuthorEntry> {
    let mut entries: Vec<AuthorEntry> = stats
        .values()
        .map(|a| {
            let (top_rule, top_rule_count) = a.top_rule().unwrap_or((NO_RULE, 0));
            AuthorEntry {
                name: a.name.clone(),
                email: a.email.clone(),
                count: a.count,
                errors: a.errors,
                warnings: a.warnings,
                files: a.files.len(),
                top_rule: top_rule.to_string(),
                top_rule_count,
            }
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.email.cmp(&b.email)));
    truncate(entries, top)
}

pub fn files(stats: &HashMap<String, FileStats>, top: usize) -> Vec<FileEntry> {
    let mut entries: Vec<FileEntry> = stats
        .values()
        .map(|f| {
            let (top_rule, top_rule_count) = f.top_rule().unwrap_or((NO_RULE, 0));
            FileEntry {
                path: f.path.clone(),
                count: f.count,
                errors: f.errors,
                warnings: f.warnings,
                authors: f.authors.len(),
                top_rule: top_rule.to_string(),
                top_rule_count,
            }
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.path.cmp(&b.path)));
    truncate(entries, top)
}

pub fn rules(stats: &HashMap<String, RuleStats>, top: usize) -> Vec<RuleEntry> {
    let mut entries: Vec<RuleEntry> = stats
        .values()
        .map(|r| RuleEntry {
            rule_id: r.rule_id.clone(),
            count: r.count,
            errors: r.errors,
            warnings: r.warnings,
            authors: r.authors.len(),
            files: r.files.len(),
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.rule_id.cmp(&b.rule_id)));
    truncate(entries, top)
}

pub fn summarize(snapshot: &AggregateSnapshot) -> Summary {
    Summary {
        total_issues: snapshot.total_issues(),
        authors: snapshot.authors.len(),
        files: snapshot.files.len(),
        rules: snapshot.rules.len(),
        errors: snapshot.rules.values().map(|r| r.errors).sum(),
        warnings: snapshot.rules.values().map(|r| r.warnings).sum(),
        warning_count: snapshot.warnings.len(),
    }
}

/// Keep the first `top` entries; 0 keeps everything.
pub fn truncate<T>(mut entries: Vec<T>, top: usize) -> Vec<T> {
    if top > 0 {
        entries.truncate(top);
    }
    entries
}
