//! Concurrent statistics aggregation
//!
//! One mutex guards the author, file and rule maps together with the warning
//! log, so a snapshot never sees an issue counted in one map but not another.

use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::config::IgnorePolicy;
use crate::git::WarningSink;
use crate::models::{AuthorStats, BlameInfo, FileStats, Issue, RuleStats};

/// Consistent copy of all aggregates, taken under the lock.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregateSnapshot {
    pub authors: HashMap<String, AuthorStats>,
    pub files: HashMap<String, FileStats>,
    pub rules: HashMap<String, RuleStats>,
    pub warnings: Vec<String>,
}

impl AggregateSnapshot {
    /// Total recorded issues
    pub fn total_issues(&self) -> usize {
        self.rules.values().map(|r| r.count).sum()
    }
}

/// Thread-safe accumulator for attributed issues.
pub struct Aggregator {
    policy: Arc<dyn IgnorePolicy>,
    state: Mutex<AggregateSnapshot>,
}

impl Aggregator {
    pub fn new(policy: Arc<dyn IgnorePolicy>) -> Self {
        Self {
            policy,
            state: Mutex::new(AggregateSnapshot::default()),
        }
    }

    /// Record one attributed issue. Returns `false` if the exclusion policy
    /// rejected it.
    ///
    /// Every call counts as a new occurrence; callers deduplicate.
    pub fn record(&self, issue: &Issue, blame: &BlameInfo) -> bool {
        if self.policy.should_ignore_file(&issue.file_path)
            || self.policy.should_ignore_rule(&issue.rule_id)
            || self.policy.should_ignore_author(&blame.email, &blame.name)
        {
            return false;
        }

        let now = Utc::now();
        let is_error = issue.is_error();
        let mut state = self.state.lock().expect("aggregator lock poisoned");

        let author = state
            .authors
            .entry(blame.email.clone())
            .or_insert_with(|| AuthorStats::new(blame, now));
        author.count += 1;
        *author.rules.entry(issue.rule_id.clone()).or_insert(0) += 1;
        *author.files.entry(issue.file_path.clone()).or_insert(0) += 1;
        if is_error {
            author.errors += 1;
        } else {
            author.warnings += 1;
        }
        // The most recently observed display name wins.
        if now >= author.last_seen {
            author.last_seen = now;
            author.name = blame.name.clone();
        }

        let file = state
            .files
            .entry(issue.file_path.clone())
            .or_insert_with(|| FileStats::new(&issue.file_path));
        file.count += 1;
        *file.rules.entry(issue.rule_id.clone()).or_insert(0) += 1;
        *file.authors.entry(blame.email.clone()).or_insert(0) += 1;
        if is_error {
            file.errors += 1;
        } else {
            file.warnings += 1;
        }

        let rule = state
            .rules
            .entry(issue.rule_id.clone())
            .or_insert_with(|| RuleStats::new(&issue.rule_id));
        rule.count += 1;
        *rule.authors.entry(blame.email.clone()).or_insert(0) += 1;
        *rule.files.entry(issue.file_path.clone()).or_insert(0) += 1;
        if is_error {
            rule.errors += 1;
        } else {
            rule.warnings += 1;
        }

        true
    }

    pub fn policy(&self) -> &dyn IgnorePolicy {
        self.policy.as_ref()
    }

    pub fn snapshot(&self) -> AggregateSnapshot {
        self.state.lock().expect("aggregator lock poisoned").clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.state
            .lock()
            .expect("aggregator lock poisoned")
            .warnings
            .clone()
    }

    pub fn into_snapshot(self) -> AggregateSnapshot {
        self.state.into_inner().expect("aggregator lock poisoned")
    }
}

impl WarningSink for Aggregator {
    fn push_warning(&self, message: String) {
        self.state
            .lock()
            .expect("aggregator lock poisoned")
            .warnings
            .push(message);
    }
}
