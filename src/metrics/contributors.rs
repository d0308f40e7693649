//! Commit-count and recent-activity leaderboards

use std::collections::HashMap;

use crate::config::IgnorePolicy;
use crate::git::{CommitInfo, GitError, GitHistory};
use crate::models::{CommitCountEntry, RecentContributorEntry};

/// Default window for the recent-contributors board, in days
pub const DEFAULT_RECENT_DAYS: u32 = 30;

/// Commits per author over the whole history, most active first.
pub fn commit_counts(history: &GitHistory, policy: &dyn IgnorePolicy) -> Result<Vec<CommitCountEntry>, GitError> {
    Ok(count_commits(&history.commits(None)?, policy))
}

/// Commits per author within the last `days` days.
pub fn recent_contributors(
    history: &GitHistory,
    days: u32,
    policy: &dyn IgnorePolicy,
) -> Result<Vec<RecentContributorEntry>, GitError> {
    Ok(count_recent(&history.commits(Some(days))?, policy))
}

pub fn count_commits(commits: &[CommitInfo], policy: &dyn IgnorePolicy) -> Vec<CommitCountEntry> {
    let mut by_email: HashMap<&str, CommitCountEntry> = HashMap::new();

    for commit in commits {
        if policy.should_ignore_author(&commit.author_email, &commit.author) {
            continue;
        }
        let entry = by_email
            .entry(commit.author_email.as_str())
            .or_insert_with(|| CommitCountEntry {
                name: commit.author.clone(),
                email: commit.author_email.clone(),
                commits: 0,
                merges: 0,
                first_commit: commit.timestamp,
                last_commit: commit.timestamp,
            });
        entry.commits += 1;
        if commit.is_merge() {
            entry.merges += 1;
        }
        if commit.timestamp < entry.first_commit {
            entry.first_commit = commit.timestamp;
        }
        // Show the name used most recently.
        if commit.timestamp > entry.last_commit {
            entry.last_commit = commit.timestamp;
            entry.name = commit.author.clone();
        }
    }

    let mut entries: Vec<CommitCountEntry> = by_email.into_values().collect();
    entries.sort_by(|a, b| b.commits.cmp(&a.commits).then_with(|| a.email.cmp(&b.email)));
    entries
}

pub fn count_recent(commits: &[CommitInfo], policy: &dyn IgnorePolicy) -> Vec<RecentContributorEntry> {
    let mut by_email: HashMap<&str, RecentContributorEntry> = HashMap::new();

    for commit in commits {
        if policy.should_ignore_author(&commit.author_email, &commit.author) {
            continue;
        }
        let entry = by_email
            .entry(commit.author_email.as_str())
            .or_insert_with(|| RecentContributorEntry {
                name: commit.author.clone(),
                email: commit.author_email.clone(),
                commits: 0,
                last_activity: commit.timestamp,
            });
        entry.commits += 1;
        // Show the name used most recently.
        if commit.timestamp > entry.last_activity {
            entry.last_activity = commit.timestamp;
            entry.name = commit.author.clone();
        }
    }

    let mut entries: Vec<RecentContributorEntry> = by_email.into_values().collect();
    entries.sort_by(|a, b| {
        b.commits
            .cmp(&a.commits)
            .then_with(|| b.last_activity.cmp(&a.last_activity))
            .then_with(|| a.email.cmp(&b.email))
    });
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IgnoreConfig, ProjectConfig};
    use chrono::{TimeZone, Utc};

    fn commit(name: &str, email: &str, ts: i64, parents: usize) -> CommitInfo {
        CommitInfo {
            hash: format!("{:040x}", ts),
            author: name.into(),
            author_email: email.into(),
            timestamp: Utc.timestamp_opt(ts, 0).unwrap(),
            parents,
        }
    }

    #[test]
    fn test_count_commits() {
        let commits = vec![
            commit("Alice Smith", "alice@x", 300, 2),
            commit("Bob", "bob@x", 200, 1),
            commit("Alice", "alice@x", 100, 1),
        ];
        let entries = count_commits(&commits, &ProjectConfig::default());
        assert_eq!(entries.len(), 2);
        let alice = &entries[0];
        assert_eq!(alice.email, "alice@x");
        assert_eq!(alice.name, "Alice Smith");
        assert_eq!(alice.commits, 2);
        assert_eq!(alice.merges, 1);
        assert_eq!(alice.first_commit.timestamp(), 100);
        assert_eq!(alice.last_commit.timestamp(), 300);
    }

    #[test]
    fn test_ignored_authors_are_skipped() {
        let config = ProjectConfig::with_ignore(IgnoreConfig {
            authors: vec!["bot".into()],
            ..Default::default()
        });
        let commits = vec![
            commit("dependabot[bot]", "bot@github.com", 10, 1),
            commit("Alice", "alice@x", 20, 1),
        ];
        assert_eq!(count_commits(&commits, &config).len(), 1);
        assert_eq!(count_recent(&commits, &config).len(), 1);
    }

    #[test]
    fn test_count_recent_orders_by_commits_then_activity() {
        let commits = vec![
            commit("Bob", "bob@x", 500, 1),
            commit("Carol", "carol@x", 400, 1),
            commit("Alice", "alice@x", 300, 1),
            commit("Alice", "alice@x", 100, 1),
        ];
        let entries = count_recent(&commits, &ProjectConfig::default());
        let order: Vec<&str> = entries.iter().map(|e| e.email.as_str()).collect();
        assert_eq!(order, vec!["alice@x", "bob@x", "carol@x"]);
        assert_eq!(entries[0].last_activity.timestamp(), 300);
    }

    #[test]
    fn test_latest_name_wins_in_any_order() {
        let commits = vec![
            commit("Alice", "alice@x", 100, 1),
            commit("Alice Smith", "alice@x", 300, 1),
        ];
        assert_eq!(count_commits(&commits, &ProjectConfig::default())[0].name, "Alice Smith");
        assert_eq!(count_recent(&commits, &ProjectConfig::default())[0].name, "Alice Smith");
    }
}
