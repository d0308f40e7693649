//! End-to-end attribution against real git repositories

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use blamerank::config::{IgnoreConfig, IgnorePolicy, ProjectConfig};
use blamerank::git::{BlameService, GitHistory, GitRunner, SystemGit};
use blamerank::leaderboard;
use blamerank::metrics::{churn, contributors, debt, spelling};
use blamerank::models::Issue;
use blamerank::pipeline::{Aggregator, AttributionPipeline, Gate};
use common::{setup_repo, ALICE, BOB};

fn pipeline_for(root: &std::path::Path, policy: ProjectConfig) -> (AttributionPipeline, Arc<Aggregator>, Arc<BlameService>) {
    let runner: Arc<dyn GitRunner> = Arc::new(SystemGit::new(root));
    let blame = Arc::new(BlameService::new(runner));
    let gate = Arc::new(Gate::new(2).unwrap());
    let aggregator = Arc::new(Aggregator::new(Arc::new(policy)));
    let pipeline = AttributionPipeline::new(Arc::clone(&blame), gate, Arc::clone(&aggregator));
    (pipeline, aggregator, blame)
}

#[test]
fn test_issues_attributed_to_line_authors() {
    let repo = setup_repo();
    let (pipeline, aggregator, blame) = pipeline_for(repo.path(), ProjectConfig::default());

    let issues = vec![
        Issue::new("a.js", 1, "no-console", 2),
        Issue::new("a.js", 3, "no-var", 1),
        Issue::new("b.py", 1, "F401", 1),
    ];
    let stats = pipeline.run(&issues).unwrap();
    assert_eq!(stats.recorded, 3);
    assert_eq!(stats.failed, 0);

    let snapshot = aggregator.snapshot();
    assert_eq!(snapshot.authors[ALICE.1].count, 1);
    assert_eq!(snapshot.authors[ALICE.1].name, ALICE.0);
    assert_eq!(snapshot.authors[BOB.1].count, 2);
    assert_eq!(snapshot.files["a.js"].authors.len(), 2);
    assert!(snapshot.warnings.is_empty());
    // One blame per distinct file
    assert_eq!(blame.cached_files(), 2);

    let board = leaderboard::authors(&snapshot.authors, 10);
    assert_eq!(board[0].email, BOB.1);
}

#[test]
fn test_missing_file_fails_once_and_is_excluded() {
    let repo = setup_repo();
    let (pipeline, aggregator, blame) = pipeline_for(repo.path(), ProjectConfig::default());

    let issues = vec![
        Issue::new("gone.js", 1, "semi", 1),
        Issue::new("gone.js", 2, "semi", 1),
        Issue::new("a.js", 1, "semi", 1),
    ];
    let stats = pipeline.run(&issues).unwrap();
    assert_eq!(stats.failed, 2);
    assert_eq!(stats.recorded, 1);

    let snapshot = aggregator.snapshot();
    assert_eq!(snapshot.total_issues(), 1);
    assert!(!snapshot.files.contains_key("gone.js"));
    assert_eq!(snapshot.warnings.len(), 1);
    assert!(snapshot.warnings[0].contains("gone.js"));
    assert_eq!(blame.failed_files(), vec!["gone.js".to_string()]);
}

#[test]
fn test_line_past_end_falls_back_to_last_line() {
    let repo = setup_repo();
    let (pipeline, aggregator, _) = pipeline_for(repo.path(), ProjectConfig::default());

    let stats = pipeline.run(&[Issue::new("b.py", 40, "E501", 1)]).unwrap();
    assert_eq!(stats.recorded, 1);
    assert_eq!(stats.unattributed, 0);
    assert_eq!(aggregator.snapshot().authors[BOB.1].count, 1);
}

#[test]
fn test_ignored_author_is_excluded() {
    let repo = setup_repo();
    let policy = ProjectConfig::with_ignore(IgnoreConfig {
        authors: vec!["bob@".into()],
        ..Default::default()
    });
    let (pipeline, aggregator, _) = pipeline_for(repo.path(), policy);

    let stats = pipeline
        .run(&[Issue::new("a.js", 1, "semi", 1), Issue::new("a.js", 3, "semi", 1)])
        .unwrap();
    assert_eq!(stats.recorded, 1);
    assert_eq!(stats.excluded, 1);
    assert!(!aggregator.snapshot().authors.contains_key(BOB.1));
}

#[test]
fn test_history_metrics() {
    let repo = setup_repo();
    let history = GitHistory::new(Arc::new(SystemGit::new(repo.path())));
    history.validate().unwrap();

    let tracked = history.tracked_files().unwrap();
    assert_eq!(tracked, ["a.js", "b.py"].iter().map(|s| s.to_string()).collect::<HashSet<_>>());

    let churn = churn::analyze(&history, &tracked).unwrap();
    assert_eq!(churn[0].path, "a.js");
    assert_eq!(churn[0].changes, 2);
    assert_eq!(churn[0].lines_added, 3);

    let policy = ProjectConfig::default();
    let commits = contributors::commit_counts(&history, &policy).unwrap();
    assert_eq!(commits[0].email, BOB.1);
    assert_eq!(commits[0].commits, 2);
    assert_eq!(commits[1].commits, 1);

    let recent = contributors::recent_contributors(&history, 30, &policy).unwrap();
    assert_eq!(recent.len(), 2);
}

#[test]
fn test_content_metrics_share_blame_cache() {
    let repo = setup_repo();
    let policy = ProjectConfig::default().with_repo_root(repo.path());
    let blame = BlameService::new(Arc::new(SystemGit::new(repo.path())));
    let files = vec!["a.js".to_string(), "b.py".to_string()];

    let debt = debt::analyze(repo.path(), &files);
    assert_eq!(debt.len(), 1);
    assert_eq!(debt[0].todos, 1);

    let gate = Gate::new(policy.concurrency_limit()).unwrap();
    let report = spelling::analyze(repo.path(), &files, &policy.spellcheck, &blame, &gate, &policy);
    assert_eq!(report.files.len(), 1);
    assert_eq!(report.authors.len(), 1);
    assert_eq!(report.authors[0].email, BOB.1);
    assert_eq!(report.authors[0].misspellings["wrold"], 1);
    assert_eq!(blame.cached_files(), 1);
}

#[test]
fn test_not_a_repository() {
    let dir = tempfile::tempdir().unwrap();
    let history = GitHistory::new(Arc::new(SystemGit::new(dir.path())));
    assert!(history.validate().is_err());
}
