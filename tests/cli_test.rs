//! CLI contract tests
//!
//! Runs the built binary against throwaway repositories and checks exit
//! codes, JSON sections and config handling.

mod common;

use std::path::Path;
use std::process::Command;

use common::{setup_repo, ALICE, BOB};

fn blamerank_bin() -> &'static str {
    env!("CARGO_BIN_EXE_blamerank")
}

fn run(args: &[&str], dir: &Path) -> (i32, String, String) {
    let output = Command::new(blamerank_bin())
        .args(args)
        .env_remove("RUST_LOG")
        .current_dir(dir)
        .output()
        .expect("Failed to run blamerank");
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

fn eslint_report(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("eslint.json");
    std::fs::write(
        &path,
        r#"[
          {"filePath": "a.js", "messages": [
            {"ruleId": "no-console", "severity": 2, "message": "Unexpected console statement.", "line": 1},
            {"ruleId": "no-var", "severity": 1, "message": "Unexpected var.", "line": 3},
            {"ruleId": "semi", "severity": 1, "message": "Missing semicolon.", "line": 3}
          ]},
          {"filePath": "untracked.js", "messages": [
            {"ruleId": "semi", "severity": 1, "message": "Missing semicolon.", "line": 1}
          ]}
        ]"#,
    )
    .unwrap();
    path
}

fn parse_json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("Invalid JSON")
}

#[test]
fn test_report_json_from_eslint_report() {
    let repo = setup_repo();
    let reports = tempfile::tempdir().unwrap();
    let report_file = eslint_report(reports.path());

    let (code, stdout, stderr) = run(
        &[
            "report",
            ".",
            "--eslint-report",
            report_file.to_str().unwrap(),
            "--format",
            "json",
            "--no-progress",
        ],
        repo.path(),
    );
    assert_eq!(code, 0, "stderr: {}", stderr);

    let json = parse_json(&stdout);
    let authors = json["authors"].as_array().expect("authors array");
    assert_eq!(authors.len(), 2);
    assert_eq!(authors[0]["email"], BOB.1);
    assert_eq!(authors[0]["count"], 2);
    assert_eq!(authors[1]["email"], ALICE.1);
    assert_eq!(authors[1]["top_rule"], "no-console");

    assert_eq!(json["summary"]["total_issues"], 3);
    assert_eq!(json["summary"]["errors"], 1);
    assert_eq!(json["rules"].as_array().unwrap().len(), 3);
    assert!(json.get("churn").is_none());
}

#[test]
fn test_top_limits_entries() {
    let repo = setup_repo();
    let reports = tempfile::tempdir().unwrap();
    let report_file = eslint_report(reports.path());

    let (code, stdout, _) = run(
        &[
            "report",
            ".",
            "--eslint-report",
            report_file.to_str().unwrap(),
            "--rules",
            "--top",
            "1",
            "--format",
            "json",
        ],
        repo.path(),
    );
    assert_eq!(code, 0);
    let json = parse_json(&stdout);
    assert_eq!(json["rules"].as_array().unwrap().len(), 1);
    assert!(json.get("authors").is_none());
}

#[test]
fn test_history_sections() {
    let repo = setup_repo();
    let (code, stdout, stderr) = run(
        &["report", ".", "--churn", "--bugs", "--commits", "--loc", "--debt", "--format", "json"],
        repo.path(),
    );
    assert_eq!(code, 0, "stderr: {}", stderr);
    let json = parse_json(&stdout);
    assert_eq!(json["churn"][0]["path"], "a.js");
    assert_eq!(json["commit_counts"][0]["email"], BOB.1);
    assert_eq!(json["lines_of_code"][0]["path"], "a.js");
    assert_eq!(json["technical_debt"][0]["todos"], 1);
    // Too few commits for a density figure
    assert_eq!(json["bug_density"].as_array().unwrap().len(), 0);
    assert!(json.get("summary").is_none());
}

#[test]
fn test_missing_coverage_is_a_warning() {
    let repo = setup_repo();
    let (code, stdout, _) = run(&["report", ".", "--coverage", "--format", "json"], repo.path());
    assert_eq!(code, 0);
    let json = parse_json(&stdout);
    assert!(json.get("coverage").is_none());
    let warnings = json["warnings"].as_array().unwrap();
    assert!(warnings.iter().any(|w| w.as_str().unwrap().starts_with("Coverage unavailable")));
}

#[test]
fn test_text_output_lists_warnings_last() {
    let repo = setup_repo();
    // No issue source: empty leaderboards plus one warning
    let (code, stdout, _) = run(&["report", ".", "--no-progress", "--format", "text"], repo.path());
    assert_eq!(code, 0);
    let plain = console::strip_ansi_codes(&stdout).to_string();
    let authors_at = plain.find("TOP AUTHORS").expect("authors section");
    let warnings_at = plain.find("Warnings (1)").expect("warnings section");
    assert!(warnings_at > authors_at);
    assert!(plain.contains("No issue source given"));
}

#[test]
fn test_text_output_tables() {
    let repo = setup_repo();
    let reports = tempfile::tempdir().unwrap();
    let report_file = eslint_report(reports.path());
    let (code, stdout, _) = run(
        &["report", ".", "--eslint-report", report_file.to_str().unwrap(), "--no-progress"],
        repo.path(),
    );
    assert_eq!(code, 0);
    let plain = console::strip_ansi_codes(&stdout).to_string();
    assert!(plain.contains("Bob <bob@example.com>"));
    assert!(plain.contains("TOP RULES"));
    assert!(!plain.contains("Warnings"));
}

#[test]
fn test_output_file() {
    let repo = setup_repo();
    let out = tempfile::tempdir().unwrap();
    let out_file = out.path().join("report.json");
    let (code, stdout, _) = run(
        &["report", ".", "--loc", "--format", "json", "-o", out_file.to_str().unwrap()],
        repo.path(),
    );
    assert_eq!(code, 0);
    assert!(stdout.is_empty());
    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out_file).unwrap()).unwrap();
    assert!(json["lines_of_code"].is_array());
}

#[test]
fn test_not_a_git_repo_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run(&["report", ".", "--loc"], dir.path());
    assert_ne!(code, 0);
    assert!(stderr.contains("Cannot report"), "stderr: {}", stderr);
}

#[test]
fn test_missing_eslint_report_fails() {
    let repo = setup_repo();
    let (code, _, stderr) = run(
        &["report", ".", "--eslint-report", "/definitely/missing.json"],
        repo.path(),
    );
    assert_ne!(code, 0);
    assert!(stderr.contains("eslint"), "stderr: {}", stderr);
}

#[test]
fn test_ignore_author_flag() {
    let repo = setup_repo();
    let reports = tempfile::tempdir().unwrap();
    let report_file = eslint_report(reports.path());
    let (code, stdout, _) = run(
        &[
            "report",
            ".",
            "--eslint-report",
            report_file.to_str().unwrap(),
            "--authors",
            "--format",
            "json",
            "--ignore-author",
            "bob",
        ],
        repo.path(),
    );
    assert_eq!(code, 0);
    let json = parse_json(&stdout);
    let authors = json["authors"].as_array().unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0]["email"], ALICE.1);
}

#[test]
fn test_init_and_config() {
    let repo = setup_repo();
    let (code, stdout, _) = run(&["init", "."], repo.path());
    assert_eq!(code, 0);
    assert!(stdout.contains("blamerank.toml"));
    assert!(repo.path().join("blamerank.toml").exists());

    let (code, _, stderr) = run(&["init", "."], repo.path());
    assert_ne!(code, 0);
    assert!(stderr.contains("already exists"));

    let (code, stdout, _) = run(&["config", "--workers", "3"], repo.path());
    assert_eq!(code, 0);
    let parsed: toml::Value = toml::from_str(&stdout).expect("config prints TOML");
    assert_eq!(parsed["blame"]["concurrency"].as_integer(), Some(3));
    assert_eq!(parsed["defaults"]["top"].as_integer(), Some(10));
}

#[test]
fn test_invalid_workers_rejected() {
    let repo = setup_repo();
    let (code, _, _) = run(&["report", ".", "--workers", "0"], repo.path());
    assert_ne!(code, 0);
}
