//! Shared fixtures: small git repositories with fixed authors

#![allow(dead_code)]

use std::path::Path;
use std::process::Command;

pub const ALICE: (&str, &str) = ("Alice", "alice@example.com");
pub const BOB: (&str, &str) = ("Bob", "bob@example.com");

pub fn git(dir: &Path, args: &[&str], author: (&str, &str)) {
    let output = Command::new("git")
        .args(["-c", "commit.gpgsign=false", "-c", "init.defaultBranch=main"])
        .args(args)
        .current_dir(dir)
        .env("GIT_AUTHOR_NAME", author.0)
        .env("GIT_AUTHOR_EMAIL", author.1)
        .env("GIT_COMMITTER_NAME", author.0)
        .env("GIT_COMMITTER_EMAIL", author.1)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

pub fn commit_file(dir: &Path, file: &str, content: &str, message: &str, author: (&str, &str)) {
    let path = dir.join(file);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    git(dir, &["add", file], author);
    git(dir, &["commit", "-q", "-m", message], author);
}

/// `a.js`: lines 1-2 by Alice, line 3 by Bob. `b.py`: Bob.
pub fn setup_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    git(dir.path(), &["init", "-q"], ALICE);
    commit_file(
        dir.path(),
        "a.js",
        "console.log(1);\n// TODO: tidy up\n",
        "initial import",
        ALICE,
    );
    commit_file(
        dir.path(),
        "a.js",
        "console.log(1);\n// TODO: tidy up\nvar x = 1 // the wrold\n",
        "fix crash on start",
        BOB,
    );
    commit_file(dir.path(), "b.py", "import os\n", "add script", BOB);
    dir
}
