//! Subprocess seam for git commands
//!
//! Every git invocation in blamerank goes through [`GitRunner`], so tests can
//! swap in a fake and the timeout handling lives in exactly one place
//! ([`SystemGit`]).

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

/// Poll interval while waiting on a git child process
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Errors from running a git command
#[derive(Error, Debug)]
pub enum GitError {
    #[error("git executable not found. Please install git first.")]
    NotFound,

    #[error("not a git repository: {0}")]
    NotARepository(String),

    #[error("git {command} timed out after {secs}s")]
    Timeout { command: String, secs: u64 },

    #[error("git {command} exited with status {code}: {stderr}")]
    Failed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("failed to run git {command}: {message}")]
    Io { command: String, message: String },
}

/// Runs git with the given arguments and returns its stdout.
pub trait GitRunner: Send + Sync {
    fn run(&self, args: &[&str], timeout: Option<Duration>) -> Result<String, GitError>;
}

/// Runs the system `git` binary inside a repository's working tree.
#[derive(Debug, Clone)]
pub struct SystemGit {
    repo_root: PathBuf,
}

impl SystemGit {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }
}

impl GitRunner for SystemGit {
    fn run(&self, args: &[&str], timeout: Option<Duration>) -> Result<String, GitError> {
        let command_line = args.join(" ");
        debug!("Running git {} in {}", command_line, self.repo_root.display());

        let mut child = Command::new("git")
            .args(args)
            .current_dir(&self.repo_root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    GitError::NotFound
                } else {
                    GitError::Io {
                        command: command_line.clone(),
                        message: e.to_string(),
                    }
                }
            })?;

        // Drain both pipes off-thread so a chatty child never blocks on a full pipe.
        let stdout_reader = child.stdout.take().map(spawn_reader);
        let stderr_reader = child.stderr.take().map(spawn_reader);

        let start = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if let Some(limit) = timeout {
                        if start.elapsed() > limit {
                            let _ = child.kill();
                            let _ = child.wait();
                            warn!("git {} timed out after {}s", command_line, limit.as_secs());
                            return Err(GitError::Timeout {
                                command: command_line,
                                secs: limit.as_secs(),
                            });
                        }
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    let _ = child.kill();
                    return Err(GitError::Io {
                        command: command_line,
                        message: e.to_string(),
                    });
                }
            }
        };

        let stdout = stdout_reader.map(join_reader).unwrap_or_default();
        let stderr = stderr_reader.map(join_reader).unwrap_or_default();

        if !status.success() {
            let stderr = stderr.trim().to_string();
            if stderr.contains("not a git repository") {
                return Err(GitError::NotARepository(self.repo_root.display().to_string()));
            }
            return Err(GitError::Failed {
                command: command_line,
                code: status.code().unwrap_or(-1),
                stderr,
            });
        }

        Ok(stdout)
    }
}

pub(crate) fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

pub(crate) fn join_reader(handle: thread::JoinHandle<String>) -> String {
    handle.join().unwrap_or_default()
}

#[cfg(test)]
pub mod testing {
    //! In-memory runner for unit tests.

    use super::{GitError, GitRunner};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    enum Canned {
        Output(String),
        Fail(String),
        Timeout,
    }

    /// Canned responses keyed by the full argument line, with call counting.
    #[derive(Default)]
    pub struct FakeGit {
        responses: HashMap<String, Canned>,
        calls: Mutex<HashMap<String, usize>>,
        total: AtomicUsize,
        delay: Option<Duration>,
    }

    impl FakeGit {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_output(mut self, args: &[&str], output: &str) -> Self {
            self.responses
                .insert(args.join(" "), Canned::Output(output.to_string()));
            self
        }

        pub fn with_failure(mut self, args: &[&str], stderr: &str) -> Self {
            self.responses
                .insert(args.join(" "), Canned::Fail(stderr.to_string()));
            self
        }

        pub fn with_timeout(mut self, args: &[&str]) -> Self {
            self.responses.insert(args.join(" "), Canned::Timeout);
            self
        }

        /// Sleep this long inside every call
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn calls(&self, args: &[&str]) -> usize {
            self.calls
                .lock()
                .expect("fake git lock poisoned")
                .get(&args.join(" "))
                .copied()
                .unwrap_or(0)
        }

        pub fn total_calls(&self) -> usize {
            self.total.load(Ordering::SeqCst)
        }
    }

    impl GitRunner for FakeGit {
        fn run(&self, args: &[&str], timeout: Option<Duration>) -> Result<String, GitError> {
            let key = args.join(" ");
            *self
                .calls
                .lock()
                .expect("fake git lock poisoned")
                .entry(key.clone())
                .or_insert(0) += 1;
            self.total.fetch_add(1, Ordering::SeqCst);

            if let Some(delay) = self.delay {
                std::thread::sleep(delay);
            }

            match self.responses.get(&key) {
                Some(Canned::Output(out)) => Ok(out.clone()),
                Some(Canned::Fail(stderr)) => Err(GitError::Failed {
                    command: key,
                    code: 128,
                    stderr: stderr.clone(),
                }),
                Some(Canned::Timeout) => Err(GitError::Timeout {
                    command: key,
                    secs: timeout.map(|t| t.as_secs()).unwrap_or(0),
                }),
                None => Err(GitError::Failed {
                    command: key,
                    code: 128,
                    stderr: "fatal: no such path in HEAD".to_string(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    #[test]
    fn test_system_git_reports_nonzero_exit() {
        if Command::new("git").arg("--version").output().is_err() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        Command::new("git")
            .args(["init", "-q"])
            .current_dir(dir.path())
            .output()
            .unwrap();
        let git = SystemGit::new(dir.path());
        // No commits yet, so HEAD does not resolve.
        let result = git.run(&["rev-parse", "--verify", "HEAD"], Some(Duration::from_secs(5)));
        assert!(matches!(result, Err(GitError::Failed { .. })));
    }

    #[test]
    fn test_system_git_captures_stdout() {
        if Command::new("git").arg("--version").output().is_err() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let git = SystemGit::new(dir.path());
        let out = git.run(&["--version"], Some(Duration::from_secs(5))).unwrap();
        assert!(out.starts_with("git version"));
    }

    #[test]
    fn test_fake_git_counts_calls() {
        let fake = testing::FakeGit::new().with_output(&["ls-files"], "a.js\n");
        assert_eq!(fake.run(&["ls-files"], None).unwrap(), "a.js\n");
        assert_eq!(fake.run(&["ls-files"], None).unwrap(), "a.js\n");
        assert_eq!(fake.calls(&["ls-files"]), 2);
        assert!(fake.run(&["log"], None).is_err());
        assert_eq!(fake.total_calls(), 3);
    }
}
