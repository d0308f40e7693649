//! Subprocess plumbing shared by the linter runners

use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::OnceLock;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::git::runner::{join_reader, spawn_reader};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Result from running an external tool
#[derive(Debug, Clone)]
pub struct ExternalToolResult {
    /// Whether the tool ran to completion (it may still have reported findings)
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub return_code: Option<i32>,
    pub timed_out: bool,
    /// Why the tool could not be run
    pub error: Option<String>,
    /// Set when the executable could not be spawned at all
    pub not_found: bool,
}

impl ExternalToolResult {
    pub fn success(stdout: String, stderr: String, return_code: i32) -> Self {
        Self {
            success: true,
            stdout,
            stderr,
            return_code: Some(return_code),
            timed_out: false,
            error: None,
            not_found: false,
        }
    }

    pub fn failure(error: String) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: String::new(),
            return_code: None,
            timed_out: false,
            error: Some(error),
            not_found: false,
        }
    }

    pub fn not_found(tool_name: &str) -> Self {
        Self {
            not_found: true,
            ..Self::failure(format!("{} not found. Please install it first.", tool_name))
        }
    }

    pub fn timeout(tool_name: &str, timeout_secs: u64) -> Self {
        Self {
            timed_out: true,
            ..Self::failure(format!("{} timed out after {}s", tool_name, timeout_secs))
        }
    }
}

static JS_RUNTIME: OnceLock<JsRuntime> = OnceLock::new();

/// JavaScript package runner available on this machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsRuntime {
    Bun,
    Npm,
    None,
}

impl JsRuntime {
    /// Package executor (`bunx` or `npx`)
    pub fn exec_cmd(&self) -> &'static str {
        match self {
            JsRuntime::Bun => "bunx",
            JsRuntime::Npm | JsRuntime::None => "npx",
        }
    }
}

/// Detect the JavaScript runtime once per process; bun wins when both exist.
pub fn get_js_runtime() -> JsRuntime {
    *JS_RUNTIME.get_or_init(|| {
        if is_tool_installed("bun") {
            debug!("Using Bun runtime for JavaScript tools");
            JsRuntime::Bun
        } else if is_tool_installed("npm") {
            debug!("Using npm runtime for JavaScript tools");
            JsRuntime::Npm
        } else {
            warn!("No JavaScript runtime (bun or npm) found. JS tool commands may fail.");
            JsRuntime::None
        }
    })
}

pub fn is_tool_installed(tool: &str) -> bool {
    Command::new(tool)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Run `cmd` in `cwd`, killing it after `timeout_secs` (0 = no limit).
pub fn run_external_tool(cmd: &[String], tool_name: &str, timeout_secs: u64, cwd: Option<&Path>) -> ExternalToolResult {
    let Some((program, args)) = cmd.split_first() else {
        return ExternalToolResult::failure("Empty command".to_string());
    };
    debug!("Running {}: {} {:?}", tool_name, program, args);

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return ExternalToolResult::not_found(tool_name);
        }
        Err(e) => return ExternalToolResult::failure(format!("Failed to run {}: {}", tool_name, e)),
    };

    let stdout_reader = child.stdout.take().map(spawn_reader);
    let stderr_reader = child.stderr.take().map(spawn_reader);

    let start = Instant::now();
    let limit = Duration::from_secs(timeout_secs);
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if timeout_secs > 0 && start.elapsed() > limit {
                    let _ = child.kill();
                    let _ = child.wait();
                    warn!("{} timed out after {}s", tool_name, timeout_secs);
                    return ExternalToolResult::timeout(tool_name, timeout_secs);
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                let _ = child.kill();
                return ExternalToolResult::failure(format!("Failed to wait for {}: {}", tool_name, e));
            }
        }
    };

    let stdout = stdout_reader.map(join_reader).unwrap_or_default();
    let stderr = stderr_reader.map(join_reader).unwrap_or_default();
    ExternalToolResult::success(stdout, stderr, status.code().unwrap_or(-1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_tool_result() {
        let result = ExternalToolResult::success("output".into(), "".into(), 0);
        assert!(result.success);
        assert_eq!(result.stdout, "output");

        let result = ExternalToolResult::timeout("eslint", 5);
        assert!(!result.success);
        assert!(result.timed_out);
        assert_eq!(result.error.as_deref(), Some("eslint timed out after 5s"));
    }

    #[test]
    fn test_missing_program_is_not_found() {
        let cmd = vec!["definitely-not-a-real-linter-binary".to_string()];
        let result = run_external_tool(&cmd, "fakelint", 5, None);
        assert!(result.not_found);
        assert!(result.error.unwrap().contains("not found"));
    }

    #[test]
    fn test_empty_command() {
        let result = run_external_tool(&[], "nothing", 0, None);
        assert!(!result.success);
    }

    #[test]
    fn test_exec_cmd() {
        assert_eq!(JsRuntime::Bun.exec_cmd(), "bunx");
        assert_eq!(JsRuntime::None.exec_cmd(), "npx");
    }
}
