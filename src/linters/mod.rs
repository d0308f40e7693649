//! Linter runners that produce the issues fed to attribution
//!
//! Each [`Linter`] either runs its tool against the repository or parses a
//! report saved earlier. Paths in the resulting issues are repo-relative with
//! forward slashes, the same form `git blame` and `git ls-files` use.

pub mod eslint;
pub mod external;
pub mod ruff;

use std::path::Path;
use thiserror::Error;

use crate::models::Issue;

pub use eslint::EslintLinter;
pub use ruff::RuffLinter;

#[derive(Error, Debug)]
pub enum LintError {
    #[error("{tool} not found. Please install it first.")]
    NotFound { tool: String },

    #[error("{tool} failed: {message}")]
    Failed { tool: String, message: String },

    #[error("failed to parse {tool} output: {source}")]
    Parse {
        tool: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A source of issues.
pub trait Linter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Run the tool in `repo_root`.
    fn run(&self, repo_root: &Path) -> Result<Vec<Issue>, LintError>;

    /// Parse tool JSON output; `repo_root` relativizes absolute paths.
    fn parse(&self, output: &str, repo_root: &Path) -> Result<Vec<Issue>, LintError>;

    /// Parse a report file written by an earlier run of the tool.
    fn parse_report(&self, report: &Path, repo_root: &Path) -> Result<Vec<Issue>, LintError> {
        let content = std::fs::read_to_string(report).map_err(|source| LintError::Io {
            path: report.display().to_string(),
            source,
        })?;
        self.parse(&content, repo_root)
    }
}

/// Repo-relative, forward-slash form of a path reported by a linter.
pub fn relative_path(repo_root: &Path, path: &str) -> String {
    let normalized = path.replace('\\', "/");
    let root = repo_root.to_string_lossy().replace('\\', "/");
    let root = root.trim_end_matches('/');
    let relative = match normalized.strip_prefix(root) {
        Some(rest) if !root.is_empty() && (rest.is_empty() || rest.starts_with('/')) => rest.trim_start_matches('/'),
        _ => normalized.as_str(),
    };
    relative.trim_start_matches("./").to_string()
}

/// Turn a finished tool run into its stdout, or the reason there is none.
fn tool_output(tool: &str, result: external::ExternalToolResult) -> Result<String, LintError> {
    if result.not_found {
        return Err(LintError::NotFound { tool: tool.to_string() });
    }
    if !result.success {
        return Err(LintError::Failed {
            tool: tool.to_string(),
            message: result.error.unwrap_or_default(),
        });
    }
    // Linters exit non-zero when they find problems; only empty output is fatal.
    if result.stdout.trim().is_empty() && result.return_code != Some(0) {
        return Err(LintError::Failed {
            tool: tool.to_string(),
            message: result.stderr.trim().to_string(),
        });
    }
    Ok(result.stdout)
}
