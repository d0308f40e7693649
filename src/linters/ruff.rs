//! Ruff issues for Python

use serde::Deserialize;
use std::path::Path;
use tracing::info;

use super::external::run_external_tool;
use super::{relative_path, tool_output, LintError, Linter};
use crate::models::Issue;

const RUFF_TIMEOUT_SECS: u64 = 300;
/// Ruff has no severities; everything counts as a warning.
const RUFF_SEVERITY: u8 = 1;

#[derive(Debug, Deserialize)]
struct RuffDiagnostic {
    /// Null for syntax errors
    code: Option<String>,
    #[serde(default)]
    message: String,
    location: RuffLocation,
    filename: String,
}

#[derive(Debug, Deserialize)]
struct RuffLocation {
    row: u32,
}

#[derive(Debug, Default, Clone)]
pub struct RuffLinter {
    select: Vec<String>,
}

impl RuffLinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the run to these rule codes (`--select`).
    pub fn with_select(mut self, rules: Vec<String>) -> Self {
        self.select = rules;
        self
    }

    fn command(&self) -> Vec<String> {
        let mut cmd: Vec<String> = ["ruff", "check", "--output-format", "json"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        if !self.select.is_empty() {
            cmd.push(format!("--select={}", self.select.join(",")));
        }
        cmd.push(".".to_string());
        cmd
    }
}

impl Linter for RuffLinter {
    fn name(&self) -> &'static str {
        "ruff"
    }

    fn run(&self, repo_root: &Path) -> Result<Vec<Issue>, LintError> {
        let result = run_external_tool(&self.command(), "ruff", RUFF_TIMEOUT_SECS, Some(repo_root));
        let output = tool_output(self.name(), result)?;
        let issues = self.parse(&output, repo_root)?;
        info!("Ruff reported {} issues", issues.len());
        Ok(issues)
    }

    fn parse(&self, output: &str, repo_root: &Path) -> Result<Vec<Issue>, LintError> {
        let diagnostics: Vec<RuffDiagnostic> = serde_json::from_str(output).map_err(|source| LintError::Parse {
            tool: self.name().to_string(),
            source,
        })?;

        Ok(diagnostics
            .into_iter()
            .map(|d| {
                let rule = d.code.unwrap_or_else(|| "syntax-error".to_string());
                Issue::new(relative_path(repo_root, &d.filename), d.location.row, rule, RUFF_SEVERITY)
                    .with_message(d.message)
            })
            .collect())
    }
}
