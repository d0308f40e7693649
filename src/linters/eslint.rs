//! ESLint issues for JavaScript/TypeScript
//!
//! Runs `eslint --format json .` through bunx/npx and flattens the per-file
//! message lists into [`Issue`]s.

use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

use super::external::{get_js_runtime, run_external_tool};
use super::{relative_path, tool_output, LintError, Linter};
use crate::models::Issue;

const ESLINT_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EslintFileResult {
    file_path: String,
    #[serde(default)]
    messages: Vec<EslintMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EslintMessage {
    /// Null for parse errors
    rule_id: Option<String>,
    #[serde(default)]
    severity: u8,
    #[serde(default)]
    message: String,
    #[serde(default)]
    line: u32,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct EslintLinter;

impl EslintLinter {
    pub fn new() -> Self {
        Self
    }
}

impl Linter for EslintLinter {
    fn name(&self) -> &'static str {
        "eslint"
    }

    fn run(&self, repo_root: &Path) -> Result<Vec<Issue>, LintError> {
        let cmd: Vec<String> = [get_js_runtime().exec_cmd(), "eslint", "--format", "json", "."]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let result = run_external_tool(&cmd, "eslint", ESLINT_TIMEOUT_SECS, Some(repo_root));
        let output = tool_output(self.name(), result)?;
        let issues = self.parse(&output, repo_root)?;
        info!("ESLint reported {} issues", issues.len());
        Ok(issues)
    }

    fn parse(&self, output: &str, repo_root: &Path) -> Result<Vec<Issue>, LintError> {
        let results: Vec<EslintFileResult> = serde_json::from_str(output).map_err(|source| LintError::Parse {
            tool: self.name().to_string(),
            source,
        })?;

        let mut issues = Vec::new();
        for file in results {
            let path = relative_path(repo_root, &file.file_path);
            debug!("{}: {} ESLint messages", path, file.messages.len());
            for msg in file.messages {
                let rule = msg.rule_id.unwrap_or_else(|| "unknown".to_string());
                issues.push(Issue::new(path.as_str(), msg.line, rule, msg.severity).with_message(msg.message));
            }
        }
        Ok(issues)
    }
}
