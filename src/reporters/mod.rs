//! Output reporters for leaderboard reports
//!
//! Supports two output formats:
//! - `text` - Terminal tables styled with `console`
//! - `json` - Machine-readable JSON

mod json;
mod text;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::str::FromStr;

use crate::leaderboard::{AuthorEntry, FileEntry, RuleEntry, Summary};
use crate::models::{
    BugDensityEntry, ChurnEntry, CommitCountEntry, CoverageEntry, LinesOfCodeEntry, RecentContributorEntry,
    SpellingAuthorEntry, SpellingEntry, TechnicalDebtEntry,
};
use crate::pipeline::PipelineStats;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Recent-contributor board with the window it covers
#[derive(Debug, Clone, Serialize)]
pub struct RecentSection {
    pub days: u32,
    pub contributors: Vec<RecentContributorEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpellingSection {
    pub files: Vec<SpellingEntry>,
    pub authors: Vec<SpellingAuthorEntry>,
}

/// Everything one `report` run produced. Sections that were not requested
/// stay `None` and are left out of the output.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub repository: String,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribution: Option<PipelineStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<AuthorEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<RuleEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub churn: Option<Vec<ChurnEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bug_density: Option<Vec<BugDensityEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technical_debt: Option<Vec<TechnicalDebtEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines_of_code: Option<Vec<LinesOfCodeEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage: Option<Vec<CoverageEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_counts: Option<Vec<CommitCountEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_contributors: Option<RecentSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spelling: Option<SpellingSection>,
    /// Non-fatal problems, in the order they happened
    pub warnings: Vec<String>,
}

impl Report {
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            generated_at: Utc::now(),
            ..Default::default()
        }
    }
}

/// Render a report in the named format
pub fn report(report: &Report, format: &str) -> Result<String> {
    report_with_format(report, OutputFormat::from_str(format)?)
}

pub fn report_with_format(report: &Report, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(report),
        OutputFormat::Json => json::render(report),
    }
}
