//! Report command - lint, attribute, rank and render

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use super::{effective_config, ConfigOverrides, ReportArgs};
use blamerank::config::{IgnorePolicy, ProjectConfig};
use blamerank::git::history::discover_root;
use blamerank::git::{BlameService, GitHistory, GitRunner, SystemGit};
use blamerank::leaderboard;
use blamerank::linters::{EslintLinter, Linter, RuffLinter};
use blamerank::metrics::{self, bug_density, churn, contributors, coverage, debt, loc, spelling};
use blamerank::models::Issue;
use blamerank::pipeline::{Aggregator, AttributionPipeline, Gate};
use blamerank::reporters::{self, OutputFormat, RecentSection, Report, SpellingSection};

const DEFAULT_TOP: usize = 10;

/// Which sections a run produces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Sections {
    authors: bool,
    files: bool,
    rules: bool,
    summary: bool,
    churn: bool,
    bugs: bool,
    debt: bool,
    loc: bool,
    coverage: bool,
    commits: bool,
    recent: bool,
    spelling: bool,
}

impl Sections {
    fn from_args(args: &ReportArgs) -> Self {
        if args.all {
            return Self {
                authors: true,
                files: true,
                rules: true,
                summary: true,
                churn: true,
                bugs: true,
                debt: true,
                loc: true,
                coverage: true,
                commits: true,
                recent: true,
                spelling: true,
            };
        }
        let picked = Self {
            authors: args.authors,
            files: args.files,
            rules: args.rules,
            summary: args.summary,
            churn: args.churn,
            bugs: args.bugs,
            debt: args.debt,
            loc: args.loc,
            coverage: args.coverage,
            commits: args.commits,
            recent: args.recent,
            spelling: args.spelling,
        };
        if picked == Self::default() {
            Self {
                authors: true,
                files: true,
                rules: true,
                summary: true,
                ..Self::default()
            }
        } else {
            picked
        }
    }

    /// Whether any issue-based section was requested
    fn needs_issues(&self) -> bool {
        self.authors || self.files || self.rules || self.summary
    }
}

pub fn run(
    path: &Path,
    workers: Option<usize>,
    config_file: Option<&Path>,
    overrides: &ConfigOverrides,
    args: &ReportArgs,
) -> Result<()> {
    let repo_root = discover_root(path).with_context(|| format!("Cannot report on {}", path.display()))?;
    let config = effective_config(&repo_root, config_file, workers, overrides)?;
    let top = args.top.or(config.defaults.top).unwrap_or(DEFAULT_TOP);
    let format: OutputFormat = args
        .format
        .as_deref()
        .or(config.defaults.format.as_deref())
        .unwrap_or("text")
        .parse()?;
    let sections = Sections::from_args(args);

    let runner: Arc<dyn GitRunner> = Arc::new(SystemGit::new(&repo_root));
    let history = GitHistory::new(Arc::clone(&runner));
    history.validate()?;
    let tracked = history.tracked_files()?;
    info!("{} tracked files in {}", tracked.len(), repo_root.display());

    let policy = Arc::new(config);
    let blame = Arc::new(BlameService::new(Arc::clone(&runner)).with_timeout(policy.blame.timeout()));

    let mut report = Report::new(repo_root.display().to_string());
    let mut warnings: Vec<String> = Vec::new();

    if sections.needs_issues() {
        let issues = collect_issues(&repo_root, args, &tracked, &mut warnings)?;
        let gate = Arc::new(Gate::new(policy.concurrency_limit())?);
        let aggregator = Arc::new(Aggregator::new(Arc::clone(&policy) as Arc<dyn IgnorePolicy>));
        let mut pipeline = AttributionPipeline::new(Arc::clone(&blame), gate, Arc::clone(&aggregator));

        let bar = progress_bar(issues.len(), args.no_progress || format == OutputFormat::Json);
        if let Some(bar) = &bar {
            let bar = bar.clone();
            pipeline = pipeline.with_progress(Box::new(move |done, _total| bar.set_position(done as u64)));
        }
        let stats = pipeline.run(&issues)?;
        if let Some(bar) = bar {
            bar.finish_and_clear();
        }
        info!("Attribution finished: {}", stats.summary());

        let snapshot = aggregator.snapshot();
        if sections.summary {
            report.summary = Some(leaderboard::summarize(&snapshot));
            report.attribution = Some(stats);
        }
        if sections.authors {
            report.authors = Some(leaderboard::authors(&snapshot.authors, top));
        }
        if sections.files {
            report.files = Some(leaderboard::files(&snapshot.files, top));
        }
        if sections.rules {
            report.rules = Some(leaderboard::rules(&snapshot.rules, top));
        }
        warnings.extend(snapshot.warnings);
    }

    add_history_sections(&mut report, &mut warnings, sections, &history, &tracked, &policy, top, args.since);
    add_content_sections(&mut report, &mut warnings, sections, &repo_root, &tracked, &policy, &blame, top)?;

    report.warnings = warnings;
    let rendered = reporters::report_with_format(&report, format)?;
    match &args.output {
        Some(out) => {
            std::fs::write(out, &rendered).with_context(|| format!("Failed to write {}", out.display()))?;
            eprintln!("{} Report written to {}", style("✓").green(), style(out.display()).cyan());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

/// Issues from every requested source, limited to tracked files.
fn collect_issues(
    repo_root: &Path,
    args: &ReportArgs,
    tracked: &HashSet<String>,
    warnings: &mut Vec<String>,
) -> Result<Vec<Issue>> {
    let mut sources: Vec<(Box<dyn Linter>, Option<&PathBuf>)> = Vec::new();
    if args.eslint || args.eslint_report.is_some() {
        sources.push((Box::new(EslintLinter::new()), args.eslint_report.as_ref()));
    }
    if args.ruff || args.ruff_report.is_some() {
        sources.push((Box::new(RuffLinter::new()), args.ruff_report.as_ref()));
    }
    if sources.is_empty() {
        warnings.push("No issue source given; pass --eslint, --ruff, --eslint-report or --ruff-report".to_string());
        return Ok(Vec::new());
    }

    let mut issues = Vec::new();
    for (linter, report_file) in sources {
        let found = match report_file {
            Some(file) => linter.parse_report(file, repo_root),
            None => linter.run(repo_root),
        }
        .with_context(|| format!("{} produced no usable results", linter.name()))?;
        issues.extend(found);
    }

    let before = issues.len();
    issues.retain(|issue| tracked.contains(&issue.file_path));
    if issues.len() < before {
        info!("Skipped {} issues in untracked files", before - issues.len());
    }
    Ok(issues)
}

#[allow(clippy::too_many_arguments)]
fn add_history_sections(
    report: &mut Report,
    warnings: &mut Vec<String>,
    sections: Sections,
    history: &GitHistory,
    tracked: &HashSet<String>,
    policy: &ProjectConfig,
    top: usize,
    since_days: u32,
) {
    if sections.churn {
        match churn::analyze(history, tracked) {
            Ok(entries) => report.churn = Some(leaderboard::truncate(entries, top)),
            Err(e) => section_failed(warnings, "Code churn", e),
        }
    }
    if sections.bugs {
        match bug_density::analyze(history, tracked) {
            Ok(entries) => report.bug_density = Some(leaderboard::truncate(entries, top)),
            Err(e) => section_failed(warnings, "Bug density", e),
        }
    }
    if sections.commits {
        match contributors::commit_counts(history, policy) {
            Ok(entries) => report.commit_counts = Some(leaderboard::truncate(entries, top)),
            Err(e) => section_failed(warnings, "Commit counts", e),
        }
    }
    if sections.recent {
        match contributors::recent_contributors(history, since_days, policy) {
            Ok(entries) => {
                report.recent_contributors = Some(RecentSection {
                    days: since_days,
                    contributors: leaderboard::truncate(entries, top),
                })
            }
            Err(e) => section_failed(warnings, "Recent contributors", e),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn add_content_sections(
    report: &mut Report,
    warnings: &mut Vec<String>,
    sections: Sections,
    repo_root: &Path,
    tracked: &HashSet<String>,
    policy: &ProjectConfig,
    blame: &BlameService,
    top: usize,
) -> Result<()> {
    if !(sections.debt || sections.loc || sections.coverage || sections.spelling) {
        return Ok(());
    }
    let targets = metrics::scan_targets(tracked, policy);

    if sections.debt {
        report.technical_debt = Some(leaderboard::truncate(debt::analyze(repo_root, &targets), top));
    }
    if sections.loc {
        report.lines_of_code = Some(leaderboard::truncate(loc::analyze(repo_root, &targets), top));
    }
    if sections.coverage {
        match coverage::load(repo_root, policy.coverage.file.as_deref()) {
            Ok(entries) => report.coverage = Some(leaderboard::truncate(entries, top)),
            Err(e) => section_failed(warnings, "Coverage", e),
        }
    }
    if sections.spelling {
        // Separate gate, same blame cache as the attribution run.
        let gate = Gate::new(policy.concurrency_limit())?;
        let result = spelling::analyze(repo_root, &targets, &policy.spellcheck, blame, &gate, policy);
        warnings.extend(result.warnings);
        report.spelling = Some(SpellingSection {
            files: leaderboard::truncate(result.files, top),
            authors: leaderboard::truncate(result.authors, top),
        });
    }
    Ok(())
}

fn section_failed(warnings: &mut Vec<String>, section: &str, err: impl std::fmt::Display) {
    warn!("{} unavailable: {}", section, err);
    warnings.push(format!("{} unavailable: {}", section, err));
}

fn progress_bar(len: usize, hidden: bool) -> Option<ProgressBar> {
    if hidden || len == 0 {
        return None;
    }
    let bar = ProgressBar::new(len as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .map(|s| s.progress_chars("█▓▒░  "))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar.set_message("Attributing issues...");
    Some(bar)
}
