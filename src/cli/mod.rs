//! CLI command definitions and handlers

mod init;
mod report;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use console::style;
use std::path::PathBuf;

use blamerank::config::{load_config_file, load_project_config, user_config_path, ProjectConfig};
use blamerank::git::history::discover_root;
use blamerank::metrics::contributors::DEFAULT_RECENT_DAYS;

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// blamerank - lint leaderboards attributed with git blame
#[derive(Parser, Debug)]
#[command(name = "blamerank")]
#[command(
    version,
    about = "Attribute lint findings to the authors of the offending lines and rank them",
    long_about = "blamerank runs ESLint or Ruff (or reads their saved JSON reports), blames every \
reported line and builds leaderboards of authors, files and rules. It also reports churn, bug \
density, technical debt markers, lines of code, coverage, commit activity and comment spelling.\n\n\
Run without a subcommand to report on the current directory:\n  \
blamerank .",
    after_help = "\
Examples:
  blamerank report . --eslint                   Lint with ESLint and rank authors
  blamerank report . --ruff-report ruff.json    Use a saved Ruff report
  blamerank report . --all --format json        Every leaderboard as JSON
  blamerank report . --churn --bugs --top 20    History-only leaderboards
  blamerank init                                Write an example blamerank.toml"
)]
pub struct Cli {
    /// Path to repository (default: current directory)
    #[arg(global = true, default_value = ".")]
    pub path: PathBuf,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Maximum simultaneous `git blame` processes (1-64, default from config)
    #[arg(long, global = true, value_parser = parse_workers)]
    pub workers: Option<usize>,

    /// Use this config file instead of blamerank.toml discovery
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ConfigOverrides,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Command-line additions to the loaded configuration
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Ignore a lint rule (repeatable)
    #[arg(long = "ignore-rule", global = true, value_name = "RULE")]
    pub ignore_rules: Vec<String>,

    /// Ignore an author by email or name substring (repeatable)
    #[arg(long = "ignore-author", global = true, value_name = "PATTERN")]
    pub ignore_authors: Vec<String>,

    /// Coverage file, relative to the repository root
    #[arg(long, global = true, value_name = "FILE")]
    pub coverage_file: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build leaderboards (the default command)
    Report(ReportArgs),

    /// Write an example blamerank.toml to the repository root
    Init {
        /// Overwrite an existing blamerank.toml
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML (default)
    Show,
    /// Print where configuration files are looked up
    Path,
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Author leaderboard
    #[arg(long)]
    pub authors: bool,
    /// File leaderboard
    #[arg(long)]
    pub files: bool,
    /// Rule leaderboard
    #[arg(long)]
    pub rules: bool,
    /// Most frequently changed files
    #[arg(long)]
    pub churn: bool,
    /// Share of bug-fix commits per file
    #[arg(long)]
    pub bugs: bool,
    /// TODO/FIXME/HACK markers per file
    #[arg(long)]
    pub debt: bool,
    /// Lines of code per file
    #[arg(long)]
    pub loc: bool,
    /// Least covered files (LCOV or Istanbul JSON)
    #[arg(long)]
    pub coverage: bool,
    /// Commits per author
    #[arg(long)]
    pub commits: bool,
    /// Most active authors in the last --since days
    #[arg(long)]
    pub recent: bool,
    /// Comment misspellings per file and author
    #[arg(long)]
    pub spelling: bool,
    /// Issue totals
    #[arg(long)]
    pub summary: bool,
    /// Every section
    #[arg(long)]
    pub all: bool,

    /// Run ESLint for issues
    #[arg(long)]
    pub eslint: bool,
    /// Run Ruff for issues
    #[arg(long)]
    pub ruff: bool,
    /// Read issues from a saved `eslint --format json` report
    #[arg(long, value_name = "FILE")]
    pub eslint_report: Option<PathBuf>,
    /// Read issues from a saved `ruff check --output-format json` report
    #[arg(long, value_name = "FILE")]
    pub ruff_report: Option<PathBuf>,

    /// Entries per leaderboard (0 = all; default from config, else 10)
    #[arg(long)]
    pub top: Option<usize>,

    /// Window in days for --recent
    #[arg(long, default_value_t = DEFAULT_RECENT_DAYS)]
    pub since: u32,

    /// Output format: text, json
    #[arg(long, short = 'f', value_parser = ["text", "json"])]
    pub format: Option<String>,

    /// Write the report to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl Default for ReportArgs {
    fn default() -> Self {
        Self {
            authors: false,
            files: false,
            rules: false,
            churn: false,
            bugs: false,
            debt: false,
            loc: false,
            coverage: false,
            commits: false,
            recent: false,
            spelling: false,
            summary: false,
            all: false,
            eslint: false,
            ruff: false,
            eslint_report: None,
            ruff_report: None,
            top: None,
            since: DEFAULT_RECENT_DAYS,
            format: None,
            output: None,
            no_progress: false,
        }
    }
}

/// Run the CLI command
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Report(ref args)) => report::run(&cli.path, cli.workers, cli.config.as_deref(), &cli.overrides, args),
        Some(Commands::Init { force }) => init::run(&cli.path, force),
        Some(Commands::Config { action }) => run_config_action(&cli, action.unwrap_or(ConfigAction::Show)),
        None => {
            check_unknown_subcommand(&cli.path)?;
            report::run(
                &cli.path,
                cli.workers,
                cli.config.as_deref(),
                &cli.overrides,
                &ReportArgs::default(),
            )
        }
    }
}

/// Load configuration for `repo_root` and apply command-line overrides.
pub(crate) fn effective_config(
    repo_root: &std::path::Path,
    config_file: Option<&std::path::Path>,
    workers: Option<usize>,
    overrides: &ConfigOverrides,
) -> Result<ProjectConfig> {
    let mut config = match config_file {
        Some(file) => load_config_file(file)?.with_repo_root(repo_root),
        None => load_project_config(repo_root),
    };
    config.ignore.rules.extend(overrides.ignore_rules.iter().cloned());
    config.ignore.authors.extend(overrides.ignore_authors.iter().cloned());
    if let Some(file) = &overrides.coverage_file {
        config.coverage.file = Some(file.clone());
    }
    if let Some(n) = workers {
        config.blame.concurrency = n;
    }
    Ok(config)
}

fn run_config_action(cli: &Cli, action: ConfigAction) -> Result<()> {
    let root = discover_root(&cli.path).unwrap_or_else(|_| cli.path.clone());
    match action {
        ConfigAction::Show => {
            let config = effective_config(&root, cli.config.as_deref(), cli.workers, &cli.overrides)?;
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Path => {
            let mut candidates = vec![root.join("blamerank.toml"), root.join(".blamerankrc.json")];
            candidates.extend(user_config_path());
            for path in candidates {
                let marker = if path.exists() {
                    style("✓").green()
                } else {
                    style("·").dim()
                };
                println!("{} {}", marker, path.display());
            }
        }
    }
    Ok(())
}

fn check_unknown_subcommand(path: &std::path::Path) -> Result<()> {
    let path_str = path.to_string_lossy();
    let looks_like_command = !path.exists()
        && !path_str.contains('/')
        && !path_str.contains('\\')
        && !path_str.starts_with('.');
    if !looks_like_command {
        return Ok(());
    }
    let known_commands = ["report", "init", "config"];
    anyhow::bail!(
        "Unknown command or path '{}'. Run 'blamerank --help' for available commands.\n\nDid you mean one of: {}?",
        path_str,
        known_commands.join(", ")
    )
}
