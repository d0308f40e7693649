//! Project-level configuration support
//!
//! Loads per-project configuration from `blamerank.toml` or
//! `.blamerankrc.json` in the repository root, falling back to the user-level
//! `~/.config/blamerank/config.toml`.
//!
//! # Configuration Format
//!
//! ```toml
//! # blamerank.toml
//!
//! [ignore]
//! files = ["*.min.js", "legacy/*"]
//! paths = ["node_modules", "vendor"]
//! authors = ["dependabot"]
//! rules = ["max-len"]
//! max_file_size_kb = 5000
//!
//! [blame]
//! concurrency = 4
//! timeout_secs = 30
//!
//! [spellcheck]
//! custom_words = ["blamerank"]
//!
//! [coverage]
//! file = "coverage/lcov.info"
//!
//! [defaults]
//! top = 10
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use super::user_config::user_config_path;
use super::IgnorePolicy;
use crate::pipeline::gate::DEFAULT_CONCURRENCY;

/// Default size limit for scanned/blamed files, in KB
pub const DEFAULT_MAX_FILE_SIZE_KB: u64 = 5000;

/// Default per-file `git blame` timeout, in seconds
pub const DEFAULT_BLAME_TIMEOUT_SECS: u64 = 30;

/// Paths and extensions that never hold hand-written source.
const SKIP_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".svg", ".ico", ".pdf", ".zip", ".tar", ".gz", ".exe",
    ".bin", ".lock", ".log", ".tmp", ".cache", ".woff", ".woff2", ".ttf",
];
const SKIP_DIRS: &[&str] = &[
    "node_modules/",
    ".git/",
    "dist/",
    "build/",
    "coverage/",
    ".nyc_output/",
    "vendor/",
];

/// Example written by `blamerank init`
pub const EXAMPLE_CONFIG: &str = r#"# blamerank configuration

[ignore]
# Glob on the full path or file name, or a plain substring
files = ["*.min.js"]
# Substring match on the path
paths = ["node_modules", "vendor"]
# Case-insensitive match on author email or name
authors = ["dependabot", "renovate"]
# Exact lint rule ids
rules = []
# Skip files larger than this (0 disables the check)
max_file_size_kb = 5000

[blame]
# Maximum simultaneous `git blame` processes
concurrency = 4
timeout_secs = 30

[spellcheck]
custom_words = []
extensions = [".js", ".jsx", ".ts", ".tsx", ".py", ".md"]
ignore_paths = []

[coverage]
# file = "coverage/lcov.info"

[defaults]
top = 10
"#;

/// Exclusion rules
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct IgnoreConfig {
    pub files: Vec<String>,
    pub paths: Vec<String>,
    pub authors: Vec<String>,
    pub rules: Vec<String>,
    pub max_file_size_kb: u64,
}

impl Default for IgnoreConfig {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            paths: Vec::new(),
            authors: Vec::new(),
            rules: Vec::new(),
            max_file_size_kb: DEFAULT_MAX_FILE_SIZE_KB,
        }
    }
}

/// Blame concurrency and timeout
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BlameConfig {
    /// Gate capacity; must be at least 1
    pub concurrency: usize,
    pub timeout_secs: u64,
}

impl Default for BlameConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout_secs: DEFAULT_BLAME_TIMEOUT_SECS,
        }
    }
}

impl BlameConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpellcheckConfig {
    pub custom_words: Vec<String>,
    /// File extensions to scan, with leading dot
    pub extensions: Vec<String>,
    pub ignore_paths: Vec<String>,
}

impl Default for SpellcheckConfig {
    fn default() -> Self {
        Self {
            custom_words: Vec::new(),
            extensions: [".js", ".jsx", ".ts", ".tsx", ".py", ".md"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ignore_paths: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CoverageConfig {
    /// LCOV file, relative to the repository root
    pub file: Option<String>,
}

/// CLI defaults (overridden by explicit flags)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CliDefaults {
    pub top: Option<usize>,
    pub format: Option<String>,
}

/// Project-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub ignore: IgnoreConfig,
    pub blame: BlameConfig,
    pub spellcheck: SpellcheckConfig,
    pub coverage: CoverageConfig,
    pub defaults: CliDefaults,

    /// Repository root used for file-size checks
    #[serde(skip)]
    repo_root: Option<PathBuf>,
}

impl ProjectConfig {
    /// Default configuration with the given ignore rules
    pub fn with_ignore(ignore: IgnoreConfig) -> Self {
        Self {
            ignore,
            ..Default::default()
        }
    }

    /// Resolve file-size checks against this repository root.
    pub fn with_repo_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.repo_root = Some(root.into());
        self
    }

    pub fn repo_root(&self) -> Option<&Path> {
        self.repo_root.as_deref()
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    fn exceeds_size_limit(&self, path: &str) -> bool {
        let Some(root) = &self.repo_root else {
            return false;
        };
        let limit = self.ignore.max_file_size_kb;
        if limit == 0 {
            return false;
        }
        std::fs::metadata(root.join(path))
            .map(|m| m.len() > limit * 1024)
            .unwrap_or(false)
    }
}

impl IgnorePolicy for ProjectConfig {
    fn should_ignore_file(&self, path: &str) -> bool {
        let path = path.replace('\\', "/");
        let basename = path.rsplit('/').next().unwrap_or(path.as_str());

        let by_pattern = self.ignore.files.iter().filter(|p| !p.is_empty()).any(|p| {
            glob_match(p, &path) || glob_match(p, basename) || path.contains(p.as_str())
        });
        let by_path = self
            .ignore
            .paths
            .iter()
            .filter(|p| !p.is_empty())
            .any(|p| path.contains(p.as_str()));

        by_pattern || by_path || self.exceeds_size_limit(&path)
    }

    fn should_ignore_author(&self, email: &str, name: &str) -> bool {
        let email = email.to_lowercase();
        let name = name.to_lowercase();
        self.ignore
            .authors
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| p.to_lowercase())
            .any(|p| email.contains(&p) || name.contains(&p))
    }

    fn should_ignore_rule(&self, rule_id: &str) -> bool {
        self.ignore.rules.iter().any(|r| r == rule_id)
    }

    fn concurrency_limit(&self) -> usize {
        self.blame.concurrency
    }
}

/// Whether a path looks like a build artifact, dependency or binary blob.
pub fn is_generated_or_binary(path: &str) -> bool {
    let lower = path.to_lowercase();
    SKIP_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
        || SKIP_DIRS
            .iter()
            .any(|dir| lower.starts_with(dir) || lower.contains(&format!("/{}", dir)))
}

/// Load project configuration from the repository root.
///
/// Looks for `blamerank.toml`, then `.blamerankrc.json`, then the user-level
/// config. Unreadable files are logged and skipped.
pub fn load_project_config(repo_path: &Path) -> ProjectConfig {
    let candidates = [
        Some(repo_path.join("blamerank.toml")),
        Some(repo_path.join(".blamerankrc.json")),
        user_config_path(),
    ];

    for path in candidates.into_iter().flatten() {
        if !path.exists() {
            continue;
        }
        match load_config_file(&path) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                return config.with_repo_root(repo_path);
            }
            Err(e) => {
                warn!("Failed to load {}: {:#}", path.display(), e);
            }
        }
    }

    debug!("No config found, using defaults");
    ProjectConfig::default().with_repo_root(repo_path)
}

/// Load a TOML or JSON config file (chosen by extension).
pub fn load_config_file(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let config = if is_json {
        serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))?
    } else {
        toml::from_str(&content).with_context(|| format!("Invalid TOML in {}", path.display()))?
    };
    Ok(config)
}

/// Match a path against a glob.
///
/// `*` and `?` stay within one path segment, `**` crosses segments, and a
/// pattern ending in `/` matches everything under that directory.
pub fn glob_match(pattern: &str, path: &str) -> bool {
    if pattern.ends_with('/') {
        return path.starts_with(pattern);
    }
    wildcard(pattern.as_bytes(), path.as_bytes())
}

fn wildcard(pattern: &[u8], text: &[u8]) -> bool {
    match pattern.first() {
        None => text.is_empty(),
        Some(b'*') if pattern.get(1) == Some(&b'*') => {
            let rest = &pattern[2..];
            // `**/` may also match zero directories
            if rest.first() == Some(&b'/') && wildcard(&rest[1..], text) {
                return true;
            }
            (0..=text.len()).any(|i| wildcard(rest, &text[i..]))
        }
        Some(b'*') => {
            let rest = &pattern[1..];
            for i in 0..=text.len() {
                if wildcard(rest, &text[i..]) {
                    return true;
                }
                if i < text.len() && text[i] == b'/' {
                    break;
                }
            }
            false
        }
        Some(b'?') => !text.is_empty() && text[0] != b'/' && wildcard(&pattern[1..], &text[1..]),
        Some(c) => text.first() == Some(c) && wildcard(&pattern[1..], &text[1..]),
    }
}
