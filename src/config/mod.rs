//! Configuration module for blamerank
//!
//! This module handles:
//! - Project-level configuration (blamerank.toml)
//! - User-level fallback configuration
//! - The exclusion policy consulted by the aggregator and extractors

mod project_config;
mod user_config;

pub use project_config::{
    glob_match, is_generated_or_binary, load_config_file, load_project_config, BlameConfig,
    CliDefaults, CoverageConfig, IgnoreConfig, ProjectConfig, SpellcheckConfig,
    DEFAULT_BLAME_TIMEOUT_SECS, DEFAULT_MAX_FILE_SIZE_KB, EXAMPLE_CONFIG,
};
pub use user_config::user_config_path;

/// Exclusion predicates and concurrency settings for a run.
pub trait IgnorePolicy: Send + Sync {
    fn should_ignore_file(&self, path: &str) -> bool;
    fn should_ignore_author(&self, email: &str, name: &str) -> bool;
    fn should_ignore_rule(&self, rule_id: &str) -> bool;
    /// Capacity for the blame concurrency gate
    fn concurrency_limit(&self) -> usize;
}
