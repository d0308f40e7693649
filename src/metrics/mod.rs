//! Derived-metric extractors
//!
//! These run independently of the issue-attribution path. The history-based
//! ones (churn, bug density, contributors) parse `git log` output; the
//! content-based ones (debt, lines of code, spelling) scan tracked files in
//! parallel. Only spelling touches the blame cache.

pub mod bug_density;
pub mod churn;
pub mod contributors;
pub mod coverage;
pub mod debt;
pub mod loc;
pub mod spelling;

use std::collections::HashSet;

use crate::config::{is_generated_or_binary, IgnorePolicy};

/// Tracked files worth scanning for content metrics, sorted.
pub fn scan_targets(tracked: &HashSet<String>, policy: &dyn IgnorePolicy) -> Vec<String> {
    let mut files: Vec<String> = tracked
        .iter()
        .filter(|path| !is_generated_or_binary(path) && !policy.should_ignore_file(path))
        .cloned()
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IgnoreConfig, ProjectConfig};

    #[test]
    fn test_scan_targets_filters_and_sorts() {
        let tracked: HashSet<String> = ["src/b.js", "src/a.js", "logo.png", "node_modules/x.js", "legacy/old.js"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let config = ProjectConfig::with_ignore(IgnoreConfig {
            paths: vec!["legacy/".into()],
            ..Default::default()
        });
        assert_eq!(scan_targets(&tracked, &config), vec!["src/a.js", "src/b.js"]);
    }
}
