//! Test coverage reports (LCOV and Istanbul JSON)

use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::models::CoverageEntry;

/// Locations searched when no coverage file is configured
const COMMON_COVERAGE_FILES: &[&str] = &[
    "coverage/lcov.info",
    "coverage/coverage.info",
    "lcov.info",
    "coverage.info",
    "coverage/coverage-final.json",
    "coverage-final.json",
    ".nyc_output/coverage-final.json",
];

#[derive(Error, Debug)]
pub enum CoverageError {
    #[error("no coverage file found (looked in {0})")]
    NotFound(String),

    #[error("unsupported coverage format: {0}")]
    Unsupported(String),

    #[error("failed to read coverage file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Find a coverage file in the usual places under `repo_root`.
pub fn detect_coverage_file(repo_root: &Path) -> Option<PathBuf> {
    COMMON_COVERAGE_FILES
        .iter()
        .map(|p| repo_root.join(p))
        .find(|p| p.is_file())
}

/// Load coverage from `file` (relative to `repo_root`) or an auto-detected
/// file, least covered first.
pub fn load(repo_root: &Path, file: Option<&str>) -> Result<Vec<CoverageEntry>, CoverageError> {
    let path = match file {
        Some(f) => repo_root.join(f),
        None => detect_coverage_file(repo_root)
            .ok_or_else(|| CoverageError::NotFound(COMMON_COVERAGE_FILES.join(", ")))?,
    };
    debug!("Reading coverage from {}", path.display());

    let content = std::fs::read_to_string(&path).map_err(|source| CoverageError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let trimmed = content.trim_start();
    let mut entries = if trimmed.starts_with('{') {
        parse_istanbul(&content)?
    } else if trimmed.starts_with("TN:") || trimmed.starts_with("SF:") || trimmed.is_empty() {
        parse_lcov(&content)
    } else {
        return Err(CoverageError::Unsupported(path.display().to_string()));
    };

    for entry in &mut entries {
        entry.path = relative_to(repo_root, &entry.path);
    }
    entries.sort_by(|a, b| {
        a.line_coverage()
            .total_cmp(&b.line_coverage())
            .then_with(|| a.path.cmp(&b.path))
    });
    Ok(entries)
}

/// Parse LCOV tracefile records (`SF:` ... `end_of_record`).
pub fn parse_lcov(content: &str) -> Vec<CoverageEntry> {
    let mut entries = Vec::new();
    let mut current: Option<CoverageEntry> = None;

    for line in content.lines().map(str::trim) {
        if let Some(path) = line.strip_prefix("SF:") {
            current = Some(CoverageEntry {
                path: path.to_string(),
                ..Default::default()
            });
            continue;
        }
        if line == "end_of_record" {
            if let Some(entry) = current.take() {
                entries.push(entry);
            }
            continue;
        }
        let Some(entry) = current.as_mut() else {
            continue;
        };
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let Ok(count) = value.trim().parse::<u64>() else {
            continue;
        };
        match key {
            "LH" => entry.lines_hit = count,
            "LF" => entry.lines_found = count,
            "FNH" => entry.functions_hit = count,
            "FNF" => entry.functions_found = count,
            "BRH" => entry.branches_hit = count,
            "BRF" => entry.branches_found = count,
            _ => {}
        }
    }

    entries
}

/// Parse an Istanbul/NYC `coverage-final.json` document.
///
/// Line coverage is derived from statements: a line is hit when any
/// statement starting on it ran.
pub fn parse_istanbul(content: &str) -> Result<Vec<CoverageEntry>, CoverageError> {
    let doc: JsonValue = serde_json::from_str(content)
        .map_err(|e| CoverageError::Unsupported(format!("invalid coverage JSON: {}", e)))?;
    let files = doc
        .as_object()
        .ok_or_else(|| CoverageError::Unsupported("coverage JSON is not an object".into()))?;

    let mut entries = Vec::with_capacity(files.len());
    for (key, file) in files {
        let path = file
            .get("path")
            .and_then(JsonValue::as_str)
            .unwrap_or(key)
            .to_string();

        let counts = |field: &str| -> HashMap<String, u64> {
            file.get(field)
                .and_then(JsonValue::as_object)
                .map(|m| {
                    m.iter()
                        .filter_map(|(id, v)| v.as_u64().map(|c| (id.clone(), c)))
                        .collect()
                })
                .unwrap_or_default()
        };

        let statements = counts("s");
        let mut lines: BTreeMap<u64, bool> = BTreeMap::new();
        if let Some(map) = file.get("statementMap").and_then(JsonValue::as_object) {
            for (id, loc) in map {
                let Some(line) = loc.pointer("/start/line").and_then(JsonValue::as_u64) else {
                    continue;
                };
                let hit = statements.get(id).copied().unwrap_or(0) > 0;
                *lines.entry(line).or_insert(false) |= hit;
            }
        }

        let functions = counts("f");
        let branches: Vec<u64> = file
            .get("b")
            .and_then(JsonValue::as_object)
            .map(|m| {
                m.values()
                    .filter_map(JsonValue::as_array)
                    .flatten()
                    .filter_map(JsonValue::as_u64)
                    .collect()
            })
            .unwrap_or_default();

        entries.push(CoverageEntry {
            path,
            lines_hit: lines.values().filter(|hit| **hit).count() as u64,
            lines_found: lines.len() as u64,
            functions_hit: functions.values().filter(|c| **c > 0).count() as u64,
            functions_found: functions.len() as u64,
            branches_hit: branches.iter().filter(|c| **c > 0).count() as u64,
            branches_found: branches.len() as u64,
        });
    }
    Ok(entries)
}

/// Strip `repo_root` from absolute report paths; forward slashes.
fn relative_to(repo_root: &Path, path: &str) -> String {
    let normalized = path.replace('\\', "/");
    let root = repo_root.to_string_lossy().replace('\\', "/");
    let root = root.trim_end_matches('/');
    normalized
        .strip_prefix(root)
        .map(|rest| rest.trim_start_matches('/').to_string())
        .unwrap_or(normalized)
}
