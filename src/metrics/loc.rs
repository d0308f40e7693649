//! Lines of code per tracked file

use rayon::prelude::*;
use std::path::Path;

use crate::models::LinesOfCodeEntry;

/// Line and byte counts for readable text files, largest first.
pub fn analyze(repo_root: &Path, files: &[String]) -> Vec<LinesOfCodeEntry> {
    let mut entries: Vec<LinesOfCodeEntry> = files
        .par_iter()
        .filter_map(|path| {
            let content = std::fs::read_to_string(repo_root.join(path)).ok()?;
            Some(LinesOfCodeEntry {
                path: path.clone(),
                lines: content.lines().count(),
                bytes: content.len() as u64,
            })
        })
        .collect();
    entries.sort_by(|a, b| b.lines.cmp(&a.lines).then_with(|| a.path.cmp(&b.path)));
    entries
}

/// Human-readable byte size (`512 B`, `1.5 KB`).
pub fn format_size(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    if bytes < UNIT {
        return format!("{} B", bytes);
    }
    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }
    let suffix = ['K', 'M', 'G', 'T', 'P', 'E'][exp];
    format!("{:.1} {}B", bytes as f64 / div as f64, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_counts_lines() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.js"), "a\nb\nc\n").unwrap();
        std::fs::write(dir.path().join("b.js"), "a\n").unwrap();
        std::fs::write(dir.path().join("bin.dat"), [0xff, 0xfe, 0x00]).unwrap();

        let files: Vec<String> = ["a.js", "b.js", "bin.dat"].iter().map(|s| s.to_string()).collect();
        let entries = analyze(dir.path(), &files);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, "a.js");
        assert_eq!(entries[0].lines, 3);
        assert_eq!(entries[0].bytes, 6);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
