//! Technical debt markers (TODO / FIXME / HACK) in comments

use rayon::prelude::*;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

use crate::models::TechnicalDebtEntry;

struct Markers {
    todo: Regex,
    fixme: Regex,
    hack: Regex,
}

fn markers() -> &'static Markers {
    static MARKERS: OnceLock<Markers> = OnceLock::new();
    MARKERS.get_or_init(|| {
        let marker = |word: &str| {
            Regex::new(&format!(r"(?i)//\s*{word}|#\s*{word}|/\*\s*{word}")).expect("valid regex")
        };
        Markers {
            todo: marker("todo"),
            fixme: marker("fixme"),
            hack: marker("hack"),
        }
    })
}

/// Scan files (relative to `repo_root`) in parallel; files with no markers
/// or that cannot be read as text are left out.
pub fn analyze(repo_root: &Path, files: &[String]) -> Vec<TechnicalDebtEntry> {
    let mut entries: Vec<TechnicalDebtEntry> = files
        .par_iter()
        .filter_map(|path| {
            let content = std::fs::read_to_string(repo_root.join(path)).ok()?;
            let entry = scan_content(path, &content);
            (entry.total > 0).then_some(entry)
        })
        .collect();
    entries.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.path.cmp(&b.path)));
    debug!("{} files carry technical debt markers", entries.len());
    entries
}

/// Count marker lines in one file. A line counts once per category.
pub fn scan_content(path: &str, content: &str) -> TechnicalDebtEntry {
    let m = markers();
    let mut entry = TechnicalDebtEntry {
        path: path.to_string(),
        ..Default::default()
    };
    for line in content.lines() {
        if m.todo.is_match(line) {
            entry.todos += 1;
        }
        if m.fixme.is_match(line) {
            entry.fixmes += 1;
        }
        if m.hack.is_match(line) {
            entry.hacks += 1;
        }
    }
    entry.total = entry.todos + entry.fixmes + entry.hacks;
    entry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_content_counts_each_category() {
        let content = "\
// TODO: remove
#todo python style
/* FixMe later */
const x = 1; // hack around parser
let todo = 2;
// nothing here
";
        let entry = scan_content("a.js", content);
        assert_eq!(entry.todos, 2);
        assert_eq!(entry.fixmes, 1);
        assert_eq!(entry.hacks, 1);
        assert_eq!(entry.total, 4);
    }

    #[test]
    fn test_one_line_with_two_markers() {
        let entry = scan_content("a.py", "# TODO fix this hack # hack\n");
        assert_eq!(entry.todos, 1);
        assert_eq!(entry.hacks, 1);
        assert_eq!(entry.total, 2);
    }

    #[test]
    fn test_analyze_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.js"), "// TODO one\n// TODO two\n").unwrap();
        std::fs::write(dir.path().join("b.js"), "// FIXME\n").unwrap();
        std::fs::write(dir.path().join("clean.js"), "let a = 1;\n").unwrap();

        let files: Vec<String> = ["a.js", "b.js", "clean.js", "missing.js"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let entries = analyze(dir.path(), &files);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, "a.js");
        assert_eq!(entries[0].todos, 2);
        assert_eq!(entries[1].fixmes, 1);
    }
}
