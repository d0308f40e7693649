//! Comment spell-checking with per-author attribution
//!
//! Words are pulled from comments (or whole lines of Markdown). A word is
//! reported only when it is a known typo or sits one edit away from a
//! dictionary word, so identifiers and jargon the dictionary lacks stay quiet.
//! Misspellings are attributed through the shared [`BlameService`] under a
//! gate owned by this analysis.

mod dictionary;

use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

use crate::config::{IgnorePolicy, SpellcheckConfig};
use crate::git::BlameService;
use crate::models::{SpellingAuthorEntry, SpellingEntry};
use crate::pipeline::gate::Gate;
use dictionary::{COMMON_TYPOS, ENGLISH_WORDS, PROGRAMMING_WORDS};

/// Words shorter than this are never flagged
const MIN_WORD_LEN: usize = 4;
/// Substitution typos are only considered for words at least this long
const MIN_SUBSTITUTION_LEN: usize = 6;
const MAX_SUGGESTIONS: usize = 5;
const STEM_SUFFIXES: &[&str] = &["s", "es", "ed", "d", "ing", "er", "ly"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edit {
    Substitution,
    Transposition,
    InsertDelete,
}

/// Dictionary-backed checker for comment prose.
pub struct SpellChecker {
    known: HashSet<String>,
    typos: HashMap<&'static str, &'static str>,
}

impl SpellChecker {
    pub fn new(custom_words: &[String]) -> Self {
        let known = ENGLISH_WORDS
            .iter()
            .chain(PROGRAMMING_WORDS)
            .map(|w| w.to_string())
            .chain(custom_words.iter().map(|w| w.to_lowercase()))
            .collect();
        Self {
            known,
            typos: COMMON_TYPOS.iter().copied().collect(),
        }
    }

    pub fn is_correct(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        if self.typos.contains_key(lower.as_str()) {
            return false;
        }
        if lower.len() < MIN_WORD_LEN || self.is_known(&lower) {
            return true;
        }
        !self.known.iter().any(|w| self.is_near(&lower, w))
    }

    /// Likely corrections, best first.
    pub fn suggestions(&self, word: &str) -> Vec<String> {
        let lower = word.to_lowercase();
        let mut out: Vec<String> = Vec::new();
        if let Some(fix) = self.typos.get(lower.as_str()) {
            out.push(fix.to_string());
        }
        let mut near: Vec<&String> = self.known.iter().filter(|w| self.is_near(&lower, w)).collect();
        near.sort();
        for w in near {
            if out.len() >= MAX_SUGGESTIONS {
                break;
            }
            if !out.contains(w) {
                out.push(w.clone());
            }
        }
        out
    }

    fn is_known(&self, lower: &str) -> bool {
        if self.known.contains(lower) {
            return true;
        }
        STEM_SUFFIXES.iter().any(|suffix| {
            lower.strip_suffix(suffix).is_some_and(|stem| {
                stem.len() >= 2
                    && (self.known.contains(stem)
                        || (matches!(*suffix, "ing" | "ed" | "er") && self.known.contains(&format!("{stem}e"))))
            })
        })
    }

    fn is_near(&self, word: &str, candidate: &str) -> bool {
        if candidate.len() < MIN_WORD_LEN {
            return false;
        }
        match single_edit(word.as_bytes(), candidate.as_bytes()) {
            Some(Edit::Substitution) => word.len() >= MIN_SUBSTITUTION_LEN,
            Some(_) => true,
            None => false,
        }
    }

    /// Check the comment text of one file.
    pub fn scan_content(&self, path: &str, content: &str, prose: bool) -> FileScan {
        let mut entry = SpellingEntry {
            path: path.to_string(),
            ..Default::default()
        };
        let mut hits = Vec::new();
        let mut in_fence = false;

        for (idx, line) in content.lines().enumerate() {
            let text = if prose {
                if line.trim_start().starts_with("```") {
                    in_fence = !in_fence;
                    continue;
                }
                if in_fence {
                    continue;
                }
                Some(line)
            } else {
                comment_text(line)
            };
            let Some(text) = text else {
                continue;
            };

            for word in words(text) {
                entry.words_checked += 1;
                if !self.is_correct(word) {
                    let lower = word.to_lowercase();
                    entry.errors += 1;
                    *entry.misspellings.entry(lower.clone()).or_insert(0) += 1;
                    let suggestions = entry
                        .suggestions
                        .entry(lower.clone())
                        .or_insert_with(|| self.suggestions(&lower))
                        .clone();
                    hits.push(Misspelling {
                        line: idx as u32 + 1,
                        word: lower,
                        suggestions,
                    });
                }
            }
        }

        if entry.words_checked > 0 {
            entry.error_rate = entry.errors as f64 / entry.words_checked as f64 * 100.0;
        }
        FileScan { entry, hits }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Misspelling {
    pub line: u32,
    pub word: String,
    pub suggestions: Vec<String>,
}

/// Result of checking one file
#[derive(Debug, Clone)]
pub struct FileScan {
    pub entry: SpellingEntry,
    pub hits: Vec<Misspelling>,
}

/// Spelling leaderboards for a run
#[derive(Debug, Clone, Default)]
pub struct SpellingReport {
    /// Files with at least one misspelling, highest error rate first
    pub files: Vec<SpellingEntry>,
    /// Authors with attributed misspellings, most errors first
    pub authors: Vec<SpellingAuthorEntry>,
    pub warnings: Vec<String>,
}

/// Check every eligible file and attribute misspellings to their authors.
pub fn analyze(
    repo_root: &Path,
    files: &[String],
    config: &SpellcheckConfig,
    blame: &BlameService,
    gate: &Gate,
    policy: &dyn IgnorePolicy,
) -> SpellingReport {
    let checker = SpellChecker::new(&config.custom_words);
    let warnings: Mutex<Vec<String>> = Mutex::new(Vec::new());

    let eligible: Vec<&String> = files
        .iter()
        .filter(|f| is_spellcheck_file(f, config))
        .collect();
    info!("Spell-checking {} files", eligible.len());

    let scanned: Vec<(FileScan, Vec<(Misspelling, String, String)>)> = eligible
        .par_iter()
        .filter_map(|path| {
            let content = std::fs::read_to_string(repo_root.join(path.as_str())).ok()?;
            let scan = checker.scan_content(path, &content, path.ends_with(".md"));
            if scan.entry.errors == 0 {
                return None;
            }
            let attributed = attribute_hits(path, &scan.hits, blame, gate, &warnings);
            Some((scan, attributed))
        })
        .collect();

    let mut authors: HashMap<String, SpellingAuthorEntry> = HashMap::new();
    let mut entries = Vec::with_capacity(scanned.len());
    for (scan, attributed) in scanned {
        for (hit, name, email) in attributed {
            if policy.should_ignore_author(&email, &name) {
                continue;
            }
            let author = authors.entry(email.clone()).or_insert_with(|| SpellingAuthorEntry {
                name,
                email,
                ..Default::default()
            });
            author.errors += 1;
            *author.files.entry(scan.entry.path.clone()).or_insert(0) += 1;
            *author.misspellings.entry(hit.word).or_insert(0) += 1;
        }
        entries.push(scan.entry);
    }

    entries.sort_by(|a, b| {
        b.error_rate
            .total_cmp(&a.error_rate)
            .then_with(|| a.path.cmp(&b.path))
    });
    let mut authors: Vec<SpellingAuthorEntry> = authors.into_values().collect();
    authors.sort_by(|a, b| b.errors.cmp(&a.errors).then_with(|| a.email.cmp(&b.email)));

    SpellingReport {
        files: entries,
        authors,
        warnings: warnings.into_inner().expect("warning log lock poisoned"),
    }
}

fn attribute_hits(
    path: &str,
    hits: &[Misspelling],
    blame: &BlameService,
    gate: &Gate,
    warnings: &Mutex<Vec<String>>,
) -> Vec<(Misspelling, String, String)> {
    let index = match blame.attribute(path, gate, warnings) {
        Ok(index) => index,
        Err(e) => {
            debug!("Misspellings in {} left unattributed: {}", path, e);
            return Vec::new();
        }
    };
    hits.iter()
        .filter_map(|hit| {
            let line = index.nearest_at_or_after(hit.line)?;
            let info = index.get(line)?;
            Some((hit.clone(), info.name.clone(), info.email.clone()))
        })
        .collect()
}

fn is_spellcheck_file(path: &str, config: &SpellcheckConfig) -> bool {
    config.extensions.iter().any(|ext| path.ends_with(ext.as_str()))
        && !config
            .ignore_paths
            .iter()
            .any(|p| !p.is_empty() && path.contains(p.as_str()))
}

/// Comment portion of a source line, if any.
fn comment_text(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    if let Some(rest) = trimmed.strip_prefix("<!--") {
        return Some(rest.trim_end_matches("-->"));
    }
    if let Some(rest) = trimmed.strip_prefix("/*") {
        return Some(rest.trim_end_matches("*/"));
    }
    if let Some(rest) = trimmed.strip_prefix('*') {
        return Some(rest.trim_end_matches("*/"));
    }
    if trimmed.starts_with("# ") || trimmed == "#" {
        return Some(&trimmed[1..]);
    }
    // Trailing `//` comment, but not the one in `https://`
    let mut search = 0;
    while let Some(pos) = line[search..].find("//") {
        let at = search + pos;
        if at == 0 || !line[..at].ends_with(':') {
            return Some(&line[at + 2..]);
        }
        search = at + 2;
    }
    if let Some(pos) = line.find(" # ") {
        return Some(&line[pos + 3..]);
    }
    None
}

/// Plain words in `text`; camelCase, ACRONYMS and very short tokens are skipped.
fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_ascii_alphabetic())
        .filter(|w| w.len() >= 2)
        .filter(|w| !w.chars().skip(1).any(|c| c.is_ascii_uppercase()))
}

/// Classify `a` vs `b` as a single edit, if they differ by exactly one.
fn single_edit(a: &[u8], b: &[u8]) -> Option<Edit> {
    if a == b {
        return None;
    }
    match a.len().abs_diff(b.len()) {
        0 => {
            let diffs: Vec<usize> = (0..a.len()).filter(|&i| a[i] != b[i]).collect();
            match diffs.as_slice() {
                [_] => Some(Edit::Substitution),
                [i, j] if *j == i + 1 && a[*i] == b[*j] && a[*j] == b[*i] => Some(Edit::Transposition),
                _ => None,
            }
        }
        1 => {
            let (long, short) = if a.len() > b.len() { (a, b) } else { (b, a) };
            let split = short
                .iter()
                .zip(long)
                .position(|(x, y)| x != y)
                .unwrap_or(short.len());
            (short[split..] == long[split + 1..]).then_some(Edit::InsertDelete)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;
    use crate::git::runner::testing::FakeGit;
    use std::sync::Arc;

    fn checker() -> SpellChecker {
        SpellChecker::new(&[])
    }

    #[test]
    fn test_correct_words() {
        let sc = checker();
        for word in ["hello", "world", "test", "code", "the", "and", "for", "Tests", "making", "lines"] {
            assert!(sc.is_correct(word), "expected '{}' to be correct", word);
        }
    }

    #[test]
    fn test_incorrect_words() {
        let sc = checker();
        for word in ["helo", "wrold", "tset", "coed", "recieve", "teh"] {
            assert!(!sc.is_correct(word), "expected '{}' to be incorrect", word);
        }
    }

    #[test]
    fn test_unknown_jargon_is_not_flagged() {
        let sc = checker();
        assert!(sc.is_correct("kubernetes"));
        assert!(sc.is_correct("memoize"));
    }

    #[test]
    fn test_custom_words() {
        let sc = SpellChecker::new(&["Helo".to_string()]);
        assert!(sc.is_correct("helo"));
    }

    #[test]
    fn test_suggestions() {
        let sc = checker();
        assert!(sc.suggestions("helo").contains(&"hello".to_string()));
        assert_eq!(sc.suggestions("recieve")[0], "receive");
    }

    #[test]
    fn test_single_edit() {
        assert_eq!(single_edit(b"tset", b"test"), Some(Edit::Transposition));
        assert_eq!(single_edit(b"helo", b"hello"), Some(Edit::InsertDelete));
        assert_eq!(single_edit(b"hello", b"helo"), Some(Edit::InsertDelete));
        assert_eq!(single_edit(b"port", b"sort"), Some(Edit::Substitution));
        assert_eq!(single_edit(b"abcd", b"badc"), None);
        assert_eq!(single_edit(b"same", b"same"), None);
    }

    #[test]
    fn test_comment_text() {
        assert_eq!(comment_text("let x = 1; // trailing note"), Some(" trailing note"));
        assert_eq!(comment_text("# python comment"), Some(" python comment"));
        assert_eq!(comment_text(" * block line"), Some(" block line"));
        assert_eq!(comment_text("/* opener */"), Some(" opener "));
        assert_eq!(comment_text("fetch('https://example.com')"), None);
        assert_eq!(comment_text("let y = 2;"), None);
        assert_eq!(comment_text("#[derive(Debug)]"), None);
    }

    #[test]
    fn test_scan_content() {
        let sc = checker();
        let content = "// wrold is here\nconst helo = 1;\n/* teh end */\n";
        let scan = sc.scan_content("a.js", content, false);
        assert_eq!(scan.entry.errors, 2);
        assert_eq!(scan.entry.words_checked, 5);
        let found: Vec<(u32, &str)> = scan.hits.iter().map(|h| (h.line, h.word.as_str())).collect();
        assert_eq!(found, vec![(1, "wrold"), (3, "teh")]);
        assert!(scan.hits[0].suggestions.contains(&"world".to_string()));
        assert_eq!(scan.hits[1].suggestions[0], "the");
        assert_eq!(scan.entry.suggestions["teh"], scan.hits[1].suggestions);
    }

    #[test]
    fn test_markdown_skips_code_fences() {
        let sc = checker();
        let content = "Some wrold text\n```\nhelo()\n```\n";
        let scan = sc.scan_content("README.md", content, true);
        assert_eq!(scan.entry.errors, 1);
    }

    #[test]
    fn test_analyze_attributes_misspellings() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.js"), "// the wrold\nlet a = 1;\n").unwrap();
        std::fs::write(dir.path().join("b.js"), "// all good here\n").unwrap();

        let porcelain = format!(
            "{} 1 1 2\nauthor Alice\nauthor-mail <alice@x>\n\t// the wrold\n\
             {} 2 2\nauthor Alice\nauthor-mail <alice@x>\n\tlet a = 1;\n",
            "c".repeat(40),
            "c".repeat(40)
        );
        let fake = Arc::new(FakeGit::new().with_output(&["blame", "--line-porcelain", "--", "a.js"], &porcelain));
        let blame = BlameService::new(fake.clone());
        let gate = Gate::new(1).unwrap();
        let config = ProjectConfig::default();

        let files = vec!["a.js".to_string(), "b.js".to_string()];
        let report = analyze(dir.path(), &files, &config.spellcheck, &blame, &gate, &config);

        assert_eq!(report.files.len(), 1);
        assert_eq!(report.files[0].path, "a.js");
        assert!(report.files[0].suggestions["wrold"].contains(&"world".to_string()));
        assert_eq!(report.authors.len(), 1);
        assert_eq!(report.authors[0].email, "alice@x");
        assert_eq!(report.authors[0].misspellings["wrold"], 1);
        // Only the file with misspellings was blamed
        assert_eq!(fake.total_calls(), 1);
        assert!(report.warnings.is_empty());
    }
}
