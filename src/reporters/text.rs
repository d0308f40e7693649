//! Text (terminal) reporter
//!
//! One table per requested section, then the warning log. Warnings always
//! come last so they never split a table.

use anyhow::Result;
use console::style;
use std::collections::HashMap;

use super::Report;
use crate::metrics::loc::format_size;

const RULE_WIDTH: usize = 72;

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

struct Column {
    name: &'static str,
    width: usize,
    align: Align,
}

const fn left(name: &'static str, width: usize) -> Column {
    Column { name, width, align: Align::Left }
}

const fn right(name: &'static str, width: usize) -> Column {
    Column { name, width, align: Align::Right }
}

pub fn render(report: &Report) -> Result<String> {
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", style("Blamerank Report").bold()));
    out.push_str(&format!("{}\n", style(&report.repository).dim()));

    if let Some(summary) = &report.summary {
        heading(&mut out, "SUMMARY");
        out.push_str(&format!(
            "  Issues: {}  ({} errors, {} warnings)\n",
            style(summary.total_issues).bold(),
            style(summary.errors).red(),
            style(summary.warnings).yellow()
        ));
        out.push_str(&format!(
            "  Authors: {}  Files: {}  Rules: {}\n",
            summary.authors, summary.files, summary.rules
        ));
        if let Some(stats) = &report.attribution {
            out.push_str(&format!("  {}\n", style(format!("Attribution: {}", stats.summary())).dim()));
        }
    }

    if let Some(authors) = &report.authors {
        heading(&mut out, "TOP AUTHORS");
        let rows = authors
            .iter()
            .map(|a| {
                vec![
                    format!("{} <{}>", a.name, a.email),
                    a.count.to_string(),
                    a.errors.to_string(),
                    a.warnings.to_string(),
                    a.files.to_string(),
                    format!("{} ({})", a.top_rule, a.top_rule_count),
                ]
            })
            .collect();
        table(
            &mut out,
            &[
                left("AUTHOR", 32),
                right("ISSUES", 7),
                right("ERRORS", 7),
                right("WARN", 6),
                right("FILES", 6),
                left("TOP RULE", 24),
            ],
            rows,
        );
    }

    if let Some(files) = &report.files {
        heading(&mut out, "TOP FILES");
        let rows = files
            .iter()
            .map(|f| {
                vec![
                    f.path.clone(),
                    f.count.to_string(),
                    f.errors.to_string(),
                    f.warnings.to_string(),
                    f.authors.to_string(),
                    format!("{} ({})", f.top_rule, f.top_rule_count),
                ]
            })
            .collect();
        table(
            &mut out,
            &[
                left("FILE", 36),
                right("ISSUES", 7),
                right("ERRORS", 7),
                right("WARN", 6),
                right("AUTHORS", 8),
                left("TOP RULE", 24),
            ],
            rows,
        );
    }

    if let Some(rules) = &report.rules {
        heading(&mut out, "TOP RULES");
        let rows = rules
            .iter()
            .map(|r| {
                vec![
                    r.rule_id.clone(),
                    r.count.to_string(),
                    r.errors.to_string(),
                    r.warnings.to_string(),
                    r.authors.to_string(),
                    r.files.to_string(),
                ]
            })
            .collect();
        table(
            &mut out,
            &[
                left("RULE", 32),
                right("ISSUES", 7),
                right("ERRORS", 7),
                right("WARN", 6),
                right("AUTHORS", 8),
                right("FILES", 6),
            ],
            rows,
        );
    }

    if let Some(churn) = &report.churn {
        heading(&mut out, "CODE CHURN");
        let rows = churn
            .iter()
            .map(|c| {
                vec![
                    c.path.clone(),
                    c.changes.to_string(),
                    format!("+{}", c.lines_added),
                    format!("-{}", c.lines_deleted),
                    format!("{:+}", c.net_lines),
                ]
            })
            .collect();
        table(
            &mut out,
            &[
                left("FILE", 40),
                right("CHANGES", 8),
                right("ADDED", 8),
                right("DELETED", 8),
                right("NET", 8),
            ],
            rows,
        );
    }

    if let Some(bugs) = &report.bug_density {
        heading(&mut out, "BUG DENSITY");
        let rows = bugs
            .iter()
            .map(|b| {
                vec![
                    b.path.clone(),
                    b.total_commits.to_string(),
                    b.bug_fixes.to_string(),
                    format!("{:.1}%", b.bug_ratio),
                ]
            })
            .collect();
        table(
            &mut out,
            &[left("FILE", 40), right("COMMITS", 8), right("FIXES", 6), right("RATIO", 7)],
            rows,
        );
    }

    if let Some(debt) = &report.technical_debt {
        heading(&mut out, "TECHNICAL DEBT");
        let rows = debt
            .iter()
            .map(|d| {
                vec![
                    d.path.clone(),
                    d.todos.to_string(),
                    d.fixmes.to_string(),
                    d.hacks.to_string(),
                    d.total.to_string(),
                ]
            })
            .collect();
        table(
            &mut out,
            &[
                left("FILE", 40),
                right("TODO", 6),
                right("FIXME", 6),
                right("HACK", 6),
                right("TOTAL", 6),
            ],
            rows,
        );
    }

    if let Some(loc) = &report.lines_of_code {
        heading(&mut out, "LINES OF CODE");
        let rows = loc
            .iter()
            .map(|l| vec![l.path.clone(), l.lines.to_string(), format_size(l.bytes)])
            .collect();
        table(&mut out, &[left("FILE", 44), right("LINES", 8), right("SIZE", 10)], rows);
    }

    if let Some(coverage) = &report.coverage {
        heading(&mut out, "TEST COVERAGE (least covered first)");
        let rows = coverage
            .iter()
            .map(|c| {
                vec![
                    c.path.clone(),
                    format!("{:.1}%", c.line_coverage()),
                    format!("{:.1}%", c.function_coverage()),
                    format!("{:.1}%", c.branch_coverage()),
                ]
            })
            .collect();
        table(
            &mut out,
            &[
                left("FILE", 40),
                right("LINES", 8),
                right("FUNCS", 8),
                right("BRANCHES", 9),
            ],
            rows,
        );
    }

    if let Some(commits) = &report.commit_counts {
        heading(&mut out, "COMMITS");
        let rows = commits
            .iter()
            .map(|c| {
                vec![
                    format!("{} <{}>", c.name, c.email),
                    c.commits.to_string(),
                    c.merges.to_string(),
                    c.first_commit.format("%Y-%m-%d").to_string(),
                    c.last_commit.format("%Y-%m-%d").to_string(),
                ]
            })
            .collect();
        table(
            &mut out,
            &[
                left("AUTHOR", 36),
                right("COMMITS", 8),
                right("MERGES", 7),
                right("FIRST", 11),
                right("LAST", 11),
            ],
            rows,
        );
    }

    if let Some(recent) = &report.recent_contributors {
        heading(&mut out, &format!("RECENT CONTRIBUTORS (last {} days)", recent.days));
        let rows = recent
            .contributors
            .iter()
            .map(|c| {
                vec![
                    format!("{} <{}>", c.name, c.email),
                    c.commits.to_string(),
                    c.last_activity.format("%Y-%m-%d").to_string(),
                ]
            })
            .collect();
        table(
            &mut out,
            &[left("AUTHOR", 36), right("COMMITS", 8), right("LAST ACTIVE", 12)],
            rows,
        );
    }

    if let Some(spelling) = &report.spelling {
        heading(&mut out, "SPELLING (files)");
        let rows = spelling
            .files
            .iter()
            .map(|s| {
                vec![
                    s.path.clone(),
                    s.words_checked.to_string(),
                    s.errors.to_string(),
                    format!("{:.1}%", s.error_rate),
                    top_words(&s.misspellings, Some(&s.suggestions)),
                ]
            })
            .collect();
        table(
            &mut out,
            &[
                left("FILE", 32),
                right("WORDS", 7),
                right("ERRORS", 7),
                right("RATE", 7),
                left("TOP MISSPELLINGS", 28),
            ],
            rows,
        );

        heading(&mut out, "SPELLING (authors)");
        let rows = spelling
            .authors
            .iter()
            .map(|a| {
                vec![
                    format!("{} <{}>", a.name, a.email),
                    a.errors.to_string(),
                    a.files.len().to_string(),
                    top_words(&a.misspellings, None),
                ]
            })
            .collect();
        table(
            &mut out,
            &[
                left("AUTHOR", 32),
                right("ERRORS", 7),
                right("FILES", 6),
                left("TOP MISSPELLINGS", 28),
            ],
            rows,
        );
    }

    if !report.warnings.is_empty() {
        out.push_str(&format!(
            "\n{}\n",
            style(format!("Warnings ({})", report.warnings.len())).yellow().bold()
        ));
        for warning in &report.warnings {
            out.push_str(&format!("  {} {}\n", style("!").yellow(), warning));
        }
    }

    out.push('\n');
    Ok(out)
}

fn heading(out: &mut String, title: &str) {
    out.push_str(&format!("\n{}\n", style(title).bold()));
}

fn table(out: &mut String, columns: &[Column], rows: Vec<Vec<String>>) {
    if rows.is_empty() {
        out.push_str(&format!("  {}\n", style("(none)").dim()));
        return;
    }

    let header: Vec<String> = std::iter::once(format!("{:>3}", "#"))
        .chain(columns.iter().map(|c| pad(c.name, c)))
        .collect();
    out.push_str(&format!("  {}\n", style(header.join("  ")).dim()));
    out.push_str(&format!("  {}\n", style("─".repeat(RULE_WIDTH)).dim()));

    for (i, row) in rows.iter().enumerate() {
        let cells: Vec<String> = std::iter::once(format!("{:>3}", i + 1))
            .chain(columns.iter().zip(row).map(|(c, cell)| pad(cell, c)))
            .collect();
        out.push_str(&format!("  {}\n", cells.join("  ").trim_end()));
    }
}

/// Fit `text` to the column, keeping the tail of long values (file paths
/// are most recognizable by their end).
fn pad(text: &str, column: &Column) -> String {
    let len = text.chars().count();
    let fitted = if len > column.width && column.width > 3 {
        let skip = len - (column.width - 3);
        format!("...{}", text.chars().skip(skip).collect::<String>())
    } else {
        text.to_string()
    };
    match column.align {
        Align::Left => format!("{:<width$}", fitted, width = column.width),
        Align::Right => format!("{:>width$}", fitted, width = column.width),
    }
}

/// `word (n)` for the three most frequent misspellings, with the best
/// correction as `word→fix (n)` when one is known.
fn top_words(counts: &HashMap<String, usize>, fixes: Option<&HashMap<String, Vec<String>>>) -> String {
    let mut words: Vec<(&String, &usize)> = counts.iter().collect();
    words.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    words
        .iter()
        .take(3)
        .map(|(w, n)| {
            match fixes.and_then(|f| f.get(*w)).and_then(|s| s.first()) {
                Some(fix) => format!("{}→{} ({})", w, fix, n),
                None => format!("{} ({})", w, n),
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
