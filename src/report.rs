//! Aggregation of the results of several scripts, and the text printed after the
//! per-script reports.

use crate::analyzer::{ScriptAnalyzer, SeverityCounts, MAX_SCORE};
use colored::*;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Highest exit code; the number of errors is capped to it.
pub const MAX_EXIT_CODE: i32 = 255;

/// Exit code used when the analysis cannot run (invalid path, unreadable script).
pub const FATAL_EXIT_CODE: i32 = 1;

/// Totals over all analyzed scripts.
#[derive(Debug, Default)]
pub struct Summary {
    pub scripts: usize,
    pub scripts_with_issues: usize,
    pub counts: SeverityCounts,
    /// Score of each script, in analysis order.
    pub scores: Vec<(PathBuf, i32)>,
}

impl Summary {
    /// Adds the result of a checked script.
    pub fn add(&mut self, script: &ScriptAnalyzer) {
        self.scripts += 1;
        if !script.findings().is_empty() {
            self.scripts_with_issues += 1;
        }
        self.counts.merge(&script.counts());
        self.scores.push((script.path().to_path_buf(), script.score()));
    }

    /// Final status line.
    pub fn status_line(&self, use_colors: bool) -> String {
        if self.scripts == 0 {
            return "No scripts analyzed".to_string();
        }
        let (status, color) = if self.counts.total() == 0 {
            ("Perfect", Color::Green)
        } else if self.counts.error + self.counts.warning == 0 {
            ("Almost good", Color::Cyan)
        } else if self.counts.error == 0 {
            ("Not so good", Color::Yellow)
        } else {
            ("FAILED", Color::Red)
        };
        let status = if use_colors {
            status.bold().color(color).to_string()
        } else {
            status.to_string()
        };
        format!(
            "{}: {} scripts analyzed, {} with issues: {} errors, {} warnings, {} info",
            status,
            self.scripts,
            self.scripts_with_issues,
            self.counts.error,
            self.counts.warning,
            self.counts.info
        )
    }

    /// Exit code: number of errors (plus warnings in strict mode), capped to 255.
    pub fn exit_code(&self, strict: bool) -> i32 {
        let mut issues = self.counts.error;
        if strict {
            issues += self.counts.warning;
        }
        issues.min(MAX_EXIT_CODE as usize) as i32
    }
}

/// Color of a score; `None` for a value outside 0..=100.
pub fn score_color(score: i32) -> Option<Color> {
    match score {
        s if !(0..=MAX_SCORE).contains(&s) => None,
        s if s < 50 => Some(Color::Red),
        s if s < 80 => Some(Color::Yellow),
        s if s < MAX_SCORE => Some(Color::Cyan),
        _ => Some(Color::Green),
    }
}

/// Formats a score as `N / 100`.
pub fn format_score(score: i32, use_colors: bool) -> String {
    let text = format!("{} / {}", score, MAX_SCORE);
    match score_color(score) {
        Some(color) if use_colors => text.bold().color(color).to_string(),
        _ => text,
    }
}

/// One line per script: `path: score = N / 100`.
pub fn scores_listing(scores: &[(PathBuf, i32)], use_colors: bool) -> String {
    scores
        .iter()
        .map(|(path, score)| {
            format!(
                "{}: score = {}",
                path.display(),
                format_score(*score, use_colors)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Scripts grouped by score, best score first, paths sorted in each group.
pub fn scores_by_score(scores: &[(PathBuf, i32)], use_colors: bool) -> String {
    let mut groups: BTreeMap<i32, Vec<&PathBuf>> = BTreeMap::new();
    for (path, score) in scores {
        groups.entry(*score).or_default().push(path);
    }
    groups
        .into_iter()
        .rev()
        .map(|(score, mut paths)| {
            paths.sort();
            let mut block = format!(
                "{} scripts with score {}:",
                paths.len(),
                format_score(score, use_colors)
            );
            for path in paths {
                block.push_str(&format!("\n  {}", path.display()));
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n")
}
