use crate::error::LintError;
use crate::messages::{format_message, lookup, RuleName, Severity, TemplateArgs};
use crate::rules::{Rule, ScriptSource, RULES};
use colored::*;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, span, trace, warn, Level};

/// Score of a script without any finding.
pub const MAX_SCORE: i32 = 100;

/// Options applied to every analyzed script.
#[derive(Debug, Clone)]
pub struct LintOptions {
    /// Rules whose findings are dropped.
    pub ignored_rules: HashSet<RuleName>,
    /// Least severe level displayed: `Error` shows errors only, `Info` shows everything.
    pub min_level: Severity,
    /// Whether levels are colored in reports.
    pub use_colors: bool,
}

impl Default for LintOptions {
    fn default() -> Self {
        Self {
            ignored_rules: HashSet::new(),
            min_level: Severity::Info,
            use_colors: true,
        }
    }
}

impl LintOptions {
    /// Sets the ignored rules from a comma-separated list of rule names.
    pub fn with_ignore_list(mut self, list: &str) -> Self {
        self.ignored_rules = parse_ignore_list(list);
        self
    }

    pub fn with_min_level(mut self, min_level: Severity) -> Self {
        self.min_level = min_level;
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }
}

/// Parses a comma-separated list of rule names.
///
/// Entries are trimmed and empty entries are dropped. Unknown names cannot match any
/// finding: they are logged and skipped.
pub fn parse_ignore_list(list: &str) -> HashSet<RuleName> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter_map(|name| match name.parse::<RuleName>() {
            Ok(rule) => Some(rule),
            Err(e) => {
                warn!(name, "Ignoring {}", e);
                None
            }
        })
        .collect()
}

/// One issue found in a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub rule: RuleName,
    /// Line number (1-indexed).
    pub line: usize,
    /// Message text, placeholders resolved.
    pub text: String,
    /// Score change (<= 0).
    pub score_delta: i32,
}

impl Finding {
    /// Creates a finding from the catalog entry of `rule`.
    pub fn new(rule: RuleName, line: usize, args: &TemplateArgs) -> Result<Self, LintError> {
        let entry = lookup(rule);
        Ok(Self {
            severity: entry.severity,
            rule,
            line,
            text: format_message(rule, args)?,
            score_delta: entry.score_delta,
        })
    }

    /// Formats the finding as `path:line: level [rule]: text`.
    pub fn render(&self, path: &Path, use_colors: bool) -> String {
        let label = if use_colors {
            colorize_level(self.severity).to_string()
        } else {
            self.severity.to_string()
        };
        format!(
            "{}:{}: {} [{}]: {}",
            path.display(),
            self.line,
            label,
            self.rule,
            self.text
        )
    }
}

fn colorize_level(severity: Severity) -> ColoredString {
    match severity {
        Severity::Error => severity.as_str().bold().red(),
        Severity::Warning => severity.as_str().bold().yellow(),
        Severity::Info => severity.as_str().bold().green(),
    }
}

/// Number of findings per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub error: usize,
    pub warning: usize,
    pub info: usize,
}

impl SeverityCounts {
    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Error => self.error,
            Severity::Warning => self.warning,
            Severity::Info => self.info,
        }
    }

    pub fn increment(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.error += 1,
            Severity::Warning => self.warning += 1,
            Severity::Info => self.info += 1,
        }
    }

    /// Adds the counters of another script.
    pub fn merge(&mut self, other: &SeverityCounts) {
        self.error += other.error;
        self.warning += other.warning;
        self.info += other.info;
    }

    pub fn total(&self) -> usize {
        self.error + self.warning + self.info
    }
}

/// Result of the analysis of one script, as serialized with `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct ScriptResult {
    pub path: PathBuf,
    pub findings: Vec<Finding>,
    pub counts: SeverityCounts,
    pub score: i32,
}

/// Analyzer of one script.
///
/// The file is read once at creation; [`ScriptAnalyzer::check`] runs the rules and
/// can be called again without duplicating findings.
pub struct ScriptAnalyzer {
    source: ScriptSource,
    options: LintOptions,
    findings: Vec<Finding>,
    counts: SeverityCounts,
    score: i32,
}

impl ScriptAnalyzer {
    /// Reads the script at `path` (resolved to an absolute path).
    ///
    /// Bytes that are not valid UTF-8 (Latin-1 author names in old scripts) are replaced
    /// with U+FFFD instead of failing the whole run.
    pub fn new(path: &Path, options: LintOptions) -> Result<Self, LintError> {
        let read_error = |source| LintError::FileRead {
            path: path.to_path_buf(),
            source,
        };
        let path = fs::canonicalize(path).map_err(read_error)?;
        let bytes = fs::read(&path).map_err(read_error)?;
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                debug!(path = %path.display(), "Invalid UTF-8 replaced");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };
        Ok(Self::from_source(ScriptSource::new(path, text), options))
    }

    /// Creates an analyzer on content already in memory.
    pub fn from_source(source: ScriptSource, options: LintOptions) -> Self {
        Self {
            source,
            options,
            findings: Vec::new(),
            counts: SeverityCounts::default(),
            score: MAX_SCORE,
        }
    }

    /// Runs all rules on the script.
    ///
    /// Findings are kept in rule order, then in match order. An empty file runs no
    /// rule and gets a single `empty_file` error.
    pub fn check(&mut self) -> Result<(), LintError> {
        let span = span!(Level::DEBUG, "script", path = %self.source.path().display());
        let _guard = span.enter();

        self.findings.clear();
        self.counts = SeverityCounts::default();
        self.score = MAX_SCORE;

        if self.source.is_empty() {
            debug!("Empty script, rules skipped");
            let finding = Finding::new(RuleName::EmptyFile, 1, &TemplateArgs::None)?;
            self.add_finding(finding);
            return Ok(());
        }

        self.run_rules(RULES)
    }

    /// Runs `rules` in order and records their findings.
    ///
    /// Stops at the first internal error: a descriptor that disagrees with the catalog
    /// or a rule that cannot complete.
    pub(crate) fn run_rules(&mut self, rules: &[Rule]) -> Result<(), LintError> {
        for rule in rules {
            if !rule.applies_to(&self.source) {
                trace!(rule = %rule.name, "Rule does not apply to this script");
                continue;
            }
            let catalog = lookup(rule.name).severity;
            if catalog != rule.severity {
                return Err(LintError::SeverityMismatch {
                    rule: rule.name,
                    declared: rule.severity,
                    catalog,
                });
            }
            let hits = (rule.check)(&self.source).map_err(|source| LintError::Rule {
                rule: rule.name,
                source,
            })?;
            debug!(rule = %rule.name, hits = hits.len(), "Rule completed");
            for hit in hits {
                let finding = Finding::new(rule.name, hit.line, &hit.args)?;
                self.add_finding(finding);
            }
        }
        Ok(())
    }

    /// Records a finding unless it is filtered out by the options.
    fn add_finding(&mut self, finding: Finding) {
        if self.options.ignored_rules.contains(&finding.rule) {
            trace!(rule = %finding.rule, line = finding.line, "Finding ignored");
            return;
        }
        if !finding.severity.is_reported_at(self.options.min_level) {
            trace!(rule = %finding.rule, line = finding.line, "Finding below level");
            return;
        }
        self.counts.increment(finding.severity);
        self.score = (self.score - finding.score_delta.abs()).max(0);
        self.findings.push(finding);
    }

    /// Absolute path of the script.
    pub fn path(&self) -> &Path {
        self.source.path()
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn counts(&self) -> SeverityCounts {
        self.counts
    }

    /// Score between 0 and 100.
    pub fn score(&self) -> i32 {
        self.score
    }

    /// Report of the script.
    ///
    /// Empty when there is no finding. With `name_only`, only the file name is
    /// returned; otherwise one line per finding.
    pub fn get_report(&self, name_only: bool) -> String {
        if self.findings.is_empty() {
            return String::new();
        }
        if name_only {
            return self
                .path()
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        self.findings
            .iter()
            .map(|f| f.render(self.path(), self.options.use_colors))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Snapshot of the analysis, for serialization.
    pub fn result(&self) -> ScriptResult {
        ScriptResult {
            path: self.path().to_path_buf(),
            findings: self.findings.clone(),
            counts: self.counts,
            score: self.score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleError;
    use crate::rules::{capture, Hit};
    use crate::utils::PatternMatch;

    fn broken_capture(source: &ScriptSource) -> Result<Vec<Hit>, RuleError> {
        // group 1 never participates in this match
        let found = PatternMatch {
            line: 1,
            text: source.text().to_string(),
            groups: vec![None],
        };
        let message = capture(&found, 1)?;
        Ok(vec![Hit::with_args(1, TemplateArgs::Message(message))])
    }

    const PERL: &[&str] = &["pl"];

    fn always_line_one(_source: &ScriptSource) -> Result<Vec<Hit>, RuleError> {
        Ok(vec![Hit::at(1)])
    }

    fn analyzer_on(text: &str) -> ScriptAnalyzer {
        ScriptAnalyzer::from_source(ScriptSource::new("a.py", text), LintOptions::default())
    }

    #[test]
    fn test_parse_ignore_list() {
        let ignored = parse_ignore_list(" missing_email ,,sys_exit, unknown_rule,");
        assert_eq!(ignored.len(), 2);
        assert!(ignored.contains(&RuleName::MissingEmail));
        assert!(ignored.contains(&RuleName::SysExit));
        assert!(parse_ignore_list("").is_empty());
    }

    #[test]
    fn test_counts() {
        let mut counts = SeverityCounts::default();
        counts.increment(Severity::Warning);
        counts.increment(Severity::Warning);
        counts.increment(Severity::Info);
        assert_eq!(counts.get(Severity::Warning), 2);
        assert_eq!(counts.total(), 3);
        let mut total = SeverityCounts::default();
        total.merge(&counts);
        total.merge(&counts);
        assert_eq!(total.get(Severity::Info), 2);
        assert_eq!(total.get(Severity::Error), 0);
    }

    #[test]
    fn test_render_without_colors() {
        let finding = Finding::new(RuleName::SysExit, 12, &TemplateArgs::None).unwrap();
        assert_eq!(
            finding.render(Path::new("/tmp/x.py"), false),
            "/tmp/x.py:12: warning [sys_exit]: sys.exit() causes WeeChat to exit itself"
        );
    }

    #[test]
    fn test_render_with_colors() {
        colored::control::set_override(true);
        let finding = Finding::new(RuleName::MissingEmail, 1, &TemplateArgs::None).unwrap();
        let line = finding.render(Path::new("x.py"), true);
        assert!(line.starts_with("x.py:1: \x1b["));
        assert!(line.contains("error\x1b[0m [missing_email]"));
    }

    #[test]
    fn test_rule_failure_is_internal_error() {
        let rules = [Rule {
            name: RuleName::ModifierIrcIn,
            severity: Severity::Warning,
            extensions: None,
            check: broken_capture,
        }];
        let mut analyzer = analyzer_on("weechat.hook_modifier('irc_in_', 'cb', '')\n");
        match analyzer.run_rules(&rules) {
            Err(err @ LintError::Rule { .. }) => {
                assert!(err.is_internal());
                assert!(matches!(
                    err,
                    LintError::Rule {
                        rule: RuleName::ModifierIrcIn,
                        source: RuleError::MissingCapture { group: 1, line: 1 },
                    }
                ));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(analyzer.findings().is_empty());
        assert_eq!(analyzer.counts().total(), 0);
        assert_eq!(analyzer.score(), MAX_SCORE);
    }

    #[test]
    fn test_severity_mismatch_is_internal_error() {
        // sys_exit is a warning in the catalog
        let rules = [Rule {
            name: RuleName::SysExit,
            severity: Severity::Error,
            extensions: None,
            check: always_line_one,
        }];
        let mut analyzer = analyzer_on("import sys\nsys.exit(1)\n");
        match analyzer.run_rules(&rules) {
            Err(err @ LintError::SeverityMismatch { .. }) => {
                assert!(err.is_internal());
                assert!(err.to_string().contains("sys_exit"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(analyzer.findings().is_empty());
        assert_eq!(analyzer.score(), MAX_SCORE);
    }

    #[test]
    fn test_run_rules_records_findings() {
        let rules = [Rule {
            name: RuleName::UnneededShebang,
            severity: Severity::Info,
            extensions: Some(PERL),
            check: always_line_one,
        }];
        let mut analyzer = analyzer_on("print 1\n");
        analyzer.run_rules(&rules).unwrap();
        // the extension guard skips the rule on a Python script
        assert!(analyzer.findings().is_empty());

        let rules = [Rule {
            name: RuleName::UnneededShebang,
            severity: Severity::Info,
            extensions: None,
            check: always_line_one,
        }];
        analyzer.run_rules(&rules).unwrap();
        assert_eq!(analyzer.findings().len(), 1);
        assert_eq!(analyzer.score(), MAX_SCORE - 1);
    }
}
