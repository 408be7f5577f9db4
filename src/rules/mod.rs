// Rules module
// Every rule is a pure function of the script source. The `RULES` table fixes the
// execution order, which is also the order of the messages in a report.

/// Rules reporting errors: the script is broken or misbehaves in WeeChat.
pub mod errors;

/// Rules reporting warnings: deprecated or risky API usage.
pub mod warnings;

/// Rules reporting info: style and metadata.
pub mod info;

use crate::error::RuleError;
use crate::messages::{RuleName, Severity, TemplateArgs};
use crate::utils::{search_regex, LineIndex, PatternMatch};
use regex::Regex;
use std::path::{Path, PathBuf};

/// Content of a script, as seen by the rules.
pub struct ScriptSource {
    path: PathBuf,
    text: String,
    line_index: LineIndex,
}

impl ScriptSource {
    /// Creates a source from a path and the text of the file.
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let text = text.into();
        let line_index = LineIndex::new(&text);
        Self {
            path: path.into(),
            text,
            line_index,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// File extension without the dot (`py`, `pl`, ...).
    pub fn extension(&self) -> Option<&str> {
        self.path.extension().and_then(|ext| ext.to_str())
    }

    /// All matches of `regex` spanning at most `max_lines` lines.
    pub fn search(&self, regex: &Regex, max_lines: usize) -> Vec<PatternMatch> {
        search_regex(&self.text, &self.line_index, regex, max_lines)
    }

    /// Number of occurrences of a plain substring.
    pub fn count(&self, needle: &str) -> usize {
        self.text.matches(needle).count()
    }
}

/// A raw detection, before it goes through the catalog and the filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub line: usize,
    pub args: TemplateArgs,
}

impl Hit {
    /// A hit with no template arguments.
    pub fn at(line: usize) -> Self {
        Self {
            line,
            args: TemplateArgs::None,
        }
    }

    pub fn with_args(line: usize, args: TemplateArgs) -> Self {
        Self { line, args }
    }
}

/// Signature shared by all rules.
pub type RuleFn = fn(&ScriptSource) -> Result<Vec<Hit>, RuleError>;

/// Descriptor of a rule.
pub struct Rule {
    pub name: RuleName,
    /// Severity the rule reports with; must match the catalog.
    pub severity: Severity,
    /// Extensions the rule applies to; `None` for all scripts.
    pub extensions: Option<&'static [&'static str]>,
    pub check: RuleFn,
}

impl Rule {
    /// Whether the rule must run on this script.
    pub fn applies_to(&self, source: &ScriptSource) -> bool {
        match self.extensions {
            None => true,
            Some(extensions) => source
                .extension()
                .map_or(false, |ext| extensions.iter().any(|e| *e == ext)),
        }
    }
}

const PYTHON: &[&str] = &["py"];

const fn rule(name: RuleName, severity: Severity, check: RuleFn) -> Rule {
    Rule {
        name,
        severity,
        extensions: None,
        check,
    }
}

const fn rule_for(
    name: RuleName,
    severity: Severity,
    extensions: &'static [&'static str],
    check: RuleFn,
) -> Rule {
    Rule {
        name,
        severity,
        extensions: Some(extensions),
        check,
    }
}

/// All rules, in execution order.
pub static RULES: &[Rule] = &[
    // errors
    rule(RuleName::MissingEmail, Severity::Error, errors::missing_email),
    rule(
        RuleName::MissingInfolistFree,
        Severity::Error,
        errors::missing_infolist_free,
    ),
    rule_for(RuleName::Python2Bin, Severity::Error, PYTHON, errors::python2_bin),
    // warnings
    rule_for(RuleName::SysExit, Severity::Warning, PYTHON, warnings::sys_exit),
    rule(
        RuleName::DeprecatedHookCompletionGetString,
        Severity::Warning,
        warnings::deprecated_hook_completion_get_string,
    ),
    rule(
        RuleName::DeprecatedHookCompletionListAdd,
        Severity::Warning,
        warnings::deprecated_hook_completion_list_add,
    ),
    rule(
        RuleName::DeprecatedIrcNickColor,
        Severity::Warning,
        warnings::deprecated_irc_nick_color,
    ),
    rule(
        RuleName::DeprecatedIrcNickColorName,
        Severity::Warning,
        warnings::deprecated_irc_nick_color_name,
    ),
    rule(RuleName::ModifierIrcIn, Severity::Warning, warnings::modifier_irc_in),
    rule(RuleName::SignalIrcOut, Severity::Warning, warnings::signal_irc_out),
    rule(
        RuleName::SignalIrcOuttags,
        Severity::Warning,
        warnings::signal_irc_outtags,
    ),
    rule(RuleName::HookProcessUrl, Severity::Warning, warnings::hook_process_url),
    rule(
        RuleName::MixedTabsSpaces,
        Severity::Warning,
        warnings::mixed_tabs_spaces,
    ),
    // info
    rule(RuleName::UnneededShebang, Severity::Info, info::unneeded_shebang),
    rule(RuleName::UrlWeechat, Severity::Info, info::url_weechat),
    rule(
        RuleName::MissingSpdxCopyright,
        Severity::Info,
        info::missing_spdx_copyright,
    ),
    rule(
        RuleName::MissingSpdxLicense,
        Severity::Info,
        info::missing_spdx_license,
    ),
];

/// Returns the captured group of a match, or an error naming the group and line.
pub(crate) fn capture(found: &PatternMatch, group: usize) -> Result<String, RuleError> {
    found
        .group(group)
        .map(str::to_string)
        .ok_or(RuleError::MissingCapture {
            group,
            line: found.line,
        })
}

/// One hit per match, without arguments.
pub(crate) fn hits(found: Vec<PatternMatch>) -> Vec<Hit> {
    found.into_iter().map(|m| Hit::at(m.line)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::lookup;
    use std::collections::HashSet;

    #[test]
    fn test_rules_match_catalog() {
        for rule in RULES {
            assert_eq!(
                rule.severity,
                lookup(rule.name).severity,
                "severity of {} differs from the catalog",
                rule.name
            );
        }
    }

    #[test]
    fn test_rule_names_are_unique() {
        let names: HashSet<RuleName> = RULES.iter().map(|r| r.name).collect();
        assert_eq!(names.len(), RULES.len());
        // the empty file message is emitted by the analyzer itself
        assert!(!names.contains(&RuleName::EmptyFile));
    }

    #[test]
    fn test_rules_grouped_by_severity() {
        let severities: Vec<Severity> = RULES.iter().map(|r| r.severity).collect();
        let mut sorted = severities.clone();
        sorted.sort();
        assert_eq!(severities, sorted);
    }

    #[test]
    fn test_extension_guard() {
        let sys_exit = RULES
            .iter()
            .find(|r| r.name == RuleName::SysExit)
            .unwrap();
        assert!(sys_exit.applies_to(&ScriptSource::new("a.py", "")));
        assert!(!sys_exit.applies_to(&ScriptSource::new("a.pl", "")));
        assert!(!sys_exit.applies_to(&ScriptSource::new("Makefile", "")));
        let shebang = RULES
            .iter()
            .find(|r| r.name == RuleName::UnneededShebang)
            .unwrap();
        assert!(shebang.applies_to(&ScriptSource::new("a.tcl", "")));
    }
}
