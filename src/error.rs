//! Error types for weechat-script-lint
//!
//! Findings are never errors: a script full of issues is a successful analysis.
//! These types cover what prevents an analysis from happening (fatal errors) and
//! inconsistencies between rules and the message catalog (internal errors).

use crate::messages::{RuleName, Severity};
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the linter
#[derive(Error, Debug)]
pub enum LintError {
    /// Failed to read a script
    #[error("cannot read {}: {source}", .path.display())]
    FileRead {
        /// Path to the script that failed to read
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// A path given on the command line is neither a file nor a directory
    #[error("not a directory/file: {}", .0.display())]
    InvalidPath(PathBuf),

    /// Failed to list a directory
    #[error("cannot walk {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// A rule could not complete on the script content
    #[error("internal error in rule {rule}: {source}")]
    Rule {
        rule: RuleName,
        source: RuleError,
    },

    /// A rule is declared with a severity that differs from its catalog entry
    #[error("internal error: rule {rule} is declared as {declared} but the catalog lists it as {catalog}")]
    SeverityMismatch {
        rule: RuleName,
        declared: Severity,
        catalog: Severity,
    },

    /// A message template references a placeholder the rule did not provide
    #[error("internal error: message of rule {rule} needs a value for {{{placeholder}}}")]
    MissingTemplateArg { rule: RuleName, placeholder: String },
}

impl LintError {
    /// Whether the error is a programming error (rule or catalog bug) rather than
    /// a problem with the user's input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            LintError::Rule { .. }
                | LintError::SeverityMismatch { .. }
                | LintError::MissingTemplateArg { .. }
        )
    }
}

/// Errors raised by a rule while inspecting a script
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RuleError {
    /// The rule pattern matched but the expected capture group is absent
    #[error("capture group {group} missing in match at line {line}")]
    MissingCapture { group: usize, line: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let fatal = LintError::InvalidPath(PathBuf::from("/nowhere"));
        assert!(!fatal.is_internal());
        assert_eq!(fatal.to_string(), "not a directory/file: /nowhere");

        let internal = LintError::Rule {
            rule: RuleName::ModifierIrcIn,
            source: RuleError::MissingCapture { group: 1, line: 3 },
        };
        assert!(internal.is_internal());
        assert_eq!(
            internal.to_string(),
            "internal error in rule modifier_irc_in: capture group 1 missing in match at line 3"
        );
    }

    #[test]
    fn test_missing_template_arg_message() {
        let err = LintError::MissingTemplateArg {
            rule: RuleName::UrlWeechat,
            placeholder: "link".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "internal error: message of rule url_weechat needs a value for {link}"
        );
    }
}
