// Lib file to expose modules for testing and external usage.
// This file serves as the root for the library crate.

/// Module containing the per-file analyzer.
/// This includes the `ScriptAnalyzer` struct, findings, counters and scoring.
pub mod analyzer;

/// Module defining the message catalog.
/// Maps every rule name to its severity, score delta and message template.
pub mod messages;

/// Module containing the detection rules, in execution order.
pub mod rules;

/// Module containing the script discovery logic (files and directories given on the command line).
pub mod discovery;

/// Module containing the aggregate summary, score display and exit code helpers.
pub mod report;

/// Module defining the error types.
pub mod error;

/// Module containing utility functions.
/// This includes the line index and the pattern matcher used by the rules.
pub mod utils;

pub use analyzer::{Finding, LintOptions, ScriptAnalyzer};
pub use error::LintError;
pub use messages::{RuleName, Severity};
