//! Message catalog.
//!
//! Every rule name maps to exactly one entry: the severity the rule reports with, the
//! score delta applied for each accepted finding and the message template. Templates use
//! named placeholders (`{message}`, `{link}`) filled from [`TemplateArgs`].

use crate::error::LintError;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Level of a message.
///
/// The derived ordering is `Error < Warning < Info`: a finding is displayed when its
/// severity is lower than or equal to the minimum level requested.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The script is broken or misbehaves in WeeChat.
    Error,
    /// Deprecated or risky API usage.
    Warning,
    /// Style and metadata.
    Info,
}

impl Severity {
    /// All severities, most severe first.
    pub const ALL: [Severity; 3] = [Severity::Error, Severity::Warning, Severity::Info];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }

    /// Whether a finding of this severity is shown when `min_level` is requested.
    pub fn is_reported_at(&self, min_level: Severity) -> bool {
        *self <= min_level
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|sev| sev.as_str() == s)
            .ok_or_else(|| format!("unknown level '{}'", s))
    }
}

/// Identifier of a rule, as displayed in reports and accepted by `--ignore-messages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleName {
    EmptyFile,
    MissingEmail,
    MissingInfolistFree,
    Python2Bin,
    SysExit,
    DeprecatedHookCompletionGetString,
    DeprecatedHookCompletionListAdd,
    DeprecatedIrcNickColor,
    DeprecatedIrcNickColorName,
    ModifierIrcIn,
    SignalIrcOut,
    SignalIrcOuttags,
    HookProcessUrl,
    MixedTabsSpaces,
    UnneededShebang,
    UrlWeechat,
    MissingSpdxCopyright,
    MissingSpdxLicense,
}

impl RuleName {
    pub const ALL: [RuleName; 18] = [
        RuleName::EmptyFile,
        RuleName::MissingEmail,
        RuleName::MissingInfolistFree,
        RuleName::Python2Bin,
        RuleName::SysExit,
        RuleName::DeprecatedHookCompletionGetString,
        RuleName::DeprecatedHookCompletionListAdd,
        RuleName::DeprecatedIrcNickColor,
        RuleName::DeprecatedIrcNickColorName,
        RuleName::ModifierIrcIn,
        RuleName::SignalIrcOut,
        RuleName::SignalIrcOuttags,
        RuleName::HookProcessUrl,
        RuleName::MixedTabsSpaces,
        RuleName::UnneededShebang,
        RuleName::UrlWeechat,
        RuleName::MissingSpdxCopyright,
        RuleName::MissingSpdxLicense,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleName::EmptyFile => "empty_file",
            RuleName::MissingEmail => "missing_email",
            RuleName::MissingInfolistFree => "missing_infolist_free",
            RuleName::Python2Bin => "python2_bin",
            RuleName::SysExit => "sys_exit",
            RuleName::DeprecatedHookCompletionGetString => "deprecated_hook_completion_get_string",
            RuleName::DeprecatedHookCompletionListAdd => "deprecated_hook_completion_list_add",
            RuleName::DeprecatedIrcNickColor => "deprecated_irc_nick_color",
            RuleName::DeprecatedIrcNickColorName => "deprecated_irc_nick_color_name",
            RuleName::ModifierIrcIn => "modifier_irc_in",
            RuleName::SignalIrcOut => "signal_irc_out",
            RuleName::SignalIrcOuttags => "signal_irc_outtags",
            RuleName::HookProcessUrl => "hook_process_url",
            RuleName::MixedTabsSpaces => "mixed_tabs_spaces",
            RuleName::UnneededShebang => "unneeded_shebang",
            RuleName::UrlWeechat => "url_weechat",
            RuleName::MissingSpdxCopyright => "missing_spdx_copyright",
            RuleName::MissingSpdxLicense => "missing_spdx_license",
        }
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("unknown rule '{}'", s))
    }
}

/// Values substituted in a message template.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TemplateArgs {
    #[default]
    None,
    /// IRC message name, for `{message}`.
    Message(String),
    /// URL found in the script, for `{link}`.
    Link(String),
}

impl TemplateArgs {
    /// Returns the value provided for the placeholder `name`, if any.
    fn value(&self, name: &str) -> Option<&str> {
        match (self, name) {
            (TemplateArgs::Message(value), "message") => Some(value),
            (TemplateArgs::Link(value), "link") => Some(value),
            _ => None,
        }
    }
}

/// One entry of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub severity: Severity,
    /// Applied to the score for each accepted finding; always <= 0.
    pub score_delta: i32,
    pub template: &'static str,
}

const fn entry(severity: Severity, score_delta: i32, template: &'static str) -> CatalogEntry {
    CatalogEntry {
        severity,
        score_delta,
        template,
    }
}

/// Returns the catalog entry of a rule.
pub fn lookup(rule: RuleName) -> CatalogEntry {
    use Severity::*;
    match rule {
        // errors
        RuleName::EmptyFile => entry(Error, -100, "the script is empty"),
        RuleName::MissingEmail => entry(Error, -15, "the author e-mail is missing"),
        RuleName::MissingInfolistFree => entry(Error, -20, "missing call to infolist_free"),
        RuleName::Python2Bin => entry(
            Error,
            -20,
            "the info python2_bin must not be used any more",
        ),
        // warnings
        RuleName::SysExit => entry(Warning, -10, "sys.exit() causes WeeChat to exit itself"),
        RuleName::DeprecatedHookCompletionGetString => entry(
            Warning,
            -8,
            "function hook_completion_get_string is deprecated since WeeChat 2.9 \
             and must be replaced by completion_get_string",
        ),
        RuleName::DeprecatedHookCompletionListAdd => entry(
            Warning,
            -8,
            "function hook_completion_list_add is deprecated since WeeChat 2.9 \
             and must be replaced by completion_list_add",
        ),
        RuleName::DeprecatedIrcNickColor => entry(
            Warning,
            -8,
            "info irc_nick_color is deprecated since WeeChat 1.5 \
             and must be replaced by nick_color",
        ),
        RuleName::DeprecatedIrcNickColorName => entry(
            Warning,
            -8,
            "info irc_nick_color_name is deprecated since WeeChat 1.5 \
             and must be replaced by nick_color_name",
        ),
        RuleName::ModifierIrcIn => entry(
            Warning,
            -5,
            "modifier irc_in_{message} should be replaced by irc_in2_{message} \
             which sends only valid UTF-8 data",
        ),
        RuleName::SignalIrcOut => entry(
            Warning,
            -5,
            "signal irc_out_{message} should be replaced by irc_out1_{message} \
             which sends only valid UTF-8 data",
        ),
        RuleName::SignalIrcOuttags => entry(
            Warning,
            -5,
            "signal irc_outtags_{message} should be replaced by irc_out1_{message} \
             which sends only valid UTF-8 data",
        ),
        RuleName::HookProcessUrl => entry(
            Warning,
            -5,
            "hook_process with \"url:\" is deprecated since WeeChat 4.1.0 \
             and should be replaced by hook_url",
        ),
        RuleName::MixedTabsSpaces => entry(
            Warning,
            -5,
            "mixed tabs and spaces are used for indentation",
        ),
        // info
        RuleName::UnneededShebang => entry(Info, -1, "shebang not needed"),
        RuleName::UrlWeechat => entry(
            Info,
            -1,
            "URL {link} should be changed to https://weechat.org",
        ),
        RuleName::MissingSpdxCopyright => entry(
            Info,
            -1,
            "the SPDX copyright tag \"SPDX-FileCopyrightText\" is missing",
        ),
        RuleName::MissingSpdxLicense => entry(
            Info,
            -1,
            "the SPDX license tag \"SPDX-License-Identifier\" is missing",
        ),
    }
}

lazy_static::lazy_static! {
    static ref PLACEHOLDER_RE: Regex = Regex::new(r"\{([a-z_]+)\}").unwrap();
}

/// Formats the message of a rule with the given arguments.
///
/// A placeholder without a matching argument is an internal error: the rule and its
/// template disagree.
pub fn format_message(rule: RuleName, args: &TemplateArgs) -> Result<String, LintError> {
    let template = lookup(rule).template;
    for caps in PLACEHOLDER_RE.captures_iter(template) {
        let name = &caps[1];
        if args.value(name).is_none() {
            return Err(LintError::MissingTemplateArg {
                rule,
                placeholder: name.to_string(),
            });
        }
    }
    let text = PLACEHOLDER_RE.replace_all(template, |caps: &regex::Captures| {
        args.value(&caps[1]).unwrap_or_default().to_string()
    });
    Ok(text.into_owned())
}
