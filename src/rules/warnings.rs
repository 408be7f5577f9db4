use super::{capture, hits, Hit, ScriptSource};
use crate::error::RuleError;
use crate::messages::TemplateArgs;
use crate::utils::call_regex;
use regex::Regex;

lazy_static::lazy_static! {
    static ref SYS_EXIT_RE: Regex = Regex::new(r"sys\.exit").unwrap();

    // deprecated functions and their replacements; `\b` keeps the new name from
    // matching inside the old one
    static ref HOOK_COMPLETION_GET_STRING_RE: Regex =
        Regex::new(r"hook_completion_get_string").unwrap();
    static ref COMPLETION_GET_STRING_RE: Regex = Regex::new(r"\bcompletion_get_string").unwrap();
    static ref HOOK_COMPLETION_LIST_ADD_RE: Regex =
        Regex::new(r"hook_completion_list_add").unwrap();
    static ref COMPLETION_LIST_ADD_RE: Regex = Regex::new(r"\bcompletion_list_add").unwrap();

    // deprecated infos and their replacements
    static ref IRC_NICK_COLOR_RE: Regex =
        call_regex("info_get", r#"["']irc_nick_color["']"#).unwrap();
    static ref NICK_COLOR_RE: Regex = call_regex("info_get", r#"["']nick_color["']"#).unwrap();
    static ref IRC_NICK_COLOR_NAME_RE: Regex =
        call_regex("info_get", r#"["']irc_nick_color_name["']"#).unwrap();
    static ref NICK_COLOR_NAME_RE: Regex =
        call_regex("info_get", r#"["']nick_color_name["']"#).unwrap();

    static ref MODIFIER_IRC_IN_RE: Regex =
        call_regex("hook_modifier", r#"["']irc_in_([^"']+)["']"#).unwrap();
    static ref SIGNAL_IRC_OUT_RE: Regex =
        call_regex("hook_signal", r#"["'][^"']+,irc_out_([^"']+)["']"#).unwrap();
    static ref SIGNAL_IRC_OUTTAGS_RE: Regex =
        call_regex("hook_signal", r#"["'][^"']+,irc_outtags_([^"']+)["']"#).unwrap();

    static ref HOOK_PROCESS_URL_RE: Regex =
        call_regex("hook_process(?:_hashtable)?", r#"["']url:"#).unwrap();
}

/// sys.exit() in a Python script exits WeeChat itself.
///
/// Only a warning: calling it when `import weechat` fails is legitimate.
pub fn sys_exit(source: &ScriptSource) -> Result<Vec<Hit>, RuleError> {
    Ok(hits(source.search(&SYS_EXIT_RE, 1)))
}

/// Reports uses of a deprecated API, unless the script calls the replacement
/// exactly as many times (old and new calls in both branches of a version check).
fn deprecated(
    source: &ScriptSource,
    old: &Regex,
    new: &Regex,
    max_lines: usize,
) -> Vec<Hit> {
    let old_calls = source.search(old, max_lines);
    let new_calls = source.search(new, max_lines);
    if old_calls.len() == new_calls.len() {
        return Vec::new();
    }
    hits(old_calls)
}

/// hook_completion_get_string is deprecated since WeeChat 2.9.
pub fn deprecated_hook_completion_get_string(
    source: &ScriptSource,
) -> Result<Vec<Hit>, RuleError> {
    Ok(deprecated(
        source,
        &HOOK_COMPLETION_GET_STRING_RE,
        &COMPLETION_GET_STRING_RE,
        1,
    ))
}

/// hook_completion_list_add is deprecated since WeeChat 2.9.
pub fn deprecated_hook_completion_list_add(source: &ScriptSource) -> Result<Vec<Hit>, RuleError> {
    Ok(deprecated(
        source,
        &HOOK_COMPLETION_LIST_ADD_RE,
        &COMPLETION_LIST_ADD_RE,
        1,
    ))
}

/// The info irc_nick_color is deprecated since WeeChat 1.5.
pub fn deprecated_irc_nick_color(source: &ScriptSource) -> Result<Vec<Hit>, RuleError> {
    Ok(deprecated(source, &IRC_NICK_COLOR_RE, &NICK_COLOR_RE, 2))
}

/// The info irc_nick_color_name is deprecated since WeeChat 1.5.
pub fn deprecated_irc_nick_color_name(source: &ScriptSource) -> Result<Vec<Hit>, RuleError> {
    Ok(deprecated(
        source,
        &IRC_NICK_COLOR_NAME_RE,
        &NICK_COLOR_NAME_RE,
        2,
    ))
}

/// One hit per match, with the first capture group as `{message}`.
fn hits_with_message(source: &ScriptSource, regex: &Regex) -> Result<Vec<Hit>, RuleError> {
    source
        .search(regex, 2)
        .iter()
        .map(|found| {
            let message = capture(found, 1)?;
            Ok(Hit::with_args(found.line, TemplateArgs::Message(message)))
        })
        .collect()
}

/// Modifiers irc_in_xxx receive data that may not be valid UTF-8.
pub fn modifier_irc_in(source: &ScriptSource) -> Result<Vec<Hit>, RuleError> {
    hits_with_message(source, &MODIFIER_IRC_IN_RE)
}

/// Signals irc_out_xxx send data that may not be valid UTF-8.
pub fn signal_irc_out(source: &ScriptSource) -> Result<Vec<Hit>, RuleError> {
    hits_with_message(source, &SIGNAL_IRC_OUT_RE)
}

/// Signals irc_outtags_xxx send data that may not be valid UTF-8.
pub fn signal_irc_outtags(source: &ScriptSource) -> Result<Vec<Hit>, RuleError> {
    hits_with_message(source, &SIGNAL_IRC_OUTTAGS_RE)
}

/// "url:" commands in hook_process are replaced by hook_url.
pub fn hook_process_url(source: &ScriptSource) -> Result<Vec<Hit>, RuleError> {
    Ok(hits(source.search(&HOOK_PROCESS_URL_RE, 2)))
}

/// Indentation must not mix tabs and spaces.
///
/// Reported once, on the first line where the mix shows: a line whose indentation
/// contains both characters, or the first line indented with the other character.
/// Blank lines are skipped.
pub fn mixed_tabs_spaces(source: &ScriptSource) -> Result<Vec<Hit>, RuleError> {
    let mut first_tabs: Option<usize> = None;
    let mut first_spaces: Option<usize> = None;

    for (idx, line) in source.text().lines().enumerate() {
        let line_no = idx + 1;
        let content = line.trim_start_matches(|c: char| c == ' ' || c == '\t');
        if content.is_empty() {
            continue;
        }
        let indent = &line[..line.len() - content.len()];
        let has_tab = indent.contains('\t');
        let has_space = indent.contains(' ');
        match (has_tab, has_space) {
            (true, true) => return Ok(vec![Hit::at(line_no)]),
            (true, false) => {
                first_tabs.get_or_insert(line_no);
            }
            (false, true) => {
                first_spaces.get_or_insert(line_no);
            }
            (false, false) => {}
        }
        if let (Some(tabs), Some(spaces)) = (first_tabs, first_spaces) {
            return Ok(vec![Hit::at(tabs.max(spaces))]);
        }
    }
    Ok(Vec::new())
}
