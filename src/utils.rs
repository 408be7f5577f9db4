use regex::{Regex, RegexBuilder};

/// A utility struct to convert byte offsets to line numbers.
///
/// Patterns are matched against the whole file so that calls spanning several lines
/// can be detected, but findings are reported with line numbers.
pub struct LineIndex {
    /// Stores the byte index of the start of each line.
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Creates a new `LineIndex` by scanning the source code for newlines.
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, ch) in source.char_indices() {
            if ch == '\n' {
                // Record the start of the next line (current newline index + 1)
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Converts a byte offset to a 1-indexed line number.
    pub fn line_index(&self, offset: usize) -> usize {
        // Binary search to find which line range the offset falls into.
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        }
    }
}

/// One occurrence of a pattern in a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    /// Line (1-indexed) where the match starts.
    pub line: usize,
    /// The whole matched text.
    pub text: String,
    /// Captured sub-groups, group 1 first. `None` for groups that did not participate.
    pub groups: Vec<Option<String>>,
}

impl PatternMatch {
    /// Returns the captured group `index` (1-indexed, like regex groups).
    pub fn group(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.groups.get(i))
            .and_then(|g| g.as_deref())
    }
}

/// Searches a compiled regex over the whole text.
///
/// Matches spanning more than `max_lines` physical lines are dropped: greedy patterns
/// like `[\s,(]*` could otherwise swallow unrelated lines.
pub fn search_regex(
    text: &str,
    index: &LineIndex,
    regex: &Regex,
    max_lines: usize,
) -> Vec<PatternMatch> {
    regex
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let match_lines = whole.as_str().matches('\n').count() + 1;
            if match_lines > max_lines {
                return None;
            }
            let groups = caps
                .iter()
                .skip(1)
                .map(|g| g.map(|m| m.as_str().to_string()))
                .collect();
            Some(PatternMatch {
                line: index.line_index(whole.start()),
                text: whole.as_str().to_string(),
                groups,
            })
        })
        .collect()
}

/// Searches a pattern given as a string.
///
/// Returns an error if the pattern is not a valid regular expression.
pub fn search(
    text: &str,
    pattern: &str,
    case_insensitive: bool,
    max_lines: usize,
) -> Result<Vec<PatternMatch>, regex::Error> {
    let regex = RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()?;
    let index = LineIndex::new(text);
    Ok(search_regex(text, &index, &regex, max_lines))
}

/// Builds the pattern of a call to `function` with `argument` as first argument.
///
/// Whitespace, commas and parentheses are allowed between both, so that
/// `info_get("x")`, `info_get ( 'x'` and `info_get\n    "x"` all match.
pub fn call_pattern(function: &str, argument: &str) -> String {
    format!(r"{function}[\s,(]*{argument}")
}

/// Compiles the pattern built by [`call_pattern`].
pub fn call_regex(function: &str, argument: &str) -> Result<Regex, regex::Error> {
    Regex::new(&call_pattern(function, argument))
}

/// Searches a call to a function with the given argument (a match can span 2 lines by default).
pub fn search_call(
    text: &str,
    function: &str,
    argument: &str,
    max_lines: usize,
) -> Result<Vec<PatternMatch>, regex::Error> {
    search(text, &call_pattern(function, argument), false, max_lines)
}
