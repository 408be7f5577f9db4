use super::{hits, Hit, ScriptSource};
use crate::error::RuleError;
use crate::utils::call_regex;
use regex::Regex;

lazy_static::lazy_static! {
    /// Very permissive e-mail pattern: it only has to tell scripts with no e-mail at all
    /// from the others, including obfuscated addresses ("user at host dot org", "u#s*r@...").
    static ref EMAIL_RE: Regex = Regex::new(concat!(
        r"(?i)",
        r"([*#a-z0-9_.+-]+ ?(@| *at *) ?[*#a-z0-9-]+(\.| *dot *)[a-z0-9.-]+)",
        r"|(<[a-z0-9_.+-]+>)",
    ))
    .unwrap();

    static ref INFOLIST_GET_RE: Regex = Regex::new(r"infolist_get").unwrap();

    static ref PYTHON2_BIN_RE: Regex = call_regex("info_get", r#"["']python2_bin["']"#).unwrap();
}

/// The author e-mail must appear somewhere in the script.
pub fn missing_email(source: &ScriptSource) -> Result<Vec<Hit>, RuleError> {
    if EMAIL_RE.is_match(source.text()) {
        Ok(Vec::new())
    } else {
        Ok(vec![Hit::at(1)])
    }
}

/// Every infolist_get needs an infolist_free.
///
/// Calls are not paired: one infolist_free anywhere in the script is enough.
pub fn missing_infolist_free(source: &ScriptSource) -> Result<Vec<Hit>, RuleError> {
    let infolist_get = source.search(&INFOLIST_GET_RE, 1);
    if infolist_get.is_empty() || source.count("infolist_free") > 0 {
        return Ok(Vec::new());
    }
    Ok(hits(infolist_get))
}

/// The info "python2_bin" was removed from WeeChat.
pub fn python2_bin(source: &ScriptSource) -> Result<Vec<Hit>, RuleError> {
    Ok(hits(source.search(&PYTHON2_BIN_RE, 2)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_variants() {
        for text in [
            "# Author: John <john@example.com>",
            "# john.doe at example dot com",
            "# j#o#h#n @ example.org",
            "# <john>",
        ] {
            let source = ScriptSource::new("a.py", text);
            assert!(missing_email(&source).unwrap().is_empty(), "{}", text);
        }
        let source = ScriptSource::new("a.py", "# Author: John\nimport weechat\n");
        assert_eq!(missing_email(&source).unwrap(), vec![Hit::at(1)]);
    }
}
