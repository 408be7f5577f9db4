use super::{Hit, ScriptSource};
use crate::error::RuleError;
use crate::messages::TemplateArgs;
use regex::Regex;

lazy_static::lazy_static! {
    // https is required and "www." is not needed
    static ref URL_WEECHAT_RE: Regex = Regex::new(
        r"(?i)(?:http://[w.]+weechat|https?://www.weechat)(?:\.org|\.net)"
    )
    .unwrap();
}

const SPDX_COPYRIGHT_TAG: &str = "SPDX-FileCopyrightText:";
const SPDX_LICENSE_TAG: &str = "SPDX-License-Identifier:";

/// WeeChat loads scripts itself, a shebang is useless.
pub fn unneeded_shebang(source: &ScriptSource) -> Result<Vec<Hit>, RuleError> {
    if source.text().starts_with("#!") {
        Ok(vec![Hit::at(1)])
    } else {
        Ok(Vec::new())
    }
}

/// Links to the WeeChat site must use https://weechat.org.
pub fn url_weechat(source: &ScriptSource) -> Result<Vec<Hit>, RuleError> {
    Ok(source
        .search(&URL_WEECHAT_RE, 1)
        .into_iter()
        .map(|found| Hit::with_args(found.line, TemplateArgs::Link(found.text)))
        .collect())
}

fn missing_tag(source: &ScriptSource, tag: &str) -> Vec<Hit> {
    if source.text().contains(tag) {
        Vec::new()
    } else {
        vec![Hit::at(1)]
    }
}

/// The copyright must be declared with an SPDX tag.
pub fn missing_spdx_copyright(source: &ScriptSource) -> Result<Vec<Hit>, RuleError> {
    Ok(missing_tag(source, SPDX_COPYRIGHT_TAG))
}

/// The license must be declared with an SPDX tag.
pub fn missing_spdx_license(source: &ScriptSource) -> Result<Vec<Hit>, RuleError> {
    Ok(missing_tag(source, SPDX_LICENSE_TAG))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links(text: &str) -> Vec<Hit> {
        url_weechat(&ScriptSource::new("a.py", text)).unwrap()
    }

    #[test]
    fn test_url_weechat_variants() {
        assert_eq!(
            links("# http://weechat.org\n# http://www.weechat.org\n"),
            vec![Hit::with_args(
                2,
                TemplateArgs::Link("http://www.weechat.org".to_string())
            )]
        );
        // any character between "www" and "weechat" after https
        assert_eq!(
            links("# https://www-weechat.net\n"),
            vec![Hit::with_args(
                1,
                TemplateArgs::Link("https://www-weechat.net".to_string())
            )]
        );
        assert!(links("# https://weechat.org/scripts\n").is_empty());
    }
}
