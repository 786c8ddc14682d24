//! Inline helpers: plain text of a run of Markdown and hyperlink lookup.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// `[text](url)` or `[text](<url> "title")`, not preceded by `!`.
static RE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?P<bang>!?)\[(?P<text>(?:[^\[\]]|\[[^\[\]]*\])*)\]\(\s*(?:<(?P<angle>[^>]*)>|(?P<url>[^\s)]*))(?:\s+(?:"[^"]*"|'[^']*'))?\s*\)"#)
        .unwrap()
});

/// An inline link, or a full (`[text][label]`), collapsed (`[text][]`) or
/// shortcut (`[text]`) reference.
static RE_ANY_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?P<bang>!?)\[(?P<text>(?:[^\[\]]|\[[^\[\]]*\])*)\](?:\(\s*(?:<(?P<angle>[^>]*)>|(?P<url>[^\s)]*))(?:\s+(?:"[^"]*"|'[^']*'))?\s*\)|\[(?P<label>[^\[\]]*)\])?"#)
        .unwrap()
});

static RE_HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[a-zA-Z][^>]*>|<!--.*?-->").unwrap());

static RE_EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*{1,3}|(?:^|\b)_{2,3}|_{2,3}(?:\b|$)|~~").unwrap());

/// A hyperlink found in inline content.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    /// Plain text of the link label.
    pub text: String,
    pub url: String,
}

/// Link reference definitions (`[label]: url`) of one document.
///
/// Labels match case-insensitively with inner whitespace collapsed. The first
/// definition of a label wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkReferences {
    urls: HashMap<String, String>,
}

impl LinkReferences {
    pub fn insert(&mut self, label: &str, url: &str) {
        let key = normalize_label(label);
        if !key.is_empty() {
            self.urls.entry(key).or_insert_with(|| url.to_string());
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.urls.get(&normalize_label(label)).map(String::as_str)
    }
}

fn normalize_label(label: &str) -> String {
    label.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// The first non-image hyperlink in `inline`. References resolve against
/// `references`; undefined ones are plain text.
pub fn first_link(inline: &str, references: &LinkReferences) -> Option<Link> {
    RE_ANY_LINK
        .captures_iter(inline)
        .filter(|caps| caps["bang"].is_empty())
        .find_map(|caps| {
            let text = &caps["text"];
            let url = match caps.name("angle").or_else(|| caps.name("url")) {
                Some(url) => url.as_str(),
                None => {
                    let label = caps
                        .name("label")
                        .map(|m| m.as_str())
                        .filter(|l| !l.trim().is_empty())
                        .unwrap_or(text);
                    references.get(label)?
                }
            };
            Some(Link {
                text: plain_text(text),
                url: url.to_string(),
            })
        })
}

/// Strip inline markup, keeping the visible text.
///
/// Links and images collapse to their labels, code spans lose their
/// backticks, HTML tags and emphasis markers disappear, backslash escapes are
/// resolved.
pub fn plain_text(inline: &str) -> String {
    let text = RE_LINK.replace_all(inline, "$text");
    let text = RE_HTML_TAG.replace_all(&text, "");
    let text = text.replace('`', "");
    let text = RE_EMPHASIS.replace_all(&text, "");
    unescape(&text).trim().to_string()
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii_punctuation() {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(ch);
    }
    out
}
