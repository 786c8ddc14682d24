//! Text signal extraction: metadata pulled out of raw Markdown with patterns.
//!
//! None of these functions parse the document. They run line-anchored regexes
//! over the whole text, take the first match, and treat absence as a normal
//! outcome.

use regex::Regex;
use std::sync::LazyLock;

/// Namespace assumed when a document does not declare one.
pub const DEFAULT_NAMESPACE: &str = "microsoft.graph";

static RE_DOC_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^doc_type:\s*"?(?P<doc_type>[a-zA-Z0-9]+)"#).unwrap());

static RE_TITLE_YAML: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^title:\s*["']?(?P<name>[a-zA-Z0-9_]+)\s+((resource|complex)\s+type|facet)"#)
        .unwrap()
});

static RE_TITLE_H1: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^#\s*(?P<name>[a-zA-Z0-9_]+)\s+((resource|complex)\s+type|facet)").unwrap()
});

static RE_NAMESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mi)^\s*namespace:\s*(?P<ns>[\w.]*)\s*$").unwrap());

static RE_TOC_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^toc\.title:[ \t]*(?P<title>.*?)[ \t\r]*$").unwrap());

/// The `doc_type` front matter value, e.g. `resourcePageType`.
pub fn extract_doc_type(markdown: &str) -> Option<String> {
    RE_DOC_TYPE
        .captures(markdown)
        .map(|caps| caps["doc_type"].to_string())
}

/// The resource name from the `title:` line, falling back to the H1.
///
/// Both must read like `<name> resource type`, `<name> complex type` or
/// `<name> facet`.
pub fn extract_resource_name(markdown: &str) -> Option<String> {
    RE_TITLE_YAML
        .captures(markdown)
        .or_else(|| RE_TITLE_H1.captures(markdown))
        .map(|caps| caps["name"].to_string())
}

/// The `Namespace:` line, or [`DEFAULT_NAMESPACE`].
pub fn extract_namespace(markdown: &str) -> String {
    RE_NAMESPACE
        .captures(markdown)
        .map(|caps| caps["ns"].to_string())
        .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string())
}

/// The `toc.title:` value with one level of matching quotes removed.
pub fn extract_toc_title(markdown: &str) -> Option<String> {
    let caps = RE_TOC_TITLE.captures(markdown)?;
    let raw = &caps["title"];
    let title = unquote(raw);
    (!title.is_empty()).then(|| title.to_string())
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
