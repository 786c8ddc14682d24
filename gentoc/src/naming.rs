//! Display names for resources: camelCase identifiers to sentence case, with
//! a list of term overrides applied afterwards.

use crate::error::{GenerateError, Result};
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// One entry of the terms override file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermOverride {
    /// The term to replace, matched as a whole word.
    pub term: String,
    /// What the term should read as.
    #[serde(rename = "override", default)]
    pub replacement: String,
    #[serde(default)]
    pub case_sensitive: bool,
}

impl TermOverride {
    pub fn new(term: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            replacement: replacement.into(),
            case_sensitive: false,
        }
    }

    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }
}

/// Read a terms override file: a JSON array of [`TermOverride`].
pub fn load_term_overrides(path: &Path) -> Result<Vec<TermOverride>> {
    let invalid = |reason: String| GenerateError::TermOverrides {
        path: path.to_path_buf(),
        reason,
    };
    let content = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))
}

#[derive(Debug, Clone)]
struct CompiledOverride {
    pattern: Regex,
    replacement: String,
}

impl CompiledOverride {
    /// Replace matches bounded by whitespace or the ends of the string.
    fn apply(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut copied = 0;
        let mut pos = 0;

        while pos <= input.len() {
            let Some(m) = self.pattern.find_at(input, pos) else {
                break;
            };
            let before_ok = input[..m.start()]
                .chars()
                .next_back()
                .map_or(true, char::is_whitespace);
            let after_ok = input[m.end()..]
                .chars()
                .next()
                .map_or(true, char::is_whitespace);

            if before_ok && after_ok && !m.is_empty() {
                out.push_str(&input[copied..m.start()]);
                out.push_str(&self.replacement);
                copied = m.end();
                pos = m.end();
            } else {
                // Retry one character further along
                pos = m.start()
                    + input[m.start()..]
                        .chars()
                        .next()
                        .map_or(1, char::len_utf8);
            }
        }

        out.push_str(&input[copied..]);
        out
    }
}

/// Turns resource identifiers into TOC display names.
#[derive(Debug, Clone, Default)]
pub struct NameFormatter {
    overrides: Vec<CompiledOverride>,
}

impl NameFormatter {
    /// A formatter that applies `overrides` in order.
    pub fn new(overrides: &[TermOverride]) -> Result<Self> {
        let overrides = overrides
            .iter()
            .filter(|o| !o.term.is_empty())
            .map(|o| {
                RegexBuilder::new(&regex::escape(&o.term))
                    .case_insensitive(!o.case_sensitive)
                    .build()
                    .map(|pattern| CompiledOverride {
                        pattern,
                        replacement: o.replacement.clone(),
                    })
                    .map_err(|source| GenerateError::TermPattern {
                        term: o.term.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { overrides })
    }

    /// `windowsMobileMSI` → `Windows mobile MSI`, then overrides.
    ///
    /// The first word is title-cased, the rest lowercased. Words are runs of
    /// a capital plus lowercase letters, lowercase letters, capitals not
    /// followed by a lowercase letter, or digits. Anything else separates
    /// words and is dropped.
    pub fn sentence_case(&self, value: &str) -> String {
        let mut sentence = String::with_capacity(value.len() + 8);
        for word in split_words(value) {
            if sentence.is_empty() {
                sentence.push_str(&title_case(word));
            } else {
                sentence.push(' ');
                sentence.push_str(&word.to_lowercase());
            }
        }
        self.apply_overrides(&sentence)
    }

    /// Apply every override in order, each to the previous result.
    pub fn apply_overrides(&self, value: &str) -> String {
        self.overrides
            .iter()
            .fold(value.to_string(), |acc, o| o.apply(&acc))
    }
}

/// Split a camelCase identifier into words.
fn split_words(value: &str) -> Vec<&str> {
    let bytes = value.as_bytes();
    let mut words = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let start = i;
        let b = bytes[i];

        if b.is_ascii_uppercase() {
            if bytes.get(i + 1).is_some_and(u8::is_ascii_lowercase) {
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_lowercase() {
                    i += 1;
                }
            } else {
                while i < bytes.len() && bytes[i].is_ascii_uppercase() {
                    i += 1;
                }
                // The last capital of `IOSLob` starts the next word
                if bytes.get(i).is_some_and(u8::is_ascii_lowercase) {
                    i -= 1;
                }
            }
        } else if b.is_ascii_lowercase() {
            while i < bytes.len() && bytes[i].is_ascii_lowercase() {
                i += 1;
            }
        } else if b.is_ascii_digit() {
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
        } else {
            // Separator or non-ASCII; skip the whole character
            i += value[i..].chars().next().map_or(1, char::len_utf8);
            continue;
        }

        words.push(&value[start..i]);
    }

    words
}

/// Capitalise the first letter and lowercase the rest, leaving acronyms alone.
fn title_case(word: &str) -> String {
    if word.chars().all(|c| !c.is_lowercase()) {
        return word.to_string();
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
