//! Block-level Markdown parser: a line-by-line state machine.
//!
//! Recognises just enough CommonMark/GFM to find headings and pipe tables at
//! the top level of a document: YAML front matter, ATX and setext headings,
//! fenced code, block quotes, thematic breaks, pipe tables, link reference
//! definitions and paragraphs.
//! Inline content is kept as raw text; see [`super::inline`].

use regex::Regex;
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

static RE_ATX_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ {0,3}(?P<hashes>#{1,6})(?:[ \t]+(?P<text>.*?))?(?:[ \t]+#+)?[ \t]*$").unwrap()
});

static RE_SETEXT_UNDERLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}(?P<marker>=+|-+)[ \t]*$").unwrap());

static RE_FENCE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}(?P<fence>`{3,}|~{3,})").unwrap());

static RE_THEMATIC_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ {0,3}(?:(?:\*[ \t]*){3,}|(?:-[ \t]*){3,}|(?:_[ \t]*){3,})$").unwrap()
});

static RE_TABLE_DELIMITER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*\|?[ \t]*:?-+:?[ \t]*(?:\|[ \t]*:?-+:?[ \t]*)*\|?[ \t]*$").unwrap()
});

static RE_BLOCK_QUOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^ {0,3}>").unwrap());

static RE_LINK_DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^ {0,3}\[(?P<label>[^\[\]]+)\]:[ \t]*(?:<(?P<angle>[^>]*)>|(?P<url>\S+))(?:[ \t]+(?:"[^"]*"|'[^']*'|\([^)]*\)))?[ \t]*$"#)
        .unwrap()
});

// -- Block tree ---------------------------------------------------------------

/// A top-level block of a Markdown document.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// The YAML between the opening and closing `---` lines, delimiters excluded.
    FrontMatter(String),
    Heading(Heading),
    Table(Table),
    /// Fenced code body, fences excluded.
    Code(String),
    /// Block quote lines with the `>` markers left in place.
    Quote(String),
    ThematicBreak,
    /// A link reference definition: `[label]: url`.
    LinkDefinition { label: String, url: String },
    Paragraph(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub level: usize,
    /// Raw inline content of the heading.
    pub text: String,
}

/// A GFM pipe table. Cells hold raw inline Markdown.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Parse Markdown into its top-level blocks.
pub fn parse(markdown: &str) -> Vec<Block> {
    let lines: Vec<&str> = markdown.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    if let Some((front_matter, next)) = front_matter(&lines) {
        blocks.push(Block::FrontMatter(front_matter));
        i = next;
    }

    let mut paragraph: Vec<&str> = Vec::new();

    while i < lines.len() {
        let line = lines[i];

        if line.trim().is_empty() {
            flush_paragraph(&mut blocks, &mut paragraph);
            i += 1;
            continue;
        }

        if let Some(caps) = RE_FENCE_OPEN.captures(line) {
            flush_paragraph(&mut blocks, &mut paragraph);
            let fence = caps["fence"].to_string();
            let (body, next) = fenced_code(&lines, i + 1, &fence);
            blocks.push(Block::Code(body));
            i = next;
            continue;
        }

        if let Some(caps) = RE_ATX_HEADING.captures(line) {
            flush_paragraph(&mut blocks, &mut paragraph);
            blocks.push(Block::Heading(Heading {
                level: caps["hashes"].len(),
                text: caps.name("text").map_or("", |m| m.as_str()).trim().to_string(),
            }));
            i += 1;
            continue;
        }

        // Definitions cannot interrupt a paragraph.
        if paragraph.is_empty() {
            if let Some(caps) = RE_LINK_DEFINITION.captures(line) {
                let url = caps
                    .name("angle")
                    .or_else(|| caps.name("url"))
                    .map_or("", |m| m.as_str());
                blocks.push(Block::LinkDefinition {
                    label: caps["label"].to_string(),
                    url: url.to_string(),
                });
                i += 1;
                continue;
            }
        }

        // Setext underline turns the pending single-paragraph into a heading.
        if !paragraph.is_empty() {
            if let Some(caps) = RE_SETEXT_UNDERLINE.captures(line) {
                let level = if caps["marker"].starts_with('=') { 1 } else { 2 };
                let text = paragraph.join(" ").trim().to_string();
                paragraph.clear();
                blocks.push(Block::Heading(Heading { level, text }));
                i += 1;
                continue;
            }
        }

        if RE_THEMATIC_BREAK.is_match(line) {
            flush_paragraph(&mut blocks, &mut paragraph);
            blocks.push(Block::ThematicBreak);
            i += 1;
            continue;
        }

        if RE_BLOCK_QUOTE.is_match(line) {
            flush_paragraph(&mut blocks, &mut paragraph);
            let start = i;
            while i < lines.len() && !lines[i].trim().is_empty() && RE_BLOCK_QUOTE.is_match(lines[i]) {
                i += 1;
            }
            blocks.push(Block::Quote(lines[start..i].join("\n")));
            continue;
        }

        if is_table_start(&lines, i) {
            flush_paragraph(&mut blocks, &mut paragraph);
            let (table, next) = table(&lines, i);
            blocks.push(Block::Table(table));
            i = next;
            continue;
        }

        paragraph.push(line);
        i += 1;
    }

    flush_paragraph(&mut blocks, &mut paragraph);
    blocks
}

fn flush_paragraph(blocks: &mut Vec<Block>, paragraph: &mut Vec<&str>) {
    if !paragraph.is_empty() {
        blocks.push(Block::Paragraph(paragraph.join("\n")));
        paragraph.clear();
    }
}

/// Front matter must open on the very first line.
fn front_matter(lines: &[&str]) -> Option<(String, usize)> {
    if lines.first().map(|l| l.trim_end()) != Some("---") {
        return None;
    }
    let close = lines
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, l)| matches!(l.trim_end(), "---" | "..."))
        .map(|(idx, _)| idx)?;
    Some((lines[1..close].join("\n"), close + 1))
}

fn fenced_code(lines: &[&str], start: usize, fence: &str) -> (String, usize) {
    let marker = fence.chars().next().unwrap_or('`');
    let mut i = start;
    while i < lines.len() {
        let trimmed = lines[i].trim();
        let run = trimmed.chars().take_while(|&c| c == marker).count();
        if run >= fence.len() && trimmed.chars().all(|c| c == marker) {
            return (lines[start..i].join("\n"), i + 1);
        }
        i += 1;
    }
    // Unclosed fences run to the end of the document.
    (lines[start..].join("\n"), lines.len())
}

fn is_table_start(lines: &[&str], i: usize) -> bool {
    let Some(next) = lines.get(i + 1) else {
        return false;
    };
    lines[i].contains('|') && next.contains('-') && RE_TABLE_DELIMITER.is_match(next)
}

fn table(lines: &[&str], start: usize) -> (Table, usize) {
    let header = split_row(lines[start]);
    let mut rows = Vec::new();
    let mut i = start + 2;
    while i < lines.len() {
        let line = lines[i];
        if line.trim().is_empty()
            || RE_ATX_HEADING.is_match(line)
            || RE_FENCE_OPEN.is_match(line)
            || RE_BLOCK_QUOTE.is_match(line)
        {
            break;
        }
        rows.push(split_row(line));
        i += 1;
    }
    (Table { header, rows }, i)
}

/// Split a table row on unescaped pipes outside code spans.
pub(crate) fn split_row(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let trimmed = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let trimmed = if trimmed.ends_with('|') && !trimmed.ends_with("\\|") {
        &trimmed[..trimmed.len() - 1]
    } else {
        trimmed
    };

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_code = false;
    let mut escaped = false;
    for ch in trimmed.chars() {
        match ch {
            _ if escaped => {
                current.push(ch);
                escaped = false;
            }
            '\\' => {
                current.push(ch);
                escaped = true;
            }
            '`' => {
                in_code = !in_code;
                current.push(ch);
            }
            '|' if !in_code => {
                cells.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    cells.push(current.trim().to_string());
    cells
}
