//! Methods-section walker.
//!
//! Finds the `Methods` heading, then reads every operations table in that
//! section. A table counts only when its first column is headed `Method`.
//! Rows whose first cell holds a link become [`MethodLink`]s; rows with plain
//! text instead (usually a bold separator like `**Extended properties**`)
//! start a new sub-heading. A heading one level below `Methods` also sets the
//! sub-heading; any heading at or above the `Methods` level ends the section.
//! Reference-style links count when the document defines their label.

use super::blocks::{Block, Table};
use super::inline::{first_link, plain_text, LinkReferences};

/// A link to one API operation's page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodLink {
    /// Link text, used as the TOC entry name.
    pub title: String,
    /// Link target, usually a relative path like `../api/user-get.md`.
    pub file_path: String,
    /// Sub-heading the link was found under.
    pub heading: Option<String>,
}

impl MethodLink {
    pub fn new(title: impl Into<String>, file_path: impl Into<String>, heading: Option<String>) -> Self {
        Self {
            title: title.into(),
            file_path: file_path.into(),
            heading: heading.filter(|h| !h.is_empty()),
        }
    }
}

/// Collect method links from the `Methods` section, in document order.
pub fn method_links(blocks: &[Block]) -> Vec<MethodLink> {
    let references = super::link_references(blocks);
    let mut links = Vec::new();
    let mut section_level: Option<usize> = None;
    let mut sub_heading: Option<String> = None;

    for block in blocks {
        let Some(level) = section_level else {
            if let Block::Heading(heading) = block {
                if text_equals(&heading.text, "Methods") {
                    section_level = Some(heading.level);
                }
            }
            continue;
        };

        match block {
            Block::Table(table) if is_method_table(table) => {
                read_table(table, &references, &mut sub_heading, &mut links);
            }
            Block::Heading(heading) if heading.level <= level => break,
            Block::Heading(heading) if heading.level == level + 1 => {
                sub_heading = Some(plain_text(&heading.text));
            }
            _ => {}
        }
    }

    links
}

fn read_table(
    table: &Table,
    references: &LinkReferences,
    sub_heading: &mut Option<String>,
    links: &mut Vec<MethodLink>,
) {
    for row in &table.rows {
        let Some(cell) = row.first() else {
            continue;
        };
        match first_link(cell, references) {
            Some(link) if !link.url.is_empty() => {
                links.push(MethodLink::new(link.text, link.url, sub_heading.clone()));
            }
            _ => {
                let text = plain_text(cell);
                if !text.is_empty() {
                    *sub_heading = Some(text);
                }
            }
        }
    }
}

fn is_method_table(table: &Table) -> bool {
    table
        .header
        .iter()
        .map(|h| plain_text(h))
        .find(|h| !h.is_empty())
        .is_some_and(|h| h.eq_ignore_ascii_case("Method"))
}

fn text_equals(inline: &str, value: &str) -> bool {
    plain_text(inline).to_lowercase() == value.to_lowercase()
}
