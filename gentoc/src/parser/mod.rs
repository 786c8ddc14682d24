//! Markdown structural parser.

pub mod blocks;
pub mod inline;
pub mod methods;

pub use blocks::{Block, Heading, Table};
pub use inline::LinkReferences;
pub use methods::MethodLink;

/// The raw YAML front matter of a parsed document, if any.
pub fn front_matter(blocks: &[Block]) -> Option<&str> {
    match blocks.first() {
        Some(Block::FrontMatter(yaml)) => Some(yaml.as_str()),
        _ => None,
    }
}

/// Every link reference definition in a parsed document.
pub fn link_references(blocks: &[Block]) -> LinkReferences {
    let mut references = LinkReferences::default();
    for block in blocks {
        if let Block::LinkDefinition { label, url } = block {
            references.insert(label, url);
        }
    }
    references
}
