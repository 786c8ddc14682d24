//! Error types for document loading and TOC generation.

use std::path::PathBuf;
use thiserror::Error;

/// Why a Markdown file did not produce a [`ResourceDocument`](crate::document::ResourceDocument).
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The file is not a resource page. Expected for most of a docs folder.
    #[error("file is not a resource document - doc_type: {}", .doc_type.as_deref().unwrap_or("NONE"))]
    WrongDocType { doc_type: Option<String> },

    #[error("could not determine resource name from file")]
    MissingResourceName,

    #[error("invalid YAML front matter: {0}")]
    FrontMatter(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DocumentError {
    /// Wrong doc types are routine and only worth a debug line.
    pub fn is_wrong_doc_type(&self) -> bool {
        matches!(self, Self::WrongDocType { .. })
    }
}

/// Fatal errors that abort a generation run.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("invalid mapping file {}: {reason}", .path.display())]
    MappingFile { path: PathBuf, reason: String },

    #[error("invalid terms override file {}: {reason}", .path.display())]
    TermOverrides { path: PathBuf, reason: String },

    #[error("invalid mapping node file {}: {reason}", .path.display())]
    Include { path: PathBuf, reason: String },

    #[error("invalid static TOC {}: {reason}", .path.display())]
    StaticToc { path: PathBuf, reason: String },

    #[error("cannot read resource docs folder {}: {source}", .path.display())]
    ResourceFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("mapping node '{name}' is nested deeper than {depth} levels")]
    DepthExceeded { name: String, depth: usize },

    #[error("invalid term override '{term}': {source}")]
    TermPattern {
        term: String,
        #[source]
        source: regex::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GenerateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_doc_type_message_names_the_type() {
        let err = DocumentError::WrongDocType {
            doc_type: Some("enumPageType".into()),
        };
        assert_eq!(
            err.to_string(),
            "file is not a resource document - doc_type: enumPageType"
        );
        assert!(err.is_wrong_doc_type());
    }

    #[test]
    fn missing_doc_type_message() {
        let err = DocumentError::WrongDocType { doc_type: None };
        assert!(err.to_string().ends_with("doc_type: NONE"));
    }

    #[test]
    fn missing_name_is_not_wrong_doc_type() {
        assert!(!DocumentError::MissingResourceName.is_wrong_doc_type());
    }
}
