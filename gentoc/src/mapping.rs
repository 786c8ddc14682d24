//! The mapping file: the desired TOC shape and which resources go where.

use crate::error::{GenerateError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Top level of the mapping file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TocMapping {
    pub toc_nodes: Vec<TocNode>,
    pub resource_overviews: Vec<ResourceOverview>,
}

/// One node of the desired TOC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TocNode {
    pub name: Option<String>,
    /// Path to an overview page, listed first as "Overview".
    pub overview: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub resources: Option<Vec<String>>,
    pub complex_types: Option<Vec<String>>,
    pub additional_links: Option<Vec<TocLink>>,
    pub child_nodes: Option<Vec<TocNode>>,
    pub should_sort: bool,
    /// JSON file holding this node's full definition, relative to the mapping file.
    pub file: Option<String>,
}

impl TocNode {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// A literal link added to a node as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TocLink {
    pub name: String,
    pub href: String,
}

/// Overview page for a single resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResourceOverview {
    pub resource: String,
    pub overview: String,
}

impl TocMapping {
    /// Load and parse a mapping file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| GenerateError::MappingFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| GenerateError::MappingFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// The overview registered for `resource`, first match wins.
    pub fn overview_for(overviews: &[ResourceOverview], resource: &str) -> Option<String> {
        overviews
            .iter()
            .find(|o| o.resource.to_lowercase() == resource.to_lowercase())
            .map(|o| o.overview.clone())
    }
}

// -- Node file references ----------------------------------------------------

/// Loads the node a `file` reference points at.
pub trait NodeResolver {
    fn resolve(&self, file: &str) -> Result<TocNode>;
}

/// Reads referenced nodes from JSON files next to the mapping file.
#[derive(Debug, Clone)]
pub struct FileNodeResolver {
    base_dir: PathBuf,
}

impl FileNodeResolver {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Resolver for files referenced from `mapping_file`.
    pub fn for_mapping(mapping_file: &Path) -> Self {
        Self::new(mapping_file.parent().unwrap_or_else(|| Path::new("")))
    }
}

impl NodeResolver for FileNodeResolver {
    fn resolve(&self, file: &str) -> Result<TocNode> {
        let path = self.base_dir.join(crate::paths::normalize_file_path(file));
        let content = fs::read_to_string(&path).map_err(|e| GenerateError::Include {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| GenerateError::Include {
            path,
            reason: e.to_string(),
        })
    }
}
