//! The DocFX TOC tree: `toc.yml` items and their YAML form.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

/// One entry in a `toc.yml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TocItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub expanded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<TocItem>>,
    /// Keys this tool does not model, kept so hand-written TOCs round-trip.
    #[serde(flatten, default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_yaml::Value>,
    /// Resource the item was built for. Never written out.
    #[serde(skip)]
    pub resource_name: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl TocItem {
    /// A leaf pointing at `href`.
    pub fn link(name: impl Into<String>, href: Option<String>) -> Self {
        Self {
            name: Some(name.into()),
            href,
            ..Self::default()
        }
    }

    /// A group holding `items`.
    pub fn group(name: impl Into<String>, items: Vec<TocItem>) -> Self {
        Self {
            name: Some(name.into()),
            items: Some(items),
            ..Self::default()
        }
    }

    /// Children, or an empty slice.
    pub fn children(&self) -> &[TocItem] {
        self.items.as_deref().unwrap_or_default()
    }

    pub fn has_children(&self) -> bool {
        !self.children().is_empty()
    }

    /// Case-insensitive ordering by name; unnamed items sort first.
    pub fn cmp_by_name(&self, other: &Self) -> Ordering {
        let a = self.name.as_deref().map(str::to_uppercase);
        let b = other.name.as_deref().map(str::to_uppercase);
        a.cmp(&b)
    }
}

/// Stable sort by [`TocItem::cmp_by_name`].
pub fn sort_by_name(items: &mut [TocItem]) {
    items.sort_by(TocItem::cmp_by_name);
}

/// A whole `toc.yml` file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Toc {
    #[serde(default)]
    pub items: Vec<TocItem>,
}

impl Toc {
    pub fn new(items: Vec<TocItem>) -> Self {
        Self { items }
    }

    /// Add generated items under the last root item, or at the root when
    /// there are no items yet.
    pub fn append_generated(&mut self, generated: Vec<TocItem>) {
        match self.items.last_mut() {
            Some(last) => last.items.get_or_insert_with(Vec::new).extend(generated),
            None => self.items.extend(generated),
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub fn load(path: &Path) -> io::Result<Self> {
        let yaml = fs::read_to_string(path)?;
        Self::from_yaml(&yaml).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Write to `path`, creating parent folders as needed.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let yaml = self
            .to_yaml()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, yaml)
    }
}
