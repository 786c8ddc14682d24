//! Resource documents and the set of them found in a docs folder.

use crate::error::DocumentError;
use crate::extract;
use crate::parser::{self, MethodLink};
use crate::paths;
use crate::resource::{names_match, Resource};
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Value of `doc_type` that marks a resource page.
pub const RESOURCE_DOC_TYPE: &str = "resourcePageType";

/// The front matter fields this tool cares about. Everything else is ignored.
#[derive(Debug, Default, Deserialize)]
struct FrontMatter {
    #[serde(rename = "toc.title")]
    toc_title: Option<String>,
    #[serde(rename = "toc.keywords", default, deserialize_with = "keywords")]
    keywords: Option<Vec<String>>,
}

/// `toc.keywords` is normally a list, but a lone scalar shows up too. Numbers
/// and booleans are kept as their text.
fn keywords<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let keywords = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::Sequence(items)) => Some(items.iter().filter_map(scalar_text).collect()),
        Some(value) => scalar_text(&value).map(|k| vec![k]),
    };
    Ok(keywords)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A Markdown page documenting one API resource.
#[derive(Debug, Clone)]
pub struct ResourceDocument {
    file_path: PathBuf,
    resource_name: String,
    namespace: String,
    toc_title: Option<String>,
    keywords: Option<Vec<String>>,
    methods: Vec<MethodLink>,
}

impl ResourceDocument {
    /// Build a document from Markdown content.
    ///
    /// Fails with [`DocumentError::WrongDocType`] unless `doc_type` is
    /// `resourcePageType`, and with [`DocumentError::MissingResourceName`] when
    /// neither the title nor the H1 names a resource.
    pub fn from_markdown(file_path: impl Into<PathBuf>, markdown: &str) -> Result<Self, DocumentError> {
        let markdown = markdown.strip_prefix('\u{feff}').unwrap_or(markdown);
        let doc_type = extract::extract_doc_type(markdown);
        if !doc_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case(RESOURCE_DOC_TYPE))
        {
            return Err(DocumentError::WrongDocType { doc_type });
        }

        let resource_name =
            extract::extract_resource_name(markdown).ok_or(DocumentError::MissingResourceName)?;
        let namespace = extract::extract_namespace(markdown);

        let blocks = parser::blocks::parse(markdown);
        let front_matter = match parser::front_matter(&blocks) {
            Some(yaml) if !yaml.trim().is_empty() => serde_yaml::from_str::<FrontMatter>(yaml)?,
            _ => FrontMatter::default(),
        };

        Ok(Self {
            file_path: file_path.into(),
            resource_name,
            namespace,
            toc_title: front_matter
                .toc_title
                .or_else(|| extract::extract_toc_title(markdown)),
            keywords: front_matter.keywords,
            methods: parser::methods::method_links(&blocks),
        })
    }

    /// Read and build a document from a Markdown file.
    pub fn from_file(path: &Path) -> Result<Self, DocumentError> {
        let markdown = fs::read_to_string(path)?;
        Self::from_markdown(path, &markdown)
    }

    /// Like [`from_file`](Self::from_file), but logs failures and returns `None`.
    pub fn load(path: &Path) -> Option<Self> {
        match Self::from_file(path) {
            Ok(doc) => Some(doc),
            Err(e) if e.is_wrong_doc_type() => {
                debug!("Error parsing {}: {}", path.display(), e);
                None
            }
            Err(e) => {
                warn!("Error parsing {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The `toc.title` override from front matter.
    pub fn toc_title(&self) -> Option<&str> {
        self.toc_title.as_deref()
    }

    /// The `toc.keywords` list from front matter.
    pub fn keywords(&self) -> Option<&[String]> {
        self.keywords.as_deref()
    }

    pub fn methods(&self) -> &[MethodLink] {
        &self.methods
    }

    /// Whether this document describes `resource`.
    pub fn describes(&self, resource: &Resource) -> bool {
        names_match(&self.resource_name, &resource.name)
            && names_match(&self.namespace, &resource.namespace)
    }

    /// File name without extension, e.g. `user` for `resources/user.md`.
    pub fn file_stem(&self) -> &str {
        self.file_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }

    /// Method links whose targets do not resolve next to this document.
    pub fn invalid_method_links(&self) -> Vec<&MethodLink> {
        self.methods
            .iter()
            .filter(|m| !paths::is_valid_link(&m.file_path, &self.file_path))
            .collect()
    }
}

/// Every resource document found directly inside one folder.
#[derive(Debug, Default)]
pub struct DocSet {
    documents: Vec<ResourceDocument>,
}

impl DocSet {
    /// Load all `*.md` files in `root` (not recursive), skipping the ones that
    /// are not resource documents.
    pub fn load(root: &Path) -> io::Result<Self> {
        let mut files: Vec<PathBuf> = fs::read_dir(root)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && is_markdown(p))
            .collect();
        // Sort for deterministic diagnostics
        files.sort();

        let documents = files.iter().filter_map(|p| ResourceDocument::load(p)).collect();
        Ok(Self { documents })
    }

    pub fn from_documents(documents: Vec<ResourceDocument>) -> Self {
        Self { documents }
    }

    pub fn documents(&self) -> &[ResourceDocument] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents whose resource name and namespace match `resource`.
    pub fn find(&self, resource: &Resource) -> Vec<&ResourceDocument> {
        self.documents.iter().filter(|d| d.describes(resource)).collect()
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("md"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const RESOURCE: &str = r#"---
title: "membersDeletedEventMessageDetail resource type"
description: "Represents the details of an event message about members deleted."
author: "jasonjoh"
ms.localizationpriority: medium
doc_type: "resourcePageType"
toc.keywords:
- members
- deleted
---

# membersDeletedEventMessageDetail resource type

Namespace: microsoft.graph

## Methods

| Method | Return Type | Description |
|:-------|:------------|:------------|
|[List mailFolders](../api/user-list-mailfolders.md) | [mailFolder](mailfolder.md) collection|Get all.|
|[Get mailFolder](../api/mailfolder-get.md) | [mailFolder](mailfolder.md) |Read.|
|[Create mailFolder](../api/user-post-mailfolders.md) |[mailFolder](mailfolder.md)| Create.|
|**Extended properties**| | |
|[Create single-value extended property](../api/singlevaluelegacyextendedproperty-post-singlevalueextendedproperties.md) |[mailFolder](mailfolder.md)  |Create.|
|[Get mailFolder with multi-value extended property](../api/multivaluelegacyextendedproperty-get.md)  | [mailFolder](mailfolder.md) | Get.|
"#;

    const ENUM_PAGE: &str = "---\ntitle: membersDeletedEventMessageDetail resource type\ndoc_type: enumPageType\n---\n\n# membersDeletedEvent resource type\n";

    const NO_DOC_TYPE: &str = "---\ntitle: membersDeletedEventMessageDetail resource type\n---\n\n# membersDeletedEvent resource type\n";

    const NO_NAME: &str = "---\ndoc_type: resourcePageType\n---\n\n# Just a heading\n";

    #[test]
    fn resource_document_loads() {
        let doc = ResourceDocument::from_markdown("resources/members.md", RESOURCE).unwrap();
        assert_eq!(doc.resource_name(), "membersDeletedEventMessageDetail");
        assert_eq!(doc.namespace(), "microsoft.graph");
        assert_eq!(doc.methods().len(), 5);
        assert_eq!(
            doc.keywords(),
            Some(&["members".to_string(), "deleted".to_string()][..])
        );
        assert_eq!(doc.toc_title(), None);
        assert_eq!(doc.file_stem(), "members");
    }

    #[test]
    fn wrong_doc_type_is_rejected() {
        let err = ResourceDocument::from_markdown("x.md", ENUM_PAGE).unwrap_err();
        assert!(err.is_wrong_doc_type());
    }

    #[test]
    fn missing_doc_type_is_rejected() {
        let err = ResourceDocument::from_markdown("x.md", NO_DOC_TYPE).unwrap_err();
        assert!(matches!(err, DocumentError::WrongDocType { doc_type: None }));
    }

    #[test]
    fn missing_resource_name_is_a_parse_error() {
        let err = ResourceDocument::from_markdown("x.md", NO_NAME).unwrap_err();
        assert!(matches!(err, DocumentError::MissingResourceName));
    }

    #[test]
    fn toc_title_from_front_matter() {
        let md = "---\ntitle: m365AppsInstallationOptions resource type\ndoc_type: resourcePageType\ntoc.title: '\"Special\" installation options'\ntoc.keywords: installation\n---\n";
        let doc = ResourceDocument::from_markdown("x.md", md).unwrap();
        assert_eq!(doc.toc_title(), Some("\"Special\" installation options"));
        assert_eq!(doc.keywords(), Some(&["installation".to_string()][..]));
    }

    #[test]
    fn numeric_keywords_are_kept_as_text() {
        let md = "---\ntitle: team resource type\ndoc_type: resourcePageType\ntoc.keywords:\n- Microsoft 365\n- 365\n- true\n---\n";
        let doc = ResourceDocument::from_markdown("x.md", md).unwrap();
        assert_eq!(
            doc.keywords(),
            Some(&["Microsoft 365".to_string(), "365".to_string(), "true".to_string()][..])
        );

        let md = "---\ntitle: team resource type\ndoc_type: resourcePageType\ntoc.keywords:\n---\n";
        let doc = ResourceDocument::from_markdown("x.md", md).unwrap();
        assert_eq!(doc.keywords(), None);
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        let md = format!("\u{feff}{}", RESOURCE);
        let doc = ResourceDocument::from_markdown("x.md", &md).unwrap();
        assert_eq!(
            doc.keywords(),
            Some(&["members".to_string(), "deleted".to_string()][..])
        );
        assert_eq!(doc.methods().len(), 5);
    }

    #[test]
    fn byte_order_mark_file_loads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("members.md");
        fs::write(&path, format!("\u{feff}{}", RESOURCE)).unwrap();
        let doc = ResourceDocument::from_file(&path).unwrap();
        assert_eq!(doc.keywords().map(<[String]>::len), Some(2));
    }

    #[test]
    fn malformed_front_matter_is_a_parse_error() {
        let md = "---\ntitle: user resource type\ndoc_type: resourcePageType\ntoc.keywords: [unclosed\n---\n";
        let err = ResourceDocument::from_markdown("x.md", md).unwrap_err();
        assert!(matches!(err, DocumentError::FrontMatter(_)));
    }

    #[test]
    fn describes_matches_name_and_namespace_ignoring_case() {
        let doc = ResourceDocument::from_markdown("x.md", RESOURCE).unwrap();
        assert!(doc.describes(&Resource::parse("MembersDeletedEventMessageDetail")));
        assert!(doc.describes(&Resource::parse(
            "Microsoft.Graph.membersDeletedEventMessageDetail"
        )));
        assert!(!doc.describes(&Resource::parse(
            "microsoft.graph.security.membersDeletedEventMessageDetail"
        )));
    }

    #[test]
    fn invalid_method_links_are_reported() {
        let dir = TempDir::new().unwrap();
        let resources = dir.path().join("resources");
        let api = dir.path().join("api");
        fs::create_dir_all(&resources).unwrap();
        fs::create_dir_all(&api).unwrap();
        fs::write(api.join("user-list-mailfolders.md"), "# list").unwrap();

        let doc = ResourceDocument::from_markdown(resources.join("members.md"), RESOURCE).unwrap();
        let invalid: Vec<_> = doc.invalid_method_links().iter().map(|m| m.title.clone()).collect();
        assert_eq!(invalid.len(), 4);
        assert!(!invalid.contains(&"List mailFolders".to_string()));
    }

    #[test]
    fn doc_set_skips_non_resource_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("members.md"), RESOURCE).unwrap();
        fs::write(dir.path().join("enum.md"), ENUM_PAGE).unwrap();
        fs::write(dir.path().join("noname.md"), NO_NAME).unwrap();
        fs::write(dir.path().join("notes.txt"), RESOURCE).unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("deep.md"), RESOURCE).unwrap();

        let set = DocSet::load(dir.path()).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.documents()[0].file_stem(), "members");
    }

    #[test]
    fn doc_set_missing_folder_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(DocSet::load(&dir.path().join("missing")).is_err());
    }
}
