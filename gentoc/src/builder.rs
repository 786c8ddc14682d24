//! Builds the output TOC tree from mapping nodes and resource documents.
//!
//! Each mapping node becomes one [`TocItem`]. Its children are, in order: an
//! optional "Overview" link, the node's additional links, its resources and
//! child nodes (optionally sorted together by name), and finally a
//! "Complex types" group. A resource becomes a flat link to its page when it
//! has no methods and no overview, otherwise an expandable item listing the
//! page itself and its methods grouped by sub-heading.

use crate::document::{DocSet, ResourceDocument};
use crate::error::{GenerateError, Result};
use crate::mapping::{NodeResolver, ResourceOverview, TocMapping, TocNode};
use crate::naming::NameFormatter;
use crate::parser::MethodLink;
use crate::paths::to_toc_relative_path;
use crate::resource::Resource;
use crate::toc::{sort_by_name, TocItem};
use std::borrow::Cow;
use tracing::{debug, error, warn};

/// Mapping nodes may not nest deeper than this.
pub const MAX_DEPTH: usize = 64;

const OVERVIEW: &str = "Overview";
const COMPLEX_TYPES: &str = "Complex types";

/// Optional resolution behavior.
#[derive(Debug, Clone, Default)]
pub struct BuilderOptions {
    /// When several documents describe one resource and none is named after
    /// it, use the single document whose file name starts with this prefix.
    pub shared_doc_prefix: Option<String>,
    /// Warn about method links whose targets do not exist.
    pub validate_links: bool,
}

pub struct TocBuilder<'a> {
    docs: &'a DocSet,
    overviews: &'a [ResourceOverview],
    formatter: &'a NameFormatter,
    resolver: &'a dyn NodeResolver,
    options: BuilderOptions,
}

impl<'a> TocBuilder<'a> {
    pub fn new(docs: &'a DocSet, formatter: &'a NameFormatter, resolver: &'a dyn NodeResolver) -> Self {
        Self {
            docs,
            overviews: &[],
            formatter,
            resolver,
            options: BuilderOptions::default(),
        }
    }

    pub fn with_overviews(mut self, overviews: &'a [ResourceOverview]) -> Self {
        self.overviews = overviews;
        self
    }

    pub fn with_options(mut self, options: BuilderOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the item for one mapping node and everything below it.
    pub fn build(&self, node: &TocNode) -> Result<TocItem> {
        self.build_node(node, 0)
    }

    fn build_node(&self, node: &TocNode, depth: usize) -> Result<TocItem> {
        if depth >= MAX_DEPTH {
            return Err(GenerateError::DepthExceeded {
                name: node.name.clone().unwrap_or_default(),
                depth: MAX_DEPTH,
            });
        }
        let node = self.expand(node)?;

        let mut items = Vec::new();
        if let Some(overview) = node.overview.as_deref().filter(|o| !o.is_empty()) {
            items.push(TocItem::link(OVERVIEW, to_toc_relative_path(overview)));
        }
        for link in node.additional_links.iter().flatten() {
            items.push(TocItem::link(link.name.clone(), Some(link.href.clone())));
        }

        let mut unsorted: Vec<TocItem> = node
            .resources
            .iter()
            .flatten()
            .filter_map(|name| self.resolve_resource(name))
            .collect();
        let mut complex_types: Vec<TocItem> = node
            .complex_types
            .iter()
            .flatten()
            .filter_map(|name| self.resolve_resource(name))
            .collect();

        for child in node.child_nodes.iter().flatten() {
            let built = self.build_node(child, depth + 1)?;
            match unsorted.iter_mut().find(|i| i.name == built.name) {
                Some(existing) => {
                    debug!(
                        "Merging child node {} into existing entry",
                        built.name.as_deref().unwrap_or_default()
                    );
                    existing
                        .items
                        .get_or_insert_with(Vec::new)
                        .extend(built.items.unwrap_or_default());
                }
                None => unsorted.push(built),
            }
        }

        if node.should_sort {
            sort_by_name(&mut unsorted);
        }
        items.extend(unsorted);

        if !complex_types.is_empty() {
            sort_by_name(&mut complex_types);
            items.push(TocItem::group(COMPLEX_TYPES, complex_types));
        }

        Ok(TocItem {
            name: node.name.clone(),
            display_name: join_keywords(node.keywords.as_deref()),
            items: Some(items),
            ..TocItem::default()
        })
    }

    /// Replace a node that references a file with the node loaded from it.
    fn expand<'n>(&self, node: &'n TocNode) -> Result<Cow<'n, TocNode>> {
        let Some(file) = node.file.as_deref() else {
            return Ok(Cow::Borrowed(node));
        };

        let mut loaded = self.resolver.resolve(file)?;
        if let Some(nested) = loaded.file.take() {
            warn!("Ignoring file reference {} inside {}", nested, file);
        }
        if loaded.name.is_none() {
            loaded.name = node.name.clone();
        }
        debug!("Loaded mapping node {} from {}", loaded.name.as_deref().unwrap_or_default(), file);
        Ok(Cow::Owned(loaded))
    }

    // -- Resources -------------------------------------------------------------

    /// The TOC item for a resource named in the mapping, or `None` (logged)
    /// when no single document can be found for it.
    ///
    /// Document keywords become the display name of a leaf only; an
    /// expandable item carries none.
    pub fn resolve_resource(&self, resource_name: &str) -> Option<TocItem> {
        let resource = Resource::parse(resource_name);
        let Some(doc) = self.find_document(&resource) else {
            error!("Could not find resource document for {}", resource);
            return None;
        };

        if self.options.validate_links {
            for link in doc.invalid_method_links() {
                warn!(
                    "Invalid method link in {}: {}",
                    doc.file_path().display(),
                    link.file_path
                );
            }
        }

        let name = match doc.toc_title() {
            Some(title) => title.to_string(),
            None => self.formatter.sentence_case(&resource.name),
        };
        let href = to_toc_relative_path(&doc.file_path().to_string_lossy());
        let overview = TocMapping::overview_for(self.overviews, &resource.name);

        if doc.methods().is_empty() && overview.is_none() {
            return Some(TocItem {
                name: Some(name),
                href,
                display_name: join_keywords(doc.keywords()),
                resource_name: Some(resource.name),
                ..TocItem::default()
            });
        }

        let mut items = Vec::new();
        if let Some(overview) = overview {
            items.push(TocItem::link(OVERVIEW, Some(overview)));
        }
        items.push(TocItem::link(name.clone(), href));
        items.extend(method_items(doc.methods()));

        Some(TocItem {
            name: Some(name),
            items: Some(items),
            resource_name: Some(resource.name),
            ..TocItem::default()
        })
    }

    /// The one document for `resource`, narrowing ambiguous matches first by
    /// file name, then by the shared document prefix.
    fn find_document(&self, resource: &Resource) -> Option<&'a ResourceDocument> {
        let matches = self.docs.find(resource);
        match matches.len() {
            0 => return None,
            1 => return matches.into_iter().next(),
            _ => {}
        }

        let files: Vec<_> = matches
            .iter()
            .filter_map(|d| d.file_path().file_name())
            .map(|f| f.to_string_lossy())
            .collect();
        warn!(
            "Found {} documents for {}: {}",
            matches.len(),
            resource,
            files.join(",")
        );

        let by_stem: Vec<_> = matches
            .iter()
            .filter(|d| d.file_stem().eq_ignore_ascii_case(&resource.name))
            .collect();
        if let [doc] = by_stem[..] {
            return Some(*doc);
        }

        let prefix = self.options.shared_doc_prefix.as_deref()?;
        let by_prefix: Vec<_> = matches
            .iter()
            .filter(|d| {
                d.file_path()
                    .file_name()
                    .is_some_and(|f| f.to_string_lossy().starts_with(prefix))
            })
            .collect();
        match by_prefix[..] {
            [doc] => Some(*doc),
            _ => None,
        }
    }
}

/// Method links grouped by sub-heading, in the order headings first appear.
/// Links without a heading are listed directly.
fn method_items(methods: &[MethodLink]) -> Vec<TocItem> {
    let mut headings: Vec<Option<&str>> = Vec::new();
    for method in methods {
        let heading = method.heading.as_deref().filter(|h| !h.is_empty());
        if !headings.contains(&heading) {
            headings.push(heading);
        }
    }

    let mut items = Vec::new();
    for heading in headings {
        let links = methods
            .iter()
            .filter(|m| m.heading.as_deref().filter(|h| !h.is_empty()) == heading)
            .map(|m| TocItem::link(m.title.clone(), to_toc_relative_path(&m.file_path)));
        match heading {
            None => items.extend(links),
            Some(heading) => items.push(TocItem::group(heading, links.collect())),
        }
    }
    items
}

fn join_keywords(keywords: Option<&[String]>) -> Option<String> {
    keywords.filter(|k| !k.is_empty()).map(|k| k.join(", "))
}
