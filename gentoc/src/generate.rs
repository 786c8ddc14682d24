//! One generation run: read every input, build the tree, write the TOC files.

use crate::builder::TocBuilder;
use crate::config::GeneratorOptions;
use crate::document::DocSet;
use crate::error::{GenerateError, Result};
use crate::mapping::{FileNodeResolver, TocMapping};
use crate::naming::{load_term_overrides, NameFormatter};
use crate::toc::{Toc, TocItem};
use std::path::{Path, PathBuf};
use tracing::info;

/// Name of every TOC file this tool writes.
pub const TOC_FILE_NAME: &str = "toc.yml";

pub struct Generator {
    options: GeneratorOptions,
}

impl Generator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    /// Generate the root TOC and one sub-TOC per top-level mapping node.
    ///
    /// All inputs are read and the whole tree is built before anything is
    /// written, so a bad input leaves no output behind.
    pub fn run(&self) -> Result<()> {
        let options = &self.options;
        self.log_options();

        let mapping = TocMapping::load(&options.mapping_file)?;
        let overrides = match &options.terms_override_file {
            Some(path) => load_term_overrides(path)?,
            None => Vec::new(),
        };
        let formatter = NameFormatter::new(&overrides)?;

        let docs = DocSet::load(&options.resource_docs).map_err(|source| {
            GenerateError::ResourceFolder {
                path: options.resource_docs.clone(),
                source,
            }
        })?;
        info!("Found {} resource documents.", docs.len());

        let mut toc = match &options.static_toc_file {
            Some(path) => Toc::load(path).map_err(|e| GenerateError::StaticToc {
                path: path.clone(),
                reason: e.to_string(),
            })?,
            None => Toc::default(),
        };

        let resolver = FileNodeResolver::for_mapping(&options.mapping_file);
        let builder = TocBuilder::new(&docs, &formatter, &resolver)
            .with_overviews(&mapping.resource_overviews)
            .with_options(options.builder_options());
        let items = mapping
            .toc_nodes
            .iter()
            .map(|node| builder.build(node))
            .collect::<Result<Vec<_>>>()?;

        let sub_toc_dir = options.sub_toc_dir();
        let mut top_level = Vec::with_capacity(items.len());
        for mut item in items {
            if let Some(path) = write_sub_toc(&mut item, &sub_toc_dir)? {
                info!("Wrote {}", path.display());
            }
            top_level.push(item);
        }

        toc.append_generated(top_level);
        toc.save(&options.toc_file)?;
        info!("TOC generation complete.");
        Ok(())
    }

    fn log_options(&self) {
        let o = &self.options;
        let or_none = |p: &Option<PathBuf>| {
            p.as_ref()
                .map_or_else(|| "NONE".to_string(), |p| p.display().to_string())
        };
        info!("Starting TOC generation with the following parameters:");
        info!("  Resource docs folder: {}", o.resource_docs.display());
        info!("  Mapping file: {}", o.mapping_file.display());
        info!("  Terms override file: {}", or_none(&o.terms_override_file));
        info!("  Output TOC: {}", o.toc_file.display());
        info!("  Static TOC: {}", or_none(&o.static_toc_file));
        info!(
            "  Shared doc prefix: {}",
            o.shared_doc_prefix.as_deref().unwrap_or("NONE")
        );
    }
}

/// Folder name for a top-level section: `Teams and communications` → `teams-and-communications`.
pub fn section_slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Move a named top-level item's children into their own TOC file and turn
/// the item into a link to it. Returns the path written, if any.
fn write_sub_toc(item: &mut TocItem, sub_toc_dir: &Path) -> Result<Option<PathBuf>> {
    if !item.has_children() {
        item.items = None;
        return Ok(None);
    }
    let Some(name) = item.name.as_deref().filter(|n| !n.is_empty()) else {
        return Ok(None);
    };

    let slug = section_slug(name);
    let path = sub_toc_dir.join(&slug).join(TOC_FILE_NAME);
    Toc::new(item.items.take().unwrap_or_default()).save(&path)?;
    item.href = Some(format!("toc/{}/{}", slug, TOC_FILE_NAME));
    Ok(Some(path))
}
