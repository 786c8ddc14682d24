//! Generator settings.

use crate::builder::BuilderOptions;
use std::io;
use std::path::{self, Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct GeneratorOptions {
    /// Folder of resource Markdown files.
    pub resource_docs: PathBuf,
    pub mapping_file: PathBuf,
    pub terms_override_file: Option<PathBuf>,
    /// Root `toc.yml` to write. Sub-TOCs go in a `toc` folder next to it.
    pub toc_file: PathBuf,
    /// Existing TOC the generated nodes are appended to.
    pub static_toc_file: Option<PathBuf>,
    pub shared_doc_prefix: Option<String>,
    pub validate_links: bool,
}

impl GeneratorOptions {
    /// Make every path absolute, relative to the working directory.
    pub fn normalized(self) -> io::Result<Self> {
        Ok(Self {
            resource_docs: path::absolute(&self.resource_docs)?,
            mapping_file: path::absolute(&self.mapping_file)?,
            terms_override_file: self
                .terms_override_file
                .as_deref()
                .map(path::absolute)
                .transpose()?,
            toc_file: path::absolute(&self.toc_file)?,
            static_toc_file: self
                .static_toc_file
                .as_deref()
                .map(path::absolute)
                .transpose()?,
            ..self
        })
    }

    pub fn builder_options(&self) -> BuilderOptions {
        BuilderOptions {
            shared_doc_prefix: self.shared_doc_prefix.clone().filter(|p| !p.is_empty()),
            validate_links: self.validate_links,
        }
    }

    /// Folder the per-section TOC files are written under.
    pub fn sub_toc_dir(&self) -> PathBuf {
        self.toc_file
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("toc")
    }
}
