//! gentoc: build a DocFX table of contents for API reference docs.
//!
//! A JSON mapping describes the TOC sections and which API resources each
//! one lists. Every resource is matched to its Markdown page in the resource
//! docs folder, and the page's `Methods` table supplies the operations listed
//! under it.

pub mod builder;
pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod generate;
pub mod mapping;
pub mod naming;
pub mod parser;
pub mod paths;
pub mod resource;
pub mod toc;

pub use builder::{BuilderOptions, TocBuilder};
pub use config::GeneratorOptions;
pub use document::{DocSet, ResourceDocument};
pub use error::{DocumentError, GenerateError};
pub use generate::Generator;
pub use toc::{Toc, TocItem};
