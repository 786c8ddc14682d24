//! split-toc: move each workload under a TOC's API reference node into its
//! own `toc.yml`.
//!
//! ```text
//! split-toc -t api-reference/v1.0/toc.yml -o api-reference/v1.0/toc -u
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use gentoc::generate::{section_slug, TOC_FILE_NAME};
use gentoc::paths::relative_path;
use gentoc::{Toc, TocItem};
use regex::Regex;
use std::fs;
use std::path::{self, Path, PathBuf};
use std::sync::LazyLock;

static RE_API_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^API\s.*[Rr]eference$").unwrap());

#[derive(Parser)]
#[command(
    name = "split-toc",
    about = "Split the API reference section of a toc.yml into one file per workload"
)]
struct Cli {
    /// The toc.yml to split
    #[arg(short = 't', long)]
    toc: PathBuf,

    /// Directory for the split files. Its current contents are removed.
    #[arg(short = 'o', long)]
    out: PathBuf,

    /// Rewrite the original TOC to link to the split files
    #[arg(short = 'u', long)]
    update: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let toc_file = path::absolute(&cli.toc)?;
    let out_dir = path::absolute(&cli.out)?;

    if !toc_file.is_file() {
        bail!("{} does not exist", cli.toc.display());
    }
    let mut toc =
        Toc::load(&toc_file).with_context(|| format!("failed to read {}", toc_file.display()))?;

    let toc_dir = toc_file.parent().unwrap_or_else(|| Path::new("."));
    let links_from = cli.update.then_some(toc_dir);
    let written = split(&mut toc, &out_dir, links_from)?;
    for path in &written {
        println!("Created {}", path.display());
    }

    if cli.update {
        toc.save(&toc_file)
            .with_context(|| format!("failed to write {}", toc_file.display()))?;
        println!("Updated {}", toc_file.display());
    }
    Ok(())
}

/// The one root item named like `API v1.0 reference`.
fn reference_node(toc: &mut Toc) -> Result<&mut TocItem> {
    let mut matches = toc
        .items
        .iter_mut()
        .filter(|i| RE_API_REFERENCE.is_match(i.name.as_deref().unwrap_or_default()));
    match (matches.next(), matches.next()) {
        (Some(node), None) => Ok(node),
        (None, _) => bail!("No API reference node detected in provided TOC file"),
        (Some(_), Some(_)) => {
            bail!("More than one API reference node detected in provided TOC file")
        }
    }
}

/// Write each child of the reference node that has items to
/// `<out_dir>/<slug>/toc.yml`.
///
/// With `links_from` set, each split child loses its items and links to its
/// new file instead, relative to that directory.
fn split(toc: &mut Toc, out_dir: &Path, links_from: Option<&Path>) -> Result<Vec<PathBuf>> {
    let reference = reference_node(toc)?;
    let workloads: Vec<&mut TocItem> = reference
        .items
        .iter_mut()
        .flatten()
        .filter(|i| i.items.is_some())
        .collect();
    if workloads.is_empty() {
        bail!("No child nodes found under API reference node");
    }

    clear_dir(out_dir).with_context(|| format!("failed to clear {}", out_dir.display()))?;

    let mut written = Vec::with_capacity(workloads.len());
    for workload in workloads {
        let Some(name) = workload.name.as_deref() else {
            bail!("TOC node must have a name");
        };
        let file = out_dir.join(section_slug(name)).join(TOC_FILE_NAME);
        Toc::new(workload.children().to_vec())
            .save(&file)
            .with_context(|| format!("failed to write {}", file.display()))?;

        if let Some(dir) = links_from {
            workload.items = None;
            workload.href = Some(relative_path(dir, &file));
        }
        written.push(file);
    }

    Ok(written)
}

/// Empty `dir`, creating it if needed.
fn clear_dir(dir: &Path) -> std::io::Result<()> {
    if !dir.exists() {
        return fs::create_dir_all(dir);
    }
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}
