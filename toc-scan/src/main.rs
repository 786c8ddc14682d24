//! toc-scan: list API and resource docs that no `toc.yml` links to.
//!
//! ```text
//! toc-scan -a api-reference/v1.0/api -r api-reference/v1.0/resources -t api-reference/v1.0
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use gentoc::generate::TOC_FILE_NAME;
use gentoc::paths::trim_anchor;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static RE_RESOURCE_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)href:\s+(?:\.\./)*resources/(?P<file>\S+)").unwrap());

static RE_API_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)href:\s+(?:\.\./)*api/(?P<file>\S+)").unwrap());

#[derive(Parser)]
#[command(name = "toc-scan", about = "Report API and resource docs missing from every toc.yml")]
struct Cli {
    /// Folder containing the API docs
    #[arg(short = 'a', long)]
    api_docs: PathBuf,

    /// Folder containing the resource docs
    #[arg(short = 'r', long)]
    resource_docs: PathBuf,

    /// Folder searched recursively for toc.yml files
    #[arg(short = 't', long)]
    toc: PathBuf,

    /// File the unreferenced doc names are written to
    #[arg(short = 'o', long, default_value = "files.txt")]
    output: PathBuf,
}

/// File names linked from TOC files, split by target folder.
#[derive(Debug, Default)]
struct TocEntries {
    resources: HashSet<String>,
    apis: HashSet<String>,
}

impl TocEntries {
    fn scan(&mut self, toc_yaml: &str) {
        collect(&RE_RESOURCE_HREF, toc_yaml, &mut self.resources);
        collect(&RE_API_HREF, toc_yaml, &mut self.apis);
    }
}

fn collect(re: &Regex, toc_yaml: &str, into: &mut HashSet<String>) {
    for caps in re.captures_iter(toc_yaml) {
        into.insert(trim_anchor(&caps["file"]).to_string());
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let api_docs = file_names(&cli.api_docs)?;
    let resource_docs = file_names(&cli.resource_docs)?;

    let mut entries = TocEntries::default();
    for toc_file in toc_files(&cli.toc)? {
        let yaml = fs::read_to_string(&toc_file)
            .with_context(|| format!("failed to read {}", toc_file.display()))?;
        entries.scan(&yaml);
    }

    let missing_resources: Vec<&String> = resource_docs
        .iter()
        .filter(|f| !entries.resources.contains(*f))
        .collect();
    let missing_apis: Vec<&String> = api_docs
        .iter()
        .filter(|f| !entries.apis.contains(*f))
        .collect();

    println!(
        "{} of {} resource documents not found in any TOC.",
        missing_resources.len(),
        resource_docs.len()
    );
    println!(
        "{} of {} api documents not found in any TOC.",
        missing_apis.len(),
        api_docs.len()
    );

    let mut report = String::new();
    for name in missing_resources.iter().chain(&missing_apis) {
        report.push_str(name);
        report.push('\n');
    }
    fs::write(&cli.output, report)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    Ok(())
}

/// Names of the files directly inside `dir`, sorted.
fn file_names(dir: &Path) -> Result<Vec<String>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to read directory: {}", dir.display()))?;
    let mut names: Vec<String> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
        .collect();
    names.sort();
    Ok(names)
}

/// Every `toc.yml` below `dir`.
fn toc_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/**/{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        TOC_FILE_NAME
    );
    let mut files: Vec<PathBuf> = glob::glob(&pattern)
        .with_context(|| format!("invalid glob pattern: {}", pattern))?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    Ok(files)
}
