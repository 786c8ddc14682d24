//! gentoc: generate the API reference `toc.yml` from a resource mapping.
//!
//! ```text
//! gentoc -r api-reference/v1.0/resources -m mapping/v1.0-mapping.json \
//!        -t api-reference/v1.0/toc.yml -s static/v1.0-toc.yml
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use gentoc::{Generator, GeneratorOptions};
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "gentoc",
    about = "Generate a DocFX table of contents from a resource mapping file"
)]
struct Cli {
    /// Folder containing the resource Markdown files
    #[arg(short = 'r', long)]
    resource_docs: PathBuf,

    /// JSON file describing the TOC sections and their resources
    #[arg(short = 'm', long)]
    mapping: PathBuf,

    /// JSON file of term overrides applied to generated names
    #[arg(long)]
    terms_override: Option<PathBuf>,

    /// Output TOC file. Section TOCs are written to a `toc` folder next to it.
    #[arg(short = 't', long)]
    toc: PathBuf,

    /// Existing TOC to add the generated sections to
    #[arg(short = 's', long)]
    static_toc: Option<PathBuf>,

    /// File name prefix of the shared document to use when several
    /// documents describe the same resource
    #[arg(long)]
    shared_doc_prefix: Option<String>,

    /// Warn about method links whose targets do not exist
    #[arg(long)]
    validate_links: bool,

    /// Also write log output to this file
    #[arg(short = 'l', long)]
    log_file: Option<PathBuf>,

    /// Log debug messages
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let options = GeneratorOptions {
        resource_docs: cli.resource_docs,
        mapping_file: cli.mapping,
        terms_override_file: cli.terms_override,
        toc_file: cli.toc,
        static_toc_file: cli.static_toc,
        shared_doc_prefix: cli.shared_doc_prefix,
        validate_links: cli.validate_links,
    }
    .normalized()
    .context("failed to resolve input paths")?;

    let toc_file = options.toc_file.clone();
    Generator::new(options)
        .run()
        .inspect_err(|e| tracing::error!("{}", e))
        .with_context(|| format!("failed to generate {}", toc_file.display()))
}

/// Log to stderr, and to `--log-file` when given. `RUST_LOG` overrides the level.
fn init_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_ansi(io::stderr().is_terminal())
                .with_writer(io::stderr),
        )
        .with(file_layer)
        .init();
    Ok(())
}
