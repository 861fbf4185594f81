//! bibnorm - reconcile a BibTeX file against DBLP
//!
//! Matched entries are replaced by DBLP's canonical records; everything
//! else is kept and pruned to the same field schema.

use std::path::{Path, PathBuf};

use bibnorm_bibtex::{format_library, parse};
use bibnorm_core::{ReconcileConfig, Reconciler};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bibnorm")]
#[command(about = "Replace BibTeX entries with canonical DBLP records")]
#[command(version)]
struct Cli {
    /// BibTeX file to reconcile
    input: PathBuf,

    /// Write the result here instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Config file (default: <config dir>/bibnorm/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Accept invalid TLS certificates
    #[arg(long)]
    insecure: bool,

    /// Debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stdout carries the BibTeX output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<ReconcileConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => ReconcileConfig::load(path)?,
        None => ReconcileConfig::load_default()?,
    };

    if let Some(secs) = cli.timeout {
        config.http.timeout_secs = secs;
    }
    if cli.insecure {
        config.http.accept_invalid_certs = true;
    }

    config.validate()?;
    Ok(config)
}

fn read_input(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    std::fs::read_to_string(path)
        .map_err(|e| format!("could not read {}: {}", path.display(), e).into())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;
    let library = parse(&read_input(&cli.input)?);

    let summary = library.summary();
    tracing::info!(
        "{}: {} entries, {} comments, {} macros, {} preambles, {} unparseable",
        cli.input.display(),
        summary.entries,
        summary.comments,
        summary.macros,
        summary.preambles,
        summary.failed
    );
    for failed in library.failed_blocks() {
        tracing::warn!(
            "line {}, column {}: {}",
            failed.line,
            failed.column,
            failed.message
        );
    }

    let reconciler = Reconciler::from_config(&config)?;
    let report = reconciler.reconcile(library).await;
    let rendered = format_library(&report.library);

    match &cli.output {
        Some(path) => std::fs::write(path, rendered)
            .map_err(|e| format!("could not write {}: {}", path.display(), e))?,
        None => print!("{}", rendered),
    }

    eprintln!("{} replaced, {} kept", report.replaced, report.kept());
    for diagnostic in &report.diagnostics {
        eprintln!(
            "  {} ({}): {}",
            diagnostic.cite_key, diagnostic.kind, diagnostic.message
        );
    }

    Ok(())
}
