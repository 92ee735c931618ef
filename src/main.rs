// src/main.rs

use anyhow::{Context, Result};
use clap::Parser;
use quarry::{build_repo, load_package_list, Config, Ingest, ListFormat, Snapshot};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "quarry")]
#[command(author, version, about = "Static PyPI-compatible package index generator", long_about = None)]
struct Cli {
    /// Package list: one distribution filename per line
    #[arg(long, value_name = "FILE", required_unless_present = "package_list_json", conflicts_with = "package_list_json")]
    package_list: Option<PathBuf>,

    /// Package list: one JSON record per line
    #[arg(long, value_name = "FILE")]
    package_list_json: Option<PathBuf>,

    /// Previous package list; enables a partial rebuild of only what changed
    #[arg(long, value_name = "FILE", conflicts_with = "previous_package_list_json")]
    previous_package_list: Option<PathBuf>,

    /// Previous package list in the JSON format
    #[arg(long, value_name = "FILE")]
    previous_package_list_json: Option<PathBuf>,

    /// Directory to write the index into
    #[arg(long, value_name = "DIR")]
    output_dir: PathBuf,

    /// Base URL where the package files themselves are hosted
    ///
    /// May be absolute ("https://files.example.com/pool") or relative to
    /// the simple index pages ("../../pool/").
    #[arg(long, value_name = "URL")]
    packages_url: String,

    /// Title shown on the landing page
    #[arg(long, default_value = "My Private PyPI")]
    title: String,

    /// Logo URL for the landing page
    #[arg(long, value_name = "URL")]
    logo: Option<String>,

    /// Logo width in pixels
    #[arg(long, value_name = "PX")]
    logo_width: Option<u32>,

    /// Don't stamp generated pages with the build time
    #[arg(long)]
    no_generate_timestamp: bool,

    /// Skip the per-release pypi/{name}/{version}/json documents
    #[arg(long)]
    no_per_release_json: bool,
}

/// Load a package list, warning about (and skipping) every bad record
fn load_snapshot(path: &PathBuf, format: ListFormat) -> Result<Snapshot> {
    let Ingest { packages, rejected } = load_package_list(path, format)
        .with_context(|| format!("Failed to read package list {}", path.display()))?;
    for reject in &rejected {
        warn!(
            "skipping {}:{}: {} ({})",
            path.display(),
            reject.line,
            reject.error,
            reject.content
        );
    }
    info!(
        "loaded {} packages from {} ({} skipped)",
        packages.len(),
        path.display(),
        rejected.len()
    );
    Ok(Snapshot::from_packages(packages))
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let current = match (&cli.package_list, &cli.package_list_json) {
        (Some(path), None) => load_snapshot(path, ListFormat::Plain)?,
        (None, Some(path)) => load_snapshot(path, ListFormat::Json)?,
        // clap enforces exactly one list flag
        _ => unreachable!("one package list flag is required"),
    };

    let previous = match (&cli.previous_package_list, &cli.previous_package_list_json) {
        (Some(path), None) => Some(load_snapshot(path, ListFormat::Plain)?),
        (None, Some(path)) => Some(load_snapshot(path, ListFormat::Json)?),
        _ => None,
    };

    let config = Config {
        output_dir: cli.output_dir,
        packages_url: cli.packages_url,
        title: cli.title,
        logo: cli.logo,
        logo_width: cli.logo_width,
        generate_timestamp: !cli.no_generate_timestamp,
        per_release_json: !cli.no_per_release_json,
    };

    let summary = build_repo(&current, previous.as_ref(), &config)
        .with_context(|| format!("Failed to build index in {}", config.output_dir.display()))?;

    info!(
        "done: {} packages, {} package directories written",
        summary.package_count, summary.names_written
    );
    Ok(())
}
