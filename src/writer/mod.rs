// src/writer/mod.rs

//! Repository writer: turns a snapshot (and optionally a diff against the
//! previous snapshot) into the output tree
//!
//! ```text
//! {out}/index.html                     landing page
//! {out}/packages.json                  round-trippable package inventory
//! {out}/simple/index.html              name listing
//! {out}/simple/{name}/index.html       per-name file listing
//! {out}/pypi/{name}/json               JSON API document
//! {out}/pypi/{name}/{version}/json     per-release JSON API document
//! {out}/changelog/page{N}.html         newest uploads first
//! ```
//!
//! Every file is produced by exactly one write through [`atomic_write`]:
//! content lands in a sibling temporary file that is renamed into place
//! only on success, so a failed build never clobbers a previous one.

pub mod html;

use crate::config::Config;
use crate::diff::{compute_diff, RepoDiff};
use crate::error::Result;
use crate::index::{self, Snapshot};
use chrono::Utc;
use std::fs;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Changelog entries per page
const CHANGELOG_PAGE_SIZE: usize = 100;

/// Write `contents` to `path` atomically
///
/// The temporary file lives next to the target so the final rename never
/// crosses a filesystem boundary. On any failure the temporary file is
/// cleaned up and the existing target, if any, is left untouched.
pub fn atomic_write(path: &Path, contents: &str) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(parent)?;
    std::io::Write::write_all(&mut temp, contents.as_bytes())?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// What a build actually wrote
#[derive(Debug, Default)]
pub struct BuildSummary {
    /// Package names whose artifacts were regenerated
    pub names_written: usize,
    /// Total packages in the current snapshot
    pub package_count: usize,
}

/// Build the output tree
///
/// With `previous` supplied this is a partial rebuild: only changed names
/// are regenerated, the top-level artifacts are refreshed only when
/// something changed at all, and the simple index listing only when the
/// name set changed. A rebuild with no changes writes nothing.
pub fn build_repo(
    current: &Snapshot,
    previous: Option<&Snapshot>,
    config: &Config,
) -> Result<BuildSummary> {
    let diff = compute_diff(previous, current);
    let full_build = previous.is_none();

    if !full_build && !diff.has_changes() {
        info!("package list unchanged, nothing to regenerate");
        return Ok(BuildSummary {
            names_written: 0,
            package_count: current.package_count(),
        });
    }

    let generated = config
        .generate_timestamp
        .then(|| Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string());
    let out = config.output_dir.as_path();
    fs::create_dir_all(out)?;

    let names_written = write_package_dirs(current, &diff, config, generated.as_deref())?;

    if full_build || diff.names_changed() {
        let simple_dir = out.join("simple");
        fs::create_dir_all(&simple_dir)?;
        atomic_write(
            &simple_dir.join("index.html"),
            &html::render_simple_index(current, generated.as_deref()),
        )?;
    }

    atomic_write(
        &out.join("index.html"),
        &html::render_root_index(current, config, generated.as_deref()),
    )?;
    write_inventory(current, out)?;
    write_changelog(&diff, config, generated.as_deref())?;

    info!(
        "wrote {} of {} package directories under {}",
        names_written,
        current.len(),
        out.display()
    );
    Ok(BuildSummary {
        names_written,
        package_count: current.package_count(),
    })
}

/// Regenerate `simple/{name}/` and `pypi/{name}/` for every changed name
fn write_package_dirs(
    current: &Snapshot,
    diff: &RepoDiff<'_>,
    config: &Config,
    generated: Option<&str>,
) -> Result<usize> {
    let out = config.output_dir.as_path();
    let mut names_written = 0;

    for group in current.groups() {
        if !diff.is_changed(group.name()) {
            continue;
        }
        debug!("regenerating {}", group.name());

        let simple_dir = out.join("simple").join(group.name());
        fs::create_dir_all(&simple_dir)?;
        atomic_write(
            &simple_dir.join("index.html"),
            &html::render_package_detail(group, config, generated),
        )?;

        let pypi_dir = out.join("pypi").join(group.name());
        fs::create_dir_all(&pypi_dir)?;
        let document = index::package_json(group.files(), &config.packages_url);
        atomic_write(&pypi_dir.join("json"), &serde_json::to_string(&document)?)?;

        if config.per_release_json {
            for (version, files) in index::releases(group.files()) {
                let version_dir = pypi_dir.join(version);
                fs::create_dir_all(&version_dir)?;
                let release_files: Vec<_> = files.into_iter().cloned().collect();
                let document = index::package_json(&release_files, &config.packages_url);
                atomic_write(&version_dir.join("json"), &serde_json::to_string(&document)?)?;
            }
        }

        names_written += 1;
    }

    Ok(names_written)
}

/// Write `packages.json`: one `input_json` record per line, in package
/// order, ready to be fed back as the next build's previous package list
fn write_inventory(current: &Snapshot, out: &Path) -> Result<()> {
    let mut contents = String::new();
    for package in current.packages() {
        contents.push_str(&serde_json::to_string(&package.input_json())?);
        contents.push('\n');
    }
    atomic_write(&out.join("packages.json"), &contents)
}

fn write_changelog(diff: &RepoDiff<'_>, config: &Config, generated: Option<&str>) -> Result<()> {
    let changelog_dir = config.output_dir.join("changelog");
    fs::create_dir_all(&changelog_dir)?;

    let entries = diff.changelog();
    let pages: Vec<&[&crate::package::Package]> = if entries.is_empty() {
        vec![&[]]
    } else {
        entries.chunks(CHANGELOG_PAGE_SIZE).collect()
    };
    let total_pages = pages.len();
    for (index, chunk) in pages.into_iter().enumerate() {
        let page = index + 1;
        atomic_write(
            &changelog_dir.join(format!("page{page}.html")),
            &html::render_changelog_page(chunk, page, total_pages, config, generated),
        )?;
    }
    Ok(())
}
