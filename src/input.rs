// src/input.rs

//! Package list ingestion
//!
//! Two list formats exist: plain (one distribution filename per line) and
//! JSON (one record object per line). Ingestion never aborts on a bad
//! entry: each line either becomes a [`Package`] or a rejection carrying
//! the line number and error, and the caller decides how loudly to
//! complain. A list mixing `..`, absolute paths, and one valid wheel
//! still produces an index for the wheel.

use crate::error::{Error, Result};
use crate::package::{Package, PackageRecord};
use std::fs;
use std::path::Path;

/// Package list file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    /// One filename per line
    Plain,
    /// One JSON record per line
    Json,
}

/// A line that failed to become a package
#[derive(Debug)]
pub struct RejectedRecord {
    /// 1-based line number in the source list
    pub line: usize,
    /// The offending line, verbatim
    pub content: String,
    pub error: Error,
}

/// The outcome of ingesting a package list: everything that parsed, plus
/// everything that did not
#[derive(Debug, Default)]
pub struct Ingest {
    pub packages: Vec<Package>,
    pub rejected: Vec<RejectedRecord>,
}

/// Read and ingest a package list file
pub fn load_package_list(path: &Path, format: ListFormat) -> Result<Ingest> {
    let text = fs::read_to_string(path)?;
    Ok(ingest(text.lines(), format))
}

/// Ingest lines of a package list
///
/// Blank lines are skipped. Everything else is parsed per `format` and
/// either collected as a package or recorded as a rejection.
pub fn ingest<'a>(lines: impl IntoIterator<Item = &'a str>, format: ListFormat) -> Ingest {
    let mut result = Ingest::default();

    for (index, line) in lines.into_iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        match record_from_line(line, format).and_then(Package::from_record) {
            Ok(package) => result.packages.push(package),
            Err(error) => result.rejected.push(RejectedRecord {
                line: index + 1,
                content: line.to_string(),
                error,
            }),
        }
    }

    result
}

fn record_from_line(line: &str, format: ListFormat) -> Result<PackageRecord> {
    match format {
        ListFormat::Plain => Ok(PackageRecord::new(line)),
        ListFormat::Json => serde_json::from_str(line)
            .map_err(|e| Error::malformed_record(format!("bad JSON record: {e}"))),
    }
}
