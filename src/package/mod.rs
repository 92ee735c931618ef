// src/package/mod.rs

//! The `Package` value type and its serialized views
//!
//! A `Package` is built once from an input record, derives its name,
//! version, type, and sort key at construction, and is never mutated
//! afterwards. Equality is value-based over every field; ordering is
//! `(natural name, natural version, natural normalized filename)` so that
//! multi-digit versions and mixed wheel/sdist artifacts sort the way a
//! human expects.

pub mod filename;

use crate::error::{Error, Result};
use crate::natsort::{natural_key, NaturalKey};
use chrono::DateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

pub use filename::parse_filename;

/// Characters allowed in a distribution filename; anything else (path
/// separators included) is rejected at construction.
static SAFE_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.+-]+$").expect("static regex"));

/// Upload times render the way the JSON API shows them
const UPLOAD_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Normalize a package name for grouping and directory layout
///
/// Lowercases and collapses every run of `-`, `_`, and `.` into a single
/// `-`, so `Fluffy_server` and `fluffy-server` land in the same release
/// group.
pub fn normalize_package_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_separator_run = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            in_separator_run = true;
        } else {
            if in_separator_run {
                out.push('-');
                in_separator_run = false;
            }
            out.extend(c.to_lowercase());
        }
    }
    if in_separator_run {
        out.push('-');
    }
    out
}

/// Distribution kind, derived purely from the filename extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageType {
    BdistWheel,
    BdistEgg,
    Sdist,
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageType::BdistWheel => write!(f, "bdist_wheel"),
            PackageType::BdistEgg => write!(f, "bdist_egg"),
            PackageType::Sdist => write!(f, "sdist"),
        }
    }
}

/// A parsed `algorithm=hexdigest` pair
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FileHash {
    algorithm: String,
    digest: String,
}

impl FileHash {
    /// Parse the `algo=digest` form used by input records
    pub fn parse(s: &str) -> Result<Self> {
        match s.split_once('=') {
            Some((algorithm, digest)) if !algorithm.is_empty() && !digest.is_empty() => {
                Ok(FileHash {
                    algorithm: algorithm.to_string(),
                    digest: digest.to_string(),
                })
            }
            _ => Err(Error::malformed_record(format!(
                "hash '{s}' is not of the form algorithm=digest"
            ))),
        }
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }
}

impl fmt::Display for FileHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.algorithm, self.digest)
    }
}

/// The raw input record shape, round-trippable through `input_json`
///
/// Absent fields stay absent on re-serialization, so a record written by
/// one build can be fed back verbatim as the previous-package list of the
/// next.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_dist: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_python: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_timestamp: Option<i64>,
}

impl PackageRecord {
    /// A record carrying only a filename
    pub fn new(filename: impl Into<String>) -> Self {
        PackageRecord {
            filename: filename.into(),
            ..PackageRecord::default()
        }
    }
}

/// The per-file view exposed by the simple and JSON API documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub filename: String,
    pub url: String,
    pub requires_python: Option<String>,
    pub packagetype: PackageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digests: Option<BTreeMap<String, String>>,
}

/// Precomputed ordering key: `(name, version, normalized filename)`
///
/// The filename component is normalized the same way names are, which is
/// what makes wheels sort ahead of same-version sdists (`-py…` < `.tar…`
/// once separator runs collapse) and keeps `cp38 < cp39 < cp310`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct SortKey {
    name: NaturalKey,
    version: NaturalKey,
    filename: NaturalKey,
}

/// An immutable distribution file plus its optional upload metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    filename: String,
    name: String,
    version: Option<String>,
    hash: Option<FileHash>,
    requires_dist: Option<Vec<String>>,
    requires_python: Option<String>,
    uploaded_by: Option<String>,
    upload_timestamp: Option<i64>,
    sort_key: SortKey,
}

impl Package {
    /// Build a package from an input record
    ///
    /// Validates the filename (non-empty, safe character set, no `..`),
    /// parses name and version out of it, and normalizes the name.
    /// Construction is all-or-nothing: a failure leaves no partial state.
    pub fn from_record(record: PackageRecord) -> Result<Self> {
        let PackageRecord {
            filename,
            hash,
            requires_dist,
            requires_python,
            uploaded_by,
            upload_timestamp,
        } = record;

        if filename.is_empty() {
            return Err(Error::invalid_filename(filename, "empty filename"));
        }
        if !SAFE_FILENAME.is_match(&filename) {
            return Err(Error::invalid_filename(
                filename,
                "unsafe characters or path separators",
            ));
        }
        if filename.contains("..") {
            return Err(Error::invalid_filename(filename, "path traversal"));
        }

        let (raw_name, version) = parse_filename(&filename)?;
        let name = normalize_package_name(&raw_name);
        let hash = hash.map(|h| FileHash::parse(&h)).transpose()?;
        let sort_key = SortKey {
            name: natural_key(&name),
            version: natural_key(version.as_deref().unwrap_or("")),
            filename: natural_key(&normalize_package_name(&filename)),
        };

        Ok(Package {
            filename,
            name,
            version,
            hash,
            requires_dist,
            requires_python,
            uploaded_by,
            upload_timestamp,
            sort_key,
        })
    }

    /// Build a package from a bare filename
    pub fn create(filename: &str) -> Result<Self> {
        Self::from_record(PackageRecord::new(filename))
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Normalized package name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn hash(&self) -> Option<&FileHash> {
        self.hash.as_ref()
    }

    pub fn requires_dist(&self) -> Option<&[String]> {
        self.requires_dist.as_deref()
    }

    pub fn requires_python(&self) -> Option<&str> {
        self.requires_python.as_deref()
    }

    pub fn uploaded_by(&self) -> Option<&str> {
        self.uploaded_by.as_deref()
    }

    pub fn upload_timestamp(&self) -> Option<i64> {
        self.upload_timestamp
    }

    /// Distribution kind from the filename extension
    pub fn package_type(&self) -> PackageType {
        if self.filename.ends_with(".whl") {
            PackageType::BdistWheel
        } else if self.filename.ends_with(".egg") {
            PackageType::BdistEgg
        } else {
            PackageType::Sdist
        }
    }

    /// Download URL under `base_url`, with a `#algo=digest` fragment when
    /// the file has a hash
    pub fn url(&self, base_url: &str) -> String {
        let mut url = format!("{}/{}", base_url.trim_end_matches('/'), self.filename);
        if let Some(hash) = &self.hash {
            url.push('#');
            url.push_str(&hash.to_string());
        }
        url
    }

    /// Upload time rendered for the JSON API, when a timestamp exists
    pub fn upload_time(&self) -> Option<String> {
        self.upload_timestamp
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .map(|dt| dt.format(UPLOAD_TIME_FORMAT).to_string())
    }

    /// The release-file view used by the simple and JSON API documents
    pub fn json_info(&self, base_url: &str) -> FileInfo {
        FileInfo {
            filename: self.filename.clone(),
            url: self.url(base_url),
            requires_python: self.requires_python.clone(),
            packagetype: self.package_type(),
            upload_time: self.upload_time(),
            digests: self.hash.as_ref().map(|h| {
                BTreeMap::from([(h.algorithm.clone(), h.digest.clone())])
            }),
        }
    }

    /// The round-trippable input record
    ///
    /// Law: `Package::from_record(p.input_json()) == p`.
    pub fn input_json(&self) -> PackageRecord {
        PackageRecord {
            filename: self.filename.clone(),
            hash: self.hash.as_ref().map(FileHash::to_string),
            requires_dist: self.requires_dist.clone(),
            requires_python: self.requires_python.clone(),
            uploaded_by: self.uploaded_by.clone(),
            upload_timestamp: self.upload_timestamp,
        }
    }
}

impl Ord for Package {
    fn cmp(&self, other: &Self) -> Ordering {
        // The metadata tail keeps Ord consistent with Eq when two files
        // share a filename but differ in upload metadata.
        self.sort_key
            .cmp(&other.sort_key)
            .then_with(|| self.filename.cmp(&other.filename))
            .then_with(|| self.version.cmp(&other.version))
            .then_with(|| self.upload_timestamp.cmp(&other.upload_timestamp))
            .then_with(|| self.hash.cmp(&other.hash))
            .then_with(|| self.requires_dist.cmp(&other.requires_dist))
            .then_with(|| self.requires_python.cmp(&other.requires_python))
            .then_with(|| self.uploaded_by.cmp(&other.uploaded_by))
    }
}

impl PartialOrd for Package {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
