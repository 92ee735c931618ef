// src/lib.rs

//! quarry: static PyPI-compatible package index generator
//!
//! Builds a `simple/` + `pypi/` + changelog directory tree from a flat
//! list of distribution filenames, servable by any static file host.
//!
//! # Architecture
//!
//! - Pure core: filename parsing, natural ordering, grouping, and diffing
//!   are side-effect free and run in one synchronous pass
//! - Value types: a `Package` is constructed once from an input record
//!   and never mutated
//! - Skip-and-continue ingestion: a bad record is logged and dropped, the
//!   rest of the build proceeds
//! - Partial rebuilds: given the previous package list, only changed name
//!   directories are regenerated
//! - Atomic output: every file is written to a sibling temp file and
//!   renamed into place

pub mod config;
pub mod diff;
mod error;
pub mod index;
pub mod input;
pub mod natsort;
pub mod package;
pub mod writer;

pub use config::Config;
pub use diff::{compute_diff, RepoDiff};
pub use error::{Error, Result};
pub use index::{package_json, ProjectDocument, ProjectInfo, ReleaseGroup, Snapshot};
pub use input::{ingest, load_package_list, Ingest, ListFormat, RejectedRecord};
pub use natsort::{natural_key, NaturalKey};
pub use package::{
    normalize_package_name, parse_filename, FileHash, FileInfo, Package, PackageRecord,
    PackageType,
};
pub use writer::{atomic_write, build_repo, BuildSummary};
