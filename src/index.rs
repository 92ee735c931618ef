// src/index.rs

//! Snapshot grouping and the JSON API documents
//!
//! A [`Snapshot`] is the full set of packages known at build time,
//! grouped by normalized name and fully sorted. The builder functions
//! here project a release group into the two JSON shapes the output tree
//! serves: the per-name document at `pypi/{name}/json` and the per-release
//! documents at `pypi/{name}/{version}/json`.

use crate::package::{FileInfo, Package};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// All files sharing one normalized package name, sorted ascending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseGroup {
    name: String,
    files: Vec<Package>,
}

impl ReleaseGroup {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn files(&self) -> &[Package] {
        &self.files
    }

    /// Latest version in the group, if any file carries one
    ///
    /// Files are sorted with versionless entries first, so the last file
    /// holds the maximum version whenever one exists.
    pub fn latest_version(&self) -> Option<&str> {
        self.files.last().and_then(|p| p.version())
    }
}

/// The full ordered package set for one build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    groups: Vec<ReleaseGroup>,
    by_name: HashMap<String, usize>,
}

impl Snapshot {
    /// Group packages by normalized name
    ///
    /// Groups come out ordered by the natural key of the name, and files
    /// within a group by the full package ordering.
    pub fn from_packages(mut packages: Vec<Package>) -> Self {
        packages.sort();

        let mut groups: Vec<ReleaseGroup> = Vec::new();
        for package in packages {
            match groups.last_mut() {
                Some(group) if group.name == package.name() => group.files.push(package),
                _ => groups.push(ReleaseGroup {
                    name: package.name().to_string(),
                    files: vec![package],
                }),
            }
        }

        let by_name = groups
            .iter()
            .enumerate()
            .map(|(i, g)| (g.name.clone(), i))
            .collect();

        Snapshot { groups, by_name }
    }

    /// Release groups in natural name order
    pub fn groups(&self) -> &[ReleaseGroup] {
        &self.groups
    }

    /// Files for one normalized name
    pub fn get(&self, name: &str) -> Option<&[Package]> {
        self.by_name.get(name).map(|&i| self.groups[i].files())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Number of distinct package names
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Every package in global sorted order
    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.groups.iter().flat_map(|g| g.files.iter())
    }

    pub fn package_count(&self) -> usize {
        self.groups.iter().map(|g| g.files.len()).sum()
    }
}

/// `info` block of a JSON API document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectInfo {
    pub name: String,
    pub version: Option<String>,
    pub requires_dist: Option<Vec<String>>,
    pub requires_python: Option<String>,
    pub platform: String,
    pub summary: Option<String>,
}

/// `releases` mapping, serialized newest version first
///
/// A plain map would re-sort keys lexicographically (`10.0` ahead of
/// `2.0`), so the entries keep their own order and serialize manually.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Releases(Vec<(String, Vec<FileInfo>)>);

impl Releases {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FileInfo])> {
        self.0.iter().map(|(v, files)| (v.as_str(), files.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Releases {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (version, files) in &self.0 {
            map.serialize_entry(version, files)?;
        }
        map.end()
    }
}

/// A `pypi/{name}/json`-style document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectDocument {
    pub info: ProjectInfo,
    pub releases: Releases,
    pub urls: Vec<FileInfo>,
}

/// Distinct versions of a group in ascending order, each with its files
///
/// Files without a version are excluded; the writer also uses this to
/// decide which per-release documents exist at all.
pub fn releases(files: &[Package]) -> Vec<(&str, Vec<&Package>)> {
    let mut out: Vec<(&str, Vec<&Package>)> = Vec::new();
    for package in files {
        let Some(version) = package.version() else {
            continue;
        };
        match out.iter_mut().find(|(v, _)| *v == version) {
            Some((_, group)) => group.push(package),
            None => out.push((version, vec![package])),
        }
    }
    out
}

/// Build the JSON API document for one release group
///
/// `files` must be the sorted files of a single name. The `info` block
/// describes the latest release: its version, and the requirements of the
/// first file uploaded for it. Groups where no file has a parseable
/// version still produce a well-formed document with a null version and
/// empty `releases`/`urls`.
pub fn package_json(files: &[Package], base_url: &str) -> ProjectDocument {
    let by_version = releases(files);
    let latest = by_version.last();

    let info = ProjectInfo {
        name: files
            .first()
            .map(|p| p.name().to_string())
            .unwrap_or_default(),
        version: latest.map(|(v, _)| v.to_string()),
        requires_dist: latest
            .and_then(|(_, files)| files[0].requires_dist())
            .map(<[String]>::to_vec),
        requires_python: latest
            .and_then(|(_, files)| files[0].requires_python())
            .map(str::to_string),
        platform: "UNKNOWN".to_string(),
        summary: None,
    };

    let urls = latest
        .map(|(_, files)| files.iter().map(|p| p.json_info(base_url)).collect())
        .unwrap_or_default();

    // Newest version first
    let release_entries = by_version
        .iter()
        .rev()
        .map(|(version, files)| {
            (
                version.to_string(),
                files.iter().map(|p| p.json_info(base_url)).collect(),
            )
        })
        .collect();

    ProjectDocument {
        info,
        releases: Releases(release_entries),
        urls,
    }
}
