// src/diff.rs

//! Diff computation between two repository snapshots
//!
//! A partial rebuild compares the previous package list against the
//! current one and regenerates only the affected portions of the output
//! tree. The diff decides three things: which name directories need
//! regenerating, whether the set of names itself changed (which is the
//! only thing that invalidates the simple index listing), and the order
//! of the changelog.
//!
//! Names that disappeared from the current snapshot are deliberately not
//! touched: a partial rebuild only adds or refreshes directories, and
//! pruning stale output is out of scope.

use crate::index::Snapshot;
use crate::package::Package;
use std::collections::BTreeSet;

/// What a rebuild has to regenerate
#[derive(Debug)]
pub struct RepoDiff<'a> {
    /// Names whose file set or metadata changed (all names on a full build)
    changed_names: BTreeSet<String>,
    /// Whether the set of package names differs from the previous snapshot
    names_changed: bool,
    /// Every current file, newest upload first
    changelog: Vec<&'a Package>,
}

impl<'a> RepoDiff<'a> {
    /// Whether anything needs to be written at all
    pub fn has_changes(&self) -> bool {
        !self.changed_names.is_empty()
    }

    pub fn is_changed(&self, name: &str) -> bool {
        self.changed_names.contains(name)
    }

    pub fn changed_names(&self) -> impl Iterator<Item = &str> {
        self.changed_names.iter().map(String::as_str)
    }

    pub fn changed_count(&self) -> usize {
        self.changed_names.len()
    }

    /// True when the simple index listing must be regenerated
    pub fn names_changed(&self) -> bool {
        self.names_changed
    }

    /// All current files ordered by upload timestamp descending, ties
    /// broken by the package ordering ascending
    pub fn changelog(&self) -> &[&'a Package] {
        &self.changelog
    }
}

/// Compare two snapshots
///
/// With no previous snapshot this is a full build: every name counts as
/// changed. A name counts as changed when it is new or when any field of
/// any of its files differs (a bare timestamp change on an existing
/// filename is enough).
pub fn compute_diff<'a>(previous: Option<&Snapshot>, current: &'a Snapshot) -> RepoDiff<'a> {
    let (changed_names, names_changed) = match previous {
        None => (
            current.groups().iter().map(|g| g.name().to_string()).collect(),
            true,
        ),
        Some(previous) => {
            let mut changed = BTreeSet::new();
            for group in current.groups() {
                match previous.get(group.name()) {
                    Some(previous_files) if previous_files == group.files() => {}
                    _ => {
                        changed.insert(group.name().to_string());
                    }
                }
            }
            let names_changed = current.len() != previous.len()
                || current.groups().iter().any(|g| !previous.contains(g.name()));
            (changed, names_changed)
        }
    };

    let mut changelog: Vec<&Package> = current.packages().collect();
    changelog.sort_by(|a, b| {
        b.upload_timestamp()
            .unwrap_or(0)
            .cmp(&a.upload_timestamp().unwrap_or(0))
            .then_with(|| a.cmp(b))
    });

    RepoDiff {
        changed_names,
        names_changed,
        changelog,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::{Package, PackageRecord};

    fn pkg(filename: &str, timestamp: i64) -> Package {
        Package::from_record(PackageRecord {
            upload_timestamp: Some(timestamp),
            ..PackageRecord::new(filename)
        })
        .unwrap()
    }

    fn snapshot(packages: Vec<Package>) -> Snapshot {
        Snapshot::from_packages(packages)
    }

    #[test]
    fn test_full_build_marks_everything_changed() {
        let current = snapshot(vec![pkg("a-0.0.1.tar.gz", 1), pkg("b-0.0.1.tar.gz", 1)]);
        let diff = compute_diff(None, &current);
        assert!(diff.has_changes());
        assert!(diff.names_changed());
        assert_eq!(diff.changed_names().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_identical_snapshots_are_a_noop() {
        let previous = snapshot(vec![pkg("a-0.0.1.tar.gz", 1), pkg("b-0.0.1.tar.gz", 2)]);
        let current = previous.clone();
        let diff = compute_diff(Some(&previous), &current);
        assert!(!diff.has_changes());
        assert!(!diff.names_changed());
    }

    #[test]
    fn test_metadata_change_marks_name_changed() {
        let previous = snapshot(vec![pkg("a-0.0.1.tar.gz", 1), pkg("b-0.0.1.tar.gz", 1)]);
        let current = snapshot(vec![pkg("a-0.0.1.tar.gz", 1), pkg("b-0.0.1.tar.gz", 999)]);
        let diff = compute_diff(Some(&previous), &current);
        assert_eq!(diff.changed_names().collect::<Vec<_>>(), vec!["b"]);
        // Same filenames on both sides: the simple index listing is stale-proof
        assert!(!diff.names_changed());
    }

    #[test]
    fn test_new_version_changes_name_but_not_name_set() {
        let previous = snapshot(vec![pkg("a-0.0.1.tar.gz", 1), pkg("b-0.0.1.tar.gz", 1)]);
        let current = snapshot(vec![
            pkg("a-0.0.1.tar.gz", 1),
            pkg("b-0.0.1.tar.gz", 1),
            pkg("b-0.0.2.tar.gz", 2),
        ]);
        let diff = compute_diff(Some(&previous), &current);
        assert_eq!(diff.changed_names().collect::<Vec<_>>(), vec!["b"]);
        assert!(!diff.names_changed());
    }

    #[test]
    fn test_new_package_changes_name_set() {
        let previous = snapshot(vec![pkg("a-0.0.1.tar.gz", 1)]);
        let current = snapshot(vec![pkg("a-0.0.1.tar.gz", 1), pkg("d-0.0.1.tar.gz", 1)]);
        let diff = compute_diff(Some(&previous), &current);
        assert_eq!(diff.changed_names().collect::<Vec<_>>(), vec!["d"]);
        assert!(diff.names_changed());
    }

    #[test]
    fn test_removed_package_is_left_alone() {
        let previous = snapshot(vec![pkg("a-0.0.1.tar.gz", 1), pkg("b-0.0.1.tar.gz", 1)]);
        let current = snapshot(vec![pkg("a-0.0.1.tar.gz", 1)]);
        let diff = compute_diff(Some(&previous), &current);
        // Nothing to regenerate, even though the name set shrank
        assert!(!diff.has_changes());
        assert!(diff.names_changed());
    }

    #[test]
    fn test_changelog_ordering() {
        // The scenario from the partial-rebuild fixture: b gains files at
        // timestamp 3, c's second file moves to 999, d is new.
        let current = snapshot(vec![
            pkg("a-0.0.1.tar.gz", 1),
            pkg("a-0.0.2.tar.gz", 1),
            pkg("b-0.0.1.tar.gz", 1),
            pkg("b-0.0.2.tar.gz", 2),
            pkg("b-0.0.3.tar.gz", 3),
            pkg("b-0.0.3-py39-none-any.whl", 3),
            pkg("b-0.0.3-py310-none-any.whl", 3),
            pkg("c-0.0.1.tar.gz", 1),
            pkg("c-0.0.2.tar.gz", 999),
            pkg("d-0.0.1.tar.gz", 1),
        ]);
        let diff = compute_diff(None, &current);
        let filenames: Vec<&str> = diff.changelog().iter().map(|p| p.filename()).collect();
        assert_eq!(
            filenames,
            vec![
                "c-0.0.2.tar.gz",
                "b-0.0.3-py39-none-any.whl",
                "b-0.0.3-py310-none-any.whl",
                "b-0.0.3.tar.gz",
                "b-0.0.2.tar.gz",
                "a-0.0.1.tar.gz",
                "a-0.0.2.tar.gz",
                "b-0.0.1.tar.gz",
                "c-0.0.1.tar.gz",
                "d-0.0.1.tar.gz",
            ]
        );
    }

    #[test]
    fn test_changelog_missing_timestamp_sorts_last() {
        let current = snapshot(vec![
            Package::create("a-0.0.1.tar.gz").unwrap(),
            pkg("b-0.0.1.tar.gz", 5),
        ]);
        let diff = compute_diff(None, &current);
        let filenames: Vec<&str> = diff.changelog().iter().map(|p| p.filename()).collect();
        assert_eq!(filenames, vec!["b-0.0.1.tar.gz", "a-0.0.1.tar.gz"]);
    }
}
