// src/package/filename.rs

//! Distribution filename parsing
//!
//! Extracts a package name (and, when the filename shape allows it, a
//! version) from a distribution filename. Wheels carry a well-defined
//! `name-version-pytag-abitag-platform.whl` structure; everything else
//! (sdists, eggs, legacy installers) is best effort: the important thing
//! is to recover the name, and versions are parsed only when a reliable
//! boundary exists.
//!
//! The parser deliberately accepts version strings that are not valid
//! PEP 440 (e.g. `1.2.3.4.post5.post2`); it locates the name/version
//! boundary and nothing more.

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Dot-separated Python tag component, e.g. `py2`, `cp38`, `py310`
static PYTHON_TAG_COMPONENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+[0-9]+$").expect("static regex"));

/// Suffixes recognized for non-wheel distributions, longest first
const ARCHIVE_SUFFIXES: &[&str] = &[
    ".tar.bz2", ".tar.gz", ".tar.xz", ".tgz", ".tar", ".zip", ".egg", ".exe",
];

/// Parse a distribution filename into `(name, version)`
///
/// The name is returned exactly as it appears in the filename; callers
/// that need to group packages should normalize it (see
/// [`normalize_package_name`](super::normalize_package_name)).
///
/// Fails with [`Error::InvalidFilename`] when no name can be extracted:
/// empty input, an unrecognized suffix, an empty name segment, or a wheel
/// whose trailing tags do not form a valid tag triple.
pub fn parse_filename(filename: &str) -> Result<(String, Option<String>)> {
    if let Some(stem) = filename.strip_suffix(".whl") {
        return parse_wheel(filename, stem);
    }
    parse_archive(filename)
}

/// Wheel filenames are `name-version-pytag-abitag-platform.whl`
fn parse_wheel(filename: &str, stem: &str) -> Result<(String, Option<String>)> {
    let parts: Vec<&str> = stem.split('-').collect();
    if parts.len() != 5 {
        return Err(Error::invalid_filename(
            filename,
            format!("expected 5 dash-separated wheel fields, found {}", parts.len()),
        ));
    }
    let (name, version) = (parts[0], parts[1]);
    if name.is_empty() {
        return Err(Error::invalid_filename(filename, "empty package name"));
    }
    if version.is_empty() {
        return Err(Error::invalid_filename(filename, "empty version"));
    }
    if !is_python_tag(parts[2]) {
        return Err(Error::invalid_filename(
            filename,
            format!("'{}' is not a valid python tag", parts[2]),
        ));
    }
    Ok((name.to_string(), Some(version.to_string())))
}

/// A Python tag is one or more dot-separated `<letters><digits>`
/// components: `py2`, `py2.py3`, `cp38`, `py310`.
fn is_python_tag(tag: &str) -> bool {
    !tag.is_empty() && tag.split('.').all(|c| PYTHON_TAG_COMPONENT.is_match(c))
}

/// Everything that is not a wheel: strip a recognized archive suffix, then
/// scan dash-separated segments from the right for a version boundary.
///
/// A segment starts a version only if it begins with a digit *and*
/// contains a dot; `ocflib-3-4.tar.gz` stays versionless while
/// `flup-123-1.0.3.dev-20110405.tar.gz` splits at `1.0.3.dev`. The
/// version runs from the boundary to the end of the stem, which keeps
/// trailing platform or python markers attached (`mesos.cli-0.1.3-py2.7`
/// has version `0.1.3-py2.7`) -- a degraded but accepted parse.
fn parse_archive(filename: &str) -> Result<(String, Option<String>)> {
    let stem = ARCHIVE_SUFFIXES
        .iter()
        .find_map(|suffix| filename.strip_suffix(suffix))
        .ok_or_else(|| Error::invalid_filename(filename, "unrecognized distribution suffix"))?;

    if stem.is_empty() {
        return Err(Error::invalid_filename(filename, "empty package name"));
    }

    let segments: Vec<&str> = stem.split('-').collect();
    for i in (1..segments.len()).rev() {
        if looks_like_version(segments[i]) {
            let name = segments[..i].join("-");
            if name.is_empty() {
                return Err(Error::invalid_filename(filename, "empty package name"));
            }
            return Ok((name, Some(segments[i..].join("-"))));
        }
    }

    if segments[0].is_empty() {
        return Err(Error::invalid_filename(filename, "empty package name"));
    }
    Ok((stem.to_string(), None))
}

fn looks_like_version(segment: &str) -> bool {
    segment.starts_with(|c: char| c.is_ascii_digit()) && segment.contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(filename: &str) -> (String, Option<String>) {
        parse_filename(filename).unwrap()
    }

    #[test]
    fn test_parse_wheels() {
        for (filename, name, version) in [
            (
                "dumb_init-1.2.0-py2.py3-none-manylinux1_x86_64.whl",
                "dumb_init",
                "1.2.0",
            ),
            (
                "ocflib-2016.12.10.1.48-py2.py3-none-any.whl",
                "ocflib",
                "2016.12.10.1.48",
            ),
            ("aspy.yaml-0.2.2-py2.py3-none-any.whl", "aspy.yaml", "0.2.2"),
            (
                "numpy-1.11.1rc1-cp27-cp27m-macosx_10_6_intel.macosx_10_9_intel.macosx_10_9_x86_64.macosx_10_10_intel.macosx_10_10_x86_64.whl",
                "numpy",
                "1.11.1rc1",
            ),
            // Not PEP 440, still accepted for backward compatibility
            (
                "somepackage-1.2.3.4.post5.post2-py3-none-any.whl",
                "somepackage",
                "1.2.3.4.post5.post2",
            ),
            ("f-1.0+local-py3-none-any.whl", "f", "1.0+local"),
            ("zpkg-1-cp38-cp38-manylinux_2_28_aarch64.whl", "zpkg", "1"),
        ] {
            assert_eq!(parsed(filename), (name.to_string(), Some(version.to_string())));
        }
    }

    #[test]
    fn test_parse_archives() {
        for (filename, name, version) in [
            ("aspy.yaml-0.2.1.tar.gz", "aspy.yaml", Some("0.2.1")),
            ("numpy-1.11.0rc1.tar.gz", "numpy", Some("1.11.0rc1")),
            ("pandas-0.2beta.tar.gz", "pandas", Some("0.2beta")),
            ("scikit-learn-0.15.1.tar.gz", "scikit-learn", Some("0.15.1")),
            (
                "ocflib-2015.11.23.20.2.tar.gz",
                "ocflib",
                Some("2015.11.23.20.2"),
            ),
            ("mesos.cli-0.1.3-py2.7.egg", "mesos.cli", Some("0.1.3-py2.7")),
            (
                "flup-123-1.0.3.dev-20110405.tar.gz",
                "flup-123",
                Some("1.0.3.dev-20110405"),
            ),
            (
                "package-123-1.3.7+build.11.e0f985a.zip",
                "package-123",
                Some("1.3.7+build.11.e0f985a"),
            ),
            // No reliable version boundary: name-only parses
            ("aspy.yaml.zip", "aspy.yaml", None),
            ("ocflib-3-4.tar.gz", "ocflib-3-4", None),
        ] {
            assert_eq!(
                parsed(filename),
                (name.to_string(), version.map(str::to_string))
            );
        }
    }

    #[test]
    fn test_parse_name_only_legacy_formats() {
        // The version comes out wrong for these legacy shapes; recovering
        // the name is what matters.
        for (filename, name, broken_version) in [
            ("dumb-init-0.1.0.linux-x86_64.tar.gz", "dumb-init", "0.1.0"),
            ("greenlet-0.3.4-py3.1-win-amd64.egg", "greenlet", "0.3.4"),
            ("numpy-1.7.0.win32-py3.1.exe", "numpy", "1.7.0"),
            (
                "surf.sesame2-0.2.1_r291-py2.5.egg",
                "surf.sesame2",
                "0.2.1_r291",
            ),
        ] {
            let (parsed_name, parsed_version) = parsed(filename);
            assert_eq!(parsed_name, name);
            // If one of these starts parsing cleanly, move it up into
            // test_parse_archives.
            assert_ne!(parsed_version.as_deref(), Some(broken_version));
        }
    }

    #[test]
    fn test_parse_invalid() {
        for filename in [
            "",
            "lol",
            "lol-sup",
            "-20160920.193125.zip",
            // 2.7.6 is not a valid python tag
            "playlyfe-0.1.1-2.7.6-none-any.whl",
        ] {
            assert!(parse_filename(filename).is_err(), "{filename:?} should fail");
        }
    }

    #[test]
    fn test_python_tags() {
        assert!(is_python_tag("py2"));
        assert!(is_python_tag("py2.py3"));
        assert!(is_python_tag("cp38"));
        assert!(is_python_tag("py310"));
        assert!(!is_python_tag("2.7.6"));
        assert!(!is_python_tag("none"));
        assert!(!is_python_tag(""));
    }
}
