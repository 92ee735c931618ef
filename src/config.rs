// src/config.rs

//! Build configuration consumed by the repository writer

use std::path::PathBuf;

/// Settings for one index build
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the generated output tree
    pub output_dir: PathBuf,
    /// Base URL where the distribution files themselves live
    pub packages_url: String,
    /// Title shown on the landing page
    pub title: String,
    /// Optional logo URL for the landing page
    pub logo: Option<String>,
    /// Logo width in pixels
    pub logo_width: Option<u32>,
    /// Stamp generated pages with the build time
    pub generate_timestamp: bool,
    /// Emit the per-release `pypi/{name}/{version}/json` documents
    pub per_release_json: bool,
}

impl Config {
    /// Configuration with default presentation settings
    pub fn new(output_dir: impl Into<PathBuf>, packages_url: impl Into<String>) -> Self {
        Config {
            output_dir: output_dir.into(),
            packages_url: packages_url.into(),
            title: "My Private PyPI".to_string(),
            logo: None,
            logo_width: None,
            generate_timestamp: true,
            per_release_json: true,
        }
    }
}
