//! Run configuration for headerboard.
//!
//! Configuration is optional: every field has a default, and a YAML file
//! only needs the fields it changes.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::leaderboard::DEFAULT_TOP_N;

/// Default config file names to search for.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["headerboard.yaml", ".headerboard.yaml"];

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Entries per leaderboard (default: 10)
    #[serde(default)]
    pub top_n: Option<usize>,
    /// Extensions (without dot) of files to analyze (default: h, hpp)
    #[serde(default)]
    pub header_extensions: Option<Vec<String>>,
    /// Extensions whose inline implementation volume is measured (default: hpp)
    #[serde(default)]
    pub implementation_extensions: Option<Vec<String>>,
    /// Glob patterns, relative to the scan root, for paths to skip
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    /// Descend into hidden directories (default: false)
    #[serde(default)]
    pub include_hidden: Option<bool>,
    /// Analyze files in parallel (default: true)
    #[serde(default)]
    pub parallel: Option<bool>,
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Look for a config file in `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    pub fn top_n(&self) -> usize {
        self.top_n.unwrap_or(DEFAULT_TOP_N)
    }

    pub fn header_extensions(&self) -> Vec<String> {
        self.header_extensions
            .clone()
            .unwrap_or_else(|| vec!["h".to_string(), "hpp".to_string()])
    }

    pub fn implementation_extensions(&self) -> Vec<String> {
        self.implementation_extensions
            .clone()
            .unwrap_or_else(|| vec!["hpp".to_string()])
    }

    pub fn include_hidden(&self) -> bool {
        self.include_hidden.unwrap_or(false)
    }

    pub fn parallel(&self) -> bool {
        self.parallel.unwrap_or(true)
    }

    /// Whether a file is analyzed at all, judged by its extension.
    pub fn is_header(&self, path: &Path) -> bool {
        extension_in(path, &self.header_extensions())
    }

    /// Whether a file's inline implementation volume is measured.
    pub fn is_implementation_bearing(&self, path: &Path) -> bool {
        extension_in(path, &self.implementation_extensions())
    }

    /// Compile `excluded_paths` into a matcher.
    pub fn excluded_matcher(&self) -> anyhow::Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.excluded_paths {
            let glob = Glob::new(pattern)
                .map_err(|e| anyhow::anyhow!("invalid excluded_paths pattern {:?}: {}", pattern, e))?;
            builder.add(glob);
        }
        Ok(builder.build()?)
    }
}

fn extension_in(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| extensions.iter().any(|e| e == ext))
        .unwrap_or(false)
}

/// Validate a config, returning an error describing the first problem found.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    if config.top_n() == 0 {
        anyhow::bail!("top_n must be at least 1");
    }

    let headers = config.header_extensions();
    if headers.is_empty() {
        anyhow::bail!("header_extensions must not be empty");
    }

    for ext in headers.iter().chain(config.implementation_extensions().iter()) {
        if ext.is_empty() || ext.starts_with('.') {
            anyhow::bail!("invalid extension {:?}, expected e.g. \"hpp\" without a dot", ext);
        }
    }

    for ext in config.implementation_extensions() {
        if !headers.contains(&ext) {
            anyhow::bail!(
                "implementation extension {:?} is not one of the header extensions",
                ext
            );
        }
    }

    config.excluded_matcher()?;

    Ok(())
}
