//! Corpus scanning: discover headers under a root and extract metrics for each.
//!
//! A bad file never aborts the run. Its failure is logged with the
//! offending path and the file is left out of the results.

use std::fs;
use std::path::{Path, PathBuf};

use globset::GlobSet;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::parser;

use super::extract::{extract, ExtractError};
use super::facts::FileMetrics;

/// Errors that abort a scan before any file is analyzed.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("no syntax tree provider available for .{extension} files")]
    Startup { extension: String },
    #[error("syntax tree provider for .{extension} files is unusable: {message}")]
    ProviderUnusable { extension: String, message: String },
    #[error("directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ScanError {
    /// Whether this error means the parsing capability itself is missing.
    pub fn is_startup(&self) -> bool {
        matches!(self, ScanError::Startup { .. } | ScanError::ProviderUnusable { .. })
    }
}

/// Failure to analyze a single file.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
    #[error("failed to attribute lines in {}: {source}", .path.display())]
    Attribution {
        path: PathBuf,
        #[source]
        source: ExtractError,
    },
}

impl FileError {
    /// The file that failed.
    pub fn path(&self) -> &Path {
        match self {
            FileError::Io { path, .. }
            | FileError::Parse { path, .. }
            | FileError::Attribution { path, .. } => path,
        }
    }
}

/// Result of scanning a directory.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Metrics for every file that was analyzed, in scan order.
    pub metrics: Vec<FileMetrics>,
    /// Files that were skipped, in scan order.
    pub failures: Vec<FileError>,
}

impl ScanOutcome {
    /// Number of candidate files seen.
    pub fn files_seen(&self) -> usize {
        self.metrics.len() + self.failures.len()
    }
}

/// Scans a directory tree of headers.
pub struct Scanner {
    config: Config,
    excluded: GlobSet,
    show_progress: bool,
}

impl Scanner {
    /// Create a new scanner.
    pub fn new(config: Config) -> Result<Self, ScanError> {
        let excluded = config
            .excluded_matcher()
            .map_err(|e| ScanError::Config(e.to_string()))?;
        Ok(Self {
            config,
            excluded,
            show_progress: false,
        })
    }

    /// Set whether to draw a progress bar on stderr.
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Check that every header extension has a working provider.
    fn check_providers(&self) -> Result<(), ScanError> {
        for ext in self.config.header_extensions() {
            let provider = parser::for_extension(&format!(".{}", ext)).ok_or_else(|| {
                ScanError::Startup {
                    extension: ext.clone(),
                }
            })?;
            provider
                .probe()
                .map_err(|e| ScanError::ProviderUnusable {
                    extension: ext.clone(),
                    message: format!("{:#}", e),
                })?;
        }
        Ok(())
    }

    /// Collect header files under `root`, depth-first in file-name order.
    pub fn discover(&self, root: &Path) -> Result<Vec<PathBuf>, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::DirectoryNotFound(root.to_path_buf()));
        }

        let include_hidden = self.config.include_hidden();
        let mut files = Vec::new();

        let walker = WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                // Skip hidden directories
                if e.depth() > 0 && e.file_type().is_dir() && !include_hidden {
                    let name = e.file_name().to_string_lossy();
                    if name.starts_with('.') {
                        return false;
                    }
                }
                true
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if !self.config.is_header(path) {
                continue;
            }
            let rel = path.strip_prefix(root).unwrap_or(path);
            if self.excluded.is_match(rel) {
                debug!(file = %rel.display(), "excluded by configuration");
                continue;
            }
            files.push(path.to_path_buf());
        }

        Ok(files)
    }

    /// Analyze every header under `root`.
    pub fn scan(&self, root: &Path) -> Result<ScanOutcome, ScanError> {
        self.check_providers()?;
        let files = self.discover(root)?;
        info!(root = %root.display(), files = files.len(), "found header files to analyze");

        let bar = self.progress_bar(files.len());
        let analyze = |path: &PathBuf| {
            let result = self.analyze_file(root, path);
            if let Err(e) = &result {
                bar.suspend(|| warn!(file = %e.path().display(), error = %e, "skipping file"));
            }
            bar.inc(1);
            result
        };

        let results: Vec<Result<FileMetrics, FileError>> = if self.config.parallel() {
            files.par_iter().map(analyze).collect()
        } else {
            files.iter().map(analyze).collect()
        };
        bar.finish_and_clear();

        let mut outcome = ScanOutcome::default();
        for result in results {
            match result {
                Ok(metrics) => outcome.metrics.push(metrics),
                Err(e) => outcome.failures.push(e),
            }
        }

        info!(
            analyzed = outcome.metrics.len(),
            failed = outcome.failures.len(),
            "scan complete"
        );
        Ok(outcome)
    }

    /// Read, parse and extract a single file.
    ///
    /// The recorded path is relative to `root`.
    pub fn analyze_file(&self, root: &Path, path: &Path) -> Result<FileMetrics, FileError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let provider =
            parser::for_extension(&format!(".{}", ext)).ok_or_else(|| FileError::Parse {
                path: path.to_path_buf(),
                message: format!("no provider registered for .{}", ext),
            })?;

        let bytes = fs::read(path).map_err(|source| FileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let source = String::from_utf8_lossy(&bytes);

        let tree = provider
            .parse(source.as_bytes())
            .map_err(|e| FileError::Parse {
                path: path.to_path_buf(),
                message: format!("{:#}", e),
            })?;

        let rel_path = path
            .strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");

        debug!(file = %rel_path, nodes = tree.node_count(), "extracting metrics");
        extract(
            &rel_path,
            &source,
            &tree,
            self.config.is_implementation_bearing(path),
        )
        .map_err(|source| FileError::Attribution {
            path: path.to_path_buf(),
            source,
        })
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len as u64);
        let style = ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} headers {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        bar
    }
}
