//! Leaderboard and snapshot construction.
//!
//! Both are built once, at the end of a run, from the complete set of
//! per-file metrics.

use serde::{Deserialize, Serialize};

use crate::analysis::FileMetrics;

/// Default number of entries per leaderboard.
pub const DEFAULT_TOP_N: usize = 10;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Four rankings of the analyzed headers plus run metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardReport {
    pub most_lines_of_code: Vec<FileMetrics>,
    pub most_implementation_lines: Vec<FileMetrics>,
    pub most_methods: Vec<FileMetrics>,
    pub most_types: Vec<FileMetrics>,
    pub generated_at: String,
    pub total_files_analyzed: usize,
}

/// Build the leaderboards, stamped with the current local time.
pub fn build(metrics: &[FileMetrics], top_n: usize) -> LeaderboardReport {
    let generated_at = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
    build_at(metrics, top_n, generated_at)
}

/// Build the leaderboards with an explicit timestamp.
pub fn build_at(metrics: &[FileMetrics], top_n: usize, generated_at: String) -> LeaderboardReport {
    LeaderboardReport {
        most_lines_of_code: top_by(metrics.iter(), top_n, |m| m.num_lines),
        most_implementation_lines: top_by(
            metrics.iter().filter(|m| m.implementation_bearing),
            top_n,
            |m| m.implementation_lines,
        ),
        most_methods: top_by(metrics.iter(), top_n, |m| m.num_methods),
        most_types: top_by(metrics.iter(), top_n, |m| m.num_types),
        generated_at,
        total_files_analyzed: metrics.len(),
    }
}

/// Stable descending sort on `key`, truncated to `n`.
///
/// Equal keys keep their input order.
fn top_by<'a, I, F>(metrics: I, n: usize, key: F) -> Vec<FileMetrics>
where
    I: Iterator<Item = &'a FileMetrics>,
    F: Fn(&FileMetrics) -> usize,
{
    let mut ranked: Vec<&FileMetrics> = metrics.collect();
    ranked.sort_by(|a, b| key(b).cmp(&key(a)));
    ranked.into_iter().take(n).cloned().collect()
}

/// Dated totals over a whole run, appended to a history file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub date: String,
    pub num_files: usize,
    pub num_types: usize,
    pub num_methods: usize,
    pub num_lines: usize,
}

impl Snapshot {
    /// Summarize metrics, dated today in local time.
    pub fn from_metrics(metrics: &[FileMetrics]) -> Self {
        let date = chrono::Local::now().format(DATE_FORMAT).to_string();
        Self::from_metrics_at(metrics, date)
    }

    pub fn from_metrics_at(metrics: &[FileMetrics], date: String) -> Self {
        Self {
            date,
            num_files: metrics.len(),
            num_types: metrics.iter().map(|m| m.num_types).sum(),
            num_methods: metrics.iter().map(|m| m.num_methods).sum(),
            num_lines: metrics.iter().map(|m| m.num_lines).sum(),
        }
    }
}
