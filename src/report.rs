//! Output for headerboard results.
//!
//! Supports two artifacts:
//! - Leaderboard: the full ranked report, overwriting the output file
//! - Snapshot: a totals record appended to a JSON history array
//!
//! plus a short colored summary on stdout.

use colored::*;
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::analysis::FileMetrics;
use crate::leaderboard::{LeaderboardReport, Snapshot};

// =============================================================================
// JSON artifacts
// =============================================================================

/// Write the leaderboard report, replacing any previous contents.
pub fn write_report(path: &Path, report: &LeaderboardReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)
        .map_err(|e| anyhow::anyhow!("writing report to {}: {}", path.display(), e))?;
    Ok(())
}

/// Append a snapshot to the history array stored at `path`.
///
/// A missing or unreadable history starts a new one. Existing entries are
/// kept as they are, whatever their shape. Returns the history length.
pub fn append_snapshot(path: &Path, snapshot: &Snapshot) -> anyhow::Result<usize> {
    let mut history = read_history(path);
    history.push(serde_json::to_value(snapshot)?);

    let json = to_string_indented(&history)?;
    fs::write(path, json)
        .map_err(|e| anyhow::anyhow!("writing snapshot history to {}: {}", path.display(), e))?;
    Ok(history.len())
}

fn read_history(path: &Path) -> Vec<serde_json::Value> {
    let Ok(content) = fs::read_to_string(path) else {
        return Vec::new();
    };
    match serde_json::from_str::<serde_json::Value>(&content) {
        Ok(serde_json::Value::Array(entries)) => entries,
        Ok(_) | Err(_) => {
            tracing::warn!(file = %path.display(), "existing history is not a JSON array, starting a new one");
            Vec::new()
        }
    }
}

/// Pretty JSON with four-space indentation, as the history file has always used.
fn to_string_indented<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8(buf)?)
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Print a human-readable summary of the leaderboards.
pub fn write_pretty(input: &str, output: &str, report: &LeaderboardReport, failed: usize) {
    write_header(input);

    print!("  {}", "Analyzed: ".dimmed());
    print!("{} files", report.total_files_analyzed);
    if failed > 0 {
        print!("  {}", format!("({} skipped)", failed).yellow());
    }
    println!();
    println!();

    write_board("Most lines of code", &report.most_lines_of_code, |m| m.num_lines);
    write_board("Most implementation lines", &report.most_implementation_lines, |m| {
        m.implementation_lines
    });
    write_board("Most methods", &report.most_methods, |m| m.num_methods);
    write_board("Most types", &report.most_types, |m| m.num_types);

    print!("  {}", "Leaderboard data saved to ".dimmed());
    println!("{}", output.blue());
    println!();
}

/// Print a human-readable summary of a snapshot.
pub fn write_snapshot_pretty(input: &str, output: &str, snapshot: &Snapshot, entries: usize) {
    write_header(input);

    println!("  {}", snapshot.date.bold());
    println!("    {:<10} {:>8}", "files", snapshot.num_files);
    println!("    {:<10} {:>8}", "types", snapshot.num_types);
    println!("    {:<10} {:>8}", "methods", snapshot.num_methods);
    println!("    {:<10} {:>8}", "lines", snapshot.num_lines);
    println!();

    print!("  {}", "Snapshot appended to ".dimmed());
    print!("{}", output.blue());
    println!("{}", format!(" ({} entries)", entries).dimmed());
    println!();
}

fn write_header(input: &str) {
    println!();
    print!("  ");
    print!("{}", "headerboard".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();
    print!("  {}", "Scanning: ".dimmed());
    println!("{}", input);
}

fn write_board<F>(title: &str, entries: &[FileMetrics], value: F)
where
    F: Fn(&FileMetrics) -> usize,
{
    println!("  {}", title.bold());
    if entries.is_empty() {
        println!("    {}", "(no files)".dimmed());
    }
    for (rank, m) in entries.iter().enumerate() {
        println!("    {:>2}. {:>7}  {}", rank + 1, value(m), m.path.blue());
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn snapshot(date: &str) -> Snapshot {
        Snapshot {
            date: date.to_string(),
            num_files: 2,
            num_types: 3,
            num_methods: 4,
            num_lines: 50,
        }
    }

    #[test]
    fn test_append_snapshot_preserves_history() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("api_metrics.json");
        fs::write(&path, r#"[{"date": "2023-12-31", "legacy": true}]"#).unwrap();

        let len = append_snapshot(&path, &snapshot("2024-01-01")).unwrap();
        assert_eq!(len, 2);

        let history: Vec<serde_json::Value> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(history[0]["legacy"], true);
        assert_eq!(history[1]["date"], "2024-01-01");
        assert_eq!(history[1]["num_lines"], 50);
    }

    #[test]
    fn test_append_snapshot_starts_fresh() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("new.json");
        assert_eq!(append_snapshot(&missing, &snapshot("2024-01-01")).unwrap(), 1);

        let corrupt = temp.path().join("corrupt.json");
        fs::write(&corrupt, "{not json").unwrap();
        assert_eq!(append_snapshot(&corrupt, &snapshot("2024-01-01")).unwrap(), 1);

        let object = temp.path().join("object.json");
        fs::write(&object, r#"{"date": "x"}"#).unwrap();
        assert_eq!(append_snapshot(&object, &snapshot("2024-01-01")).unwrap(), 1);
    }

    #[test]
    fn test_history_uses_four_space_indent() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("h.json");
        append_snapshot(&path, &snapshot("2024-01-01")).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\n    {"));
    }

    #[test]
    fn test_write_report_overwrites() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("leaderboard.json");
        fs::write(&path, "old contents that are longer than the report will be ......").unwrap();

        let report = crate::leaderboard::build_at(&[], 10, "2024-01-01 00:00:00".to_string());
        write_report(&path, &report).unwrap();

        let parsed: LeaderboardReport =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, report);
    }
}
