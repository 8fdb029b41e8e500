//! Headerboard - leaderboards for C++ headers.
//!
//! Headerboard walks a directory of C++ headers, parses each one with
//! tree-sitter, and ranks files by lines of code, inline implementation
//! volume, declared members and declared types.
//!
//! # Architecture
//!
//! - `parser`: Tree providers turning source text into owned syntax trees
//! - `analysis`: Node classification, per-file extraction and scanning
//! - `leaderboard`: Rankings and snapshot totals over all files
//! - `report`: JSON artifacts and terminal summary
//! - `config`: Optional YAML configuration
//!
//! # Adding a New Grammar
//!
//! See `src/parser/languages/`. Map the grammar's node tags onto
//! `NodeKind` and register the provider for its extensions in
//! `languages/mod.rs`.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod leaderboard;
pub mod parser;
pub mod report;

pub use analysis::{
    classify, extract, Classification, FileMetrics, Region, RegionKind, ScanError, ScanOutcome,
    Scanner,
};
pub use config::Config;
pub use leaderboard::{LeaderboardReport, Snapshot};
pub use parser::{for_extension, NodeKind, Span, SyntaxNode, TreeProvider};

