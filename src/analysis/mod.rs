//! Syntax-tree analysis of C++ headers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ Header Files    │────▶│ TreeProvider │────▶│ SyntaxNode    │
//! └─────────────────┘     │ (tree-sitter)│     │ tree          │
//!         ▲               └──────────────┘     └───────────────┘
//!         │                                            │
//!         │                                            ▼
//! ┌──────────────┐        ┌──────────────┐     ┌───────────────┐
//! │ Scanner      │◀───────│ FileMetrics  │◀────│ Classifier +  │
//! │ (per file)   │        │ (regions)    │     │ Extractor     │
//! └──────────────┘        └──────────────┘     └───────────────┘
//! ```
//!
//! The classifier is a pure function of node kind and "inside a type body"
//! context. The extractor walks each tree once, and the scanner isolates
//! failures per file.

mod classify;
mod extract;
mod facts;
mod scan;

pub use classify::{
    classify, enters_type_body, is_implementation_block, Classification, TypeKind,
};
pub use extract::{count_lines, events, extract, Event, ExtractError};
pub use facts::{FileMetrics, HighlightRegions, Region, RegionKind};
pub use scan::{FileError, ScanError, ScanOutcome, Scanner};
