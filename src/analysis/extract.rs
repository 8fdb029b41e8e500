//! File metrics extraction.
//!
//! A single pre-order walk emits one event per classified construct.
//! Counting and implementation-line accounting are both reductions over
//! that event stream, so they can never see different trees.

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::parser::{Span, SyntaxNode};

use super::classify::{classify, enters_type_body, is_implementation_block, Classification};
use super::facts::{FileMetrics, HighlightRegions, Region, RegionKind};

/// Errors raised while attributing nodes to lines.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("{kind} node starts at line {start_line} but ends at line {end_line}")]
    ParseAttribution {
        kind: String,
        start_line: usize,
        end_line: usize,
    },
}

/// A classified construct found during the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: RegionKind,
    pub span: Option<Span>,
}

/// State threaded by value down the walk.
#[derive(Debug, Clone, Copy, Default)]
struct Context {
    /// Set on entering any type body, never cleared below it.
    inside_type_body: bool,
    /// Set below the outermost implementation block, so nested blocks
    /// are not counted twice.
    inside_implementation: bool,
}

/// Walk a tree and collect classification events in pre-order.
pub fn events(tree: &SyntaxNode) -> Result<Vec<Event>, ExtractError> {
    let mut out = Vec::new();
    walk(tree, Context::default(), &mut out)?;
    Ok(out)
}

fn walk(node: &SyntaxNode, ctx: Context, out: &mut Vec<Event>) -> Result<(), ExtractError> {
    if let Some(span) = node.span {
        if span.start_line > span.end_line {
            return Err(ExtractError::ParseAttribution {
                kind: node.kind.to_string(),
                start_line: span.start_line,
                end_line: span.end_line,
            });
        }
    }

    let classification = classify(node, ctx.inside_type_body);
    if let Some(c) = classification {
        if c != Classification::ImplementationBlock {
            out.push(Event {
                kind: RegionKind::from_classification(c),
                span: node.span,
            });
        }
    }

    let implementation = is_implementation_block(node);
    if implementation && !ctx.inside_implementation {
        out.push(Event {
            kind: RegionKind::ImplementationBlock,
            span: node.span,
        });
    }

    let child_ctx = Context {
        inside_type_body: enters_type_body(node, ctx.inside_type_body),
        inside_implementation: ctx.inside_implementation || implementation,
    };
    for child in &node.children {
        walk(child, child_ctx, out)?;
    }
    Ok(())
}

/// Physical line count: line breaks plus a non-empty final line.
pub fn count_lines(source: &str) -> usize {
    source.lines().count()
}

/// Extract metrics for one file from its parsed tree.
///
/// Implementation volume is measured only when `implementation_bearing`
/// is set; otherwise it is zero and no implementation regions are kept.
pub fn extract(
    path: &str,
    source: &str,
    tree: &SyntaxNode,
    implementation_bearing: bool,
) -> Result<FileMetrics, ExtractError> {
    let mut regions = HighlightRegions::default();
    let mut implementation_lines = 0;

    for event in events(tree)? {
        let Some(span) = event.span else {
            debug!(file = path, kind = %event.kind, "node without position, not attributed");
            continue;
        };
        let region = Region {
            start_line: span.start_line,
            end_line: span.end_line,
            kind: event.kind,
        };

        if event.kind.is_type() {
            regions.types.push(region);
        } else if event.kind.is_method() {
            regions.methods.push(region);
        } else if implementation_bearing {
            implementation_lines += region.line_count();
            regions.implementations.push(region);
        }
    }

    let filename = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string());

    Ok(FileMetrics::new(
        path.to_string(),
        filename,
        count_lines(source),
        implementation_lines,
        regions,
        implementation_bearing,
    ))
}
