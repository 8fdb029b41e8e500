//! Tree-sitter based provider implementation.
//!
//! This module provides a generic tree-sitter provider that can be configured
//! for different grammars via a node-kind mapping.

use tree_sitter::{Language, Node, Parser as TsParser};

use super::{NodeKind, Span, SyntaxNode, TreeProvider};

/// Configuration for a tree-sitter grammar.
#[derive(Clone)]
pub struct Config {
    /// The tree-sitter language
    pub language: Language,
    /// Grammar name (e.g., "cpp")
    pub language_name: &'static str,
    /// Maps a grammar node onto the analysis node kinds
    pub node_kind: fn(Node) -> NodeKind,
}

/// Tree-sitter based provider.
pub struct TreeSitterProvider {
    config: Config,
}

impl TreeSitterProvider {
    /// Create a new tree-sitter provider with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Parse source code and return the tree-sitter tree.
    fn parse_tree(&self, source: &[u8]) -> anyhow::Result<tree_sitter::Tree> {
        let mut parser = TsParser::new();
        parser.set_language(&self.config.language)?;
        parser
            .parse(source, None)
            .ok_or_else(|| anyhow::anyhow!("failed to parse {} source", self.config.language_name))
    }

    /// Convert a tree-sitter node into an owned syntax node.
    ///
    /// Only named nodes are kept; punctuation and keywords never carry
    /// structure the analysis needs.
    fn convert(&self, node: Node) -> SyntaxNode {
        let mut out = SyntaxNode::new((self.config.node_kind)(node), Some(span_from_node(node)));
        let mut cursor = node.walk();
        out.children = node
            .named_children(&mut cursor)
            .map(|child| self.convert(child))
            .collect();
        out
    }
}

/// Build a 1-indexed span from a tree-sitter node.
///
/// A node whose end sits at column 0 of a later row ended on the previous
/// line's terminator, so its last line is the previous one.
pub fn span_from_node(node: Node) -> Span {
    let start = node.start_position();
    let end = node.end_position();
    let end_row = if end.column == 0 && end.row > start.row {
        end.row - 1
    } else {
        end.row
    };
    Span {
        start_line: start.row + 1, // tree-sitter is 0-indexed
        start_col: start.column + 1,
        end_line: end_row + 1,
        end_col: end.column + 1,
    }
}

impl TreeProvider for TreeSitterProvider {
    fn parse(&self, source: &[u8]) -> anyhow::Result<SyntaxNode> {
        let tree = self.parse_tree(source)?;
        Ok(self.convert(tree.root_node()))
    }

    fn grammar(&self) -> &str {
        self.config.language_name
    }
}
