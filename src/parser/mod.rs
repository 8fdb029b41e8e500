//! Syntax tree providers.
//!
//! This module provides:
//! - `TreeProvider` trait: Abstract interface for grammar-driven parsers
//! - `SyntaxNode`: An owned, grammar-independent view of a concrete syntax tree
//! - `Registry`: Factory-based provider lookup by file extension
//! - Tree-sitter implementations (behind the `tree-sitter` feature)

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

#[cfg(feature = "tree-sitter")]
pub mod treesitter;

#[cfg(feature = "tree-sitter")]
pub mod languages;

/// Source location span with line/column positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Start line (1-indexed).
    pub start_line: usize,
    /// Start column (1-indexed).
    pub start_col: usize,
    /// End line (1-indexed, inclusive).
    pub end_line: usize,
    /// End column (1-indexed).
    pub end_col: usize,
}

impl Span {
    /// Span covering whole lines, for trees built by hand.
    pub fn lines(start_line: usize, end_line: usize) -> Self {
        Self {
            start_line,
            start_col: 1,
            end_line,
            end_col: 1,
        }
    }

    /// Number of lines covered, counting both ends.
    /// Zero when the span is inverted.
    pub fn line_count(&self) -> usize {
        if self.end_line < self.start_line {
            0
        } else {
            self.end_line - self.start_line + 1
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}:{}", self.start_line, self.start_col, self.end_line, self.end_col)
    }
}

/// Grammar-independent node kinds the analysis cares about.
///
/// Providers map their grammar's tags onto these. Anything else is kept
/// as `Other` with the raw tag for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    TranslationUnit,
    Class,
    Struct,
    Enum,
    /// A function declared (not defined) by a plain declaration statement.
    FreeFunctionDeclaration,
    FieldDeclaration,
    FunctionDefinition,
    CompoundStatement,
    Other(String),
}

impl NodeKind {
    /// Short tag used in logs.
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::TranslationUnit => "translation_unit",
            NodeKind::Class => "class",
            NodeKind::Struct => "struct",
            NodeKind::Enum => "enum",
            NodeKind::FreeFunctionDeclaration => "free_function_declaration",
            NodeKind::FieldDeclaration => "field_declaration",
            NodeKind::FunctionDefinition => "function_definition",
            NodeKind::CompoundStatement => "compound_statement",
            NodeKind::Other(tag) => tag,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A node of a concrete syntax tree.
///
/// Trees are strict hierarchies: every node owns its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    /// Position metadata, absent when the provider could not supply it.
    pub span: Option<Span>,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, span: Option<Span>) -> Self {
        Self {
            kind,
            span,
            children: Vec::new(),
        }
    }

    /// Builder helper used when assembling trees by hand.
    pub fn with_children(mut self, children: Vec<SyntaxNode>) -> Self {
        self.children = children;
        self
    }

    /// Total number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SyntaxNode::node_count).sum::<usize>()
    }
}

/// Parses source text into a syntax tree.
pub trait TreeProvider: Send + Sync {
    /// Parse source bytes into a tree rooted at a translation unit.
    ///
    /// Partial parse errors still yield a tree; an error is returned only
    /// when no tree could be produced at all.
    fn parse(&self, source: &[u8]) -> anyhow::Result<SyntaxNode>;

    /// Return the grammar this provider handles (e.g., "cpp").
    fn grammar(&self) -> &str;

    /// Verify the provider is usable before any files are processed.
    fn probe(&self) -> anyhow::Result<()> {
        self.parse(b"").map(|_| ())
    }
}

/// Factory function type for creating provider instances.
pub type ProviderFactory = fn() -> Box<dyn TreeProvider>;

lazy_static::lazy_static! {
    /// Global provider registry mapping file extensions to provider factories.
    static ref REGISTRY: RwLock<HashMap<String, ProviderFactory>> = RwLock::new(HashMap::new());
}

/// Register a provider factory for a file extension.
/// Extension should include the dot (e.g., ".hpp").
pub fn register(ext: &str, factory: ProviderFactory) {
    let mut registry = REGISTRY.write().unwrap_or_else(|e| e.into_inner());
    registry.insert(ext.to_string(), factory);
}

/// Get a provider for the given file extension.
/// Returns None if no provider is registered for the extension.
pub fn for_extension(ext: &str) -> Option<Box<dyn TreeProvider>> {
    let registry = REGISTRY.read().unwrap_or_else(|e| e.into_inner());
    registry.get(ext).map(|factory| factory())
}

/// Initialize the provider registry with all available grammars.
/// Call this once at startup before using providers.
#[cfg(feature = "tree-sitter")]
pub fn init() {
    languages::register_all();
}

/// Initialize (no-op when tree-sitter is disabled).
#[cfg(not(feature = "tree-sitter"))]
pub fn init() {
    // No tree-sitter grammars available
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockProvider;

    impl TreeProvider for MockProvider {
        fn parse(&self, _source: &[u8]) -> anyhow::Result<SyntaxNode> {
            Ok(SyntaxNode::new(NodeKind::TranslationUnit, Some(Span::lines(1, 1))))
        }

        fn grammar(&self) -> &str {
            "mock"
        }
    }

    fn mock_factory() -> Box<dyn TreeProvider> {
        Box::new(MockProvider)
    }

    #[test]
    fn test_registry() {
        register(".mock", mock_factory);

        let provider = for_extension(".mock");
        assert!(provider.is_some());

        let provider = provider.unwrap();
        assert_eq!(provider.grammar(), "mock");
        assert!(provider.probe().is_ok());

        let tree = provider.parse(b"anything").unwrap();
        assert_eq!(tree.kind, NodeKind::TranslationUnit);
    }

    #[test]
    fn test_unregistered_extension() {
        assert!(for_extension(".unknown").is_none());
    }

    #[test]
    fn test_span_line_count() {
        assert_eq!(Span::lines(3, 3).line_count(), 1);
        assert_eq!(Span::lines(3, 7).line_count(), 5);
        assert_eq!(Span::lines(7, 3).line_count(), 0);
    }

    #[test]
    fn test_node_count() {
        let tree = SyntaxNode::new(NodeKind::TranslationUnit, None).with_children(vec![
            SyntaxNode::new(NodeKind::Struct, None)
                .with_children(vec![SyntaxNode::new(NodeKind::FieldDeclaration, None)]),
            SyntaxNode::new(NodeKind::Other("comment".to_string()), None),
        ]);
        assert_eq!(tree.node_count(), 4);
    }
}
