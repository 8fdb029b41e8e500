//! Syntactic classification of syntax-tree nodes.
//!
//! Classification looks only at node shape and at whether the node sits
//! inside a type body. It never resolves names.

use crate::parser::{NodeKind, SyntaxNode};

/// The kind of a type definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Struct,
    Enum,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
            TypeKind::Enum => "enum",
        }
    }
}

/// What a node contributes to a file's metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    TypeDefinition(TypeKind),
    FreeFunctionDeclaration,
    ClassMember { is_method: bool },
    ImplementationBlock,
}

/// Classify a node, first matching rule wins.
///
/// 1. class/struct/enum specifiers are type definitions.
/// 2. Free function declarations always count, whatever the enclosing scope.
/// 3. Inside a type body, field declarations and function definitions are
///    members; definitions are methods.
/// 4. Compound statements and function definitions are implementation blocks.
pub fn classify(node: &SyntaxNode, inside_type_body: bool) -> Option<Classification> {
    match node.kind {
        NodeKind::Class => Some(Classification::TypeDefinition(TypeKind::Class)),
        NodeKind::Struct => Some(Classification::TypeDefinition(TypeKind::Struct)),
        NodeKind::Enum => Some(Classification::TypeDefinition(TypeKind::Enum)),
        NodeKind::FreeFunctionDeclaration => Some(Classification::FreeFunctionDeclaration),
        NodeKind::FieldDeclaration | NodeKind::FunctionDefinition if inside_type_body => {
            Some(Classification::ClassMember {
                is_method: node.kind == NodeKind::FunctionDefinition,
            })
        }
        _ if is_implementation_block(node) => Some(Classification::ImplementationBlock),
        _ => None,
    }
}

/// Rule 4 on its own.
///
/// Line accounting asks this independently of `classify`, so a method
/// defined inside a class is both a member and an implementation block.
pub fn is_implementation_block(node: &SyntaxNode) -> bool {
    matches!(
        node.kind,
        NodeKind::CompoundStatement | NodeKind::FunctionDefinition
    )
}

/// Whether children of `node` are inside a type body.
///
/// Once true it stays true for the whole subtree.
pub fn enters_type_body(node: &SyntaxNode, inside_type_body: bool) -> bool {
    inside_type_body || matches!(node.kind, NodeKind::Class | NodeKind::Struct | NodeKind::Enum)
}
