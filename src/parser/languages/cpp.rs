//! C++ grammar configuration for tree-sitter parsing.

use tree_sitter::Node;

use crate::parser::treesitter::{Config, TreeSitterProvider};
use crate::parser::{NodeKind, TreeProvider};

/// Declarator wrappers that may sit between a declaration and its
/// function declarator (`int *f();`, `T &f();`, `void (f)();`).
const DECLARATOR_WRAPPERS: &[&str] = &[
    "pointer_declarator",
    "reference_declarator",
    "parenthesized_declarator",
    "attributed_declarator",
];

/// Map a tree-sitter-cpp node onto the analysis node kinds.
pub fn node_kind(node: Node) -> NodeKind {
    match node.kind() {
        "translation_unit" => NodeKind::TranslationUnit,
        "class_specifier" => NodeKind::Class,
        "struct_specifier" => NodeKind::Struct,
        "enum_specifier" => NodeKind::Enum,
        "field_declaration" => NodeKind::FieldDeclaration,
        "function_definition" => NodeKind::FunctionDefinition,
        "compound_statement" => NodeKind::CompoundStatement,
        "declaration" if declares_function(node) => NodeKind::FreeFunctionDeclaration,
        other => NodeKind::Other(other.to_string()),
    }
}

/// Whether a `declaration` node declares a function rather than a variable.
fn declares_function(node: Node) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children_by_field_name("declarator", &mut cursor)
        .any(is_function_declarator);
    found
}

fn is_function_declarator(declarator: Node) -> bool {
    match unwrap_declarator(declarator, DECLARATOR_WRAPPERS) {
        Some(d) if d.kind() == "function_declarator" => !names_function_pointer(d),
        _ => false,
    }
}

/// Whether a function declarator declares a pointer (or reference, or array
/// of pointers) to a function, as in `int (*handler)(int);`.
///
/// A parenthesized declarator that reaches another function declarator is
/// a function returning a function pointer: `int (*get(void))(int);`.
fn names_function_pointer(function: Node) -> bool {
    let Some(inner) = function.child_by_field_name("declarator") else {
        return false;
    };
    if inner.kind() != "parenthesized_declarator" {
        return false;
    }

    let mut indirect = false;
    let mut current = inner;
    loop {
        match current.kind() {
            "function_declarator" => return false,
            "pointer_declarator" | "reference_declarator" | "array_declarator" => indirect = true,
            "parenthesized_declarator" | "attributed_declarator" => {}
            _ => return indirect,
        }
        match inner_declarator(current) {
            Some(n) => current = n,
            None => return indirect,
        }
    }
}

/// Strip `wrappers` from a declarator, returning the first other node.
fn unwrap_declarator<'a>(mut declarator: Node<'a>, wrappers: &[&str]) -> Option<Node<'a>> {
    while wrappers.contains(&declarator.kind()) {
        declarator = inner_declarator(declarator)?;
    }
    Some(declarator)
}

fn inner_declarator(declarator: Node) -> Option<Node> {
    declarator.child_by_field_name("declarator").or_else(|| {
        let count = declarator.named_child_count();
        if count == 0 {
            None
        } else {
            declarator.named_child(count - 1)
        }
    })
}

/// Create a new C++ provider.
pub fn new_provider() -> Box<dyn TreeProvider> {
    Box::new(TreeSitterProvider::new(Config {
        language: tree_sitter_cpp::LANGUAGE.into(),
        language_name: "cpp",
        node_kind,
    }))
}

/// Register the C++ provider for header extensions.
pub fn register() {
    crate::parser::register(".h", new_provider);
    crate::parser::register(".hh", new_provider);
    crate::parser::register(".hpp", new_provider);
    crate::parser::register(".hxx", new_provider);
}
