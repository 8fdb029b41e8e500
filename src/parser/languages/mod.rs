//! Grammar-specific tree-sitter configurations.
//!
//! Each grammar module provides:
//! - A node-kind mapping from grammar tags to `NodeKind`
//! - Factory function for creating providers
//! - Registration for the file extensions it handles

#[cfg(feature = "tree-sitter")]
pub mod cpp;

/// Register all available grammar providers.
#[cfg(feature = "tree-sitter")]
pub fn register_all() {
    cpp::register();
}
