//! Per-file metric records extracted from syntax trees.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::classify::{Classification, TypeKind};

/// Kind tag carried by a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    Class,
    Struct,
    Enum,
    FreeFunction,
    ClassMethod,
    Field,
    ImplementationBlock,
}

impl RegionKind {
    /// Convert to a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionKind::Class => "class",
            RegionKind::Struct => "struct",
            RegionKind::Enum => "enum",
            RegionKind::FreeFunction => "free_function",
            RegionKind::ClassMethod => "class_method",
            RegionKind::Field => "field",
            RegionKind::ImplementationBlock => "implementation_block",
        }
    }

    /// Region kind recorded for a classification.
    pub fn from_classification(classification: Classification) -> Self {
        match classification {
            Classification::TypeDefinition(TypeKind::Class) => RegionKind::Class,
            Classification::TypeDefinition(TypeKind::Struct) => RegionKind::Struct,
            Classification::TypeDefinition(TypeKind::Enum) => RegionKind::Enum,
            Classification::FreeFunctionDeclaration => RegionKind::FreeFunction,
            Classification::ClassMember { is_method: true } => RegionKind::ClassMethod,
            Classification::ClassMember { is_method: false } => RegionKind::Field,
            Classification::ImplementationBlock => RegionKind::ImplementationBlock,
        }
    }

    pub fn is_type(&self) -> bool {
        matches!(self, RegionKind::Class | RegionKind::Struct | RegionKind::Enum)
    }

    pub fn is_method(&self) -> bool {
        matches!(
            self,
            RegionKind::FreeFunction | RegionKind::ClassMethod | RegionKind::Field
        )
    }
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A classified line range, 1-indexed and inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    #[serde(rename = "start")]
    pub start_line: usize,
    #[serde(rename = "end")]
    pub end_line: usize,
    #[serde(rename = "type")]
    pub kind: RegionKind,
}

impl Region {
    pub fn line_count(&self) -> usize {
        self.end_line - self.start_line + 1
    }
}

/// Regions kept for downstream highlighting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRegions {
    pub types: Vec<Region>,
    pub methods: Vec<Region>,
    pub implementations: Vec<Region>,
}

/// All metrics extracted from a single header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetrics {
    /// Path relative to the scan root.
    pub path: String,
    pub filename: String,
    pub num_types: usize,
    pub num_methods: usize,
    pub num_lines: usize,
    pub implementation_lines: usize,
    pub highlight_regions: HighlightRegions,
    /// Whether implementation volume was measured for this file.
    #[serde(skip)]
    pub implementation_bearing: bool,
}

impl FileMetrics {
    /// Assemble a record; counts are taken from the region lists.
    pub fn new(
        path: String,
        filename: String,
        num_lines: usize,
        implementation_lines: usize,
        regions: HighlightRegions,
        implementation_bearing: bool,
    ) -> Self {
        Self {
            path,
            filename,
            num_types: regions.types.len(),
            num_methods: regions.methods.len(),
            num_lines,
            implementation_lines,
            highlight_regions: regions,
            implementation_bearing,
        }
    }

    pub fn types(&self) -> &[Region] {
        &self.highlight_regions.types
    }

    pub fn methods(&self) -> &[Region] {
        &self.highlight_regions.methods
    }

    pub fn implementations(&self) -> &[Region] {
        &self.highlight_regions.implementations
    }

    /// Iterate over every recorded region.
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.types()
            .iter()
            .chain(self.methods())
            .chain(self.implementations())
    }
}
