//! Integration tests for header scanning and metric extraction.
//!
//! These tests run the tree-sitter provider over the fixtures in
//! `testdata/` and check the extracted metrics end to end.

use std::fs;
use std::path::{Path, PathBuf};

use headerboard::analysis::{FileError, RegionKind, ScanError, Scanner};
use headerboard::config::Config;
use headerboard::parser::{self, NodeKind, Span, SyntaxNode, TreeProvider};
use headerboard::FileMetrics;

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn setup() {
    parser::init();
}

fn scan(root: &Path) -> Vec<FileMetrics> {
    setup();
    let scanner = Scanner::new(Config::default()).expect("default config is valid");
    scanner.scan(root).expect("scan should succeed").metrics
}

fn find<'a>(metrics: &'a [FileMetrics], path: &str) -> &'a FileMetrics {
    metrics
        .iter()
        .find(|m| m.path == path)
        .unwrap_or_else(|| panic!("{} not in results", path))
}

fn count_kind(m: &FileMetrics, kind: RegionKind) -> usize {
    m.regions().filter(|r| r.kind == kind).count()
}

// =============================================================================
// Fixture metrics
// =============================================================================

#[test]
#[cfg(feature = "tree-sitter")]
fn test_scan_order_is_depth_first_by_name() {
    let metrics = scan(&testdata_path().join("api"));
    let paths: Vec<&str> = metrics.iter().map(|m| m.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "comments_only.hpp",
            "detail/one_line.hpp",
            "device.hpp",
            "same_as_one_line.h",
            "types.h",
        ]
    );
}

#[test]
#[cfg(feature = "tree-sitter")]
fn test_one_line_struct() {
    let metrics = scan(&testdata_path().join("api"));
    let m = find(&metrics, "detail/one_line.hpp");

    assert_eq!(m.filename, "one_line.hpp");
    assert_eq!(m.num_lines, 1);
    assert_eq!(m.num_types, 1);
    assert_eq!(m.num_methods, 2, "field x and method f");
    assert_eq!(m.implementation_lines, 1);
    assert_eq!(count_kind(m, RegionKind::Field), 1);
    assert_eq!(count_kind(m, RegionKind::ClassMethod), 1);
}

#[test]
#[cfg(feature = "tree-sitter")]
fn test_plain_header_has_no_implementation_lines() {
    let metrics = scan(&testdata_path().join("api"));
    let hpp = find(&metrics, "detail/one_line.hpp");
    let h = find(&metrics, "same_as_one_line.h");

    assert_eq!(h.num_types, hpp.num_types);
    assert_eq!(h.num_methods, hpp.num_methods);
    assert_eq!(h.implementation_lines, 0);
    assert!(h.implementations().is_empty());

    let types = find(&metrics, "types.h");
    assert_eq!(types.implementation_lines, 0);
}

#[test]
#[cfg(feature = "tree-sitter")]
fn test_comment_only_file() {
    let metrics = scan(&testdata_path().join("api"));
    let m = find(&metrics, "comments_only.hpp");

    assert_eq!(m.num_lines, 2);
    assert_eq!(m.num_types, 0);
    assert_eq!(m.num_methods, 0);
    assert_eq!(m.implementation_lines, 0);
}

#[test]
#[cfg(feature = "tree-sitter")]
fn test_device_header() {
    let metrics = scan(&testdata_path().join("api"));
    let m = find(&metrics, "device.hpp");

    assert_eq!(m.num_lines, 38);
    // DeviceState, Config, Device
    assert_eq!(m.num_types, 3);
    assert_eq!(count_kind(m, RegionKind::Enum), 1);
    assert_eq!(count_kind(m, RegionKind::Struct), 1);
    assert_eq!(count_kind(m, RegionKind::Class), 1);

    // reset_all, device_count
    assert_eq!(count_kind(m, RegionKind::FreeFunction), 2);
    // constructor, id, is_busy
    assert_eq!(count_kind(m, RegionKind::ClassMethod), 3);
    // id, name, open, cfg_, state_
    assert_eq!(count_kind(m, RegionKind::Field), 5);
    assert_eq!(m.num_methods, 10);

    // Constructor (1) + id (1) + is_busy (6); the nested if block is not recounted.
    assert_eq!(m.implementation_lines, 8);
    assert_eq!(m.implementations().len(), 3);
    let busy = m
        .implementations()
        .iter()
        .find(|r| r.start_line == 26)
        .expect("is_busy body");
    assert_eq!(busy.end_line, 31);
}

#[test]
#[cfg(feature = "tree-sitter")]
fn test_nested_types_attribute_inner_members() {
    let metrics = scan(&testdata_path().join("nested"));
    let m = find(&metrics, "outer.hpp");

    assert_eq!(m.num_types, 2);
    let field_lines: Vec<usize> = m
        .methods()
        .iter()
        .filter(|r| r.kind == RegionKind::Field)
        .map(|r| r.start_line)
        .collect();
    assert!(field_lines.contains(&3), "inner member a: {:?}", field_lines);
    assert!(field_lines.contains(&5), "outer member b: {:?}", field_lines);
}

#[test]
#[cfg(feature = "tree-sitter")]
fn test_structural_invariants() {
    for dir in ["api", "nested"] {
        for m in scan(&testdata_path().join(dir)) {
            assert_eq!(m.num_types, m.types().len(), "{}", m.path);
            assert_eq!(m.num_methods, m.methods().len(), "{}", m.path);
            for r in m.regions() {
                assert!(r.end_line >= r.start_line, "{}: {:?}", m.path, r);
                assert!(r.end_line <= m.num_lines, "{}: {:?}", m.path, r);
            }
        }
    }
}

#[test]
#[cfg(feature = "tree-sitter")]
fn test_scan_is_idempotent() {
    let root = testdata_path().join("api");
    let first = scan(&root);
    let second = scan(&root);
    assert_eq!(first, second);
}

#[test]
#[cfg(feature = "tree-sitter")]
fn test_sequential_matches_parallel() {
    setup();
    let root = testdata_path().join("api");
    let parallel = scan(&root);
    let config = Config {
        parallel: Some(false),
        ..Default::default()
    };
    let sequential = Scanner::new(config).unwrap().scan(&root).unwrap().metrics;
    assert_eq!(parallel, sequential);
}

// =============================================================================
// Failure handling
// =============================================================================

/// Fails on any non-empty input, so it passes the startup probe.
struct RejectingProvider;

impl TreeProvider for RejectingProvider {
    fn parse(&self, source: &[u8]) -> anyhow::Result<SyntaxNode> {
        if source.is_empty() {
            return Ok(SyntaxNode::new(NodeKind::TranslationUnit, None));
        }
        anyhow::bail!("grammar rejected input")
    }

    fn grammar(&self) -> &str {
        "rejecting"
    }
}

/// Produces a node that ends before it starts.
struct InvertedProvider;

impl TreeProvider for InvertedProvider {
    fn parse(&self, _source: &[u8]) -> anyhow::Result<SyntaxNode> {
        Ok(SyntaxNode::new(NodeKind::TranslationUnit, Some(Span::lines(1, 1)))
            .with_children(vec![SyntaxNode::new(NodeKind::Struct, Some(Span::lines(5, 2)))]))
    }

    fn grammar(&self) -> &str {
        "inverted"
    }
}

fn rejecting_factory() -> Box<dyn TreeProvider> {
    Box::new(RejectingProvider)
}

fn inverted_factory() -> Box<dyn TreeProvider> {
    Box::new(InvertedProvider)
}

#[test]
#[cfg(feature = "tree-sitter")]
fn test_bad_files_are_skipped() {
    setup();
    parser::register(".rejected", rejecting_factory);
    parser::register(".inverted", inverted_factory);

    let temp = tempfile::TempDir::new().unwrap();
    fs::write(temp.path().join("a.rejected"), "anything").unwrap();
    fs::write(temp.path().join("b.hpp"), "struct S { int x; };\n").unwrap();
    fs::write(temp.path().join("c.inverted"), "anything").unwrap();

    let config = Config {
        header_extensions: Some(vec![
            "hpp".to_string(),
            "rejected".to_string(),
            "inverted".to_string(),
        ]),
        ..Default::default()
    };
    let outcome = Scanner::new(config).unwrap().scan(temp.path()).unwrap();

    assert_eq!(outcome.metrics.len(), 1);
    assert_eq!(outcome.metrics[0].path, "b.hpp");
    assert_eq!(outcome.failures.len(), 2);
    assert_eq!(outcome.files_seen(), 3);
    assert!(matches!(outcome.failures[0], FileError::Parse { .. }));
    assert!(matches!(outcome.failures[1], FileError::Attribution { .. }));
    assert!(outcome.failures[0].path().ends_with("a.rejected"));
}

#[test]
fn test_missing_provider_is_startup_error() {
    setup();
    let config = Config {
        header_extensions: Some(vec!["nogrammar".to_string()]),
        implementation_extensions: Some(vec![]),
        ..Default::default()
    };
    let temp = tempfile::TempDir::new().unwrap();
    let err = Scanner::new(config).unwrap().scan(temp.path()).unwrap_err();
    assert!(err.is_startup());
    assert!(matches!(err, ScanError::Startup { .. }));
}

#[test]
#[cfg(feature = "tree-sitter")]
fn test_missing_directory() {
    setup();
    let err = Scanner::new(Config::default())
        .unwrap()
        .scan(&testdata_path().join("does-not-exist"))
        .unwrap_err();
    assert!(matches!(err, ScanError::DirectoryNotFound(_)));
}
