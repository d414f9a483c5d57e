//! Anchor, alias and merge-key resolution through the public API

use findyml::document::parse_documents;
use findyml::find::{FileError, Hit, QueryEngine};
use findyml::index::{walk, AnchorTable, NodeIndexer, ResolutionError};
use std::path::Path;

fn search(query: &str, source: &str) -> Result<Vec<Hit>, FileError> {
    QueryEngine::new(query)
        .unwrap()
        .search_source(Path::new("anchors.yml"), source)
}

fn lines(hits: &[Hit]) -> Vec<usize> {
    hits.iter().map(|hit| hit.line).collect()
}

#[test]
fn test_nested_alias_chain_outermost_first() {
    let source = "\
inner: &inner
  leaf: 1
outer: &outer
  nested: *inner
use: *outer
";
    let hits = search("use.nested.leaf", source).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].line, 2);
    assert_eq!(hits[0].alias_lines, vec![5, 4]);
}

#[test]
fn test_alias_to_scalar_is_terminal() {
    let hits = search("b", "a: &s hello\nb: *s\n").unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].terminal);
    assert!(hits[0].alias_lines.is_empty());
}

#[test]
fn test_redefined_anchor_shadows_earlier_definition() {
    let source = "\
first: &x
  one: 1
use_first: *x
second: &x
  two: 2
use_second: *x
";
    assert_eq!(lines(&search("use_first.one", source).unwrap()), vec![2]);
    assert!(search("use_first.two", source).unwrap().is_empty());
    assert_eq!(lines(&search("use_second.two", source).unwrap()), vec![5]);
}

#[test]
fn test_duplicate_key_last_wins() {
    let source = "a: 1\nb: 2\na: 3\n";
    let hits = search("*", source).unwrap();
    let paths: Vec<String> = hits.iter().map(|hit| hit.path.join(".")).collect();
    assert_eq!(paths, vec!["b", "a"]);
    assert_eq!(hits[1].line, 3);
}

#[test]
fn test_merge_sequence_earlier_mapping_wins() {
    let source = "\
a: &a
  k: from_a
b: &b
  k: from_b
  j: from_b
m:
  <<: [*a, *b]
";
    assert_eq!(lines(&search("m.k", source).unwrap()), vec![2]);
    assert_eq!(lines(&search("m.j", source).unwrap()), vec![5]);
}

#[test]
fn test_later_merge_overrides_earlier_merge() {
    let source = "\
a: &a
  k: from_a
b: &b
  k: from_b
m:
  <<: *a
  <<: *b
";
    assert_eq!(lines(&search("m.k", source).unwrap()), vec![4]);
}

#[test]
fn test_inline_merge_mapping() {
    let hits = search("m.k", "m:\n  <<: {k: inline}\n  j: 1\n").unwrap();
    assert_eq!(lines(&hits), vec![2]);
    assert!(hits[0].alias_lines.is_empty());
}

#[test]
fn test_merge_of_scalar_is_invalid() {
    let err = search("m", "s: &s text\nm:\n  <<: *s\n").unwrap_err();
    assert!(matches!(
        err,
        FileError::Resolution {
            source: ResolutionError::InvalidMerge { .. },
            ..
        }
    ));
}

#[test]
fn test_composite_keys_match_canonical_form() {
    let source = "? {a: 1, b: 2}\n: first\n? [x, y]\n: second\n";
    assert_eq!(lines(&search("'{a:1,b:2}'", source).unwrap()), vec![1]);
    assert_eq!(lines(&search("[x,y]", source).unwrap()), vec![3]);
}

#[test]
fn test_depth_limit() {
    let docs = parse_documents("a:\n  b:\n    c:\n      d: 1\n").unwrap();
    let mut anchors = AnchorTable::new();
    let err = NodeIndexer::new(&mut anchors)
        .with_max_depth(3)
        .index(&docs[0])
        .unwrap_err();
    assert!(matches!(err, ResolutionError::DepthExceeded { limit: 3, .. }));

    let mut anchors = AnchorTable::new();
    let indexed = NodeIndexer::new(&mut anchors).index(&docs[0]).unwrap();
    assert_eq!(walk(indexed).len(), 4);
}
