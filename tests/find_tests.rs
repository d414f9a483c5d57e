//! End-to-end tests for searching directories of YAML files.

use findyml::find::{FileError, FindOptions, Hit, QueryEngine};
use findyml::index::ResolutionError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const EXAMPLE: &str = r#"foo:
  bar:
    baz: qux
  multiline: |
    line one
    line two
  wierdness:
    Funny Key: 1
    "Funny Key with : in it": 2
    "Funny Key with . in it": 3
    asdf.qwer: 4
    0: zero
    yes: yes
    2020-01-01: date
    ":symbol": sym
    ":": colon
    "::": colons
    ":::": more
    ? [1,2,3]
    : seq
    "{foo: bar}": map
  array:
    - a
    - b
    - c
  arrays_of_objects:
    - foo: 1
    - foo: 2
      bar: 3
  alias: &alias
    alias_key: 1
    another_alias_key: 2
  inherit_alias:
    <<: *alias
    another_key: 3
  override_alias:
    <<: *alias
    alias_key: overridden
another_top_level_key: true
also:
  in_another:
    file: here
"#;

const ANOTHER_EXAMPLE: &str = "also:\n  in_another:\n    file: there\nqux:\n  norf: 1\n";

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("example.yml"), EXAMPLE).unwrap();
    fs::write(dir.path().join("another_example.yml"), ANOTHER_EXAMPLE).unwrap();
    dir
}

fn hits(dir: &Path, query: &str) -> Vec<Hit> {
    QueryEngine::new(query)
        .unwrap()
        .find(dir)
        .unwrap()
        .map(|result| result.unwrap())
        .collect()
}

/// File names of every hit, in output order.
fn found(dir: &Path, query: &str) -> Vec<String> {
    hits(dir, query)
        .iter()
        .map(|hit| hit.file.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_find_simple_keys() {
    let dir = fixture();
    assert_eq!(found(dir.path(), "foo.bar"), vec!["example.yml"]);
    assert_eq!(found(dir.path(), "foo.multiline"), vec!["example.yml"]);
    assert_eq!(found(dir.path(), "another_top_level_key"), vec!["example.yml"]);
}

#[test]
fn test_find_multiple_files_in_sorted_order() {
    let dir = fixture();
    for query in ["also", "also.in_another", "also.in_another.file"] {
        assert_eq!(
            found(dir.path(), query),
            vec!["another_example.yml", "example.yml"],
            "query {}",
            query
        );
    }
    assert_eq!(found(dir.path(), "qux.norf"), vec!["another_example.yml"]);
}

#[test]
fn test_not_found() {
    let dir = fixture();
    assert!(found(dir.path(), "does.not.exist").is_empty());
}

#[test]
fn test_hit_positions_are_one_based() {
    let dir = fixture();
    let found = hits(dir.path(), "foo.bar.baz");
    assert_eq!(found.len(), 1);
    assert_eq!((found[0].line, found[0].col), (3, 5));
    assert!(found[0].file.is_absolute());
    assert!(found[0].terminal);
}

#[test]
fn test_quoted_keys() {
    let dir = fixture();
    for query in [
        "\"foo\"",
        "\"foo\".bar",
        "foo.\"bar\"",
        "foo.\"bar\".baz",
        "'foo'",
        "'foo'.bar",
        "foo.'bar'",
        "foo.'bar'.baz",
        "foo.wierdness.'Funny Key'",
        "foo.wierdness.'Funny Key with : in it'",
        "foo.wierdness.'Funny Key with . in it'",
        "foo.wierdness.'asdf.qwer'",
    ] {
        assert_eq!(found(dir.path(), query), vec!["example.yml"], "query {}", query);
    }

    assert!(found(dir.path(), "foo.wierdness.asdf.qwer").is_empty());
}

#[test]
fn test_non_string_keys() {
    let dir = fixture();
    for query in [
        "foo.wierdness.0",
        "foo.wierdness.yes",
        "foo.wierdness.2020-01-01",
        "foo.wierdness.:symbol",
        "foo.wierdness.:",
        "foo.wierdness.::",
        "foo.wierdness.:::",
        "foo.wierdness.[1,2,3]",
        "foo.wierdness.\"{foo: bar}\"",
    ] {
        assert_eq!(found(dir.path(), query), vec!["example.yml"], "query {}", query);
    }
}

#[test]
fn test_arrays() {
    let dir = fixture();
    for query in [
        "foo.array.0",
        "foo.array.1",
        "foo.array.2",
        "foo.arrays_of_objects.0.foo",
        "foo.arrays_of_objects.1.foo",
        "foo.arrays_of_objects.1.bar",
    ] {
        assert_eq!(found(dir.path(), query), vec!["example.yml"], "query {}", query);
    }

    assert!(found(dir.path(), "foo.array.3").is_empty());
    assert!(found(dir.path(), "foo.arrays_of_objects.3.foo").is_empty());
}

#[test]
fn test_alias_and_merge_keys() {
    let dir = fixture();
    for query in [
        "foo.alias.alias_key",
        "foo.alias.another_alias_key",
        "foo.inherit_alias.alias_key",
        "foo.inherit_alias.another_alias_key",
        "foo.inherit_alias.another_key",
        "foo.override_alias.alias_key",
        "foo.override_alias.another_alias_key",
    ] {
        assert_eq!(found(dir.path(), query), vec!["example.yml"], "query {}", query);
    }

    assert!(found(dir.path(), "foo.inherit_alias.<<").is_empty());
}

#[test]
fn test_merged_keys_report_alias_lines() {
    let dir = fixture();

    let inherited = hits(dir.path(), "foo.inherit_alias.alias_key");
    assert_eq!(inherited[0].line, 31);
    assert_eq!(inherited[0].alias_lines, vec![34]);

    let overridden = hits(dir.path(), "foo.override_alias.alias_key");
    assert_eq!(overridden[0].line, 38);
    assert!(overridden[0].alias_lines.is_empty());
}

#[test]
fn test_wildcards() {
    let dir = fixture();
    assert_eq!(
        found(dir.path(), ".file"),
        vec!["another_example.yml", "example.yml"]
    );
    let paths: Vec<String> = hits(dir.path(), "foo.*.alias_key")
        .iter()
        .map(|hit| hit.path.join("."))
        .collect();
    assert_eq!(
        paths,
        vec![
            "foo.alias.alias_key",
            "foo.inherit_alias.alias_key",
            "foo.override_alias.alias_key"
        ]
    );
}

#[test]
fn test_parse_error_skips_only_that_file() {
    let dir = fixture();
    fs::write(dir.path().join("broken.yml"), "also: [unclosed\n").unwrap();

    let results: Vec<_> = QueryEngine::new("also")
        .unwrap()
        .find(dir.path())
        .unwrap()
        .collect();

    assert_eq!(results.len(), 3);
    let skipped: Vec<&FileError> = results.iter().filter_map(|r| r.as_ref().err()).collect();
    assert_eq!(skipped.len(), 1);
    assert!(skipped[0].is_skippable());
    assert!(skipped[0].path().ends_with("broken.yml"));
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 2);
}

#[test]
fn test_dangling_alias_is_attributed_to_file() {
    let dir = fixture();
    fs::write(dir.path().join("dangling.yml"), "also: *undefined\n").unwrap();

    let errors: Vec<FileError> = QueryEngine::new("also")
        .unwrap()
        .find(dir.path())
        .unwrap()
        .filter_map(Result::err)
        .collect();

    assert_eq!(errors.len(), 1);
    assert!(!errors[0].is_skippable());
    assert!(matches!(
        &errors[0],
        FileError::Resolution {
            source: ResolutionError::DanglingAlias { anchor, .. },
            ..
        } if anchor == "undefined"
    ));
}

#[test]
fn test_cyclic_alias_is_resolution_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("cycle.yml"), "a: &x\n  b: *x\n").unwrap();

    let results: Vec<_> = QueryEngine::new("a")
        .unwrap()
        .find(dir.path())
        .unwrap()
        .collect();

    assert_eq!(results.len(), 1);
    assert!(matches!(
        &results[0],
        Err(FileError::Resolution {
            source: ResolutionError::CyclicAlias { anchor, .. },
            ..
        }) if anchor == "x"
    ));
}

#[test]
fn test_extensions_option() {
    let dir = fixture();
    fs::write(dir.path().join("extra.yaml"), "qux:\n  norf: 2\n").unwrap();

    let engine = QueryEngine::new("qux.norf").unwrap();
    assert_eq!(engine.find(dir.path()).unwrap().count(), 1);

    let engine = engine.with_options(FindOptions {
        extensions: vec!["yml".to_string(), "yaml".to_string()],
        ..FindOptions::default()
    });
    assert_eq!(engine.find(dir.path()).unwrap().count(), 2);
}

#[test]
fn test_multi_document_file_shares_anchors() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("multi.yml"),
        "first:\n  k: 1\n---\nsecond:\n  k: 2\n",
    )
    .unwrap();

    let lines: Vec<usize> = hits(dir.path(), ".k").iter().map(|h| h.line).collect();
    assert_eq!(lines, vec![2, 5]);
}

#[test]
fn test_top_level_find() {
    let dir = fixture();
    let results = findyml::find("qux.norf", dir.path()).unwrap();
    assert_eq!(results.len(), 1);
    assert!(findyml::find("foo.'bar", dir.path()).is_err());
}
