//! The search driver.
//!
//! A [`QueryEngine`] parses its query once, then walks candidate files in
//! sorted order. Each file is parsed, every document in it is indexed
//! against one shared anchor table, and the resulting path entries are
//! matched lazily in document order.
//!
//! # Example
//!
//! ```
//! use findyml::find::QueryEngine;
//! use std::path::Path;
//!
//! let engine = QueryEngine::new("foo.bar").unwrap();
//! let hits = engine
//!     .search_source(Path::new("inline.yml"), "foo:\n  bar: baz\n")
//!     .unwrap();
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].line, 2);
//! ```

use crate::config::Config;
use crate::document::node::{Position, YamlNode};
use crate::document::parser::{parse_documents, ParseError};
use crate::file::discovery::candidate_files;
use crate::file::loader::{load_yaml_file, LoadError};
use crate::index::{AnchorTable, Extractor, Indexed, NodeIndexer, PathEntry, ResolutionError};
use crate::index::DEFAULT_MAX_DEPTH;
use crate::query::{matches, parse, ParsedQuery, QueryError};
use anyhow::Context;
use serde::Serialize;
use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;

/// A single matching node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hit {
    pub file: PathBuf,
    /// 1-based line of the key or sequence item
    pub line: usize,
    /// 1-based column of the key or sequence item
    pub col: usize,
    pub path: Vec<String>,
    pub terminal: bool,
    /// 1-based lines of the aliases traversed, outermost first
    pub alias_lines: Vec<usize>,
}

impl Hit {
    fn from_entry(file: &Path, entry: PathEntry) -> Self {
        Self {
            file: file.to_path_buf(),
            line: entry.position.display_line(),
            col: entry.position.display_column(),
            path: entry.path,
            terminal: entry.terminal,
            alias_lines: entry.aliases.iter().map(Position::display_line).collect(),
        }
    }

    /// Renders the path with each segment quoted, e.g. `"foo"."a.b"`.
    pub fn display_path(&self) -> String {
        self.path
            .iter()
            .map(|segment| format!("{:?}", segment))
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// A failure confined to one candidate file.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("{}: {source}", path.display())]
    Resolution {
        path: PathBuf,
        #[source]
        source: ResolutionError,
    },
}

impl FileError {
    /// The file the failure belongs to.
    pub fn path(&self) -> &Path {
        match self {
            FileError::Read { path, .. }
            | FileError::Parse { path, .. }
            | FileError::Resolution { path, .. } => path,
        }
    }

    /// True for malformed YAML, which is reported and skipped.
    pub fn is_skippable(&self) -> bool {
        matches!(self, FileError::Parse { .. })
    }

    fn from_parse(path: &Path, err: ParseError) -> Self {
        match err {
            ParseError::UnknownAnchor {
                anchor,
                line,
                column,
            } => FileError::Resolution {
                path: path.to_path_buf(),
                source: ResolutionError::DanglingAlias {
                    anchor,
                    position: Position::new(line.saturating_sub(1), column.saturating_sub(1)),
                },
            },
            source => FileError::Parse {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

/// Tuning knobs for a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindOptions {
    /// Candidate file extensions, without the dot
    pub extensions: Vec<String>,
    /// Maximum nesting accepted by the indexer
    pub max_depth: usize,
    /// Only report terminal nodes
    pub leaves_only: bool,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            extensions: vec!["yml".to_string()],
            max_depth: DEFAULT_MAX_DEPTH,
            leaves_only: false,
        }
    }
}

impl From<&Config> for FindOptions {
    fn from(config: &Config) -> Self {
        Self {
            extensions: config.extensions.clone(),
            max_depth: config.max_depth,
            leaves_only: config.leaves_only,
        }
    }
}

/// Searches YAML files for key paths matching one query.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    query: ParsedQuery,
    options: FindOptions,
}

impl QueryEngine {
    /// Parses `query` and builds an engine with default options.
    ///
    /// # Errors
    ///
    /// Returns a `QueryError` if the query is malformed.
    pub fn new(query: &str) -> Result<Self, QueryError> {
        Ok(Self {
            query: parse(query)?,
            options: FindOptions::default(),
        })
    }

    pub fn with_options(mut self, options: FindOptions) -> Self {
        self.options = options;
        self
    }

    pub fn query(&self) -> &ParsedQuery {
        &self.query
    }

    pub fn options(&self) -> &FindOptions {
        &self.options
    }

    /// Lists the candidate files below `root` and returns a lazy iterator
    /// over their matches.
    ///
    /// Files are visited in sorted path order. Each item is either a hit or
    /// the failure of one file; a failed file yields no hits.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` cannot be made absolute or a configured
    /// extension is not a valid glob fragment.
    pub fn find(&self, root: &Path) -> anyhow::Result<Matches<'_>> {
        let root = std::path::absolute(root)
            .with_context(|| format!("Failed to resolve {}", root.display()))?;
        let files = candidate_files(&root, &self.options.extensions)
            .context("Invalid file extension pattern")?;

        tracing::debug!(root = %root.display(), files = files.len(), "collected candidate files");

        Ok(Matches {
            engine: self,
            files: files.into(),
            current: None,
        })
    }

    /// Searches one file on disk.
    ///
    /// # Errors
    ///
    /// Returns a `FileError` if the file cannot be read, is not valid YAML,
    /// or contains an alias that cannot be resolved.
    pub fn search_file(&self, path: &Path) -> Result<Vec<Hit>, FileError> {
        Ok(self.open(path)?.collect())
    }

    /// Searches YAML text, attributing hits to `file`.
    ///
    /// # Errors
    ///
    /// Returns a `FileError` if the text is not valid YAML or contains an
    /// alias that cannot be resolved.
    pub fn search_source(&self, file: &Path, source: &str) -> Result<Vec<Hit>, FileError> {
        let documents = parse_documents(source).map_err(|err| FileError::from_parse(file, err))?;
        Ok(self.prepare(file, &documents)?.collect())
    }

    fn open(&self, path: &Path) -> Result<FileMatches<'_>, FileError> {
        let documents = load_yaml_file(path).map_err(|err| match err {
            LoadError::Io(source) => FileError::Read {
                path: path.to_path_buf(),
                source,
            },
            LoadError::Parse(err) => FileError::from_parse(path, err),
        })?;
        self.prepare(path, &documents)
    }

    /// Indexes every document up front, so a resolution failure anywhere in
    /// the file is reported before any of its hits.
    fn prepare(&self, file: &Path, documents: &[YamlNode]) -> Result<FileMatches<'_>, FileError> {
        let mut anchors = AnchorTable::new();
        let mut roots = VecDeque::with_capacity(documents.len());
        for document in documents {
            let root = NodeIndexer::new(&mut anchors)
                .with_max_depth(self.options.max_depth)
                .index(document)
                .map_err(|source| FileError::Resolution {
                    path: file.to_path_buf(),
                    source,
                })?;
            roots.push_back(root);
        }

        tracing::debug!(
            file = %file.display(),
            documents = roots.len(),
            anchors = anchors.len(),
            "indexed file"
        );

        Ok(FileMatches {
            engine: self,
            file: file.to_path_buf(),
            roots,
            current: None,
        })
    }

    fn accepts(&self, entry: &PathEntry) -> bool {
        (entry.terminal || !self.options.leaves_only) && matches(&entry.path, &self.query)
    }
}

/// Matches within one indexed file.
struct FileMatches<'e> {
    engine: &'e QueryEngine,
    file: PathBuf,
    roots: VecDeque<Rc<Indexed>>,
    current: Option<Extractor>,
}

impl Iterator for FileMatches<'_> {
    type Item = Hit;

    fn next(&mut self) -> Option<Hit> {
        let engine = self.engine;
        loop {
            if let Some(extractor) = self.current.as_mut() {
                if let Some(entry) = extractor.find(|entry| engine.accepts(entry)) {
                    return Some(Hit::from_entry(&self.file, entry));
                }
            }
            self.current = Some(Extractor::new(self.roots.pop_front()?));
        }
    }
}

/// Lazy iterator over the matches of a directory search.
pub struct Matches<'e> {
    engine: &'e QueryEngine,
    files: VecDeque<PathBuf>,
    current: Option<FileMatches<'e>>,
}

impl Iterator for Matches<'_> {
    type Item = Result<Hit, FileError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(hit) = self.current.as_mut().and_then(Iterator::next) {
                return Some(Ok(hit));
            }
            self.current = None;

            let file = self.files.pop_front()?;
            match self.engine.open(&file) {
                Ok(matches) => self.current = Some(matches),
                Err(err) => {
                    if err.is_skippable() {
                        tracing::warn!(file = %file.display(), error = %err, "skipping file");
                    }
                    return Some(Err(err));
                }
            }
        }
    }
}

/// Searches every candidate file below `root` for `query` with default
/// options, collecting the results.
///
/// # Errors
///
/// Returns an error if the query is malformed or the root cannot be
/// resolved. Per-file failures are returned inline.
pub fn find(query: &str, root: &Path) -> anyhow::Result<Vec<Result<Hit, FileError>>> {
    let engine = QueryEngine::new(query)?;
    Ok(engine.find(root)?.collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search(query: &str, source: &str) -> Vec<Hit> {
        QueryEngine::new(query)
            .unwrap()
            .search_source(Path::new("test.yml"), source)
            .unwrap()
    }

    fn lines(hits: &[Hit]) -> Vec<usize> {
        hits.iter().map(|h| h.line).collect()
    }

    #[test]
    fn test_nested_key() {
        let hits = search("foo.bar", "foo:\n  bar: baz\n");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].file, PathBuf::from("test.yml"));
        assert_eq!((hits[0].line, hits[0].col), (2, 3));
        assert!(hits[0].terminal);
        assert!(hits[0].alias_lines.is_empty());
    }

    #[test]
    fn test_flow_mapping_hits_on_line_one() {
        let source = "{foo: {bar: baz}}\n";
        assert_eq!(lines(&search("foo.bar", source)), vec![1]);
        assert_eq!(search("foo", source).len(), 1);
        assert!(!search("foo", source)[0].terminal);
        assert_eq!(search("*.bar", source), search("foo.bar", source));
    }

    #[test]
    fn test_leading_dot_does_not_repeat_nested_key() {
        let hits = search(".a", "x:\n  a:\n    a: 1\n");
        let paths: Vec<_> = hits.iter().map(|h| h.path.join(".")).collect();
        assert_eq!(paths, vec!["x.a"]);
        assert_eq!(hits[0].line, 2);
    }

    #[test]
    fn test_alias_chain() {
        let source = "anchor: &a\n  k: v\nuse: *a\n";
        let via_alias = search("use.k", source);
        assert_eq!(via_alias.len(), 1);
        assert_eq!(via_alias[0].alias_lines, vec![3]);
        assert_eq!(via_alias[0].line, 2);

        let direct = search("anchor.k", source);
        assert!(direct[0].alias_lines.is_empty());
    }

    #[test]
    fn test_merge_key_local_wins() {
        let source = "a: &a\n  k: v1\n  j: w\nm:\n  <<: *a\n  k: v2\n";
        assert_eq!(lines(&search("m.k", source)), vec![6]);
        assert_eq!(lines(&search("m.j", source)), vec![3]);
    }

    #[test]
    fn test_leaves_only() {
        let engine = QueryEngine::new("foo.").unwrap().with_options(FindOptions {
            leaves_only: true,
            ..FindOptions::default()
        });
        let hits = engine
            .search_source(Path::new("t.yml"), "foo:\n  a:\n    b: 1\n  c: 2\n")
            .unwrap();
        let paths: Vec<_> = hits.iter().map(|h| h.path.join(".")).collect();
        assert_eq!(paths, vec!["foo.a.b", "foo.c"]);
    }

    #[test]
    fn test_multiple_documents_in_order() {
        let hits = search("*.k", "a:\n  k: 1\n---\nb:\n  k: 2\n");
        assert_eq!(lines(&hits), vec![2, 5]);
    }

    #[test]
    fn test_dangling_alias_is_resolution_error() {
        let err = QueryEngine::new("use")
            .unwrap()
            .search_source(Path::new("bad.yml"), "use: *undefined\n")
            .unwrap_err();
        assert!(!err.is_skippable());
        assert_eq!(err.path(), Path::new("bad.yml"));
        match err {
            FileError::Resolution {
                source: ResolutionError::DanglingAlias { anchor, position },
                ..
            } => {
                assert_eq!(anchor, "undefined");
                assert_eq!(position, Position::new(0, 5));
            }
            other => panic!("Expected dangling alias, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_is_skippable() {
        let err = QueryEngine::new("a")
            .unwrap()
            .search_source(Path::new("bad.yml"), "a: [1, 2\n")
            .unwrap_err();
        assert!(err.is_skippable());
    }

    #[test]
    fn test_invalid_query() {
        assert!(QueryEngine::new("foo.'bar").is_err());
    }

    #[test]
    fn test_display_path() {
        let hits = search("'a.b'.c", "a.b:\n  c: 1\n");
        assert_eq!(hits[0].display_path(), "\"a.b\".\"c\"");
    }
}
