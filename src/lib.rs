//! findyml - locate keys in YAML files by dotted path.
//!
//! A query such as `foo.*.bar` is matched against the canonical key path of
//! every node in every candidate file. Aliases are followed and merge keys
//! are applied, so each hit also records the aliases traversed to reach it.
//!
//! # Example
//!
//! ```
//! use findyml::find::QueryEngine;
//! use std::path::Path;
//!
//! let engine = QueryEngine::new(".k").unwrap();
//! let source = "base: &b\n  k: v\nuse: *b\n";
//! let hits = engine.search_source(Path::new("a.yml"), source).unwrap();
//!
//! assert_eq!(hits.len(), 2);
//! assert_eq!(hits[1].alias_lines, vec![3]);
//! ```

pub mod config;
pub mod document;
pub mod file;
pub mod find;
pub mod index;
pub mod query;

pub use find::{find, FileError, Hit, QueryEngine};
pub use query::QueryError;
