//! Path queries over YAML keys.
//!
//! This module parses dotted query strings and matches them against the key
//! paths produced by the indexer.
//!
//! # Supported Syntax
//!
//! - `foo.bar` - exact key path
//! - `foo.'a.b'` / `foo."a.b"` - quoted key containing dots
//! - `foo.*.baz` - wildcard over one or more keys
//! - `.bar` - `bar` at any depth below the root
//! - `foo.` - anything below `foo`
//!
//! # Examples
//!
//! ```
//! use findyml::query::{matches, parse};
//!
//! let query = parse(".port").unwrap();
//! assert!(matches(&["services", "api", "port"], &query));
//! assert!(!matches(&["port"], &query));
//! ```

pub mod ast;
pub mod error;
pub mod matcher;
pub mod parser;

pub use ast::{ParsedQuery, Segment};
pub use error::QueryError;
pub use matcher::matches;
pub use parser::{parse, Parser};
