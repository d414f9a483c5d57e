//! Key-path indexing of YAML documents.
//!
//! - [`key`]: canonical identities for mapping keys and sequence indices
//! - [`indexer`]: builds keyed trees, resolving anchors, aliases and merges
//! - [`extract`]: walks keyed trees into path entries

pub mod extract;
pub mod indexer;
pub mod key;

pub use extract::{walk, Extractor, PathEntry};
pub use indexer::{AnchorTable, Child, Indexed, NodeIndexer, ResolutionError, DEFAULT_MAX_DEPTH};
pub use key::{canonical, KeyKind, KeyNode};
