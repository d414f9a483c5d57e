//! YAML document model and parsing.
//!
//! - [`node`]: the structural node tree with source positions and anchors
//! - [`parser`]: builds node trees from `yaml-rust2` parser events

pub mod node;
pub mod parser;

pub use node::{NodeKind, Position, YamlNode, YamlValue};
pub use parser::{parse_documents, ParseError};
