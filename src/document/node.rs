//! YAML node representation with source positions.
//!
//! This module provides the structural node tree that the rest of findyml
//! consumes. A `YamlNode` is deliberately untyped: scalars keep their raw
//! text exactly as written, so `yes`, `2020-01-01` and `:symbol` are all
//! opaque strings. Every node remembers where it started in the source and,
//! for scalars and collections, the anchor attached to it.
//!
//! # Example
//!
//! ```
//! use findyml::document::node::{Position, YamlNode, YamlValue};
//!
//! let key = YamlNode::scalar("name", Position::new(0, 0));
//! let value = YamlNode::scalar("Alice", Position::new(0, 6));
//! let map = YamlNode::mapping(vec![(key, value)], Position::new(0, 0));
//!
//! assert!(matches!(map.value(), YamlValue::Mapping(pairs) if pairs.len() == 1));
//! ```

use serde::Serialize;

/// A 0-based line/column location in the original YAML source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize)]
pub struct Position {
    /// Line number (0-based)
    pub line: usize,
    /// Column number (0-based, in characters)
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Line number as shown to users (1-based).
    pub fn display_line(&self) -> usize {
        self.line + 1
    }

    /// Column number as shown to users (1-based).
    pub fn display_column(&self) -> usize {
        self.column + 1
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.display_line(), self.display_column())
    }
}

/// The kind of a YAML node, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Scalar,
    Mapping,
    Sequence,
    Alias,
    Document,
}

/// The payload of a YAML node.
#[derive(Debug, Clone, PartialEq)]
pub enum YamlValue {
    /// Raw scalar text, no type inference applied
    Scalar(String),
    /// Key/value pairs in document order (duplicates preserved)
    Mapping(Vec<(YamlNode, YamlNode)>),
    /// Items in document order
    Sequence(Vec<YamlNode>),
    /// Reference to a previously anchored node. `target` is the anchor's
    /// identity; `name` is the alias as written, for diagnostics.
    Alias { target: String, name: String },
    /// A document root; `None` for an empty document
    Document(Option<Box<YamlNode>>),
}

/// A node in the structural YAML tree.
#[derive(Debug, Clone, PartialEq)]
pub struct YamlNode {
    value: YamlValue,
    anchor: Option<String>,
    position: Position,
}

impl YamlNode {
    /// Creates a node from a value and its starting position.
    pub fn new(value: YamlValue, position: Position) -> Self {
        Self {
            value,
            anchor: None,
            position,
        }
    }

    pub fn scalar(text: impl Into<String>, position: Position) -> Self {
        Self::new(YamlValue::Scalar(text.into()), position)
    }

    pub fn mapping(pairs: Vec<(YamlNode, YamlNode)>, position: Position) -> Self {
        Self::new(YamlValue::Mapping(pairs), position)
    }

    pub fn sequence(items: Vec<YamlNode>, position: Position) -> Self {
        Self::new(YamlValue::Sequence(items), position)
    }

    /// An alias whose written name is its target.
    pub fn alias(anchor: impl Into<String>, position: Position) -> Self {
        let target = anchor.into();
        Self::named_alias(target.clone(), target, position)
    }

    pub fn named_alias(
        target: impl Into<String>,
        name: impl Into<String>,
        position: Position,
    ) -> Self {
        Self::new(
            YamlValue::Alias {
                target: target.into(),
                name: name.into(),
            },
            position,
        )
    }

    /// Wraps a document root. The document takes the root's position, or
    /// the origin for an empty document.
    pub fn document(root: Option<YamlNode>) -> Self {
        let position = root.as_ref().map(|r| r.position).unwrap_or_default();
        Self::new(YamlValue::Document(root.map(Box::new)), position)
    }

    /// Attaches an anchor name to this node.
    ///
    /// Only scalars, mappings and sequences may carry anchors; the parser
    /// never produces anchored aliases or documents.
    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        debug_assert!(matches!(
            self.kind(),
            NodeKind::Scalar | NodeKind::Mapping | NodeKind::Sequence
        ));
        self.anchor = Some(anchor.into());
        self
    }

    pub fn value(&self) -> &YamlValue {
        &self.value
    }

    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn kind(&self) -> NodeKind {
        match self.value {
            YamlValue::Scalar(_) => NodeKind::Scalar,
            YamlValue::Mapping(_) => NodeKind::Mapping,
            YamlValue::Sequence(_) => NodeKind::Sequence,
            YamlValue::Alias { .. } => NodeKind::Alias,
            YamlValue::Document(_) => NodeKind::Document,
        }
    }

    /// Returns the scalar text if this node is a scalar.
    pub fn as_scalar(&self) -> Option<&str> {
        match &self.value {
            YamlValue::Scalar(text) => Some(text),
            _ => None,
        }
    }

    /// Returns true if this is the `<<` merge key.
    pub fn is_merge_key(&self) -> bool {
        self.as_scalar() == Some("<<")
    }
}
