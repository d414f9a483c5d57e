//! Canonical identities for mapping keys and sequence positions.
//!
//! A YAML mapping key can be any node, including a mapping or a sequence.
//! `KeyNode` reduces a key to its canonical string so that two structurally
//! identical keys compare equal no matter where they appear in the source.

use crate::document::node::{Position, YamlNode, YamlValue};
use std::hash::{Hash, Hasher};

/// The structural kind of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Scalar,
    Mapping,
    Sequence,
    /// A sequence position
    Index,
}

/// A mapping key or sequence index in canonical form.
///
/// Equality and hashing use `(kind, canonical)` only; the source position is
/// carried along for reporting.
#[derive(Debug, Clone)]
pub struct KeyNode {
    kind: KeyKind,
    canonical: String,
    position: Position,
}

impl KeyNode {
    /// Builds the key for a mapping key node.
    ///
    /// # Panics
    ///
    /// Panics if `node` is a document; the parser never produces document
    /// keys.
    pub fn from_node(node: &YamlNode) -> Self {
        let kind = match node.value() {
            YamlValue::Scalar(_) | YamlValue::Alias { .. } => KeyKind::Scalar,
            YamlValue::Mapping(_) => KeyKind::Mapping,
            YamlValue::Sequence(_) => KeyKind::Sequence,
            YamlValue::Document(_) => unreachable!("document node used as a mapping key"),
        };
        Self {
            kind,
            canonical: canonical(node),
            position: node.position(),
        }
    }

    /// Builds the key for the item at `index` of a sequence.
    pub fn index(index: usize, position: Position) -> Self {
        Self {
            kind: KeyKind::Index,
            canonical: index.to_string(),
            position,
        }
    }

    pub fn kind(&self) -> KeyKind {
        self.kind
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

impl PartialEq for KeyNode {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.canonical == other.canonical
    }
}

impl Eq for KeyNode {}

impl Hash for KeyNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.canonical.hash(state);
    }
}

impl std::fmt::Display for KeyNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical)
    }
}

/// Pending output while rendering a canonical string.
enum Step<'a> {
    Node(&'a YamlNode),
    Text(&'static str),
}

/// Renders the canonical string of a node.
///
/// - scalar: raw text, verbatim
/// - mapping: `{k:v,k:v}` in document order
/// - sequence: `[a,b]`
/// - alias: `*` followed by the anchor name
pub fn canonical(node: &YamlNode) -> String {
    let mut out = String::new();
    let mut stack = vec![Step::Node(node)];

    while let Some(step) = stack.pop() {
        match step {
            Step::Text(text) => out.push_str(text),
            Step::Node(node) => match node.value() {
                YamlValue::Scalar(text) => out.push_str(text),
                YamlValue::Alias { target, .. } => {
                    out.push('*');
                    out.push_str(target);
                }
                YamlValue::Mapping(pairs) => {
                    out.push('{');
                    stack.push(Step::Text("}"));
                    for (i, (key, value)) in pairs.iter().enumerate().rev() {
                        stack.push(Step::Node(value));
                        stack.push(Step::Text(":"));
                        stack.push(Step::Node(key));
                        if i > 0 {
                            stack.push(Step::Text(","));
                        }
                    }
                }
                YamlValue::Sequence(items) => {
                    out.push('[');
                    stack.push(Step::Text("]"));
                    for (i, item) in items.iter().enumerate().rev() {
                        stack.push(Step::Node(item));
                        if i > 0 {
                            stack.push(Step::Text(","));
                        }
                    }
                }
                YamlValue::Document(_) => unreachable!("document node inside a key"),
            },
        }
    }

    out
}
