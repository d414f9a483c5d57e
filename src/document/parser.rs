//! YAML parsing into structural node trees.
//!
//! This module drives the `yaml-rust2` event parser and assembles its events
//! into `YamlNode` trees, one per document in the stream. Scalars are kept as
//! raw text, positions are normalized to 0-based line/column pairs, and
//! anchors are named after the anchor ids `yaml-rust2` assigns.
//!
//! `yaml-rust2` resolves alias names while parsing. Redefining an anchor
//! allocates a fresh id, so every alias already points at the most recent
//! definition of its name, and an alias to an undefined anchor is rejected
//! as an `UnknownAnchor` error.
//!
//! # Example
//!
//! ```
//! use findyml::document::parser::parse_documents;
//! use findyml::document::node::YamlValue;
//!
//! let docs = parse_documents("name: test\n---\nother: doc\n").unwrap();
//! assert_eq!(docs.len(), 2);
//! assert!(matches!(docs[0].value(), YamlValue::Document(Some(_))));
//! ```

use super::node::{Position, YamlNode};
use thiserror::Error;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, ScanError};

/// Errors raised by the structural YAML parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Malformed YAML syntax
    #[error("{message} at line {line} column {column}")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
    },
    /// An alias names an anchor that was never defined
    #[error("alias *{anchor} at line {line} column {column} refers to an unknown anchor")]
    UnknownAnchor {
        anchor: String,
        line: usize,
        column: usize,
    },
}

impl ParseError {
    /// Converts a `yaml-rust2` scan error. Lines and columns are 1-based.
    fn from_scan(err: &ScanError, source: &str) -> Self {
        let marker = err.marker();
        let line = marker.line();
        let column = marker.col() + 1;
        if err.info().contains("unknown anchor") {
            ParseError::UnknownAnchor {
                anchor: alias_name_at(source, marker).unwrap_or_else(|| "?".to_string()),
                line,
                column,
            }
        } else {
            ParseError::Syntax {
                message: err.info().to_string(),
                line,
                column,
            }
        }
    }
}

/// Reads the alias name (`*name`) starting at `marker` in the source.
fn alias_name_at(source: &str, marker: &Marker) -> Option<String> {
    let line = source.lines().nth(marker.line().checked_sub(1)?)?;
    let mut chars = line.chars().skip(marker.col());
    if chars.next()? != '*' {
        return None;
    }
    let name: String = chars
        .take_while(|c| !c.is_whitespace() && !matches!(c, ',' | '[' | ']' | '{' | '}'))
        .collect();
    (!name.is_empty()).then_some(name)
}

/// Parses every document in a YAML stream.
///
/// Returns one `Document` node per document, in stream order. An empty
/// stream yields no documents.
///
/// # Errors
///
/// Returns a `ParseError` if the input is not well-formed YAML or an alias
/// refers to an undefined anchor.
pub fn parse_documents(source: &str) -> Result<Vec<YamlNode>, ParseError> {
    let mut parser = Parser::new_from_str(source);
    let mut builder = TreeBuilder {
        source,
        stack: Vec::new(),
        root: None,
        documents: Vec::new(),
    };

    parser
        .load(&mut builder, true)
        .map_err(|err| ParseError::from_scan(&err, source))?;

    Ok(builder.documents)
}

/// Assembles parser events into `YamlNode` trees.
struct TreeBuilder<'s> {
    /// Source text, for recovering alias names
    source: &'s str,
    /// Collections still waiting for their end event
    stack: Vec<Frame>,
    /// Root of the document being built
    root: Option<YamlNode>,
    /// Completed documents
    documents: Vec<YamlNode>,
}

/// A collection being constructed.
enum Frame {
    Sequence {
        anchor: Option<String>,
        start: Position,
        items: Vec<YamlNode>,
    },
    /// Keys and values alternate in `children`
    Mapping {
        anchor: Option<String>,
        start: Position,
        children: Vec<YamlNode>,
    },
}

/// Converts a `yaml-rust2` marker (1-based line, 0-based column).
fn position(marker: &Marker) -> Position {
    Position::new(marker.line().saturating_sub(1), marker.col())
}

/// Anchor id 0 means "no anchor".
fn anchor_name(anchor_id: usize) -> Option<String> {
    (anchor_id > 0).then(|| anchor_id.to_string())
}

fn anchored(node: YamlNode, anchor: Option<String>) -> YamlNode {
    match anchor {
        Some(name) => node.with_anchor(name),
        None => node,
    }
}

impl TreeBuilder<'_> {
    fn push_complete(&mut self, node: YamlNode) {
        match self.stack.last_mut() {
            None => self.root = Some(node),
            Some(Frame::Sequence { items, .. }) => items.push(node),
            Some(Frame::Mapping { children, .. }) => children.push(node),
        }
    }
}

impl MarkedEventReceiver for TreeBuilder<'_> {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        match ev {
            Event::Nothing | Event::StreamStart | Event::StreamEnd => {}

            Event::DocumentStart => {
                self.root = None;
            }

            Event::DocumentEnd => {
                let root = self.root.take();
                self.documents.push(YamlNode::document(root));
            }

            Event::Scalar(value, _style, anchor_id, _tag) => {
                let node = YamlNode::scalar(value, position(&marker));
                self.push_complete(anchored(node, anchor_name(anchor_id)));
            }

            Event::Alias(anchor_id) => {
                let target = anchor_id.to_string();
                let name = alias_name_at(self.source, &marker).unwrap_or_else(|| target.clone());
                self.push_complete(YamlNode::named_alias(target, name, position(&marker)));
            }

            Event::SequenceStart(anchor_id, _tag) => {
                self.stack.push(Frame::Sequence {
                    anchor: anchor_name(anchor_id),
                    start: position(&marker),
                    items: Vec::new(),
                });
            }

            Event::MappingStart(anchor_id, _tag) => {
                self.stack.push(Frame::Mapping {
                    anchor: anchor_name(anchor_id),
                    start: position(&marker),
                    children: Vec::new(),
                });
            }

            Event::SequenceEnd => {
                let Some(Frame::Sequence {
                    anchor,
                    start,
                    items,
                }) = self.stack.pop()
                else {
                    panic!("SequenceEnd without SequenceStart");
                };
                self.push_complete(anchored(YamlNode::sequence(items, start), anchor));
            }

            Event::MappingEnd => {
                let Some(Frame::Mapping {
                    anchor,
                    start,
                    children,
                }) = self.stack.pop()
                else {
                    panic!("MappingEnd without MappingStart");
                };
                assert!(children.len() % 2 == 0, "mapping key without value");

                let mut pairs = Vec::with_capacity(children.len() / 2);
                let mut children = children.into_iter();
                while let (Some(key), Some(value)) = (children.next(), children.next()) {
                    pairs.push((key, value));
                }
                self.push_complete(anchored(YamlNode::mapping(pairs, start), anchor));
            }
        }
    }
}
