//! Builds canonical key-path trees from YAML node trees.
//!
//! The indexer turns a document into nested [`Indexed`] structures keyed by
//! [`KeyNode`]s, resolving aliases against a per-file [`AnchorTable`] and
//! splicing merge keys (`<<`) into their enclosing mapping.
//!
//! Construction uses an explicit frame stack rather than recursion, so deep
//! documents cost heap instead of call stack, and an alias to an anchor that
//! is still under construction is detected as a cycle.
//!
//! # Example
//!
//! ```
//! use findyml::document::parse_documents;
//! use findyml::index::{AnchorTable, NodeIndexer};
//!
//! let docs = parse_documents("base: &b {k: v}\nuse: *b\n").unwrap();
//! let mut anchors = AnchorTable::new();
//! let indexed = NodeIndexer::new(&mut anchors).index(&docs[0]).unwrap();
//!
//! let keys: Vec<_> = indexed.children().iter().map(|c| c.key.canonical()).collect();
//! assert_eq!(keys, vec!["base", "use"]);
//! ```

use super::key::KeyNode;
use crate::document::node::{Position, YamlNode, YamlValue};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

/// Default limit on collection nesting accepted by the indexer.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Failures while resolving the structure of a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("dangling alias *{anchor} at {position}")]
    DanglingAlias { anchor: String, position: Position },

    #[error("cyclic alias *{anchor} at {position} refers to a node that contains it")]
    CyclicAlias { anchor: String, position: Position },

    #[error("merge key at {position} does not refer to a mapping")]
    InvalidMerge { position: Position },

    #[error("nesting deeper than {limit} levels at {position}")]
    DepthExceeded { limit: usize, position: Position },
}

/// An indexed node: a leaf, or an ordered list of keyed children.
#[derive(Debug, Clone, PartialEq)]
pub enum Indexed {
    Leaf,
    Map(Vec<Child>),
    Seq(Vec<Child>),
}

/// One keyed child of a mapping or sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Child {
    pub key: KeyNode,
    pub node: Rc<Indexed>,
    /// Positions of the aliases traversed to reach this child, outermost first
    pub aliases: Vec<Position>,
}

impl Indexed {
    pub fn children(&self) -> &[Child] {
        match self {
            Indexed::Leaf => &[],
            Indexed::Map(children) | Indexed::Seq(children) => children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Indexed::Leaf)
    }

    /// Returns a copy whose children record that they were reached through
    /// the alias at `alias`. Grandchildren are shared, not copied.
    pub fn through_alias(&self, alias: Position) -> Indexed {
        match self {
            Indexed::Leaf => Indexed::Leaf,
            Indexed::Map(children) => Indexed::Map(prepend_alias(children, alias)),
            Indexed::Seq(children) => Indexed::Seq(prepend_alias(children, alias)),
        }
    }
}

fn prepend_alias(children: &[Child], alias: Position) -> Vec<Child> {
    children
        .iter()
        .map(|child| Child {
            key: child.key.clone(),
            node: Rc::clone(&child.node),
            aliases: std::iter::once(alias)
                .chain(child.aliases.iter().copied())
                .collect(),
        })
        .collect()
}

#[derive(Debug)]
enum Slot {
    /// The anchored node is still being indexed
    Pending(u64),
    Ready { node: Rc<Indexed>, origin: Position },
}

/// Anchors defined so far in one file.
///
/// An anchor is defined where its node starts. Redefining a name shadows
/// the earlier definition for every alias that follows.
#[derive(Debug, Default)]
pub struct AnchorTable {
    slots: HashMap<String, Slot>,
    generation: u64,
}

impl AnchorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fully indexed node under `name`.
    pub fn register(&mut self, name: &str, node: Rc<Indexed>, origin: Position) {
        self.slots
            .insert(name.to_string(), Slot::Ready { node, origin });
    }

    /// Returns the indexed node and origin registered under `name`, if it is
    /// complete.
    pub fn get(&self, name: &str) -> Option<(&Rc<Indexed>, Position)> {
        match self.slots.get(name)? {
            Slot::Ready { node, origin } => Some((node, *origin)),
            Slot::Pending(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Resolves an alias at `position` to the node registered under
    /// `target`. Errors report the alias by its written `name`.
    pub fn resolve(
        &self,
        target: &str,
        name: &str,
        position: Position,
    ) -> Result<Rc<Indexed>, ResolutionError> {
        match self.slots.get(target) {
            None => Err(ResolutionError::DanglingAlias {
                anchor: name.to_string(),
                position,
            }),
            Some(Slot::Pending(_)) => Err(ResolutionError::CyclicAlias {
                anchor: name.to_string(),
                position,
            }),
            Some(Slot::Ready { node, .. }) if node.is_leaf() => Ok(Rc::clone(node)),
            Some(Slot::Ready { node, .. }) => Ok(Rc::new(node.through_alias(position))),
        }
    }

    fn begin(&mut self, name: &str) -> u64 {
        self.generation += 1;
        self.slots
            .insert(name.to_string(), Slot::Pending(self.generation));
        self.generation
    }

    /// Completes a definition started by `begin`, unless a later definition
    /// of the same name has shadowed it in the meantime.
    fn complete(&mut self, name: &str, generation: u64, node: Rc<Indexed>, origin: Position) {
        if let Some(slot) = self.slots.get_mut(name) {
            if matches!(slot, Slot::Pending(g) if *g == generation) {
                *slot = Slot::Ready { node, origin };
            }
        }
    }
}

/// A mapping entry during construction.
struct Entry {
    node: Rc<Indexed>,
    aliases: Vec<Position>,
    /// Provided by a merge key rather than declared locally
    merged: bool,
}

/// What the value currently being indexed will become.
enum Pending {
    Merge(Position),
    Key(KeyNode),
}

enum Body<'a> {
    Mapping {
        pairs: &'a [(YamlNode, YamlNode)],
        next: usize,
        entries: IndexMap<KeyNode, Entry>,
        pending: Option<Pending>,
    },
    Sequence {
        items: &'a [YamlNode],
        next: usize,
        children: Vec<Child>,
    },
}

/// A collection whose children are being indexed.
struct Frame<'a> {
    node: &'a YamlNode,
    /// Set when the collection carries an anchor
    generation: Option<u64>,
    body: Body<'a>,
}

impl<'a> Frame<'a> {
    fn next_child(&mut self) -> Option<&'a YamlNode> {
        match &mut self.body {
            Body::Mapping {
                pairs,
                next,
                pending,
                ..
            } => {
                let pairs: &'a [(YamlNode, YamlNode)] = *pairs;
                let (key, value) = pairs.get(*next)?;
                *next += 1;
                *pending = Some(if key.is_merge_key() {
                    Pending::Merge(key.position())
                } else {
                    Pending::Key(KeyNode::from_node(key))
                });
                Some(value)
            }
            Body::Sequence { items, next, .. } => {
                let items: &'a [YamlNode] = *items;
                let item = items.get(*next)?;
                *next += 1;
                Some(item)
            }
        }
    }

    fn accept(&mut self, done: Rc<Indexed>) -> Result<(), ResolutionError> {
        match &mut self.body {
            Body::Mapping {
                entries, pending, ..
            } => match pending.take().expect("value indexed without a pending key") {
                Pending::Merge(position) => merge_into(entries, &done, position),
                Pending::Key(key) => {
                    // Last occurrence wins and moves to the end.
                    entries.shift_remove(&key);
                    entries.insert(
                        key,
                        Entry {
                            node: done,
                            aliases: Vec::new(),
                            merged: false,
                        },
                    );
                    Ok(())
                }
            },
            Body::Sequence {
                items, children, ..
            } => {
                let index = children.len();
                children.push(Child {
                    key: KeyNode::index(index, items[index].position()),
                    node: done,
                    aliases: Vec::new(),
                });
                Ok(())
            }
        }
    }

    fn into_indexed(self) -> Indexed {
        match self.body {
            Body::Mapping { entries, .. } => Indexed::Map(
                entries
                    .into_iter()
                    .map(|(key, entry)| Child {
                        key,
                        node: entry.node,
                        aliases: entry.aliases,
                    })
                    .collect(),
            ),
            Body::Sequence { children, .. } => Indexed::Seq(children),
        }
    }
}

/// Splices a merge source into a mapping under construction.
///
/// Local keys always win over merged ones. A later merge key overrides what
/// an earlier one provided. For a sequence of mappings, earlier mappings
/// take precedence.
fn merge_into(
    entries: &mut IndexMap<KeyNode, Entry>,
    source: &Indexed,
    position: Position,
) -> Result<(), ResolutionError> {
    let provided: Vec<Child> = match source {
        Indexed::Map(children) => children.clone(),
        Indexed::Seq(items) => {
            let mut collected: IndexMap<KeyNode, Child> = IndexMap::new();
            for item in items {
                let Indexed::Map(children) = item.node.as_ref() else {
                    return Err(ResolutionError::InvalidMerge { position });
                };
                for child in children {
                    collected.entry(child.key.clone()).or_insert_with(|| Child {
                        key: child.key.clone(),
                        node: Rc::clone(&child.node),
                        aliases: item
                            .aliases
                            .iter()
                            .chain(child.aliases.iter())
                            .copied()
                            .collect(),
                    });
                }
            }
            collected.into_values().collect()
        }
        Indexed::Leaf => return Err(ResolutionError::InvalidMerge { position }),
    };

    for child in provided {
        let entry = Entry {
            node: child.node,
            aliases: child.aliases,
            merged: true,
        };
        match entries.get_mut(&child.key) {
            Some(existing) if !existing.merged => {}
            Some(existing) => *existing = entry,
            None => {
                entries.insert(child.key, entry);
            }
        }
    }
    Ok(())
}

/// Indexes YAML node trees against an anchor table.
pub struct NodeIndexer<'t> {
    anchors: &'t mut AnchorTable,
    max_depth: usize,
}

impl<'t> NodeIndexer<'t> {
    pub fn new(anchors: &'t mut AnchorTable) -> Self {
        Self {
            anchors,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the maximum collection nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Indexes a document (or any node) into its keyed structure.
    ///
    /// Anchors defined along the way are registered in the anchor table and
    /// remain visible to later documents of the same file.
    ///
    /// # Errors
    ///
    /// Returns a `ResolutionError` for dangling or cyclic aliases, merge keys
    /// that do not refer to mappings, and documents nested deeper than the
    /// configured limit.
    pub fn index(&mut self, node: &YamlNode) -> Result<Rc<Indexed>, ResolutionError> {
        let root = match node.value() {
            YamlValue::Document(Some(root)) => root.as_ref(),
            YamlValue::Document(None) => return Ok(Rc::new(Indexed::Leaf)),
            _ => node,
        };

        let mut stack: Vec<Frame<'_>> = Vec::new();
        let mut ready = self.enter(root, &mut stack)?;

        loop {
            if let Some(done) = ready.take() {
                match stack.last_mut() {
                    None => return Ok(done),
                    Some(frame) => frame.accept(done)?,
                }
            }

            let frame = stack.last_mut().expect("indexer frame stack is empty");
            ready = match frame.next_child() {
                Some(child) => self.enter(child, &mut stack)?,
                None => {
                    let frame = stack.pop().expect("indexer frame stack is empty");
                    Some(self.finish(frame))
                }
            };
        }
    }

    /// Starts indexing `node`. Leaves and aliases complete immediately;
    /// collections push a frame and complete later.
    fn enter<'a>(
        &mut self,
        node: &'a YamlNode,
        stack: &mut Vec<Frame<'a>>,
    ) -> Result<Option<Rc<Indexed>>, ResolutionError> {
        let body = match node.value() {
            YamlValue::Scalar(_) => {
                let leaf = Rc::new(Indexed::Leaf);
                if let Some(name) = node.anchor() {
                    self.anchors
                        .register(name, Rc::clone(&leaf), node.position());
                }
                return Ok(Some(leaf));
            }
            YamlValue::Alias { target, name } => {
                return self
                    .anchors
                    .resolve(target, name, node.position())
                    .map(Some);
            }
            YamlValue::Mapping(pairs) => Body::Mapping {
                pairs,
                next: 0,
                entries: IndexMap::with_capacity(pairs.len()),
                pending: None,
            },
            YamlValue::Sequence(items) => Body::Sequence {
                items,
                next: 0,
                children: Vec::with_capacity(items.len()),
            },
            YamlValue::Document(_) => unreachable!("document nested inside a document"),
        };

        if stack.len() >= self.max_depth {
            return Err(ResolutionError::DepthExceeded {
                limit: self.max_depth,
                position: node.position(),
            });
        }

        let generation = node.anchor().map(|name| self.anchors.begin(name));
        stack.push(Frame {
            node,
            generation,
            body,
        });
        Ok(None)
    }

    fn finish(&mut self, frame: Frame<'_>) -> Rc<Indexed> {
        let node = frame.node;
        let generation = frame.generation;
        let indexed = Rc::new(frame.into_indexed());

        if let (Some(name), Some(generation)) = (node.anchor(), generation) {
            self.anchors
                .complete(name, generation, Rc::clone(&indexed), node.position());
        }
        indexed
    }
}
