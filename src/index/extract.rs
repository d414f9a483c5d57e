//! Pre-order traversal of indexed structures into path entries.

use super::indexer::Indexed;
use crate::document::node::Position;
use std::rc::Rc;

/// One node reached while walking an indexed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    /// Canonical key segments from the document root
    pub path: Vec<String>,
    /// True if the node has no children
    pub terminal: bool,
    /// Position of the key (or sequence item) in the source
    pub position: Position,
    /// Positions of every alias traversed to reach this node, outermost first
    pub aliases: Vec<Position>,
}

struct Level {
    node: Rc<Indexed>,
    next: usize,
    path: Vec<String>,
    aliases: Vec<Position>,
}

/// Lazily yields one `PathEntry` per node, depth-first in document order.
///
/// The walk keeps its own stack, so aliased subtrees are expanded without
/// recursion.
pub struct Extractor {
    stack: Vec<Level>,
}

impl Extractor {
    pub fn new(root: Rc<Indexed>) -> Self {
        Self {
            stack: vec![Level {
                node: root,
                next: 0,
                path: Vec::new(),
                aliases: Vec::new(),
            }],
        }
    }
}

impl Iterator for Extractor {
    type Item = PathEntry;

    fn next(&mut self) -> Option<PathEntry> {
        loop {
            let level = self.stack.last_mut()?;
            let Some(child) = level.node.children().get(level.next) else {
                self.stack.pop();
                continue;
            };
            level.next += 1;

            let mut path = level.path.clone();
            path.push(child.key.canonical().to_string());
            let mut aliases = level.aliases.clone();
            aliases.extend_from_slice(&child.aliases);

            let entry = PathEntry {
                path,
                terminal: child.node.is_leaf(),
                position: child.key.position(),
                aliases,
            };

            if !entry.terminal {
                let node = Rc::clone(&child.node);
                self.stack.push(Level {
                    node,
                    next: 0,
                    path: entry.path.clone(),
                    aliases: entry.aliases.clone(),
                });
            }
            return Some(entry);
        }
    }
}

/// Walks `root`, collecting every path entry.
pub fn walk(root: Rc<Indexed>) -> Vec<PathEntry> {
    Extractor::new(root).collect()
}
