//! Per-container memoization of value-like nodes.

use std::collections::HashMap;

use crate::ir::node::{Node, NodeId};

/// Maps a node value to the canonical id it was first allocated under.
///
/// Correctness of the codec never depends on whether a lookup hits; interning only keeps the
/// arena small when the same scalar is emitted many times.
#[derive(Default, Debug, Clone)]
pub struct Interner {
    ids: HashMap<Node, NodeId>,
}

impl Interner {
    /// Canonical id previously recorded for `node`, if any.
    #[must_use]
    pub fn get(&self, node: &Node) -> Option<NodeId> {
        self.ids.get(node).copied()
    }

    /// Records `id` as canonical for `node` unless one is already known. Tuples are ignored.
    pub fn record(&mut self, node: &Node, id: NodeId) {
        if node.is_interned() {
            self.ids.entry(node.clone()).or_insert(id);
        }
    }

    /// Number of memoized values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if nothing has been memoized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::node::Constant;

    #[test]
    fn first_id_wins() {
        let mut interner = Interner::default();
        let node = Node::Constant(Constant::int(32, 7));
        interner.record(&node, NodeId(3));
        interner.record(&node, NodeId(9));
        assert_eq!(interner.get(&node), Some(NodeId(3)));
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn tuples_skipped() {
        let mut interner = Interner::default();
        interner.record(&Node::Tuple(vec![None]), NodeId(0));
        assert!(interner.is_empty());
    }
}
