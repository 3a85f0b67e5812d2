//! Node identifier for the block arena.
//!
//! Blocks are stored in a flat vector and addressed by [`NodeId`]. The newtype keeps
//! arena indices from being confused with program offsets or local identifiers, which
//! are all plain integers as well.

use std::fmt;

/// A strongly-typed index of a node within a [`DirectedGraph`](crate::utils::graph::DirectedGraph).
///
/// Node IDs are assigned sequentially starting from 0 in the order nodes are added.
/// For a control flow graph this is block *creation* order, which differs from
/// block *discovery* order when a forward branch creates its target block early.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Creates a new `NodeId` from a raw index value.
    ///
    /// Normal usage obtains IDs from
    /// [`DirectedGraph::add_node`](crate::utils::graph::DirectedGraph::add_node).
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        NodeId(index)
    }

    /// Returns the raw index, usable for per-node side tables.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl From<usize> for NodeId {
    #[inline]
    fn from(index: usize) -> Self {
        NodeId(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_index() {
        assert_eq!(NodeId::new(7).index(), 7);
        let node: NodeId = 3usize.into();
        assert_eq!(node, NodeId::new(3));
    }

    #[test]
    fn test_node_id_ordering() {
        let mut nodes = vec![NodeId::new(2), NodeId::new(0), NodeId::new(1)];
        nodes.sort();
        assert_eq!(nodes, vec![NodeId::new(0), NodeId::new(1), NodeId::new(2)]);
    }

    #[test]
    fn test_node_id_formatting() {
        assert_eq!(format!("{:?}", NodeId::new(42)), "NodeId(42)");
        assert_eq!(format!("{}", NodeId::new(42)), "n42");
    }
}
