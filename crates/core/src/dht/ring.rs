#![warn(missing_docs)]

//! Sorted node arena of the simulated overlay.
//!
//! The ring exclusively owns every [Node]; finger entries and
//! predecessor links refer back into it through stable [NodeRef]
//! indices, which removes the cyclic ownership a pointer graph would
//! create. Membership is frozen once bootstrap finishes: indices are
//! only handed out after the last insertion, so they stay valid for
//! the lifetime of the simulation.

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use super::FingerTable;
use super::Id;
use crate::error::Error;
use crate::error::Result;

/// Stable index of a node inside the ring arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeRef(pub(crate) usize);

impl NodeRef {
    /// Position of the node in ascending identifier order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single participant of the overlay. Immutable after bootstrap
/// except for the query counter, which workload units bump atomically.
#[derive(Debug)]
pub struct Node {
    id: Id,
    finger: FingerTable,
    predecessor: NodeRef,
    in_degree: u64,
    queries_received: AtomicU64,
}

impl Node {
    fn new(id: Id) -> Self {
        Self {
            id,
            finger: FingerTable::default(),
            predecessor: NodeRef(0),
            in_degree: 0,
            queries_received: AtomicU64::new(0),
        }
    }

    /// Identifier of this node, unique within the ring.
    pub fn id(&self) -> &Id {
        &self.id
    }

    /// Routing table of this node, one row per identifier bit.
    pub fn finger_table(&self) -> &FingerTable {
        &self.finger
    }

    /// The member immediately preceding this one on the ring.
    pub fn predecessor(&self) -> NodeRef {
        self.predecessor
    }

    /// Number of distinct incoming finger edges, computed at bootstrap.
    pub fn in_degree(&self) -> u64 {
        self.in_degree
    }

    /// Number of queries this node resolved during the last workload.
    pub fn queries_received(&self) -> u64 {
        self.queries_received.load(Ordering::Relaxed)
    }

    pub(crate) fn record_query(&self) {
        self.queries_received.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn reset_queries(&self) {
        self.queries_received.store(0, Ordering::Relaxed);
    }

    pub(crate) fn set_links(&mut self, finger: FingerTable, predecessor: NodeRef, in_degree: u64) {
        self.finger = finger;
        self.predecessor = predecessor;
        self.in_degree = in_degree;
    }
}

/// All ring members in ascending identifier order.
#[derive(Debug, Default)]
pub struct Ring {
    nodes: Vec<Node>,
}

impl Ring {
    /// Insert a member keeping ascending order. Rejects an identifier
    /// that is already present.
    pub(crate) fn insert(&mut self, id: Id) -> Result<()> {
        match self.nodes.binary_search_by(|node| node.id.cmp(&id)) {
            Ok(_) => Err(Error::DuplicateIdentifier(id)),
            Err(pos) => {
                self.nodes.insert(pos, Node::new(id));
                Ok(())
            }
        }
    }

    /// First member whose identifier is strictly greater than `id`,
    /// wrapping to the minimum-id member when none qualifies.
    pub fn successor(&self, id: &Id) -> NodeRef {
        debug_assert!(!self.nodes.is_empty());
        let pos = self.nodes.partition_point(|node| node.id <= *id);
        if pos == self.nodes.len() {
            NodeRef(0)
        } else {
            NodeRef(pos)
        }
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Member behind a reference.
    pub fn node(&self, node: NodeRef) -> &Node {
        &self.nodes[node.0]
    }

    pub(crate) fn node_mut(&mut self, node: NodeRef) -> &mut Node {
        &mut self.nodes[node.0]
    }

    /// All members in ascending identifier order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Look up a member by exact identifier.
    pub fn by_id(&self, id: &Id) -> Option<NodeRef> {
        self.nodes
            .binary_search_by(|node| node.id.cmp(id))
            .ok()
            .map(NodeRef)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(ids: &[u64]) -> Ring {
        let mut ring = Ring::default();
        for &id in ids {
            ring.insert(Id::from(id)).unwrap();
        }
        ring
    }

    #[test]
    fn test_insert_keeps_ascending_order() {
        let ring = ring(&[5, 1, 7, 3]);
        let ids: Vec<_> = ring.nodes().iter().map(|n| n.id().clone()).collect();
        assert_eq!(
            ids,
            vec![Id::from(1u64), Id::from(3u64), Id::from(5u64), Id::from(7u64)]
        );
    }

    #[test]
    fn test_insert_rejects_duplicate() {
        let mut ring = ring(&[1, 3]);
        assert!(matches!(
            ring.insert(Id::from(3u64)),
            Err(Error::DuplicateIdentifier(_))
        ));
        assert_eq!(ring.len(), 2);
    }

    #[test]
    fn test_successor_is_strictly_greater() {
        let ring = ring(&[1, 3, 5, 7]);
        assert_eq!(ring.node(ring.successor(&Id::from(0u64))).id(), &Id::from(1u64));
        assert_eq!(ring.node(ring.successor(&Id::from(1u64))).id(), &Id::from(3u64));
        assert_eq!(ring.node(ring.successor(&Id::from(2u64))).id(), &Id::from(3u64));
        assert_eq!(ring.node(ring.successor(&Id::from(6u64))).id(), &Id::from(7u64));
    }

    #[test]
    fn test_successor_wraps_to_minimum() {
        let ring = ring(&[1, 3, 5, 7]);
        assert_eq!(ring.node(ring.successor(&Id::from(7u64))).id(), &Id::from(1u64));
        assert_eq!(ring.node(ring.successor(&Id::from(100u64))).id(), &Id::from(1u64));
    }

    #[test]
    fn test_by_id() {
        let ring = ring(&[1, 3, 5]);
        assert_eq!(ring.by_id(&Id::from(3u64)), Some(NodeRef(1)));
        assert_eq!(ring.by_id(&Id::from(4u64)), None);
    }
}
