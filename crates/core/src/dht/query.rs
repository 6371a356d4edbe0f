#![warn(missing_docs)]

//! Iterative query routing over the finger graph.
//!
//! A lookup walks from its originator toward the member responsible
//! for the target key. At every step the current node either claims
//! the key (it falls on the arc between its predecessor and itself) or
//! forwards along the highest finger whose target lies between the
//! current node and the key. On a correctly built network this
//! resolves in O(log N) expected hops.

use super::Id;
use super::NodeRef;
use super::Ring;

/// Trace of a single lookup: the target key and every node it visited.
/// `hops[0]` is the originator, the final hop is the responsible node.
#[derive(Clone, Debug)]
pub struct QueryResult {
    target: Id,
    hops: Vec<NodeRef>,
}

impl QueryResult {
    /// The identifier searched by this query.
    pub fn target(&self) -> &Id {
        &self.target
    }

    /// The node from which the query started.
    pub fn origin(&self) -> NodeRef {
        self.hops[0]
    }

    /// Every node the query was routed through, in visiting order.
    pub fn hops(&self) -> &[NodeRef] {
        &self.hops
    }

    /// The node responsible for the target identifier.
    pub fn result(&self) -> NodeRef {
        *self.hops.last().expect("hops is never empty")
    }

    /// Number of forwarding steps taken.
    pub fn hop_count(&self) -> u64 {
        (self.hops.len() - 1) as u64
    }
}

/// Route a lookup for `target` starting at `origin`.
///
/// Panics with "routing did not advance" when no finger makes progress
/// or the same node is visited twice in a row; that can only happen on
/// a miswired network and is an invariant violation, not a recoverable
/// condition.
pub(crate) fn route(ring: &Ring, target: Id, origin: NodeRef) -> QueryResult {
    let mut hops = vec![origin];
    let mut current = origin;

    loop {
        let node = ring.node(current);
        let pred = node.predecessor();

        // Direct hit on the current node.
        if *node.id() == target {
            break;
        }

        // A single-member ring owns the whole identifier space.
        if pred == current {
            break;
        }

        if target.is_on_arc(ring.node(pred).id(), node.id()) {
            // The key falls between the predecessor and this node, so
            // this node is its successor, unless the key is exactly the
            // predecessor's identifier; then the predecessor resolves it.
            if *ring.node(pred).id() == target {
                current = pred;
            } else {
                break;
            }
        } else {
            // Forward along the highest finger whose target lies on the
            // arc between the current node and the key.
            for entry in node.finger_table().entries().iter().rev() {
                if entry.target.is_on_arc(node.id(), &target) {
                    current = entry.node;
                    break;
                }
            }
        }

        let previous = *hops.last().expect("hops is never empty");
        if previous == current {
            panic!(
                "routing did not advance at node {} while looking up {}",
                ring.node(current).id(),
                target
            );
        }
        tracing::trace!(at = %ring.node(current).id(), key = %target, "query forwarded");
        hops.push(current);
    }

    QueryResult { target, hops }
}
