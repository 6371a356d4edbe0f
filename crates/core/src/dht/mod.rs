#![warn(missing_docs)]
//! Chord identifier space, ring, finger tables, and query routing,
//! ref: <https://pdos.csail.mit.edu/papers/ton:chord/paper-ton.pdf>.
//! With high probability, the number of nodes that must be contacted to
//! resolve a lookup in an N-node network is O(log N).

/// Finger table routing index
pub mod finger;
pub mod id;
pub mod query;
pub mod ring;
pub mod space;

pub use finger::FingerEntry;
pub use finger::FingerTable;
pub use id::Id;
pub use query::QueryResult;
pub(crate) use query::route;
pub use ring::Node;
pub use ring::NodeRef;
pub use ring::Ring;
pub use space::IdSpace;
pub use space::SpaceKind;
