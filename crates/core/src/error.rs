//! Error of chord_sim_core

use crate::dht::Id;

/// Recoverable failures surfaced to the caller. Fatal conditions
/// (entropy source failure, a routing stall on a miswired network) are
/// invariant violations and terminate the process with a diagnostic
/// instead of appearing here.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("duplicate node identifier: {0}")]
    DuplicateIdentifier(Id),

    #[error("identifier space bit length must be positive")]
    BitLengthZero,

    #[error("network must contain at least one node")]
    NodeCountZero,

    #[error("cannot place {num_nodes} distinct nodes in an identifier space of 2^{bit_length} positions")]
    NodeCountExceedsSpace { num_nodes: u64, bit_length: u32 },

    #[error("identifier is not a base-10 integer: {0}")]
    IdentifierParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias of this crate.
pub type Result<T> = std::result::Result<T, Error>;
