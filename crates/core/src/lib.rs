//! Chord overlay simulator.
//! --------------
//! - [dht] holds the identifier space, the sorted node ring, the
//!   per-node finger tables and the iterative query router, following
//!   the Chord lookup protocol.
//! - [Simulator](simulator::Simulator) bootstraps a complete immutable
//!   network and executes parallel query workloads against it.
//! - [stats] aggregates hop-count, per-node load and degree histograms;
//!   [inspect] exports the finger graph for external tooling.
//!
//! # Bootstrap
//! A simulation starts from an identifier space of width 2^m. N fresh
//! identifiers seed the sorted ring; every node then receives its
//! predecessor link and one finger row per identifier bit, row i
//! pointing at the successor of (id + 2^i) mod 2^m. The network never
//! changes afterwards.
//!
//! # Workload
//! Queries pick a random target and originator and walk finger tables
//! until they reach the responsible node. Workloads run many queries
//! concurrently behind a semaphore admission bound; per-node counters
//! are atomic and the hop histogram sits behind a single mutex, so the
//! routing state itself stays lock-free and read-only.

pub mod consts;
pub mod dht;
pub mod error;
pub mod inspect;
pub mod simulator;
pub mod stats;

pub use dht::Id;
pub use dht::IdSpace;
pub use dht::NodeRef;
pub use dht::QueryResult;
pub use dht::SpaceKind;
pub use error::Error;
pub use error::Result;
pub use simulator::Simulator;
pub use stats::SimulationStats;
pub use stats::TopologicalStats;
