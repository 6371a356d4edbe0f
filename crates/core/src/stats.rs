#![warn(missing_docs)]

//! Aggregated statistics of a simulation run.
//!
//! All histograms map a non-negative count to the number of queries or
//! nodes that achieved it; iteration order is unspecified. The folds
//! producing them are commutative, so the figures do not depend on how
//! concurrent queries interleaved.

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

/// Outcome of a query workload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    /// hop_counts[h] = number of queries resolved in exactly h hops.
    pub hop_counts: HashMap<u64, u64>,

    /// Average number of hops needed for a query to reach its
    /// destination.
    pub avg_hop_count: f32,

    /// query_received_counts[q] = number of nodes that resolved exactly
    /// q queries.
    pub query_received_counts: HashMap<u64, u64>,

    /// Average number of queries resolved per node.
    pub avg_queries_received: f32,
}

/// Static degree distributions of the finger graph.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologicalStats {
    /// in_degrees[d] = number of nodes with d distinct incoming edges.
    pub in_degrees: HashMap<u64, u64>,

    /// Average number of incoming edges.
    pub avg_in_degree: f32,

    /// out_degrees[d] = number of nodes with d distinct outgoing edges.
    pub out_degrees: HashMap<u64, u64>,

    /// Average number of outgoing edges.
    pub avg_out_degree: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_serialize_round_trip() {
        let stats = SimulationStats {
            hop_counts: HashMap::from([(0, 2), (3, 5)]),
            avg_hop_count: 2.14,
            query_received_counts: HashMap::from([(1, 7)]),
            avg_queries_received: 1.0,
        };

        let json = serde_json::to_string(&stats).unwrap();
        let back: SimulationStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }
}
