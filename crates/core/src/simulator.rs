#![warn(missing_docs)]

//! The simulator owns the whole state of a Chord overlay simulation:
//! the identifier space, the node arena, and every finger link.
//!
//! Bootstrap is single-threaded and leaves the network immutable; the
//! query workload then runs in parallel against read-only routing
//! state, touching only atomic per-node counters and one small mutex
//! around the hop histogram.

use std::collections::HashMap;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use futures::future::join_all;
use num_bigint::BigUint;
use rand::Rng;
use tokio::sync::Semaphore;

use crate::dht::route;
use crate::dht::FingerEntry;
use crate::dht::FingerTable;
use crate::dht::Id;
use crate::dht::IdSpace;
use crate::dht::Node;
use crate::dht::NodeRef;
use crate::dht::QueryResult;
use crate::dht::Ring;
use crate::error::Error;
use crate::error::Result;
use crate::stats::SimulationStats;
use crate::stats::TopologicalStats;

/// A complete simulated Chord network.
///
/// Construction seeds the ring from the identifier space, wires every
/// predecessor link, and resolves all N·m finger entries. The network
/// never changes afterwards; external consumers only hold read-only
/// references into it.
pub struct Simulator {
    space: IdSpace,
    ring: Ring,
}

impl Simulator {
    /// Bootstrap a network of `num_nodes` members drawn from `space`.
    ///
    /// Fails with [Error::DuplicateIdentifier] when the space hands out
    /// an identifier that is already on the ring; callers may retry
    /// with another seed or different parameters.
    pub fn new(num_nodes: u64, space: IdSpace) -> Result<Self> {
        if num_nodes == 0 {
            return Err(Error::NodeCountZero);
        }
        if BigUint::from(num_nodes) > *space.width() {
            return Err(Error::NodeCountExceedsSpace {
                num_nodes,
                bit_length: space.bit_length(),
            });
        }

        let mut ring = Ring::default();
        for _ in 0..num_nodes {
            ring.insert(space.random())?;
        }

        let mut sim = Self { space, ring };
        sim.build_links();
        tracing::debug!(
            num_nodes,
            bit_length = sim.space.bit_length(),
            "network bootstrap complete"
        );
        Ok(sim)
    }

    /// Resolve every finger table against the frozen ring, then apply
    /// predecessor links and the distinct-edge in-degrees in a second
    /// pass.
    fn build_links(&mut self) {
        let n = self.ring.len();
        let m = self.space.bit_length();

        let mut tables: Vec<FingerTable> = Vec::with_capacity(n);
        for index in 0..n {
            let node_id = self.ring.node(NodeRef(index)).id().clone();
            let mut table = FingerTable::with_capacity(m as usize);
            for i in 0..m {
                let target = self.space.finger_target(&node_id, i);
                let node = self.ring.successor(&target);
                table.push(FingerEntry { target, node });
            }
            tables.push(table);
        }

        // Finger rows that repeat the previous successor share one
        // physical link, so only the collapsed rows count as edges.
        let mut in_degrees = vec![0u64; n];
        for table in &tables {
            for link in table.distinct_links() {
                in_degrees[link.index()] += 1;
            }
        }

        for (index, table) in tables.into_iter().enumerate() {
            let predecessor = NodeRef((index + n - 1) % n);
            self.ring
                .node_mut(NodeRef(index))
                .set_links(table, predecessor, in_degrees[index]);
        }
    }

    /// The identifier space this network was seeded from.
    pub fn id_space(&self) -> &IdSpace {
        &self.space
    }

    /// All nodes in ascending identifier order.
    pub fn nodes(&self) -> &[Node] {
        self.ring.nodes()
    }

    /// Number of nodes in the network.
    pub fn num_nodes(&self) -> usize {
        self.ring.len()
    }

    /// Node behind a reference.
    pub fn node(&self, node: NodeRef) -> &Node {
        self.ring.node(node)
    }

    /// The node with the given identifier, if any.
    pub fn node_by_id(&self, id: &Id) -> Option<NodeRef> {
        self.ring.by_id(id)
    }

    /// The ring member responsible for `id` per the successor relation.
    pub fn successor(&self, id: &Id) -> NodeRef {
        self.ring.successor(id)
    }

    /// Simulate a single lookup for `target` originating at `origin`.
    pub fn query(&self, target: Id, origin: NodeRef) -> QueryResult {
        route(&self.ring, target, origin)
    }

    /// Draw the (target, origin) pairs of a `num_queries`-lookup
    /// workload: targets from the identifier space, originators
    /// uniformly from the ring. Drawing up front keeps a seeded run
    /// reproducible regardless of how the workload is scheduled.
    pub fn plan_queries<R: Rng>(&self, num_queries: u64, rng: &mut R) -> Vec<(Id, NodeRef)> {
        (0..num_queries)
            .map(|_| {
                let target = self.space.random();
                let origin = NodeRef(rng.gen_range(0..self.ring.len()));
                (target, origin)
            })
            .collect()
    }

    /// Execute a workload of lookups, at most `concurrency` in flight
    /// at once, and fold the outcomes into [SimulationStats].
    ///
    /// `progress` is invoked with the completed fraction after every
    /// query and finally with 1.0. It runs outside of any lock.
    pub async fn run_queries(
        self: Arc<Self>,
        queries: Vec<(Id, NodeRef)>,
        concurrency: usize,
        progress: impl Fn(f32) + Send + Sync + 'static,
    ) -> SimulationStats {
        for node in self.ring.nodes() {
            node.reset_queries();
        }

        let total = queries.len() as u64;
        let progress = Arc::new(progress);
        let semaphore = Arc::new(Semaphore::new(concurrency));
        // Histogram and running hop sum share one lock; both updates
        // happen under a single acquisition.
        let hop_stats = Arc::new(Mutex::new((HashMap::<u64, u64>::new(), 0f32)));
        let processed = Arc::new(AtomicU64::new(0));

        let mut tasks = Vec::with_capacity(queries.len());
        for (target, origin) in queries {
            let sim = Arc::clone(&self);
            let semaphore = Arc::clone(&semaphore);
            let hop_stats = Arc::clone(&hop_stats);
            let processed = Arc::clone(&processed);
            let progress = Arc::clone(&progress);

            tasks.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("semaphore is never closed");

                let result = sim.query(target, origin);
                sim.node(result.result()).record_query();

                let hop_count = result.hop_count();
                {
                    let mut stats = hop_stats.lock().expect("hop stats lock");
                    *stats.0.entry(hop_count).or_insert(0) += 1;
                    stats.1 += hop_count as f32;
                }

                let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
                (*progress)(done as f32 / total as f32);
            }));
        }

        for task in join_all(tasks).await {
            task.expect("query task failed");
        }

        let (hop_counts, hop_sum) = {
            let stats = hop_stats.lock().expect("hop stats lock");
            (stats.0.clone(), stats.1)
        };
        let avg_hop_count = if total > 0 { hop_sum / total as f32 } else { 0.0 };

        let mut query_received_counts = HashMap::new();
        let mut received_sum = 0f32;
        for node in self.ring.nodes() {
            let received = node.queries_received();
            *query_received_counts.entry(received).or_insert(0) += 1;
            received_sum += received as f32;
        }
        let avg_queries_received = received_sum / self.ring.len() as f32;

        (*progress)(1.0);

        SimulationStats {
            hop_counts,
            avg_hop_count,
            query_received_counts,
            avg_queries_received,
        }
    }

    /// Static degree distributions of the finger graph. In-degrees were
    /// counted at bootstrap; out-degrees walk each finger table and
    /// count distinct-from-previous successors, matching the same edge
    /// collapse rule.
    pub fn topological_stats(&self) -> TopologicalStats {
        let mut in_degrees = HashMap::new();
        let mut out_degrees = HashMap::new();
        let mut in_sum = 0f32;
        let mut out_sum = 0f32;

        for node in self.ring.nodes() {
            *in_degrees.entry(node.in_degree()).or_insert(0) += 1;
            in_sum += node.in_degree() as f32;

            let out_degree = node.finger_table().distinct_links().count() as u64;
            *out_degrees.entry(out_degree).or_insert(0) += 1;
            out_sum += out_degree as f32;
        }

        let n = self.ring.len() as f32;
        TopologicalStats {
            in_degrees,
            avg_in_degree: in_sum / n,
            out_degrees,
            avg_out_degree: out_sum / n,
        }
    }
}
