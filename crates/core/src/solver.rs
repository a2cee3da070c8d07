use super::traits::ShortestPathSolver;
use common::{
    error::Error,
    numeric_kernel::{DEFAULT_PRECISION, improves, rate_from_weight, round_to},
    types::{ArbitrageCycle, BestRate, Edge},
};
use tracing::{debug, warn};

/// Output of one relaxation run from a single source.
///
/// When `has_negative_cycle()` is true, distances and predecessors of vertices
/// on or downstream of the cycle are not authoritative and must not be turned
/// into rates.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPaths {
    source: usize,
    distances: Vec<f64>,
    predecessors: Vec<Option<usize>>,
    pred_edge_idx: Vec<Option<usize>>,
    negative_cycle: bool,
    cycle: Option<ArbitrageCycle>,
}

impl ShortestPaths {
    pub fn source(&self) -> usize {
        self.source
    }

    /// Minimal accumulated `-ln(rate)` per vertex; `+inf` when unreached.
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    /// Predecessor vertex per vertex; `None` until first reached.
    pub fn predecessors(&self) -> &[Option<usize>] {
        &self.predecessors
    }

    /// Index into the edge list of the edge that last improved each vertex.
    pub fn predecessor_edges(&self) -> &[Option<usize>] {
        &self.pred_edge_idx
    }

    pub fn has_negative_cycle(&self) -> bool {
        self.negative_cycle
    }

    pub fn cycle(&self) -> Option<&ArbitrageCycle> {
        self.cycle.as_ref()
    }

    pub fn into_cycle(self) -> Option<ArbitrageCycle> {
        self.cycle
    }

    /// Reconstructs the shortest path from the source to `destination`.
    ///
    /// # Errors
    /// - `Error::InvalidIndex` if `destination` is out of range.
    /// - `Error::ArbitrageBlocked` if the run found a negative cycle.
    /// - `Error::PathNotFound` if the predecessor chain breaks before the source.
    pub fn path_to(&self, destination: usize) -> Result<Vec<usize>, Error> {
        let vertex_count = self.distances.len();
        if destination >= vertex_count {
            return Err(Error::InvalidIndex {
                index: destination,
                vertex_count,
            });
        }

        if self.negative_cycle {
            return Err(self.blocked());
        }

        let mut path = vec![destination];
        let mut current = destination;

        // A shortest-path tree has no path longer than V vertices.
        while current != self.source {
            match self.predecessors[current] {
                Some(prev) if path.len() < vertex_count => {
                    path.push(prev);
                    current = prev;
                }
                _ => {
                    return Err(Error::PathNotFound {
                        origin: self.source,
                        destination,
                    });
                }
            }
        }

        path.reverse();
        Ok(path)
    }

    fn blocked(&self) -> Error {
        Error::ArbitrageBlocked {
            origin: self.source,
            cycle: self.cycle.as_ref().map(|c| c.vertices.clone()),
        }
    }
}

/// Solver implementing Bellman-Ford for single-source shortest paths and
/// negative cycle detection over a plain edge list.
///
/// Every comparison goes through [`improves`] at `precision` decimal places.
/// Stored distances keep the full sum so rounding error cannot accumulate
/// around a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BellmanFordSolver {
    precision: u32,
}

impl Default for BellmanFordSolver {
    fn default() -> Self {
        Self::new(DEFAULT_PRECISION)
    }
}

impl BellmanFordSolver {
    pub fn new(precision: u32) -> Self {
        Self { precision }
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Returns the first negative cycle reachable from `source`, or `None`.
    ///
    /// Cycles that `source` cannot reach are not reported; callers that need
    /// graph-wide detection query each source in turn.
    pub fn detect_arbitrage(
        &self,
        vertex_count: usize,
        edges: &[Edge],
        source: usize,
    ) -> Result<Option<ArbitrageCycle>, Error> {
        let paths = self.shortest_paths(vertex_count, edges, source)?;
        Ok(paths.into_cycle())
    }

    /// Best compounded rate and path from `source` to `destination`.
    ///
    /// # Errors
    /// - `Error::InvalidIndex` if either index is out of range.
    /// - `Error::ArbitrageBlocked` if any negative cycle is reachable from `source`,
    ///   even one that does not lie on a path to `destination`.
    /// - `Error::PathNotFound` if `destination` is unreachable.
    pub fn best_rate(
        &self,
        vertex_count: usize,
        edges: &[Edge],
        source: usize,
        destination: usize,
    ) -> Result<BestRate, Error> {
        check_index(source, vertex_count)?;
        check_index(destination, vertex_count)?;

        let paths = self.shortest_paths(vertex_count, edges, source)?;
        let path = paths.path_to(destination)?;

        let log_distance = paths.distances[destination];
        let rate = round_to(rate_from_weight(log_distance), self.precision);

        Ok(BestRate {
            rate,
            path,
            log_distance,
        })
    }

    /// One pass over the full edge list in order.
    ///
    /// Returns the last vertex whose distance improved, or `None` if the pass
    /// changed nothing.
    fn relax_pass(
        &self,
        edges: &[Edge],
        distance: &mut [f64],
        pred_edge_idx: &mut [Option<usize>],
    ) -> Option<usize> {
        let mut last_relaxed = None;

        for (i, &(u, v, weight)) in edges.iter().enumerate() {
            if !distance[u].is_finite() {
                continue;
            }

            let candidate = distance[u] + weight;
            if improves(candidate, distance[v], self.precision) {
                distance[v] = candidate;
                pred_edge_idx[v] = Some(i);
                last_relaxed = Some(v);
            }
        }

        last_relaxed
    }

    /// Scans for the first edge that still relaxes after V-1 passes.
    ///
    /// Applies that relaxation, then walks predecessors back from the edge's tail
    /// until it reaches the edge's head or repeats a vertex. Falls back to
    /// [`Self::recover_cycle`] if the walk runs off the predecessor chain.
    fn detect_cycle(
        &self,
        edges: &[Edge],
        distance: &mut [f64],
        pred_edge_idx: &mut [Option<usize>],
    ) -> (bool, Option<ArbitrageCycle>) {
        let violation = edges.iter().position(|&(u, v, weight)| {
            distance[u].is_finite() && improves(distance[u] + weight, distance[v], self.precision)
        });

        let Some(edge_idx) = violation else {
            return (false, None);
        };

        let (tail, head, weight) = edges[edge_idx];
        distance[head] = distance[tail] + weight;
        pred_edge_idx[head] = Some(edge_idx);

        let cycle = walk_back(tail, head, edges, pred_edge_idx)
            .and_then(|walk| assemble_cycle(walk, edges, pred_edge_idx))
            .or_else(|| {
                debug!(tail, head, "Predecessor walk did not close, recovering cycle");
                self.recover_cycle(edges, distance, pred_edge_idx)
            });

        if cycle.is_none() {
            warn!(tail, head, "Negative cycle detected but could not be extracted");
        }

        (true, cycle)
    }

    /// Runs one more relaxation pass and steps back V predecessors from the
    /// last relaxed vertex, which lands on a vertex inside a negative cycle.
    fn recover_cycle(
        &self,
        edges: &[Edge],
        distance: &mut [f64],
        pred_edge_idx: &mut [Option<usize>],
    ) -> Option<ArbitrageCycle> {
        let num_nodes = distance.len();
        let mut trace_node = self.relax_pass(edges, distance, pred_edge_idx)?;

        for _ in 0..num_nodes {
            trace_node = edges[pred_edge_idx[trace_node]?].0;
        }

        let cycle_start_node = trace_node;
        let mut walk = vec![cycle_start_node];
        let mut current_node = edges[pred_edge_idx[cycle_start_node]?].0;

        while current_node != cycle_start_node {
            if walk.len() >= num_nodes {
                return None;
            }
            walk.push(current_node);
            current_node = edges[pred_edge_idx[current_node]?].0;
        }

        assemble_cycle(walk, edges, pred_edge_idx)
    }
}

impl ShortestPathSolver for BellmanFordSolver {
    /// Runs Bellman-Ford from `source`.
    ///
    /// Always performs exactly `V - 1` relaxation passes, then one detection
    /// pass. Only the first negative cycle in edge-list scan order is extracted.
    fn shortest_paths(
        &self,
        vertex_count: usize,
        edges: &[Edge],
        source: usize,
    ) -> Result<ShortestPaths, Error> {
        check_index(source, vertex_count)?;

        let mut distance = vec![f64::INFINITY; vertex_count];
        let mut pred_edge_idx = vec![None; vertex_count];
        distance[source] = 0.0;

        for pass in 1..vertex_count {
            if self
                .relax_pass(edges, &mut distance, &mut pred_edge_idx)
                .is_none()
            {
                debug!(source, pass, "Relaxation pass made no change");
            }
        }

        let (negative_cycle, cycle) = self.detect_cycle(edges, &mut distance, &mut pred_edge_idx);

        if let Some(cycle) = &cycle {
            debug!(
                source,
                vertices = ?cycle.vertices,
                product_rate = cycle.product_rate(),
                "Negative cycle extracted"
            );
        }

        let predecessors = pred_edge_idx
            .iter()
            .map(|idx| idx.map(|i| edges[i].0))
            .collect();

        Ok(ShortestPaths {
            source,
            distances: distance,
            predecessors,
            pred_edge_idx,
            negative_cycle,
            cycle,
        })
    }
}

fn check_index(index: usize, vertex_count: usize) -> Result<(), Error> {
    if index >= vertex_count {
        return Err(Error::InvalidIndex {
            index,
            vertex_count,
        });
    }
    Ok(())
}

/// Walks predecessors back from `tail`, stopping at `head` or at the first
/// repeated vertex. Returns the closed part of the walk in backward order, or
/// `None` if a vertex without a predecessor is reached first.
fn walk_back(
    tail: usize,
    head: usize,
    edges: &[Edge],
    pred_edge_idx: &[Option<usize>],
) -> Option<Vec<usize>> {
    let mut visited = vec![false; pred_edge_idx.len()];
    let mut walk = Vec::new();
    let mut current = tail;

    loop {
        if visited[current] {
            // Only the part from the first visit of `current` is a cycle.
            let start = walk.iter().position(|&x| x == current)?;
            walk.drain(..start);
            return Some(walk);
        }

        visited[current] = true;
        walk.push(current);

        if current == head {
            return Some(walk);
        }

        current = edges[pred_edge_idx[current]?].0;
    }
}

/// Turns a backward walk (each vertex followed by its predecessor) into a
/// forward-oriented cycle, reading hop rates off the predecessor edges.
fn assemble_cycle(
    mut walk: Vec<usize>,
    edges: &[Edge],
    pred_edge_idx: &[Option<usize>],
) -> Option<ArbitrageCycle> {
    walk.reverse();

    let len = walk.len();
    let mut rates = Vec::with_capacity(len);
    let mut log_rate_sum = 0.0f64;

    for i in 0..len {
        let next = walk[(i + 1) % len];
        let (u, _, weight) = edges[pred_edge_idx[next]?];
        if u != walk[i] {
            return None;
        }

        rates.push(rate_from_weight(weight));
        log_rate_sum += weight;
    }

    Some(ArbitrageCycle {
        vertices: walk,
        rates,
        log_rate_sum,
    })
}
