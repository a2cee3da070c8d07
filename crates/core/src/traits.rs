use super::solver::ShortestPaths;
use common::{error::Error, types::Edge};

/// Trait for single-source shortest-path solvers capable of detecting negative cycles.
pub trait ShortestPathSolver {
    /// Relaxes `edges` from `source` over a graph of `vertex_count` vertices.
    ///
    /// Returns `Ok(paths)` holding distances, predecessors and, if one is
    /// reachable from `source`, a negative cycle. Returns
    /// `Err(Error::InvalidIndex)` if `source` is out of range.
    fn shortest_paths(
        &self,
        vertex_count: usize,
        edges: &[Edge],
        source: usize,
    ) -> Result<ShortestPaths, Error>;
}
