//! Currency exchange graph and Bellman-Ford relaxation engine.
//!
//! Rates become edge weights `-ln(rate)`, so the shortest path from a source
//! is the best compounded conversion and a negative cycle is an arbitrage loop.

pub mod graph;
pub mod solver;
pub mod traits;

pub use graph::{Graph, build_graph};
pub use solver::{BellmanFordSolver, ShortestPaths};
pub use traits::ShortestPathSolver;
