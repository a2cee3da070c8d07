use common::error::Error;
use common::numeric_kernel::{
    DEFAULT_PRECISION, MAX_PRECISION, is_valid_rate, rate_from_weight, weight_from_rate,
};
use common::types::{ArbitrageCycle, BestRate, Edge};
use tracing::debug;

use super::solver::{BellmanFordSolver, ShortestPaths};
use super::traits::ShortestPathSolver;

/// Currency graph built from a square exchange-rate matrix.
///
/// Vertices are the matrix indices `0..vertex_count`. Every ordered pair of
/// distinct vertices `(i, j)` becomes one edge `(i, j, -ln(rates[i][j]))`, stored
/// in row-major order so the edge list is identical for identical input.
/// Diagonal entries are ignored.
///
/// The edge list is immutable once built; queries only read it, so a `Graph`
/// can be shared across threads behind an `Arc` without locking.
#[derive(Debug, Clone)]
pub struct Graph {
    vertex_count: usize,
    edges: Vec<Edge>,
    precision: u32,
}

/// Builds a graph with the default comparison precision.
///
/// # Errors
/// `Error::NonSquareMatrix` for ragged input, `Error::InvalidRate` for a
/// non-positive or non-finite off-diagonal rate.
pub fn build_graph<R: AsRef<[f64]>>(rates: &[R]) -> Result<Graph, Error> {
    Graph::from_rates(rates, DEFAULT_PRECISION)
}

impl Graph {
    /// Creates a graph from an `N×N` rate matrix.
    ///
    /// # Arguments
    /// - `rates`: `rates[i][j]` is how many units of `j` one unit of `i` buys.
    /// - `precision`: decimal places used when comparing accumulated weights.
    ///
    /// # Errors
    /// `Error::InvalidPrecision` if `precision` exceeds [`MAX_PRECISION`].
    /// Validation runs over the whole matrix before any edge is produced, so a
    /// bad rate never reaches relaxation as `NaN` or `inf`.
    pub fn from_rates<R: AsRef<[f64]>>(rates: &[R], precision: u32) -> Result<Self, Error> {
        if precision > MAX_PRECISION {
            return Err(Error::InvalidPrecision {
                precision,
                max: MAX_PRECISION,
            });
        }

        let vertex_count = rates.len();
        validate_matrix(rates)?;

        let mut edges = Vec::with_capacity(vertex_count * vertex_count.saturating_sub(1));
        for (from, row) in rates.iter().enumerate() {
            for (to, &rate) in row.as_ref().iter().enumerate() {
                if from != to {
                    edges.push((from, to, weight_from_rate(rate)));
                }
            }
        }

        debug!(vertex_count, edge_count = edges.len(), precision, "Graph built");

        Ok(Self {
            vertex_count,
            edges,
            precision,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// O(1) lookup of the edge index for `(from, to)` in row-major order.
    fn edge_index(&self, from: usize, to: usize) -> Result<Option<usize>, Error> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from == to {
            return Ok(None);
        }

        // Row `from` holds V-1 edges; the diagonal slot is skipped.
        let column = if to > from { to - 1 } else { to };
        Ok(Some(from * (self.vertex_count - 1) + column))
    }

    /// Weight `-ln(rate)` of the edge `from -> to`, `None` on the diagonal.
    pub fn edge_weight(&self, from: usize, to: usize) -> Result<Option<f64>, Error> {
        Ok(self.edge_index(from, to)?.map(|idx| self.edges[idx].2))
    }

    /// Direct exchange rate `from -> to`; the diagonal is the identity rate.
    pub fn rate(&self, from: usize, to: usize) -> Result<f64, Error> {
        Ok(self
            .edge_weight(from, to)?
            .map_or(1.0, rate_from_weight))
    }

    /// Runs one relaxation from `source` and returns the raw result.
    pub fn shortest_paths(&self, source: usize) -> Result<ShortestPaths, Error> {
        self.solver()
            .shortest_paths(self.vertex_count, &self.edges, source)
    }

    /// Returns the first negative cycle reachable from `source`, if any.
    pub fn detect_arbitrage(&self, source: usize) -> Result<Option<ArbitrageCycle>, Error> {
        self.solver()
            .detect_arbitrage(self.vertex_count, &self.edges, source)
    }

    /// Best compounded rate and path from `source` to `destination`.
    pub fn best_rate(&self, source: usize, destination: usize) -> Result<BestRate, Error> {
        self.solver()
            .best_rate(self.vertex_count, &self.edges, source, destination)
    }

    fn solver(&self) -> BellmanFordSolver {
        BellmanFordSolver::new(self.precision)
    }

    fn check_index(&self, index: usize) -> Result<(), Error> {
        if index >= self.vertex_count {
            return Err(Error::InvalidIndex {
                index,
                vertex_count: self.vertex_count,
            });
        }
        Ok(())
    }
}

fn validate_matrix<R: AsRef<[f64]>>(rates: &[R]) -> Result<(), Error> {
    let expected = rates.len();

    for (from, row) in rates.iter().enumerate() {
        let row = row.as_ref();
        if row.len() != expected {
            return Err(Error::NonSquareMatrix {
                row: from,
                len: row.len(),
                expected,
            });
        }

        for (to, &rate) in row.iter().enumerate() {
            if from != to && !is_valid_rate(rate) {
                return Err(Error::InvalidRate { from, to, rate });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO_A: [[f64; 3]; 3] = [
        [1.0, 0.651, 0.581],
        [1.531, 1.0, 0.952],
        [1.711, 1.049, 1.0],
    ];

    #[test]
    fn from_rates_creates_one_edge_per_ordered_pair() {
        let graph = build_graph(&SCENARIO_A).unwrap();

        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edges().len(), 3 * 2);
        assert_eq!(graph.precision(), DEFAULT_PRECISION);
    }

    #[test]
    fn edges_follow_row_major_order_without_self_loops() {
        let graph = build_graph(&SCENARIO_A).unwrap();

        let pairs: Vec<(usize, usize)> = graph.edges().iter().map(|&(u, v, _)| (u, v)).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1)]);
        assert!(graph.edges().iter().all(|&(u, v, _)| u != v));
    }

    #[test]
    fn edge_weight_transformation() {
        let graph = build_graph(&SCENARIO_A).unwrap();

        let expected: Vec<f64> = vec![0.651, 0.581, 1.531, 0.952, 1.711, 1.049]
            .into_iter()
            .map(|r: f64| -r.ln())
            .collect();
        let weights: Vec<f64> = graph.edges().iter().map(|&(_, _, w)| w).collect();
        assert_eq!(weights, expected);
    }

    #[test]
    fn diagonal_is_ignored() {
        let rates = vec![vec![0.0, 2.0], vec![0.5, -3.0]];
        let graph = build_graph(&rates).unwrap();

        assert_eq!(graph.edges().len(), 2);
        assert_eq!(graph.rate(0, 0).unwrap(), 1.0);
    }

    #[test]
    fn identical_input_gives_identical_edges() {
        let first = build_graph(&SCENARIO_A).unwrap();
        let second = build_graph(&SCENARIO_A).unwrap();
        assert_eq!(first.edges(), second.edges());
    }

    #[test]
    fn zero_rate_is_a_domain_error() {
        let rates = [[1.0, 0.0], [1.0, 1.0]];
        let err = build_graph(&rates).unwrap_err();

        assert_eq!(
            err,
            Error::InvalidRate {
                from: 0,
                to: 1,
                rate: 0.0
            }
        );
        assert!(err.is_domain_error());
    }

    #[test]
    fn negative_and_non_finite_rates_are_rejected() {
        for bad in [-0.5, f64::INFINITY, f64::NEG_INFINITY] {
            let rates = [[1.0, 1.2], [bad, 1.0]];
            let err = build_graph(&rates).unwrap_err();
            assert!(
                matches!(err, Error::InvalidRate { from: 1, to: 0, .. }),
                "unexpected error for {bad}: {err:?}"
            );
        }

        let rates = [[1.0, f64::NAN], [1.0, 1.0]];
        assert!(build_graph(&rates).unwrap_err().is_domain_error());
    }

    #[test]
    fn ragged_matrix_is_rejected() {
        let rates = vec![vec![1.0, 0.9, 1.1], vec![1.1, 1.0], vec![0.9, 1.0, 1.0]];
        let err = build_graph(&rates).unwrap_err();

        assert_eq!(
            err,
            Error::NonSquareMatrix {
                row: 1,
                len: 2,
                expected: 3
            }
        );
    }

    #[test]
    fn precision_above_max_is_rejected() {
        let rates = [[1.0, 0.9], [1.0, 1.0]];

        assert_eq!(
            Graph::from_rates(&rates, 400).unwrap_err(),
            Error::InvalidPrecision {
                precision: 400,
                max: MAX_PRECISION
            }
        );
        assert!(Graph::from_rates(&rates, u32::MAX).is_err());
    }

    #[test]
    fn max_precision_still_finds_direct_route() {
        let rates = [[1.0, 0.9], [1.0, 1.0]];
        let graph = Graph::from_rates(&rates, MAX_PRECISION).unwrap();

        let best = graph.best_rate(0, 1).unwrap();
        assert_eq!(best.path, vec![0, 1]);
        assert!((best.rate - 0.9).abs() < 1e-12);
    }

    #[test]
    fn empty_matrix_builds_empty_graph() {
        let rates: Vec<Vec<f64>> = Vec::new();
        let graph = build_graph(&rates).unwrap();

        assert_eq!(graph.vertex_count(), 0);
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn single_currency_graph_has_no_edges() {
        let graph = build_graph(&[[1.0]]).unwrap();
        assert_eq!(graph.vertex_count(), 1);
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn rate_lookup_matches_matrix() {
        let graph = build_graph(&SCENARIO_A).unwrap();

        for (from, row) in SCENARIO_A.iter().enumerate() {
            for (to, &expected) in row.iter().enumerate() {
                let rate = graph.rate(from, to).unwrap();
                assert!((rate - expected).abs() < 1e-12, "({from}, {to})");
            }
        }
        assert_eq!(graph.edge_weight(1, 1).unwrap(), None);
    }

    #[test]
    fn rate_lookup_out_of_range() {
        let graph = build_graph(&SCENARIO_A).unwrap();
        assert_eq!(
            graph.rate(0, 3).unwrap_err(),
            Error::InvalidIndex {
                index: 3,
                vertex_count: 3
            }
        );
    }
}
