use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// An off-diagonal rate is zero, negative or not finite, so `-ln(rate)` is undefined.
    #[error("Rate {rate} at ({from}, {to}) is not a strictly positive finite number.")]
    InvalidRate { from: usize, to: usize, rate: f64 },

    /// A row of the rate matrix does not have one entry per currency.
    #[error("Rate matrix is not square: row {row} has {len} entries, expected {expected}.")]
    NonSquareMatrix {
        row: usize,
        len: usize,
        expected: usize,
    },

    /// Comparison precision outside what an `f64` quantum can represent.
    #[error("Precision {precision} is out of range, expected at most {max} decimal places.")]
    InvalidPrecision { precision: u32, max: u32 },

    /// Indicates an attempt to access a vertex index that exceeds the graph size (V).
    #[error("Vertex index {index} is out of bounds for a graph of {vertex_count} vertices.")]
    InvalidIndex { index: usize, vertex_count: usize },

    /// A negative cycle is reachable from `origin`, so no best rate is defined.
    #[error("Arbitrage cycle reachable from vertex {origin} blocks best-rate computation.")]
    ArbitrageBlocked {
        origin: usize,
        cycle: Option<Vec<usize>>,
    },

    /// `destination` cannot be reached from `origin` through the edge set.
    #[error("Vertex {destination} is unreachable from vertex {origin}.")]
    PathNotFound { origin: usize, destination: usize },
}

impl Error {
    /// True for failures caused by a malformed rate matrix.
    pub fn is_domain_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidRate { .. } | Error::NonSquareMatrix { .. }
        )
    }
}
