/// Type alias for a single weighted edge: (from, to, weight) with `weight = -ln(rate)`.
pub type Edge = (usize, usize, f64);

/// A negative cycle reported by the relaxation engine.
///
/// Fields:
/// - `vertices`: Each vertex of the cycle once, in forward (trading) order.
/// - `rates`: `rates[i]` is the rate of the hop `vertices[i] -> vertices[(i + 1) % len]`.
/// - `log_rate_sum`: Sum of the transformed weights (`-ln(rate)`) around the cycle; negative for arbitrage.
#[derive(Debug, Clone, PartialEq)]
pub struct ArbitrageCycle {
    pub vertices: Vec<usize>,
    pub rates: Vec<f64>,
    pub log_rate_sum: f64,
}

impl ArbitrageCycle {
    /// Returns the actual profit multiplier (∏ rate_i) for the cycle.
    ///
    /// Internally, the cycle stores the transformed sum: ∑ w_i where w_i = -ln(rate_i).
    /// The product is recovered via the inverse operation: rate_product = e^(-sum(w_i)).
    ///
    /// Example:
    /// ```text
    /// If original rates are [0.651, 0.952, 1.711] (∏≈1.0604),
    /// stored sum (log_rate_sum) ≈ -0.0586.
    /// product_rate = exp(0.0586) ≈ 1.0604
    /// ```
    pub fn product_rate(&self) -> f64 {
        (-self.log_rate_sum).exp()
    }

    /// Returns true if the cycle is profitable (product_rate > 1.0).
    pub fn is_profitable(&self) -> bool {
        self.product_rate() > 1.0
    }

    /// Number of hops (equal to the number of distinct vertices).
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The cycle as a closed walk: the first vertex repeated at the end.
    pub fn closed_path(&self) -> Vec<usize> {
        let mut path = self.vertices.clone();
        if let Some(&first) = self.vertices.first() {
            path.push(first);
        }
        path
    }

    /// True if `vertex` lies on the cycle.
    pub fn contains(&self, vertex: usize) -> bool {
        self.vertices.contains(&vertex)
    }
}

/// Best achievable conversion from a source to a destination.
#[derive(Debug, Clone, PartialEq)]
pub struct BestRate {
    /// Compounded rate `exp(-log_distance)`, rounded to the graph precision.
    pub rate: f64,
    /// Vertices from source to destination inclusive.
    pub path: Vec<usize>,
    /// Minimal accumulated `-ln(rate)` from source to destination.
    pub log_distance: f64,
}

impl BestRate {
    /// Number of conversions along the path.
    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}
