/// Decimal places used for relaxation comparisons unless a graph is built with another precision.
pub const DEFAULT_PRECISION: u32 = 6;

/// Largest precision accepted for relaxation comparisons; `10^p` must stay well inside `f64`.
pub const MAX_PRECISION: u32 = 15;

/// Quantizes `value` to `precision` decimal places.
///
/// Non-finite values (the `+inf` of an unreached vertex) pass through unchanged.
/// `precision` is expected to be at most [`MAX_PRECISION`].
pub fn round_to(value: f64, precision: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let quantum = 10f64.powi(precision.min(MAX_PRECISION) as i32);
    (value * quantum).round() / quantum
}

/// The relaxation predicate: does `candidate` beat `current` once both are quantized?
///
/// Both the relaxation passes and the negative-cycle check go through this one gate,
/// so floating-point drift below the precision can neither relax an edge nor flag a cycle.
pub fn improves(candidate: f64, current: f64, precision: u32) -> bool {
    round_to(candidate, precision) < round_to(current, precision)
}

/// Maps an exchange rate to its edge weight: `w = -ln(rate)`.
///
/// A cycle of rates with product > 1 has a weight sum < 0.
pub fn weight_from_rate(rate: f64) -> f64 {
    -rate.ln()
}

/// Inverse of [`weight_from_rate`]: `rate = e^(-w)`.
pub fn rate_from_weight(weight: f64) -> f64 {
    (-weight).exp()
}

/// A rate is usable as an edge when its logarithm is defined and finite.
pub fn is_valid_rate(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}
