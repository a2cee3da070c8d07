use common::types::{ArbitrageCycle, BestRate};
use fx_arb_core::Graph;

use super::labels::CurrencyLabels;

/// Node list followed by one line per edge with its `-ln(rate)` weight.
pub fn render_graph(graph: &Graph, labels: &CurrencyLabels) -> String {
    let edges: String = graph
        .edges()
        .iter()
        .map(|&(u, v, weight)| {
            format!(
                "{} -> {} Weight = {:.6}\n",
                labels.label(u),
                labels.label(v),
                weight
            )
        })
        .collect();

    format!(
        "The following Graph has: \nNodes:\n[{}]\n\nEdges: \n{}",
        labels.all().join(", "),
        edges
    )
}

pub fn render_cycle(cycle: &ArbitrageCycle, labels: &CurrencyLabels) -> String {
    let product = cycle.product_rate();
    format!(
        "Arbitrage: {} (x{:.6}, {:+.4}% per loop)",
        labels.format_path(&cycle.closed_path()),
        product,
        (product - 1.0) * 100.0
    )
}

pub fn render_best_rate(best: &BestRate, labels: &CurrencyLabels) -> String {
    let (from, to) = match (best.path.first(), best.path.last()) {
        (Some(&from), Some(&to)) => (labels.label(from), labels.label(to)),
        _ => (String::new(), String::new()),
    };

    format!(
        "Best rate {} -> {}: {} via {}",
        from,
        to,
        best.rate,
        labels.format_path(&best.path)
    )
}
