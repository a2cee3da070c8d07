use tracing::info;

use fx_arb_core::Graph;

use super::error::Error;
use super::labels::CurrencyLabels;
use super::render::{render_cycle, render_graph};

/// The three reference markets, as `(name, rates)`.
pub fn demo_markets() -> Vec<(&'static str, Vec<Vec<f64>>)> {
    vec![
        (
            "market-1",
            vec![
                vec![1.0, 0.651, 0.581],
                vec![1.531, 1.0, 0.952],
                vec![1.711, 1.049, 1.0],
            ],
        ),
        (
            "market-2",
            vec![
                vec![1.0, 0.745, 0.670, 1.560],
                vec![1.341, 1.0, 1.300, 1.080],
                vec![1.493, 0.769, 1.0, 0.890],
                vec![0.641, 0.926, 1.124, 1.0],
            ],
        ),
        (
            "market-3",
            vec![
                vec![1.0, 0.832, 1.6982],
                vec![1.201, 1.0, 1.419],
                vec![0.591, 0.704, 1.0],
            ],
        ),
    ]
}

/// Builds, renders and scans each demo market from currency `A`.
pub fn run_demo(precision: u32) -> Result<String, Error> {
    let mut sections = Vec::new();

    for (name, rates) in demo_markets() {
        let graph = Graph::from_rates(&rates, precision)?;
        let labels = CurrencyLabels::generated(graph.vertex_count());

        let verdict = match graph.detect_arbitrage(0)? {
            Some(cycle) => {
                info!(market = name, vertices = ?cycle.vertices, "Arbitrage found");
                render_cycle(&cycle, &labels)
            }
            None => {
                info!(market = name, "No arbitrage reachable from A");
                "No arbitrage reachable from A".to_string()
            }
        };

        sections.push(format!(
            "== {name}\n{}{verdict}\n\n",
            render_graph(&graph, &labels)
        ));
    }

    Ok(sections.concat())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::numeric_kernel::DEFAULT_PRECISION;

    #[test]
    fn demo_markets_are_square() {
        for (name, rates) in demo_markets() {
            assert!(rates.iter().all(|row| row.len() == rates.len()), "{name}");
        }
    }

    #[test]
    fn every_demo_market_has_arbitrage_from_a() {
        let out = run_demo(DEFAULT_PRECISION).unwrap();

        assert_eq!(out.matches("== market-").count(), 3);
        assert_eq!(out.matches("Arbitrage: ").count(), 3);
        assert!(out.contains("Arbitrage: B -> C -> A -> B"));
        assert!(out.contains("Arbitrage: D -> C -> A -> D"));
    }
}
