use fx_arb_core::build_graph;
use proptest::prelude::*;
use proptest::strategy::Strategy;

const NUM_CURRENCIES_STRATEGY: std::ops::Range<usize> = 2usize..8;

/// Rate matrix with no arbitrage: `rates[i][j] = p_i / p_j * fee_ij` with every
/// fee strictly below 1, so each cycle multiplies to less than 1.
fn fee_market_strategy() -> impl Strategy<Value = Vec<Vec<f64>>> {
    NUM_CURRENCIES_STRATEGY.prop_flat_map(|n| {
        let prices = prop::collection::vec(0.5f64..2.0, n);
        let fees = prop::collection::vec(prop::collection::vec(0.9f64..0.999, n), n);

        (prices, fees).prop_map(|(prices, fees)| {
            (0..prices.len())
                .map(|i| {
                    (0..prices.len())
                        .map(|j| {
                            if i == j {
                                1.0
                            } else {
                                prices[i] / prices[j] * fees[i][j]
                            }
                        })
                        .collect()
                })
                .collect()
        })
    })
}

/// Fee-free market quoted from one price vector: `rates[i][j] = p_i / p_j`, so every
/// cycle multiplies to exactly 1 up to floating-point error.
fn break_even_market_strategy() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (3usize..9).prop_flat_map(|n| {
        prop::collection::vec(0.5f64..2.0, n).prop_map(|prices| {
            prices
                .iter()
                .map(|p_i| {
                    prices
                        .iter()
                        .map(|p_j| if p_i == p_j { 1.0 } else { p_i / p_j })
                        .collect()
                })
                .collect()
        })
    })
}

/// Flat fee market with one planted profitable pair `(i, j)`.
fn planted_pair_strategy() -> impl Strategy<Value = (Vec<Vec<f64>>, usize, usize)> {
    NUM_CURRENCIES_STRATEGY.prop_flat_map(|n| {
        (
            Just(n),
            0..n,
            1..n,
            0.8f64..0.9,
            1.01f64..1.2,
        )
            .prop_map(|(n, i, offset, fee, gain)| {
                let j = (i + offset) % n;
                let mut rates = vec![vec![fee; n]; n];
                rates[i][j] = gain;
                rates[j][i] = 1.0;
                (rates, i, j)
            })
    })
}

fn path_product(rates: &[Vec<f64>], path: &[usize]) -> f64 {
    path.windows(2).map(|hop| rates[hop[0]][hop[1]]).product()
}

proptest! {
    /// Property: one edge per ordered pair of distinct currencies, in row-major order.
    #[test]
    fn edges_cover_every_ordered_pair(rates in fee_market_strategy()) {
        let n = rates.len();
        let graph = build_graph(&rates).unwrap();

        prop_assert_eq!(graph.edges().len(), n * (n - 1));

        let expected: Vec<(usize, usize, f64)> = (0..n)
            .flat_map(|i| (0..n).filter(move |&j| j != i).map(move |j| (i, j)))
            .map(|(i, j)| (i, j, -rates[i][j].ln()))
            .collect();
        prop_assert_eq!(graph.edges(), expected.as_slice());
    }

    /// Property: a market where every conversion pays a fee has no arbitrage from any source.
    #[test]
    fn fee_market_has_no_arbitrage(rates in fee_market_strategy()) {
        let graph = build_graph(&rates).unwrap();
        for source in 0..rates.len() {
            prop_assert!(graph.detect_arbitrage(source).unwrap().is_none());
        }
    }

    /// Property: a break-even market has no arbitrage and every best rate is defined.
    #[test]
    fn break_even_market_has_no_arbitrage(rates in break_even_market_strategy()) {
        let graph = build_graph(&rates).unwrap();
        let n = rates.len();

        for source in 0..n {
            prop_assert!(graph.detect_arbitrage(source).unwrap().is_none());

            for destination in 0..n {
                let best = graph.best_rate(source, destination);
                prop_assert!(best.is_ok(), "{} -> {}: {:?}", source, destination, best);

                let best = best.unwrap();
                let direct = rates[source][destination];
                prop_assert!((best.rate - direct).abs() <= 1e-4 * direct);
            }
        }
    }

    /// Property: the reported rate is the product of the pairwise rates along the reported path.
    #[test]
    fn best_rate_matches_path_product(rates in fee_market_strategy()) {
        let graph = build_graph(&rates).unwrap();
        let n = rates.len();

        for source in 0..n {
            for destination in 0..n {
                let best = graph.best_rate(source, destination).unwrap();

                prop_assert_eq!(best.path.first(), Some(&source));
                prop_assert_eq!(best.path.last(), Some(&destination));

                let product = path_product(&rates, &best.path);
                prop_assert!((best.rate - product).abs() <= 1e-4 * product);
            }
        }
    }

    /// Property: no one- or two-hop route beats the reported best rate.
    #[test]
    fn best_rate_is_optimal(rates in fee_market_strategy()) {
        let graph = build_graph(&rates).unwrap();
        let n = rates.len();

        for source in 0..n {
            for destination in (0..n).filter(|&d| d != source) {
                let best = graph.best_rate(source, destination).unwrap();
                let tolerance = 1.0 + 1e-4;

                prop_assert!(best.rate * tolerance >= rates[source][destination]);
                for via in (0..n).filter(|&k| k != source && k != destination) {
                    let two_hop = rates[source][via] * rates[via][destination];
                    prop_assert!(best.rate * tolerance >= two_hop);
                }
            }
        }
    }

    /// Property: a planted profitable pair is reported from every source, and nothing else is.
    #[test]
    fn planted_pair_is_detected((rates, i, j) in planted_pair_strategy()) {
        let graph = build_graph(&rates).unwrap();

        for source in 0..rates.len() {
            let cycle = graph.detect_arbitrage(source).unwrap();
            prop_assert!(cycle.is_some());

            let cycle = cycle.unwrap();
            let mut vertices = cycle.vertices.clone();
            vertices.sort_unstable();
            prop_assert_eq!(vertices, vec![i.min(j), i.max(j)]);
            prop_assert!(cycle.is_profitable());
        }
    }

    /// Property: exact reciprocal quotes between two currencies are not arbitrage.
    #[test]
    fn reciprocal_pair_is_not_arbitrage(rate in 0.01f64..100.0) {
        let rates = [[1.0, rate], [1.0 / rate, 1.0]];
        let graph = build_graph(&rates).unwrap();

        prop_assert!(graph.detect_arbitrage(0).unwrap().is_none());
        prop_assert!(graph.detect_arbitrage(1).unwrap().is_none());
    }

    /// Property: repeated queries on the same graph give identical answers.
    #[test]
    fn queries_are_idempotent((rates, _, _) in planted_pair_strategy()) {
        let graph = build_graph(&rates).unwrap();

        prop_assert_eq!(graph.shortest_paths(0).unwrap(), graph.shortest_paths(0).unwrap());
        prop_assert_eq!(graph.detect_arbitrage(0).unwrap(), graph.detect_arbitrage(0).unwrap());
    }
}
