use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use super::config::SimulatorConfig;
use super::error::Error;
use super::types::{Market, RateSource};

/// Range of the hidden reference price drawn for each currency.
const PRICE_RANGE: std::ops::Range<f64> = 0.5..2.0;

const BPS: f64 = 10_000.0;

/// Produces a synthetic rate matrix.
///
/// Each currency gets a random reference price `p_i`; the quote `i -> j` is
/// `p_i / p_j`, less the per-conversion fee, moved by a random fluctuation.
/// Without fluctuation every cycle loses the fee, so arbitrage only appears
/// where the fluctuation outweighs it.
pub struct MarketSimulator {
    config: SimulatorConfig,
}

impl MarketSimulator {
    pub fn new(config: SimulatorConfig) -> Result<Self, Error> {
        if !(0.0..BPS).contains(&config.rate_fluctuation_bps) {
            return Err(Error::InvalidSimulator(format!(
                "rate_fluctuation_bps must be in [0, {}), got {}",
                BPS, config.rate_fluctuation_bps
            )));
        }
        if !(0.0..BPS).contains(&config.fee_bps) {
            return Err(Error::InvalidSimulator(format!(
                "fee_bps must be in [0, {}), got {}",
                BPS, config.fee_bps
            )));
        }

        Ok(Self { config })
    }

    fn generate(&self) -> Vec<Vec<f64>> {
        let mut rng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let n = self.config.total_nodes;
        let fee_multiplier = 1.0 - self.config.fee_bps / BPS;
        let fluctuation = self.config.rate_fluctuation_bps / BPS;

        let prices: Vec<f64> = (0..n).map(|_| rng.random_range(PRICE_RANGE)).collect();

        (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        if i == j {
                            return 1.0;
                        }
                        let noise = if fluctuation > 0.0 {
                            rng.random_range(-fluctuation..=fluctuation)
                        } else {
                            0.0
                        };
                        prices[i] / prices[j] * fee_multiplier * (1.0 + noise)
                    })
                    .collect()
            })
            .collect()
    }
}

impl RateSource for MarketSimulator {
    fn load(&self) -> Result<Market, Error> {
        let rates = self.generate();
        info!(
            currencies = rates.len(),
            seed = ?self.config.seed,
            "Simulated market generated"
        );

        Ok(Market {
            labels: None,
            rates,
        })
    }
}
