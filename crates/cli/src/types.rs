use std::path::PathBuf;

use super::error::Error;

/// A rate matrix as handed to the graph builder, plus any labels its source carried.
#[derive(Debug, Clone, PartialEq)]
pub struct Market {
    pub labels: Option<Vec<String>>,
    pub rates: Vec<Vec<f64>>,
}

/// A trait defining the contract for any source that produces a rate matrix
/// for the driver.
///
/// This trait decouples the command dispatch from the specific data source
/// (CSV file, built-in matrix or simulated market).
pub trait RateSource {
    fn load(&self) -> Result<Market, Error>;
}

/// Where the driver takes its market from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// First matrix of the demo set.
    Builtin,
    Csv(PathBuf),
    Simulated,
}
