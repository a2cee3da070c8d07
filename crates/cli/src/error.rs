use thiserror::Error;

use common::error::Error as ArbSolverError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigLoadError(String),

    #[error("Failed to read rate matrix: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Malformed rate matrix CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Graph processing error: {0}")]
    GraphError(#[from] ArbSolverError),

    #[error("Unknown currency '{0}'.")]
    UnknownCurrency(String),

    #[error("Invalid simulator settings: {0}")]
    InvalidSimulator(String),
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::ConfigLoadError(e.to_string())
    }
}
