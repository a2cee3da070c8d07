use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use tracing::{info, warn};

use super::error::Error;
use super::types::{Market, RateSource};

/// Reads a square rate matrix from a CSV file.
///
/// Row `i` holds the rates from currency `i` to every currency. An optional
/// first row of non-numeric cells names the currencies:
///
/// ```text
/// USD,EUR,GBP
/// 1,0.651,0.581
/// 1.531,1,0.952
/// 1.711,1.049,1
/// ```
pub struct CsvMatrixLoader {
    path: PathBuf,
}

impl CsvMatrixLoader {
    pub fn new(path: PathBuf) -> Self {
        CsvMatrixLoader { path }
    }

    fn parse_csv_to_matrix(&self) -> Result<Market, Error> {
        let file = File::open(&self.path).map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "Failed to open rate matrix");
            Error::IoError(e)
        })?;

        let market = read_market(file)?;
        info!(
            path = %self.path.display(),
            currencies = market.rates.len(),
            labelled = market.labels.is_some(),
            "Rate matrix loaded"
        );
        Ok(market)
    }
}

impl RateSource for CsvMatrixLoader {
    fn load(&self) -> Result<Market, Error> {
        self.parse_csv_to_matrix()
    }
}

/// Parses matrix rows from any reader. Row lengths are not checked here; the
/// graph builder rejects ragged matrices.
pub fn read_market<R: Read>(reader: R) -> Result<Market, Error> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut labels = None;
    let mut rates = Vec::new();

    for (line, result) in rdr.records().enumerate() {
        let record = result?;

        match record.deserialize::<Vec<f64>>(None) {
            Ok(row) => rates.push(row),
            Err(_) if line == 0 => {
                labels = Some(record.iter().map(String::from).collect());
            }
            Err(e) => return Err(Error::CsvError(e)),
        }
    }

    Ok(Market { labels, rates })
}
