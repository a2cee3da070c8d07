use super::error::Error;

/// Maps vertex indices to currency labels for display and argument parsing.
///
/// The core works on indices only; labels live entirely in the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyLabels {
    labels: Vec<String>,
}

impl CurrencyLabels {
    /// `A, B, C, …` for the first 26 currencies, `C26, C27, …` beyond that.
    pub fn generated(count: usize) -> Self {
        let labels = (0..count).map(default_label).collect();
        Self { labels }
    }

    /// Uses `names` for the first currencies and generated labels for the rest.
    pub fn with_names(names: &[String], count: usize) -> Self {
        let labels = (0..count)
            .map(|i| names.get(i).cloned().unwrap_or_else(|| default_label(i)))
            .collect();
        Self { labels }
    }

    /// Labels from the market source win over configured ones.
    pub fn for_market(market_labels: Option<&[String]>, configured: &[String], count: usize) -> Self {
        match market_labels {
            Some(names) => Self::with_names(names, count),
            None => Self::with_names(configured, count),
        }
    }

    pub fn label(&self, index: usize) -> String {
        self.labels
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("#{index}"))
    }

    pub fn all(&self) -> &[String] {
        &self.labels
    }

    /// Resolves a CLI token to a vertex index.
    ///
    /// Labels match case-insensitively. A bare number is taken as an index and
    /// is not range-checked here, so the core reports out-of-range indices.
    pub fn resolve(&self, token: &str) -> Result<usize, Error> {
        let token = token.trim();

        if let Some(index) = self
            .labels
            .iter()
            .position(|label| label.eq_ignore_ascii_case(token))
        {
            return Ok(index);
        }

        token
            .parse::<usize>()
            .map_err(|_| Error::UnknownCurrency(token.to_string()))
    }

    /// `A -> B -> C`
    pub fn format_path(&self, path: &[usize]) -> String {
        path.iter()
            .map(|&v| self.label(v))
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

fn default_label(index: usize) -> String {
    if index < 26 {
        char::from(b'A' + index as u8).to_string()
    } else {
        format!("C{index}")
    }
}
