use config::{Config as ConfigLoader, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use common::numeric_kernel::{DEFAULT_PRECISION, MAX_PRECISION};

use super::error::Error;

#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    pub precision: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MarketConfig {
    #[serde(default)]
    pub labels: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SimulatorConfig {
    pub total_nodes: usize,
    pub rate_fluctuation_bps: f64,
    pub fee_bps: f64,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub engine: EngineConfig,
    pub market: MarketConfig,
    pub simulator: SimulatorConfig,
}

/// Loads configuration from built-in defaults, a TOML file and environment variables.
///
/// With `path` set the file is required. Without it, `crates/cli/Config.toml`
/// under the current directory is used when present. Environment variables
/// take the form `FXARB_<SECTION>__<KEY>`, e.g. `FXARB_ENGINE__PRECISION=8`.
pub fn load_config(path: Option<&Path>) -> Result<Config, Error> {
    let (config_file_path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (default_config_path()?, false),
    };

    if required && !config_file_path.exists() {
        return Err(Error::ConfigLoadError(format!(
            "Configuration file not found at: {}",
            config_file_path.display()
        )));
    }

    debug!(path = %config_file_path.display(), required, "Loading configuration");

    let s = ConfigLoader::builder()
        .set_default("engine.precision", DEFAULT_PRECISION)?
        .set_default("market.labels", Vec::<String>::new())?
        .set_default("simulator.total_nodes", 5)?
        .set_default("simulator.rate_fluctuation_bps", 40.0)?
        .set_default("simulator.fee_bps", 10.0)?
        .add_source(File::from(config_file_path.as_path()).required(required))
        .add_source(
            Environment::with_prefix("FXARB")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("market.labels")
                .try_parsing(true),
        )
        .build()?;

    let app_config: Config = s
        .try_deserialize()
        .map_err(|e| Error::ConfigLoadError(format!("Failed to deserialize config: {}", e)))?;

    if app_config.engine.precision > MAX_PRECISION {
        return Err(Error::ConfigLoadError(format!(
            "engine.precision must be at most {}, got {}",
            MAX_PRECISION, app_config.engine.precision
        )));
    }

    info!(
        precision = app_config.engine.precision,
        labels = app_config.market.labels.len(),
        "Configuration loaded"
    );

    Ok(app_config)
}

fn default_config_path() -> Result<PathBuf, Error> {
    let base_path = env::current_dir().map_err(|e| {
        Error::ConfigLoadError(format!("Failed to determine current directory: {}", e))
    })?;

    Ok(base_path.join("crates").join("cli").join("Config.toml"))
}
