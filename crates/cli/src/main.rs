pub mod config;
pub mod demo;
pub mod error;
pub mod labels;
pub mod matrix_loader;
pub mod render;
pub mod simulator;
pub mod types;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use common::error::Error as ArbSolverError;
use error::Error;
use fx_arb_core::Graph;
use labels::CurrencyLabels;
use matrix_loader::CsvMatrixLoader;
use simulator::MarketSimulator;
use types::{DataSource, Market, RateSource};

#[derive(Parser, Debug)]
#[command(name = "fx-arb", about = "Currency arbitrage detection and best-rate search")]
struct Cli {
    /// Configuration file (defaults to crates/cli/Config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Read the rate matrix from a CSV file
    #[arg(long, global = true, conflicts_with = "simulate")]
    input: Option<PathBuf>,

    /// Use a simulated market instead of a file
    #[arg(long, global = true)]
    simulate: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print currencies and weighted edges
    Show,
    /// Look for an arbitrage cycle reachable from a currency
    Detect {
        /// Currency label or index
        #[arg(short, long, default_value = "0")]
        source: String,
    },
    /// Best conversion rate and path between two currencies
    BestRate {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
    /// Run the built-in reference markets
    Demo,
}

impl Cli {
    fn data_source(&self) -> DataSource {
        match (&self.input, self.simulate) {
            (Some(path), _) => DataSource::Csv(path.clone()),
            (None, true) => DataSource::Simulated,
            (None, false) => DataSource::Builtin,
        }
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<String, Error> {
    let config = config::load_config(cli.config.as_deref())?;
    let precision = config.engine.precision;

    if let Command::Demo = cli.command {
        return demo::run_demo(precision);
    }

    let market = load_market(&cli.data_source(), &config)?;
    let graph = Graph::from_rates(&market.rates, precision)?;
    let labels = CurrencyLabels::for_market(
        market.labels.as_deref(),
        &config.market.labels,
        graph.vertex_count(),
    );

    info!(currencies = graph.vertex_count(), precision, "Graph ready");

    match cli.command {
        Command::Show => Ok(render::render_graph(&graph, &labels)),
        Command::Detect { source } => {
            let source = labels.resolve(&source)?;
            match graph.detect_arbitrage(source)? {
                Some(cycle) => Ok(render::render_cycle(&cycle, &labels)),
                None => Ok(format!(
                    "No arbitrage reachable from {}",
                    labels.label(source)
                )),
            }
        }
        Command::BestRate { from, to } => {
            let from = labels.resolve(&from)?;
            let to = labels.resolve(&to)?;
            best_rate(&graph, &labels, from, to)
        }
        Command::Demo => demo::run_demo(precision),
    }
}

/// Blocked and unreachable queries are answers, not failures.
fn best_rate(
    graph: &Graph,
    labels: &CurrencyLabels,
    from: usize,
    to: usize,
) -> Result<String, Error> {
    match graph.best_rate(from, to) {
        Ok(best) => Ok(render::render_best_rate(&best, labels)),
        Err(ArbSolverError::ArbitrageBlocked { cycle, .. }) => {
            warn!(from, to, "Best rate blocked by arbitrage");
            let cycle = cycle
                .map(|mut vertices| {
                    if let Some(&first) = vertices.first() {
                        vertices.push(first);
                    }
                    labels.format_path(&vertices)
                })
                .unwrap_or_else(|| "unknown cycle".to_string());
            Ok(format!(
                "No best rate from {}: arbitrage cycle {} is reachable",
                labels.label(from),
                cycle
            ))
        }
        Err(ArbSolverError::PathNotFound { .. }) => Ok(format!(
            "{} is unreachable from {}",
            labels.label(to),
            labels.label(from)
        )),
        Err(e) => Err(e.into()),
    }
}

fn load_market(source: &DataSource, config: &config::Config) -> Result<Market, Error> {
    match source {
        DataSource::Csv(path) => {
            info!(path = %path.display(), "Loading market from CSV");
            CsvMatrixLoader::new(path.clone()).load()
        }
        DataSource::Simulated => {
            info!("Generating simulated market");
            MarketSimulator::new(config.simulator.clone())?.load()
        }
        DataSource::Builtin => {
            info!("Using built-in reference market");
            let (_, rates) = demo::demo_markets().swap_remove(0);
            Ok(Market {
                labels: None,
                rates,
            })
        }
    }
}
