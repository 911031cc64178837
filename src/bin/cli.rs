//! BSM Options CLI
//!
//! Prices one option from positional arguments, or a CSV batch of them, and
//! prints the model price next to the listed quote.
//!
//! Exit status is 0 on success, 1 when a batch finished with failed rows,
//! 2 for usage errors and a per-kind code otherwise (see `BsmError::exit_code`).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bsm_options::prelude::*;

const DEFAULT_CONFIG: &str = "bsm.toml";

/// Black-Scholes-Merton fair value from historical volatility
#[derive(Parser)]
#[command(name = "bsm-cli")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path [default: bsm.toml if present]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Skip the listed option quote lookup
    #[arg(long, global = true)]
    no_quotes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a single option
    Price {
        /// Underlying ticker (e.g., AAPL)
        ticker: String,
        /// C (call), P (put) or B (both)
        side: String,
        /// Volatility lookback window (e.g., 6mo, 1y)
        period: String,
        /// Strike price
        strike: f64,
        /// Maturity date (YYYY-MM-DD)
        maturity: String,
        /// Risk-free rate as a decimal (0.05 = 5%)
        #[arg(allow_negative_numbers = true)]
        rate: f64,
        /// Dividend yield as a decimal
        #[arg(allow_negative_numbers = true)]
        dividend: f64,
    },

    /// Price every row of a CSV file
    Batch {
        /// CSV with columns ticker, side, volatility_period, strike, maturity,
        /// risk_free_rate, dividend_yield
        file: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn build_engine(cli: &Cli) -> BsmResult<PricingEngine<Box<dyn MarketDataProvider>>> {
    let mut config = match &cli.config {
        Some(path) => PricerConfig::from_file(path)?,
        None => PricerConfig::load_or_default(DEFAULT_CONFIG)?,
    };
    if cli.no_quotes {
        config.pricing.fetch_quotes = false;
    }

    let client = YahooClient::new(&config.data)?;
    let provider: Box<dyn MarketDataProvider> = if config.cache.enabled {
        Box::new(CachedProvider::new(client, config.cache.clone())?)
    } else {
        Box::new(client)
    };

    Ok(PricingEngine::new(provider, config))
}

fn record_json(record: &BatchRecord) -> serde_json::Value {
    match &record.outcome {
        Ok(report) => serde_json::json!({
            "line": record.line,
            "ticker": record.ticker,
            "report": report,
        }),
        Err(e) => serde_json::json!({
            "line": record.line,
            "ticker": record.ticker,
            "error": { "kind": format!("{:?}", e.kind()), "message": e.to_string() },
        }),
    }
}

fn run(cli: &Cli) -> BsmResult<ExitCode> {
    let engine = build_engine(cli)?;
    let decimals = engine.config().pricing.display_decimals;

    match &cli.command {
        Commands::Price {
            ticker,
            side,
            period,
            strike,
            maturity,
            rate,
            dividend,
        } => {
            let request =
                PricingRequest::parse(ticker, side, period, *strike, maturity, *rate, *dividend)?;
            let report = engine.price(&request)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_report(&report, decimals));
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Batch { file } => {
            let items = read_requests_from_path(file)?;
            let records = engine.price_batch(items)?;

            if cli.json {
                let rows: Vec<_> = records.iter().map(record_json).collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print!("{}", render_batch(&records, decimals));
            }

            if BatchSummary::from_records(&records).failed > 0 {
                Ok(ExitCode::from(1))
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}
