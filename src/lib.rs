//! # BSM Options - Black-Scholes-Merton Fair Value
//!
//! Estimates the fair value of European calls and puts from observed market
//! data and compares it with the listed quote.
//!
//! ## Overview
//!
//! For each option the pipeline:
//! - Reads the latest spot and a historical close series for the underlying
//! - Counts calendar days to maturity
//! - Estimates annualised historical volatility (sample stdev × √252)
//! - Prices the call and/or put with the BSM closed form (365-day year)
//! - Optionally fetches the listed quote for side-by-side comparison
//!
//! ## Key Components
//!
//! - **Models**: expiry, historical volatility, Black-Scholes-Merton
//! - **Data Fetching**: provider interface, Yahoo Finance client, history cache
//! - **Pricing**: single-request engine and partial-failure batch driver
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bsm_options::prelude::*;
//!
//! let config = PricerConfig::default();
//! let client = YahooClient::new(&config.data).unwrap();
//! let engine = PricingEngine::new(client, config);
//!
//! let request =
//!     PricingRequest::parse("AAPL", "C", "6mo", 200.0, "2025-06-20", 0.05, 0.005).unwrap();
//! let report = engine.price(&request).unwrap();
//! println!("{}", render_report(&report, 2));
//! ```
//!
//! ## What This Library Does NOT Do
//!
//! - Solve for implied volatility
//! - Compute Greeks
//! - Price American, Bermudan or exotic options
//! - Persist results

pub mod config;
pub mod core;
pub mod data;
pub mod models;
pub mod pricing;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        BsmError, BsmResult, ErrorKind, MarketQuote, OptionSide, OptionSpec, OptionType,
        PriceSeries, PricingResult,
    };

    // Configuration
    pub use crate::config::{BatchConfig, DataConfig, PricerConfig, PricingConfig};

    // Data fetching
    pub use crate::data::{
        CacheConfig, CachedProvider, DataCache, MarketDataProvider, StaticProvider, YahooClient,
    };

    // Models
    pub use crate::models::{
        days_to_expiry, historical_volatility, norm_cdf, parse_maturity, price as bs_price,
        price_side,
    };

    // Pricing
    pub use crate::pricing::{
        read_requests, read_requests_from_path, render_batch, render_report, BatchItem,
        BatchRecord, BatchSummary, PricingEngine, PricingReport, PricingRequest,
    };
}

// Re-export main types at crate root
pub use crate::core::{BsmError, BsmResult};
pub use crate::pricing::{PricingEngine, PricingRequest};
