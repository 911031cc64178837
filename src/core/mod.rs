//! Core data types for BSM Options
//!
//! Defines fundamental types:
//! - OptionSpec: side, strike, spot, expiry, rate, dividend yield
//! - PricingResult: model call/put prices
//! - MarketQuote: observed option quote
//! - PriceSeries: historical closes

pub mod option;
pub mod quote;
pub mod series;
pub mod error;

pub use option::*;
pub use quote::*;
pub use series::*;
pub use error::*;
