//! Listed option quotes
//!
//! Market data observed from the provider. These are consumed by the pricer
//! for comparison and never produced by it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::option::OptionType;

/// Observed quote for one listed option contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketQuote {
    /// Exchange contract symbol (e.g., "AAPL250620C00200000")
    pub contract_symbol: String,
    /// Contract leg
    pub option_type: OptionType,
    /// Expiration date
    pub expiry: NaiveDate,
    /// Strike price
    pub strike: f64,
    /// Last traded price
    pub last_price: Option<f64>,
    /// Bid price
    pub bid: Option<f64>,
    /// Ask price
    pub ask: Option<f64>,
    /// Open interest
    pub open_interest: Option<u64>,
    /// Implied volatility reported by the provider
    pub implied_volatility: Option<f64>,
}

impl MarketQuote {
    /// Mid price from bid/ask
    pub fn mid(&self) -> Option<f64> {
        match (self.bid, self.ask) {
            (Some(b), Some(a)) => Some((b + a) / 2.0),
            _ => None,
        }
    }

    /// Bid-ask spread
    pub fn spread(&self) -> Option<f64> {
        match (self.bid, self.ask) {
            (Some(b), Some(a)) => Some(a - b),
            _ => None,
        }
    }
}
