//! Option contract definitions
//!
//! Represents the European option being valued: which side(s) to price, the
//! contract terms and the market inputs resolved for it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::{BsmError, BsmResult};

/// A single option leg (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => f.pad("Call"),
            OptionType::Put => f.pad("Put"),
        }
    }
}

/// Which prices a request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionSide {
    Call,
    Put,
    Both,
}

impl OptionSide {
    /// Legs covered by this side
    pub fn legs(&self) -> &'static [OptionType] {
        match self {
            OptionSide::Call => &[OptionType::Call],
            OptionSide::Put => &[OptionType::Put],
            OptionSide::Both => &[OptionType::Call, OptionType::Put],
        }
    }

    pub fn includes(&self, leg: OptionType) -> bool {
        self.legs().contains(&leg)
    }
}

impl From<OptionType> for OptionSide {
    fn from(leg: OptionType) -> Self {
        match leg {
            OptionType::Call => OptionSide::Call,
            OptionType::Put => OptionSide::Put,
        }
    }
}

impl FromStr for OptionSide {
    type Err = BsmError;

    /// Accepts `C`/`P`/`B` and `call`/`put`/`both`, case-insensitive.
    fn from_str(s: &str) -> BsmResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c" | "call" => Ok(OptionSide::Call),
            "p" | "put" => Ok(OptionSide::Put),
            "b" | "both" => Ok(OptionSide::Both),
            _ => Err(BsmError::InvalidSide(s.to_string())),
        }
    }
}

impl fmt::Display for OptionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionSide::Call => f.pad("C"),
            OptionSide::Put => f.pad("P"),
            OptionSide::Both => f.pad("B"),
        }
    }
}

/// Fully resolved pricing input for one European option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Underlying symbol (e.g., "AAPL")
    pub ticker: String,
    /// Side(s) to price
    pub side: OptionSide,
    /// Strike price
    pub strike: f64,
    /// Spot price of the underlying
    pub spot: f64,
    /// Calendar days until expiry, negative once expired
    pub days_to_expiry: i64,
    /// Continuously compounded risk-free rate
    pub risk_free_rate: f64,
    /// Continuous dividend yield
    pub dividend_yield: f64,
}

impl OptionSpec {
    /// Create a spec, checking `spot > 0` and `strike > 0`
    pub fn new(
        ticker: impl Into<String>,
        side: OptionSide,
        strike: f64,
        spot: f64,
        days_to_expiry: i64,
        risk_free_rate: f64,
        dividend_yield: f64,
    ) -> BsmResult<Self> {
        if !(strike.is_finite() && strike > 0.0) {
            return Err(BsmError::invalid_input(format!(
                "strike must be positive, got {}",
                strike
            )));
        }
        if !(spot.is_finite() && spot > 0.0) {
            return Err(BsmError::invalid_input(format!("spot must be positive, got {}", spot)));
        }

        Ok(Self {
            ticker: ticker.into(),
            side,
            strike,
            spot,
            days_to_expiry,
            risk_free_rate,
            dividend_yield,
        })
    }
}

/// Model prices for the requested side(s)
///
/// Values are unrounded; use [`PricingResult::rounded`] only for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub call: Option<f64>,
    pub put: Option<f64>,
}

impl PricingResult {
    pub fn get(&self, leg: OptionType) -> Option<f64> {
        match leg {
            OptionType::Call => self.call,
            OptionType::Put => self.put,
        }
    }

    /// Copy rounded to `decimals` places for presentation
    pub fn rounded(&self, decimals: u32) -> Self {
        Self {
            call: self.call.map(|p| round_to(p, decimals)),
            put: self.put.map(|p| round_to(p, decimals)),
        }
    }
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
