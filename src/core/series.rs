//! Historical price series

use serde::{Deserialize, Serialize};

/// Chronological closing prices of an underlying over a lookback window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    /// Underlying symbol
    pub ticker: String,
    /// Lookback window the series was requested for (e.g., "6mo")
    pub period: String,
    /// Closing prices, oldest first
    pub closes: Vec<f64>,
}

impl PriceSeries {
    pub fn new(ticker: impl Into<String>, period: impl Into<String>, closes: Vec<f64>) -> Self {
        Self {
            ticker: ticker.into(),
            period: period.into(),
            closes,
        }
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Most recent close
    pub fn last(&self) -> Option<f64> {
        self.closes.last().copied()
    }
}
