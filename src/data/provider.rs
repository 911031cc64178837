//! Market-data port
//!
//! The pricing engine reaches market data only through
//! [`MarketDataProvider`], so live clients and fixtures are interchangeable.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::core::{BsmError, BsmResult, MarketQuote, OptionType, PriceSeries};

/// Source of spot prices, price histories and option quotes
pub trait MarketDataProvider: Send + Sync {
    /// Most recent close of `ticker`
    fn spot_price(&self, ticker: &str) -> BsmResult<f64>;

    /// Chronological closes over a named lookback window (e.g., "6mo")
    fn price_history(&self, ticker: &str, period: &str) -> BsmResult<PriceSeries>;

    /// Listed quote for the contract at `maturity` and `strike`
    fn option_quote(
        &self,
        ticker: &str,
        maturity: NaiveDate,
        option_type: OptionType,
        strike: f64,
    ) -> BsmResult<MarketQuote>;
}

impl<P: MarketDataProvider + ?Sized> MarketDataProvider for &P {
    fn spot_price(&self, ticker: &str) -> BsmResult<f64> {
        (**self).spot_price(ticker)
    }

    fn price_history(&self, ticker: &str, period: &str) -> BsmResult<PriceSeries> {
        (**self).price_history(ticker, period)
    }

    fn option_quote(
        &self,
        ticker: &str,
        maturity: NaiveDate,
        option_type: OptionType,
        strike: f64,
    ) -> BsmResult<MarketQuote> {
        (**self).option_quote(ticker, maturity, option_type, strike)
    }
}

impl<P: MarketDataProvider + ?Sized> MarketDataProvider for Box<P> {
    fn spot_price(&self, ticker: &str) -> BsmResult<f64> {
        (**self).spot_price(ticker)
    }

    fn price_history(&self, ticker: &str, period: &str) -> BsmResult<PriceSeries> {
        (**self).price_history(ticker, period)
    }

    fn option_quote(
        &self,
        ticker: &str,
        maturity: NaiveDate,
        option_type: OptionType,
        strike: f64,
    ) -> BsmResult<MarketQuote> {
        (**self).option_quote(ticker, maturity, option_type, strike)
    }
}

/// Strike match tolerance when looking up a listed contract
pub const STRIKE_TOLERANCE: f64 = 0.001;

/// In-memory provider serving fixed data
///
/// Used for tests and offline runs. Histories are served for any period.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    spots: HashMap<String, f64>,
    histories: HashMap<String, Vec<f64>>,
    quotes: Vec<MarketQuote>,
    underlyings: HashMap<String, String>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spot(mut self, ticker: &str, spot: f64) -> Self {
        self.spots.insert(ticker.to_string(), spot);
        self
    }

    pub fn with_history(mut self, ticker: &str, closes: Vec<f64>) -> Self {
        self.histories.insert(ticker.to_string(), closes);
        self
    }

    pub fn with_quote(mut self, ticker: &str, quote: MarketQuote) -> Self {
        self.underlyings.insert(quote.contract_symbol.clone(), ticker.to_string());
        self.quotes.push(quote);
        self
    }
}

impl MarketDataProvider for StaticProvider {
    fn spot_price(&self, ticker: &str) -> BsmResult<f64> {
        self.spots
            .get(ticker)
            .copied()
            .ok_or_else(|| BsmError::provider(format!("unknown ticker {}", ticker)))
    }

    fn price_history(&self, ticker: &str, period: &str) -> BsmResult<PriceSeries> {
        self.histories
            .get(ticker)
            .map(|closes| PriceSeries::new(ticker, period, closes.clone()))
            .ok_or_else(|| BsmError::provider(format!("no history for {}", ticker)))
    }

    fn option_quote(
        &self,
        ticker: &str,
        maturity: NaiveDate,
        option_type: OptionType,
        strike: f64,
    ) -> BsmResult<MarketQuote> {
        self.quotes
            .iter()
            .find(|q| {
                self.underlyings.get(&q.contract_symbol).map(String::as_str) == Some(ticker)
                    && q.expiry == maturity
                    && q.option_type == option_type
                    && (q.strike - strike).abs() < STRIKE_TOLERANCE
            })
            .cloned()
            .ok_or_else(|| {
                BsmError::provider(format!(
                    "no {} quote for {} {} @ {}",
                    option_type, ticker, maturity, strike
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call_quote() -> MarketQuote {
        MarketQuote {
            contract_symbol: "TEST250620C00100000".into(),
            option_type: OptionType::Call,
            expiry: NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
            strike: 100.0,
            last_price: Some(5.1),
            bid: Some(5.0),
            ask: Some(5.2),
            open_interest: Some(10),
            implied_volatility: Some(0.25),
        }
    }

    #[test]
    fn test_static_provider() {
        let provider = StaticProvider::new()
            .with_spot("TEST", 100.0)
            .with_history("TEST", vec![99.0, 100.0, 101.0])
            .with_quote("TEST", call_quote());

        assert_eq!(provider.spot_price("TEST").unwrap(), 100.0);
        assert_eq!(provider.price_history("TEST", "1mo").unwrap().period, "1mo");

        let expiry = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();
        assert!(provider.option_quote("TEST", expiry, OptionType::Call, 100.0).is_ok());
        assert!(provider.option_quote("TEST", expiry, OptionType::Put, 100.0).is_err());
        assert!(provider.option_quote("TEST", expiry, OptionType::Call, 105.0).is_err());
        assert!(provider.option_quote("OTHER", expiry, OptionType::Call, 100.0).is_err());
    }

    #[test]
    fn test_unknown_ticker() {
        let provider = StaticProvider::new();
        let err = provider.spot_price("NOPE").unwrap_err();
        assert!(matches!(err, BsmError::DataProvider(_)));
        assert!(provider.price_history("NOPE", "6mo").is_err());
    }
}
