//! Pricing engine
//!
//! Pulls spot and history from a [`MarketDataProvider`], then runs expiry,
//! volatility and Black-Scholes-Merton in that order. Any error is returned
//! unchanged.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::PricerConfig;
use crate::core::{round_to, BsmResult, MarketQuote, OptionSide, OptionSpec, PricingResult};
use crate::data::MarketDataProvider;
use crate::models::{days_between, parse_maturity};

/// One option to value, as entered on the command line or in a batch file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRequest {
    /// Underlying symbol
    pub ticker: String,
    /// Side(s) to price
    pub side: OptionSide,
    /// Lookback window for historical volatility (e.g., "6mo", "1y")
    pub volatility_period: String,
    /// Strike price
    pub strike: f64,
    /// Maturity as `YYYY-MM-DD`; parsed when the request is priced
    pub maturity: String,
    /// Continuously compounded risk-free rate
    pub risk_free_rate: f64,
    /// Continuous dividend yield
    pub dividend_yield: f64,
}

impl PricingRequest {
    /// Build a request from raw text fields, parsing the side
    pub fn parse(
        ticker: &str,
        side: &str,
        volatility_period: &str,
        strike: f64,
        maturity: &str,
        risk_free_rate: f64,
        dividend_yield: f64,
    ) -> BsmResult<Self> {
        Ok(Self {
            ticker: ticker.trim().to_string(),
            side: side.parse()?,
            volatility_period: volatility_period.trim().to_string(),
            strike,
            maturity: maturity.trim().to_string(),
            risk_free_rate,
            dividend_yield,
        })
    }
}

/// Model prices next to the observed market quotes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingReport {
    pub request: PricingRequest,
    /// Reference date used for time to expiry
    pub valuation_date: NaiveDate,
    /// Spot price used by the model
    pub spot: f64,
    pub days_to_expiry: i64,
    /// Annualised historical volatility
    pub volatility: f64,
    /// Unrounded model prices
    pub prices: PricingResult,
    /// Listed quotes for each priced leg, when fetched
    pub quotes: Vec<MarketQuote>,
}

/// Values option requests against a market-data provider
pub struct PricingEngine<P> {
    provider: P,
    config: PricerConfig,
    valuation_date: Option<NaiveDate>,
}

impl<P: MarketDataProvider> PricingEngine<P> {
    pub fn new(provider: P, config: PricerConfig) -> Self {
        Self {
            provider,
            config,
            valuation_date: None,
        }
    }

    /// Fix the reference date instead of using today's UTC date
    pub fn with_valuation_date(mut self, date: NaiveDate) -> Self {
        self.valuation_date = Some(date);
        self
    }

    pub fn config(&self) -> &PricerConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Reference "now" for time to expiry
    pub fn valuation_date(&self) -> NaiveDate {
        self.valuation_date.unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Price one request
    pub fn price(&self, request: &PricingRequest) -> BsmResult<PricingReport> {
        tracing::info!(
            "Pricing {} {} K={} exp={}",
            request.ticker, request.side, request.strike, request.maturity
        );

        let mut spot = self.provider.spot_price(&request.ticker)?;
        if self.config.pricing.round_spot {
            spot = round_to(spot, self.config.pricing.spot_decimals);
        }
        let history = self
            .provider
            .price_history(&request.ticker, &request.volatility_period)?;
        let today = self.valuation_date();

        let maturity = parse_maturity(&request.maturity)?;
        let days_to_expiry = days_between(maturity, today);
        let volatility = history.volatility()?;

        let spec = OptionSpec::new(
            request.ticker.clone(),
            request.side,
            request.strike,
            spot,
            days_to_expiry,
            request.risk_free_rate,
            request.dividend_yield,
        )?;
        let prices = spec.price(volatility)?;

        let quotes = if self.config.pricing.fetch_quotes {
            request
                .side
                .legs()
                .iter()
                .map(|&leg| {
                    self.provider
                        .option_quote(&request.ticker, maturity, leg, request.strike)
                })
                .collect::<BsmResult<Vec<_>>>()?
        } else {
            Vec::new()
        };

        Ok(PricingReport {
            request: request.clone(),
            valuation_date: today,
            spot,
            days_to_expiry,
            volatility,
            prices,
            quotes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BsmError, MarketQuote, OptionType};
    use crate::data::StaticProvider;
    use crate::models::historical_volatility;
    use approx::assert_relative_eq;

    const HISTORY: [f64; 8] = [48.0, 48.9, 49.4, 48.7, 50.2, 49.8, 51.0, 50.0];

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()
    }

    fn quote(option_type: OptionType, last: f64) -> MarketQuote {
        MarketQuote {
            contract_symbol: format!("TEST260102{:?}00050000", option_type),
            option_type,
            expiry: NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(),
            strike: 50.0,
            last_price: Some(last),
            bid: Some(last - 0.1),
            ask: Some(last + 0.1),
            open_interest: Some(250),
            implied_volatility: Some(0.21),
        }
    }

    fn provider() -> StaticProvider {
        StaticProvider::new()
            .with_spot("TEST", 50.004)
            .with_history("TEST", HISTORY.to_vec())
            .with_quote("TEST", quote(OptionType::Call, 5.3))
            .with_quote("TEST", quote(OptionType::Put, 2.7))
    }

    fn request(side: &str, maturity: &str) -> PricingRequest {
        PricingRequest::parse("TEST", side, "6mo", 50.0, maturity, 0.05, 0.0).unwrap()
    }

    #[test]
    fn test_price_both_with_quotes() {
        let engine = PricingEngine::new(provider(), PricerConfig::default())
            .with_valuation_date(today());

        let report = engine.price(&request("B", "2026-01-02")).unwrap();
        let vol = historical_volatility(&HISTORY).unwrap();

        assert_eq!(report.spot, 50.0);
        assert_eq!(report.days_to_expiry, 365);
        assert_eq!(report.volatility, vol);

        let expected =
            crate::models::price_side(OptionSide::Both, 50.0, 50.0, 365, vol, 0.05, 0.0).unwrap();
        assert_eq!(report.prices, expected);
        assert_eq!(report.quotes.len(), 2);
        assert_eq!(report.quotes[0].option_type, OptionType::Call);
        assert_eq!(report.quotes[1].option_type, OptionType::Put);
    }

    #[test]
    fn test_unrounded_spot() {
        let config = PricerConfig::from_toml_str(
            "[pricing]\nround_spot = false\nfetch_quotes = false\n",
        )
        .unwrap();
        let engine = PricingEngine::new(provider(), config).with_valuation_date(today());

        let report = engine.price(&request("C", "2026-01-02")).unwrap();
        assert_relative_eq!(report.spot, 50.004);
        assert!(report.quotes.is_empty());
        assert!(report.prices.put.is_none());
    }

    #[test]
    fn test_errors_propagate() {
        let engine = PricingEngine::new(provider(), PricerConfig::default())
            .with_valuation_date(today());

        let err = engine.price(&request("C", "02/01/2026")).unwrap_err();
        assert!(matches!(err, BsmError::InvalidDateFormat(_)));

        let err = engine.price(&request("C", "2025-01-02")).unwrap_err();
        assert!(matches!(err, BsmError::DegenerateInput(_)));

        let mut missing = request("C", "2026-01-02");
        missing.ticker = "NOPE".into();
        assert!(matches!(engine.price(&missing).unwrap_err(), BsmError::DataProvider(_)));

        // No listed contract at this strike
        let mut unlisted = request("P", "2026-01-02");
        unlisted.strike = 55.0;
        assert!(matches!(engine.price(&unlisted).unwrap_err(), BsmError::DataProvider(_)));
    }

    #[test]
    fn test_short_and_flat_history() {
        let short = StaticProvider::new()
            .with_spot("TEST", 50.0)
            .with_history("TEST", vec![50.0, 50.5]);
        let engine =
            PricingEngine::new(short, PricerConfig::default()).with_valuation_date(today());
        let err = engine.price(&request("C", "2026-01-02")).unwrap_err();
        assert!(matches!(err, BsmError::InsufficientData { observations: 2, .. }));

        let flat = StaticProvider::new()
            .with_spot("TEST", 50.0)
            .with_history("TEST", vec![50.0; 20]);
        let engine =
            PricingEngine::new(flat, PricerConfig::default()).with_valuation_date(today());
        let err = engine.price(&request("C", "2026-01-02")).unwrap_err();
        assert!(matches!(err, BsmError::DegenerateInput(_)));
    }

    #[test]
    fn test_invalid_side() {
        let err = PricingRequest::parse("TEST", "X", "6mo", 50.0, "2026-01-02", 0.05, 0.0)
            .unwrap_err();
        assert!(matches!(err, BsmError::InvalidSide(_)));
    }
}
