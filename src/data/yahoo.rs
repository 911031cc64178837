//! Yahoo Finance data fetcher
//!
//! Fetches daily closes and listed option quotes through Yahoo Finance's
//! unofficial API.
//!
//! Note: This is for educational/research purposes. Yahoo Finance
//! data is delayed ~15 minutes and intended for personal use.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use super::provider::{MarketDataProvider, STRIKE_TOLERANCE};
use crate::config::DataConfig;
use crate::core::{BsmError, BsmResult, MarketQuote, OptionType, PriceSeries};

/// Yahoo Finance API client
pub struct YahooClient {
    client: reqwest::blocking::Client,
    base_url: String,
    spot_lookback: String,
}

impl YahooClient {
    pub fn new(config: &DataConfig) -> BsmResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BsmError::provider(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            spot_lookback: config.spot_lookback.clone(),
        })
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> BsmResult<T> {
        tracing::debug!("GET {}", url);
        self.client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| BsmError::provider(e.to_string()))?
            .json()
            .map_err(|e| BsmError::provider(format!("Failed to parse response: {}", e)))
    }

    /// Daily closes over `period`, oldest first
    pub fn get_history(&self, symbol: &str, period: &str) -> BsmResult<PriceSeries> {
        let url = format!(
            "{}/v8/finance/chart/{}?range={}&interval=1d",
            self.base_url, symbol, period
        );

        let response: YahooChartResponse = self.get_json(&url)?;
        if let Some(err) = response.chart.error {
            return Err(BsmError::provider(format!("{}: {}", symbol, err.description)));
        }

        let data = response
            .chart
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| BsmError::provider(format!("No chart data returned for {}", symbol)))?;

        // Yahoo leaves nulls for sessions without a print
        let closes: Vec<f64> = data
            .indicators
            .quote
            .into_iter()
            .next()
            .map(|q| q.close.into_iter().flatten().collect())
            .unwrap_or_default();

        tracing::info!("Fetched {} closes for {} ({})", closes.len(), symbol, period);
        Ok(PriceSeries::new(symbol, period, closes))
    }

    /// Quotes for every listed contract at `expiry`
    pub fn get_option_chain(
        &self,
        symbol: &str,
        expiry: NaiveDate,
    ) -> BsmResult<(Vec<MarketQuote>, Vec<MarketQuote>)> {
        // Yahoo keys expirations by midnight UTC
        let expiry_ts = expiry
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp())
            .ok_or_else(|| BsmError::InvalidDateFormat(expiry.to_string()))?;

        let url = format!(
            "{}/v7/finance/options/{}?date={}",
            self.base_url, symbol, expiry_ts
        );

        let response: YahooOptionsResponse = self.get_json(&url)?;
        let chain_data = response
            .option_chain
            .result
            .into_iter()
            .next()
            .ok_or_else(|| BsmError::provider(format!("No options data returned for {}", symbol)))?;

        let options = chain_data
            .options
            .into_iter()
            .next()
            .ok_or_else(|| BsmError::provider(format!("No {} chain for {}", expiry, symbol)))?;

        let convert = |rows: Vec<YahooOptionData>, option_type: OptionType| {
            rows.into_iter()
                .filter_map(|row| convert_option_quote(row, expiry, option_type))
                .collect::<Vec<_>>()
        };

        Ok((
            convert(options.calls, OptionType::Call),
            convert(options.puts, OptionType::Put),
        ))
    }
}

/// Convert Yahoo option data to our quote format
fn convert_option_quote(
    data: YahooOptionData,
    expiry: NaiveDate,
    option_type: OptionType,
) -> Option<MarketQuote> {
    Some(MarketQuote {
        contract_symbol: data.contract_symbol?,
        option_type,
        expiry,
        strike: data.strike?,
        last_price: data.last_price,
        bid: data.bid,
        ask: data.ask,
        open_interest: data.open_interest.and_then(|oi| u64::try_from(oi).ok()),
        implied_volatility: data.implied_volatility,
    })
}

impl MarketDataProvider for YahooClient {
    fn spot_price(&self, ticker: &str) -> BsmResult<f64> {
        self.get_history(ticker, &self.spot_lookback)?
            .last()
            .ok_or_else(|| BsmError::provider(format!("No closing price for {}", ticker)))
    }

    fn price_history(&self, ticker: &str, period: &str) -> BsmResult<PriceSeries> {
        self.get_history(ticker, period)
    }

    fn option_quote(
        &self,
        ticker: &str,
        maturity: NaiveDate,
        option_type: OptionType,
        strike: f64,
    ) -> BsmResult<MarketQuote> {
        let (calls, puts) = self.get_option_chain(ticker, maturity)?;
        let quotes = match option_type {
            OptionType::Call => calls,
            OptionType::Put => puts,
        };

        quotes
            .into_iter()
            .find(|q| (q.strike - strike).abs() < STRIKE_TOLERANCE)
            .ok_or_else(|| {
                BsmError::provider(format!(
                    "No {} listed for {} {} @ {}",
                    option_type, ticker, maturity, strike
                ))
            })
    }
}

// Yahoo Finance API response structures

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooChartData>>,
    error: Option<YahooApiError>,
}

#[derive(Debug, Deserialize)]
struct YahooApiError {
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooChartData {
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooBars>,
}

#[derive(Debug, Deserialize)]
struct YahooBars {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionsResponse {
    #[serde(rename = "optionChain")]
    option_chain: YahooOptionChain,
}

#[derive(Debug, Deserialize)]
struct YahooOptionChain {
    result: Vec<YahooOptionChainData>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionChainData {
    options: Vec<YahooOptions>,
}

#[derive(Debug, Deserialize)]
struct YahooOptions {
    #[serde(default)]
    calls: Vec<YahooOptionData>,
    #[serde(default)]
    puts: Vec<YahooOptionData>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionData {
    #[serde(rename = "contractSymbol")]
    contract_symbol: Option<String>,
    strike: Option<f64>,
    bid: Option<f64>,
    ask: Option<f64>,
    #[serde(rename = "lastPrice")]
    last_price: Option<f64>,
    #[serde(rename = "openInterest")]
    open_interest: Option<i64>,
    #[serde(rename = "impliedVolatility")]
    implied_volatility: Option<f64>,
}
