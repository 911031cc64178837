//! Historical volatility
//!
//! Close-to-close volatility from simple daily returns:
//! `r_i = p_i / p_{i-1} - 1`, sample standard deviation (n-1 denominator),
//! scaled by `sqrt(252)`.

use statrs::statistics::Statistics;

use crate::core::{BsmError, BsmResult, PriceSeries};

/// Trading days per year used for annualisation
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Fewest prices that yield two returns
pub const MIN_PRICES: usize = 3;

/// Simple one-period returns, `len - 1` values
pub fn simple_returns(prices: &[f64]) -> Vec<f64> {
    prices.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

/// Sample standard deviation of daily simple returns
pub fn daily_volatility(prices: &[f64]) -> BsmResult<f64> {
    if prices.len() < MIN_PRICES {
        return Err(BsmError::InsufficientData {
            observations: prices.len(),
            required: MIN_PRICES,
        });
    }
    if let Some(bad) = prices.iter().find(|p| !(p.is_finite() && **p > 0.0)) {
        return Err(BsmError::invalid_input(format!("non-positive price in series: {}", bad)));
    }

    let returns = simple_returns(prices);
    Ok(returns.iter().std_dev())
}

/// Scale a daily volatility to a one-year horizon
pub fn annualize(daily: f64) -> f64 {
    daily * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Annualised historical volatility of a chronological close series
pub fn historical_volatility(prices: &[f64]) -> BsmResult<f64> {
    let vol = annualize(daily_volatility(prices)?);
    tracing::debug!(observations = prices.len(), vol, "historical volatility");
    Ok(vol)
}

impl PriceSeries {
    /// Annualised historical volatility of this series
    pub fn volatility(&self) -> BsmResult<f64> {
        historical_volatility(&self.closes)
    }
}
