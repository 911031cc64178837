//! Black-Scholes-Merton Model
//!
//! Closed-form European option prices with a continuous dividend yield:
//!
//! - `d1 = (ln(S/K) + (r - q + σ²/2)T) / (σ√T)`
//! - `d2 = d1 - σ√T`
//! - `call = S e^{-qT} N(d1) - K e^{-rT} N(d2)`
//! - `put  = K e^{-rT} N(-d2) - S e^{-qT} N(-d1)`
//!
//! Time enters as calendar days and is converted with a 365-day year. A
//! non-positive time or volatility is rejected rather than priced.

use statrs::function::erf::erfc;
use std::f64::consts::SQRT_2;

use super::expiry::year_fraction;
use crate::core::{BsmError, BsmResult, OptionSide, OptionSpec, OptionType, PricingResult};

/// Standard normal CDF
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Black-Scholes d1 parameter
pub fn d1(spot: f64, strike: f64, rate: f64, div: f64, vol: f64, time: f64) -> f64 {
    ((spot / strike).ln() + (rate - div + 0.5 * vol * vol) * time) / (vol * time.sqrt())
}

/// Black-Scholes d2 parameter
pub fn d2(spot: f64, strike: f64, rate: f64, div: f64, vol: f64, time: f64) -> f64 {
    d1(spot, strike, rate, div, vol, time) - vol * time.sqrt()
}

fn check_inputs(spot: f64, strike: f64, vol: f64, time: f64) -> BsmResult<()> {
    if !(spot.is_finite() && spot > 0.0) {
        return Err(BsmError::invalid_input(format!("spot must be positive, got {}", spot)));
    }
    if !(strike.is_finite() && strike > 0.0) {
        return Err(BsmError::invalid_input(format!("strike must be positive, got {}", strike)));
    }
    if !(time > 0.0) {
        return Err(BsmError::degenerate(format!("time to expiry must be positive, got {}", time)));
    }
    if !(vol > 0.0) {
        return Err(BsmError::degenerate(format!("volatility must be positive, got {}", vol)));
    }
    Ok(())
}

/// Single-leg price for time in years
pub fn price(
    spot: f64,
    strike: f64,
    rate: f64,
    div: f64,
    vol: f64,
    time: f64,
    option_type: OptionType,
) -> BsmResult<f64> {
    check_inputs(spot, strike, vol, time)?;

    let d1 = d1(spot, strike, rate, div, vol, time);
    let d2 = d1 - vol * time.sqrt();
    let spot_df = spot * (-div * time).exp();
    let strike_df = strike * (-rate * time).exp();

    Ok(match option_type {
        OptionType::Call => spot_df * norm_cdf(d1) - strike_df * norm_cdf(d2),
        OptionType::Put => strike_df * norm_cdf(-d2) - spot_df * norm_cdf(-d1),
    })
}

/// Price the requested side(s) with time given in calendar days
pub fn price_side(
    side: OptionSide,
    spot: f64,
    strike: f64,
    days_to_expiry: i64,
    vol: f64,
    rate: f64,
    div: f64,
) -> BsmResult<PricingResult> {
    let time = year_fraction(days_to_expiry);
    let mut result = PricingResult::default();

    for &leg in side.legs() {
        let value = price(spot, strike, rate, div, vol, time, leg)?;
        match leg {
            OptionType::Call => result.call = Some(value),
            OptionType::Put => result.put = Some(value),
        }
    }

    tracing::debug!(%side, spot, strike, days_to_expiry, vol, ?result, "bsm price");
    Ok(result)
}

impl OptionSpec {
    /// Model price of this option at volatility `vol`
    pub fn price(&self, vol: f64) -> BsmResult<PricingResult> {
        price_side(
            self.side,
            self.spot,
            self.strike,
            self.days_to_expiry,
            vol,
            self.risk_free_rate,
            self.dividend_yield,
        )
    }
}

/// Right-hand side of put-call parity: `S e^{-qT} - K e^{-rT}`
pub fn parity_forward_value(spot: f64, strike: f64, rate: f64, div: f64, time: f64) -> f64 {
    spot * (-div * time).exp() - strike * (-rate * time).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_norm_cdf() {
        assert!((norm_cdf(0.0) - 0.5).abs() < 1e-10);
        assert!((norm_cdf(1.96) - 0.975).abs() < 0.001);
        assert!((norm_cdf(-1.96) - 0.025).abs() < 0.001);
    }

    #[test]
    fn test_benchmark_atm() {
        // S=K=50, one year, 20% vol, 5% rate: d1 = 0.35, d2 = 0.15
        let result = price_side(OptionSide::Both, 50.0, 50.0, 365, 0.20, 0.05, 0.0).unwrap();
        assert_relative_eq!(result.call.unwrap(), 5.2253, epsilon = 0.001);
        assert_relative_eq!(result.put.unwrap(), 2.7868, epsilon = 0.001);
    }

    #[test]
    fn test_textbook_value() {
        // Hull: S=42, K=40, r=10%, σ=20%, T=0.5
        let call = price(42.0, 40.0, 0.10, 0.0, 0.20, 0.5, OptionType::Call).unwrap();
        let put = price(42.0, 40.0, 0.10, 0.0, 0.20, 0.5, OptionType::Put).unwrap();
        assert_relative_eq!(call, 4.76, epsilon = 0.01);
        assert_relative_eq!(put, 0.81, epsilon = 0.01);
    }

    #[test]
    fn test_side_selection() {
        let call = price_side(OptionSide::Call, 100.0, 95.0, 90, 0.3, 0.04, 0.01).unwrap();
        let put = price_side(OptionSide::Put, 100.0, 95.0, 90, 0.3, 0.04, 0.01).unwrap();
        let both = price_side(OptionSide::Both, 100.0, 95.0, 90, 0.3, 0.04, 0.01).unwrap();

        assert!(call.call.is_some() && call.put.is_none());
        assert!(put.put.is_some() && put.call.is_none());
        assert_eq!(both.call, call.call);
        assert_eq!(both.put, put.put);
    }

    #[test]
    fn test_dividend_lowers_call() {
        let no_div = price(100.0, 100.0, 0.05, 0.0, 0.2, 1.0, OptionType::Call).unwrap();
        let div = price(100.0, 100.0, 0.05, 0.03, 0.2, 1.0, OptionType::Call).unwrap();
        assert!(div < no_div);
    }

    #[test]
    fn test_degenerate_inputs() {
        for days in [0, -1, -365] {
            let err = price_side(OptionSide::Call, 50.0, 50.0, days, 0.2, 0.05, 0.0).unwrap_err();
            assert!(matches!(err, BsmError::DegenerateInput(_)));
        }
        for vol in [0.0, -0.1, f64::NAN] {
            let err = price_side(OptionSide::Both, 50.0, 50.0, 30, vol, 0.05, 0.0).unwrap_err();
            assert!(matches!(err, BsmError::DegenerateInput(_)));
        }
    }

    #[test]
    fn test_invalid_spot_strike() {
        let err = price(0.0, 50.0, 0.05, 0.0, 0.2, 1.0, OptionType::Call).unwrap_err();
        assert!(matches!(err, BsmError::InvalidInput(_)));
        let err = price(50.0, -5.0, 0.05, 0.0, 0.2, 1.0, OptionType::Put).unwrap_err();
        assert!(matches!(err, BsmError::InvalidInput(_)));
    }

    #[test]
    fn test_spec_price() {
        let spec = OptionSpec::new("TEST", OptionSide::Both, 50.0, 50.0, 365, 0.05, 0.0).unwrap();
        let direct = price_side(OptionSide::Both, 50.0, 50.0, 365, 0.2, 0.05, 0.0).unwrap();
        assert_eq!(spec.price(0.2).unwrap(), direct);
    }

    proptest! {
        #[test]
        fn test_put_call_parity(
            spot in 1.0f64..500.0,
            strike in 1.0f64..500.0,
            days in 1i64..1500,
            vol in 0.01f64..1.5,
            rate in -0.02f64..0.15,
            div in 0.0f64..0.08,
        ) {
            let result = price_side(OptionSide::Both, spot, strike, days, vol, rate, div).unwrap();
            let time = year_fraction(days);
            let lhs = result.call.unwrap() - result.put.unwrap();
            let rhs = parity_forward_value(spot, strike, rate, div, time);
            prop_assert!((lhs - rhs).abs() < 1e-6, "parity gap {}", lhs - rhs);
        }

        #[test]
        fn test_prices_non_negative(
            spot in 1.0f64..500.0,
            strike in 1.0f64..500.0,
            days in 1i64..1500,
            vol in 0.01f64..1.5,
        ) {
            let result = price_side(OptionSide::Both, spot, strike, days, vol, 0.05, 0.0).unwrap();
            prop_assert!(result.call.unwrap() >= -1e-9);
            prop_assert!(result.put.unwrap() >= -1e-9);
        }
    }
}
