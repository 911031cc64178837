//! Pricing Models
//!
//! Implements:
//! - Time to expiry (calendar days)
//! - Historical volatility (close-to-close, 252-day annualisation)
//! - Black-Scholes-Merton closed form

pub mod expiry;
pub mod volatility;
pub mod black_scholes;

pub use expiry::*;
pub use volatility::*;
pub use black_scholes::*;
