//! Option valuation against market data
//!
//! - Engine: single request, expiry -> volatility -> BSM, plus market quotes
//! - Batch: CSV rows priced independently on a worker pool
//! - Report: console rendering

pub mod engine;
pub mod batch;
pub mod report;

pub use engine::*;
pub use batch::*;
pub use report::*;
