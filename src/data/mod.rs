//! Market data access
//!
//! Handles:
//! - The provider interface the pricing engine depends on
//! - Yahoo Finance API for closes and option chains (free)
//! - In-memory fixtures and local history caching

pub mod provider;
pub mod yahoo;
pub mod cache;

pub use provider::*;
pub use yahoo::*;
pub use cache::*;
