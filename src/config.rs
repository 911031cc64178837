//! Configuration for the pricing pipeline
//!
//! Every section has defaults, so a config file only needs the keys it
//! overrides:
//!
//! ```toml
//! [data]
//! timeout_secs = 5
//!
//! [pricing]
//! fetch_quotes = false
//!
//! [batch]
//! workers = 4
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::{BsmError, BsmResult};
use crate::data::CacheConfig;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PricerConfig {
    /// Market-data provider settings
    pub data: DataConfig,
    /// Price-history cache
    pub cache: CacheConfig,
    /// Pricing behaviour
    pub pricing: PricingConfig,
    /// Batch execution
    pub batch: BatchConfig,
}

impl PricerConfig {
    /// Parse a TOML document
    pub fn from_toml_str(text: &str) -> BsmResult<Self> {
        toml::from_str(text).map_err(|e| BsmError::config(e.to_string()))
    }

    /// Read and parse a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> BsmResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| BsmError::config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Read `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> BsmResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }
}

/// Market-data provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Yahoo Finance API root
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// User agent sent with each request
    pub user_agent: String,
    /// Window read to find the latest close
    /// Default: "1mo"
    pub spot_lookback: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            spot_lookback: "1mo".to_string(),
        }
    }
}

/// Pricing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Look up the listed quote of each priced leg
    /// Default: true
    pub fetch_quotes: bool,

    /// Round the spot before pricing
    /// Default: true
    pub round_spot: bool,

    /// Decimals kept when `round_spot` is on
    /// Default: 2
    pub spot_decimals: u32,

    /// Decimals shown in reports
    /// Default: 2
    pub display_decimals: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            fetch_quotes: true,
            round_spot: true,
            spot_decimals: 2,
            display_decimals: 2,
        }
    }
}

/// Batch configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Worker pool size; `None` uses the available parallelism
    pub workers: Option<usize>,
}

impl BatchConfig {
    pub fn worker_count(&self) -> usize {
        self.workers
            .filter(|&n| n > 0)
            .or_else(|| std::thread::available_parallelism().ok().map(|n| n.get()))
            .unwrap_or(1)
    }
}
