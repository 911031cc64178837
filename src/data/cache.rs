//! Local data caching
//!
//! Caches price histories locally to reduce API calls when a batch prices
//! many contracts on the same underlying.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::provider::MarketDataProvider;
use crate::core::{BsmResult, MarketQuote, OptionType, PriceSeries};

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache directory
    pub cache_dir: PathBuf,
    /// Maximum age before refresh (in hours)
    pub max_age_hours: i64,
    /// Whether to use cache
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("./data/cache"),
            max_age_hours: 24,
            enabled: false,
        }
    }
}

const HISTORY_SUFFIX: &str = "_history.json";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Escape a key component so `_` only ever appears as the separator
///
/// Anything other than ASCII alphanumerics and `-` becomes `%XX`, so `BRK.B`
/// and `BRK_B` map to different files.
fn encode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        if b.is_ascii_alphanumeric() || b == b'-' {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}

/// Write through a temp file in the same directory, then rename into place
fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let tmp = dir.join(format!(
        ".{}.{}-{}.tmp",
        name,
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));

    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        e
    })
}

/// Data cache manager
pub struct DataCache {
    config: CacheConfig,
}

impl DataCache {
    pub fn new(config: CacheConfig) -> BsmResult<Self> {
        if config.enabled && !config.cache_dir.exists() {
            fs::create_dir_all(&config.cache_dir)?;
        }

        Ok(Self { config })
    }

    /// Cache file for a ticker and lookback window
    fn cache_key(&self, ticker: &str, period: &str) -> PathBuf {
        self.config.cache_dir.join(format!(
            "{}_{}{}",
            encode_component(ticker),
            encode_component(period),
            HISTORY_SUFFIX
        ))
    }

    /// Check if cache is valid (exists and not expired)
    pub fn is_valid(&self, ticker: &str, period: &str) -> bool {
        if !self.config.enabled {
            return false;
        }

        let path = self.cache_key(ticker, period);
        let modified = match fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(_) => return false,
        };

        let modified: DateTime<Utc> = modified.into();
        Utc::now() - modified < Duration::hours(self.config.max_age_hours)
    }

    /// Save a price history to cache
    pub fn save_history(&self, series: &PriceSeries) -> BsmResult<()> {
        if !self.config.enabled {
            return Ok(());
        }

        let path = self.cache_key(&series.ticker, &series.period);
        let json = serde_json::to_string_pretty(series)?;
        write_atomic(&path, &json)?;

        tracing::info!("Cached {} history for {} at {:?}", series.period, series.ticker, path);
        Ok(())
    }

    /// Load a price history from cache
    pub fn load_history(&self, ticker: &str, period: &str) -> BsmResult<Option<PriceSeries>> {
        if !self.is_valid(ticker, period) {
            return Ok(None);
        }

        let path = self.cache_key(ticker, period);
        let json = fs::read_to_string(&path)?;
        let series: PriceSeries = serde_json::from_str(&json)?;

        tracing::info!("Loaded {} history for {} from cache", period, ticker);
        Ok(Some(series))
    }

    /// Clear cache for a ticker
    pub fn clear(&self, ticker: &str) -> BsmResult<()> {
        if !self.config.cache_dir.exists() {
            return Ok(());
        }

        let wanted = encode_component(ticker);
        for entry in fs::read_dir(&self.config.cache_dir)? {
            let entry = entry?;
            let file_name = entry.file_name().to_string_lossy().to_string();

            let owner = file_name
                .strip_suffix(HISTORY_SUFFIX)
                .and_then(|stem| stem.split_once('_'))
                .map(|(owner, _)| owner);
            if owner == Some(wanted.as_str()) {
                fs::remove_file(entry.path())?;
            }
        }

        Ok(())
    }
}

/// Provider wrapper that serves price histories from the cache when fresh
///
/// Spot prices and option quotes always go to the inner provider.
pub struct CachedProvider<P> {
    inner: P,
    cache: DataCache,
}

impl<P: MarketDataProvider> CachedProvider<P> {
    pub fn new(inner: P, config: CacheConfig) -> BsmResult<Self> {
        Ok(Self {
            inner,
            cache: DataCache::new(config)?,
        })
    }

    pub fn cache(&self) -> &DataCache {
        &self.cache
    }
}

impl<P: MarketDataProvider> MarketDataProvider for CachedProvider<P> {
    fn spot_price(&self, ticker: &str) -> BsmResult<f64> {
        self.inner.spot_price(ticker)
    }

    /// Cache faults are logged and never fail the request
    fn price_history(&self, ticker: &str, period: &str) -> BsmResult<PriceSeries> {
        match self.cache.load_history(ticker, period) {
            Ok(Some(series)) => return Ok(series),
            Ok(None) => {}
            Err(e) => tracing::warn!("Ignoring unreadable {} cache for {}: {}", period, ticker, e),
        }

        tracing::info!("Fetching fresh {} history for {}", period, ticker);
        let series = self.inner.price_history(ticker, period)?;
        if let Err(e) = self.cache.save_history(&series) {
            tracing::warn!("Could not cache {} history for {}: {}", period, ticker, e);
        }

        Ok(series)
    }

    fn option_quote(
        &self,
        ticker: &str,
        maturity: NaiveDate,
        option_type: OptionType,
        strike: f64,
    ) -> BsmResult<MarketQuote> {
        self.inner.option_quote(ticker, maturity, option_type, strike)
    }
}
