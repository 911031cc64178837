//! Batch pricing
//!
//! Reads rows of `ticker, side, volatility_period, strike, maturity,
//! risk_free_rate, dividend_yield` and prices each one independently on a
//! bounded worker pool. A failing row is reported in place; the batch always
//! runs to completion.

use rayon::prelude::*;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::engine::{PricingEngine, PricingReport, PricingRequest};
use crate::core::{BsmError, BsmResult};
use crate::data::MarketDataProvider;

/// Column order of a batch row
pub const BATCH_COLUMNS: [&str; 7] = [
    "ticker",
    "side",
    "volatility_period",
    "strike",
    "maturity",
    "risk_free_rate",
    "dividend_yield",
];

#[derive(Debug, Deserialize)]
struct BatchRow {
    ticker: String,
    side: String,
    volatility_period: String,
    strike: f64,
    maturity: String,
    risk_free_rate: f64,
    dividend_yield: f64,
}

impl BatchRow {
    fn into_request(self) -> BsmResult<PricingRequest> {
        PricingRequest::parse(
            &self.ticker,
            &self.side,
            &self.volatility_period,
            self.strike,
            &self.maturity,
            self.risk_free_rate,
            self.dividend_yield,
        )
    }
}

/// One input row, decoded or not
#[derive(Debug)]
pub struct BatchItem {
    /// 1-based line in the input
    pub line: u64,
    /// First column as written, for tagging failures
    pub ticker: String,
    pub request: BsmResult<PricingRequest>,
}

/// Outcome of one row
#[derive(Debug)]
pub struct BatchRecord {
    pub line: u64,
    pub ticker: String,
    pub outcome: BsmResult<PricingReport>,
}

impl BatchRecord {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Success/failure counts of a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_records(records: &[BatchRecord]) -> Self {
        let succeeded = records.iter().filter(|r| r.is_ok()).count();
        Self {
            total: records.len(),
            succeeded,
            failed: records.len() - succeeded,
        }
    }
}

fn is_header(record: &csv::StringRecord) -> bool {
    record
        .get(0)
        .map(|f| f.eq_ignore_ascii_case(BATCH_COLUMNS[0]))
        .unwrap_or(false)
}

/// Decode batch rows from CSV
///
/// A header row is optional, blank lines and `#` comments are skipped. Rows
/// that fail to decode are kept as failed items.
pub fn read_requests<R: Read>(reader: R) -> BsmResult<Vec<BatchItem>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let headers = csv::StringRecord::from(BATCH_COLUMNS.to_vec());
    let mut items = Vec::new();

    for (index, result) in csv_reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(index as u64 + 1);
                items.push(BatchItem {
                    line,
                    ticker: String::new(),
                    request: Err(BsmError::invalid_input(e.to_string())),
                });
                continue;
            }
        };

        if index == 0 && is_header(&record) {
            continue;
        }

        let line = record.position().map(|p| p.line()).unwrap_or(index as u64 + 1);
        let ticker = record.get(0).unwrap_or_default().to_string();
        let request = record
            .deserialize::<BatchRow>(Some(&headers))
            .map_err(|e| BsmError::invalid_input(format!("line {}: {}", line, e)))
            .and_then(BatchRow::into_request);

        items.push(BatchItem { line, ticker, request });
    }

    Ok(items)
}

/// Decode batch rows from a CSV file
pub fn read_requests_from_path(path: impl AsRef<Path>) -> BsmResult<Vec<BatchItem>> {
    let file = File::open(path.as_ref())?;
    read_requests(file)
}

impl<P: MarketDataProvider> PricingEngine<P> {
    /// Price every item on a bounded pool, keeping input order
    pub fn price_batch(&self, items: Vec<BatchItem>) -> BsmResult<Vec<BatchRecord>> {
        let workers = self.config().batch.worker_count();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| BsmError::config(format!("worker pool: {}", e)))?;

        tracing::info!("Pricing {} rows on {} workers", items.len(), workers);

        let records: Vec<BatchRecord> = pool.install(|| {
            items
                .into_par_iter()
                .map(|item| {
                    let outcome = item.request.and_then(|request| self.price(&request));
                    if let Err(e) = &outcome {
                        tracing::warn!("Row {} ({}) failed: {}", item.line, item.ticker, e);
                    }
                    BatchRecord {
                        line: item.line,
                        ticker: item.ticker,
                        outcome,
                    }
                })
                .collect()
        });

        let summary = BatchSummary::from_records(&records);
        tracing::info!("Batch done: {} ok, {} failed", summary.succeeded, summary.failed);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_with_header_and_comments() {
        let input = "\
ticker,side,volatility_period,strike,maturity,risk_free_rate,dividend_yield
# near-dated
AAPL, C, 6mo, 200, 2025-06-20, 0.05, 0.005

MSFT,P,1y,400,2025-09-19,0.05,0.008
";
        let items = read_requests(input.as_bytes()).unwrap();
        assert_eq!(items.len(), 2);

        let first = items[0].request.as_ref().unwrap();
        assert_eq!(first.ticker, "AAPL");
        assert_eq!(first.strike, 200.0);
        assert_eq!(first.maturity, "2025-06-20");
        assert_eq!(items[1].ticker, "MSFT");
        assert!(items[1].line > items[0].line);
    }

    #[test]
    fn test_read_without_header() {
        let items = read_requests("AAPL,B,6mo,200,2025-06-20,0.05,0\n".as_bytes()).unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].request.is_ok());
        assert_eq!(items[0].line, 1);
    }

    #[test]
    fn test_bad_rows_are_kept() {
        let input = "\
AAPL,C,6mo,abc,2025-06-20,0.05,0
AAPL,X,6mo,200,2025-06-20,0.05,0
AAPL,C,6mo
AAPL,P,6mo,200,2025-06-20,0.05,0
";
        let items = read_requests(input.as_bytes()).unwrap();
        assert_eq!(items.len(), 4);
        assert!(matches!(items[0].request, Err(BsmError::InvalidInput(_))));
        assert!(matches!(items[1].request, Err(BsmError::InvalidSide(_))));
        assert!(matches!(items[2].request, Err(BsmError::InvalidInput(_))));
        assert!(items[3].request.is_ok());
        assert_eq!(items[2].line, 3);
    }

    /// Yields one good row, then fails like a dropped network mount
    struct FailingReader {
        served: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.served {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "read failed"));
            }
            self.served = true;
            let row = b"AAPL,C,6mo,200,2025-06-20,0.05,0\n";
            buf[..row.len()].copy_from_slice(row);
            Ok(row.len())
        }
    }

    #[test]
    fn test_read_failure_is_io_error() {
        let err = read_requests(FailingReader { served: false }).unwrap_err();
        assert!(matches!(err, BsmError::IO(_)));
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn test_summary() {
        let records = vec![
            BatchRecord {
                line: 1,
                ticker: "A".into(),
                outcome: Err(BsmError::provider("down")),
            },
            BatchRecord {
                line: 2,
                ticker: "B".into(),
                outcome: Err(BsmError::InvalidDateFormat("x".into())),
            },
        ];
        let summary = BatchSummary::from_records(&records);
        assert_eq!(summary, BatchSummary { total: 2, succeeded: 0, failed: 2 });
    }
}
