//! Console formatting
//!
//! Rounding happens here and nowhere earlier.

use std::fmt::Write;

use super::batch::{BatchRecord, BatchSummary};
use super::engine::PricingReport;
use crate::core::OptionType;

fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{:.*}", decimals, v))
        .unwrap_or_else(|| "-".to_string())
}

/// Human-readable report for one priced option
pub fn render_report(report: &PricingReport, decimals: u32) -> String {
    let d = decimals as usize;
    let req = &report.request;
    let prices = report.prices.rounded(decimals);
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} {} K={:.2} exp {}",
        req.ticker, req.side, req.strike, req.maturity
    );
    let _ = writeln!(out, "  Valuation date: {}", report.valuation_date);
    let _ = writeln!(out, "  Spot:           {:.2}", report.spot);
    let _ = writeln!(out, "  Days to expiry: {}", report.days_to_expiry);
    let _ = writeln!(
        out,
        "  Volatility:     {:.2}% ({})",
        report.volatility * 100.0,
        req.volatility_period
    );
    let _ = writeln!(
        out,
        "  Rate / Div:     {:.2}% / {:.2}%",
        req.risk_free_rate * 100.0,
        req.dividend_yield * 100.0
    );

    for leg in req.side.legs() {
        let _ = writeln!(out, "  BSM {} price: {}", leg, fmt_opt(prices.get(*leg), d));
    }

    for quote in &report.quotes {
        let _ = writeln!(
            out,
            "  Market {} {}: last {} bid {} ask {} mid {} spread {} OI {} IV {}",
            match quote.option_type {
                OptionType::Call => "call",
                OptionType::Put => "put",
            },
            quote.contract_symbol,
            fmt_opt(quote.last_price, d),
            fmt_opt(quote.bid, d),
            fmt_opt(quote.ask, d),
            fmt_opt(quote.mid(), d),
            fmt_opt(quote.spread(), d),
            quote.open_interest.map(|oi| oi.to_string()).unwrap_or_else(|| "-".into()),
            fmt_opt(quote.implied_volatility.map(|iv| iv * 100.0), 2),
        );
    }

    out
}

/// One line per batch row plus a summary
pub fn render_batch(records: &[BatchRecord], decimals: u32) -> String {
    let d = decimals as usize;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{:>5}  {:<8} {:<4} {:>10} {:<10} {:>8} {:>10} {:>10}",
        "line", "ticker", "side", "strike", "maturity", "vol%", "call", "put"
    );

    for record in records {
        match &record.outcome {
            Ok(report) => {
                let prices = report.prices.rounded(decimals);
                let _ = writeln!(
                    out,
                    "{:>5}  {:<8} {:<4} {:>10.2} {:<10} {:>8.2} {:>10} {:>10}",
                    record.line,
                    record.ticker,
                    report.request.side,
                    report.request.strike,
                    report.request.maturity,
                    report.volatility * 100.0,
                    fmt_opt(prices.call, d),
                    fmt_opt(prices.put, d),
                );
            }
            Err(e) => {
                let _ = writeln!(
                    out,
                    "{:>5}  {:<8} ERROR {:?}: {}",
                    record.line,
                    record.ticker,
                    e.kind(),
                    e
                );
            }
        }
    }

    let summary = BatchSummary::from_records(records);
    let _ = writeln!(
        out,
        "\n{} rows: {} ok, {} failed",
        summary.total, summary.succeeded, summary.failed
    );
    out
}
