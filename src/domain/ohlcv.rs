//! Daily price bar representation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::BalanceWheelError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Sort bars by date and drop repeated dates, keeping the last bar seen for a date.
pub fn normalize(mut bars: Vec<PriceBar>) -> Vec<PriceBar> {
    bars.sort_by_key(|b| b.date);
    let mut out: Vec<PriceBar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match out.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            _ => out.push(bar),
        }
    }
    out
}

/// Dates must be strictly increasing.
pub fn ensure_chronological(bars: &[PriceBar]) -> Result<(), BalanceWheelError> {
    for w in bars.windows(2) {
        if w[1].date <= w[0].date {
            return Err(BalanceWheelError::Unordered {
                symbol: w[1].symbol.clone(),
                date: w[1].date.to_string(),
            });
        }
    }
    Ok(())
}

pub fn closes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}
