//! Local CSV price adapter: one `{SYMBOL}.csv` per symbol with
//! `date,open,high,low,close,volume` columns.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

use crate::domain::error::BalanceWheelError;
use crate::domain::ohlcv::{normalize, PriceBar};
use crate::ports::data_port::PriceSource;

const PROVIDER: &str = "csv";

pub struct CsvAdapter {
    base_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct Row {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path
            .join(format!("{}.csv", symbol.to_ascii_uppercase()))
    }
}

#[async_trait]
impl PriceSource for CsvAdapter {
    async fn fetch_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, BalanceWheelError> {
        let path = self.csv_path(symbol);
        debug!(path = %path.display(), "reading prices");
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(BalanceWheelError::NoData {
                    symbol: symbol.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        parse_prices(symbol, &content, start, end)
    }
}

pub fn parse_prices(
    symbol: &str,
    content: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<PriceBar>, BalanceWheelError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut bars = Vec::new();
    for result in rdr.deserialize::<Row>() {
        let row = result.map_err(|e| BalanceWheelError::parse(PROVIDER, e.to_string()))?;
        if row.date < start || row.date > end {
            continue;
        }
        if row.volume < 0.0 {
            return Err(BalanceWheelError::parse(
                PROVIDER,
                format!("{}: negative volume", row.date),
            ));
        }
        bars.push(PriceBar {
            symbol: symbol.to_ascii_uppercase(),
            date: row.date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume as u64,
        });
    }
    Ok(normalize(bars))
}
