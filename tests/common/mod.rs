#![allow(dead_code)]

use async_trait::async_trait;
use balancewheel::domain::error::BalanceWheelError;
use balancewheel::domain::fundamentals::Fundamentals;
use balancewheel::domain::news::NewsArticle;
pub use balancewheel::domain::ohlcv::PriceBar;
use balancewheel::ports::data_port::PriceSource;
use balancewheel::ports::news_port::NewsSource;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct MockPriceSource {
    pub data: Arc<HashMap<String, Vec<PriceBar>>>,
    pub errors: Arc<HashMap<String, String>>,
    pub fundamentals: Arc<HashMap<String, Fundamentals>>,
}

impl MockPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        Arc::make_mut(&mut self.data).insert(symbol.to_string(), bars);
        self
    }

    /// Fetches for `symbol` fail with an upstream error.
    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        Arc::make_mut(&mut self.errors).insert(symbol.to_string(), reason.to_string());
        self
    }

    pub fn with_fundamentals(mut self, f: Fundamentals) -> Self {
        Arc::make_mut(&mut self.fundamentals).insert(f.symbol.clone(), f);
        self
    }
}

#[async_trait]
impl PriceSource for MockPriceSource {
    async fn fetch_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, BalanceWheelError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(BalanceWheelError::Api {
                provider: "mock".into(),
                status: 503,
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start && b.date <= end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn fetch_fundamentals(&self, symbol: &str) -> Result<Fundamentals, BalanceWheelError> {
        self.fundamentals
            .get(symbol)
            .cloned()
            .ok_or_else(|| BalanceWheelError::NoData {
                symbol: symbol.to_string(),
            })
    }
}

#[derive(Clone, Default)]
pub struct MockNewsSource {
    pub titles: Arc<Vec<String>>,
    pub fail: bool,
}

impl MockNewsSource {
    pub fn with_titles(titles: &[&str]) -> Self {
        MockNewsSource {
            titles: Arc::new(titles.iter().map(|t| t.to_string()).collect()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        MockNewsSource {
            titles: Arc::new(Vec::new()),
            fail: true,
        }
    }
}

#[async_trait]
impl NewsSource for MockNewsSource {
    async fn fetch_headlines(
        &self,
        _query: &str,
        limit: usize,
    ) -> Result<Vec<NewsArticle>, BalanceWheelError> {
        if self.fail {
            return Err(BalanceWheelError::RateLimited {
                provider: "mock-news".into(),
            });
        }
        Ok(self
            .titles
            .iter()
            .take(limit)
            .map(|t| NewsArticle {
                title: t.clone(),
                description: None,
                source: Some("Mock Wire".into()),
                published_at: None,
                url: None,
            })
            .collect())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(symbol: &str, date: &str, close: f64) -> PriceBar {
    PriceBar {
        symbol: symbol.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000,
    }
}

/// `count` consecutive daily bars starting at `start_date`, close moving by `step` per bar.
pub fn generate_bars(
    symbol: &str,
    start_date: &str,
    count: usize,
    start_price: f64,
    step: f64,
) -> Vec<PriceBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| {
            let close = start_price + step * i as f64;
            PriceBar {
                symbol: symbol.to_string(),
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// `count` bars ending today, so that "last N days" queries see all of them.
pub fn bars_ending_today(symbol: &str, count: usize, start_price: f64, step: f64) -> Vec<PriceBar> {
    let today = chrono::Local::now().date_naive();
    let start = today - chrono::Duration::days(count as i64 - 1);
    generate_bars(
        symbol,
        &start.format("%Y-%m-%d").to_string(),
        count,
        start_price,
        step,
    )
}

/// Closes from a deterministic zig-zag around `base`, for series that are neither flat nor monotone.
pub fn zigzag_closes(count: usize, base: f64) -> Vec<f64> {
    (0..count)
        .map(|i| base + ((i * 7) % 5) as f64 - 2.0 + 0.1 * i as f64)
        .collect()
}

pub fn bars_from_closes(symbol: &str, start_date: &str, closes: &[f64]) -> Vec<PriceBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            symbol: symbol.to_string(),
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000,
        })
        .collect()
}
