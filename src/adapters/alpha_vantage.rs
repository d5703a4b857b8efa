//! Alpha Vantage price and company-overview adapter.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
use tracing::info;

use super::http::{get_json, number};
use crate::domain::error::BalanceWheelError;
use crate::domain::fundamentals::{fraction_to_percent, Fundamentals};
use crate::domain::ohlcv::{normalize, PriceBar};
use crate::ports::data_port::PriceSource;

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER: &str = "alphavantage";
const DAILY_KEY: &str = "Time Series (Daily)";

#[derive(Debug, Clone)]
pub struct AlphaVantageAdapter {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AlphaVantageAdapter {
    pub fn with_base_url(
        client: Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        AlphaVantageAdapter {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    async fn query(&self, function: &str, symbol: &str) -> Result<Value, BalanceWheelError> {
        let mut params = vec![
            ("function", function),
            ("symbol", symbol),
            ("apikey", self.api_key.as_str()),
        ];
        if function == "TIME_SERIES_DAILY" {
            params.push(("outputsize", "full"));
        }
        let body = get_json(&self.client, PROVIDER, &self.base_url, &params).await?;
        check_payload(&body)?;
        Ok(body)
    }
}

#[async_trait]
impl PriceSource for AlphaVantageAdapter {
    async fn fetch_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, BalanceWheelError> {
        let body = self.query("TIME_SERIES_DAILY", symbol).await?;
        let bars: Vec<PriceBar> = parse_daily(symbol, &body)?
            .into_iter()
            .filter(|b| b.date >= start && b.date <= end)
            .collect();
        info!(symbol, bars = bars.len(), "fetched daily bars");
        Ok(bars)
    }

    async fn fetch_fundamentals(&self, symbol: &str) -> Result<Fundamentals, BalanceWheelError> {
        let body = self.query("OVERVIEW", symbol).await?;
        parse_overview(symbol, &body)
    }
}

/// Alpha Vantage answers 200 for key, symbol and quota problems and explains them in the body.
fn check_payload(body: &Value) -> Result<(), BalanceWheelError> {
    if let Some(msg) = body.get("Error Message").and_then(Value::as_str) {
        return Err(BalanceWheelError::Api {
            provider: PROVIDER.into(),
            status: 200,
            reason: msg.to_string(),
        });
    }
    if body.get("Note").is_some() {
        return Err(BalanceWheelError::RateLimited {
            provider: PROVIDER.into(),
        });
    }
    if let Some(msg) = body.get("Information").and_then(Value::as_str) {
        if msg.contains("rate limit") {
            return Err(BalanceWheelError::RateLimited {
                provider: PROVIDER.into(),
            });
        }
        return Err(BalanceWheelError::Api {
            provider: PROVIDER.into(),
            status: 200,
            reason: msg.to_string(),
        });
    }
    Ok(())
}

pub fn parse_daily(symbol: &str, body: &Value) -> Result<Vec<PriceBar>, BalanceWheelError> {
    let series = body
        .get(DAILY_KEY)
        .and_then(Value::as_object)
        .ok_or_else(|| BalanceWheelError::parse(PROVIDER, format!("missing '{DAILY_KEY}'")))?;

    let mut bars = Vec::with_capacity(series.len());
    for (date, values) in series {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| BalanceWheelError::parse(PROVIDER, format!("date '{date}': {e}")))?;
        let field = |key: &str| {
            number(&values[key])
                .ok_or_else(|| BalanceWheelError::parse(PROVIDER, format!("{date}: bad '{key}'")))
        };
        bars.push(PriceBar {
            symbol: symbol.to_string(),
            date,
            open: field("1. open")?,
            high: field("2. high")?,
            low: field("3. low")?,
            close: field("4. close")?,
            volume: field("5. volume")? as u64,
        });
    }
    Ok(normalize(bars))
}

pub fn parse_overview(symbol: &str, body: &Value) -> Result<Fundamentals, BalanceWheelError> {
    if body.as_object().is_none_or(|o| o.is_empty()) {
        return Err(BalanceWheelError::NoData {
            symbol: symbol.to_string(),
        });
    }
    Ok(Fundamentals {
        symbol: symbol.to_string(),
        pe_ratio: number(&body["PERatio"]),
        pb_ratio: number(&body["PriceToBookRatio"]),
        dividend_yield: fraction_to_percent(number(&body["DividendYield"])),
        eps: number(&body["EPS"]),
        debt_to_equity: number(&body["DebtToEquityRatio"]),
        roe: fraction_to_percent(number(&body["ReturnOnEquityTTM"])),
    })
}
