//! IEX-style `/stock/{symbol}/earnings/1y` adapter.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
use tracing::info;

use super::http::{get_json, number};
use crate::domain::earnings::EarningsRecord;
use crate::domain::error::BalanceWheelError;
use crate::ports::earnings_port::EarningsSource;

pub const DEFAULT_BASE_URL: &str = "https://cloud.iexapis.com/stable";
const PROVIDER: &str = "iex";

#[derive(Debug, Clone)]
pub struct IexEarningsAdapter {
    client: Client,
    token: String,
    base_url: String,
}

impl IexEarningsAdapter {
    pub fn new(client: Client, token: impl Into<String>, base_url: impl Into<String>) -> Self {
        IexEarningsAdapter {
            client,
            token: token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl EarningsSource for IexEarningsAdapter {
    async fn fetch_earnings(&self, symbol: &str) -> Result<Vec<EarningsRecord>, BalanceWheelError> {
        let url = format!("{}/stock/{}/earnings/1y", self.base_url, symbol);
        let body = get_json(&self.client, PROVIDER, &url, &[("token", self.token.as_str())]).await?;
        let records = parse_earnings(&body)?;
        info!(symbol, records = records.len(), "fetched earnings");
        Ok(records)
    }
}

/// Accepts `{"earnings": [...]}` or a bare array.
pub fn parse_earnings(body: &Value) -> Result<Vec<EarningsRecord>, BalanceWheelError> {
    let rows = match body {
        Value::Array(rows) => rows,
        Value::Object(o) => o
            .get("earnings")
            .and_then(Value::as_array)
            .ok_or_else(|| BalanceWheelError::parse(PROVIDER, "missing 'earnings' array"))?,
        _ => return Err(BalanceWheelError::parse(PROVIDER, "expected object or array")),
    };
    Ok(rows.iter().map(parse_row).collect())
}

fn parse_row(row: &Value) -> EarningsRecord {
    let date = |key: &str| {
        row[key]
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
    };
    EarningsRecord {
        fiscal_period: row["fiscalPeriod"].as_str().unwrap_or_default().to_string(),
        fiscal_end_date: date("fiscalEndDate"),
        report_date: date("EPSReportDate"),
        actual_eps: number(&row["actualEPS"]),
        estimated_eps: number(&row["estimatedEPS"]).or_else(|| number(&row["consensusEPS"])),
        revenue: number(&row["revenue"]),
        market_cap: number(&row["marketCap"]),
        pe_ratio: number(&row["peRatio"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_wrapped_earnings() {
        let body = json!({
            "symbol": "AAPL",
            "earnings": [
                {
                    "actualEPS": 2.46,
                    "consensusEPS": 2.36,
                    "EPSReportDate": "2024-04-30",
                    "fiscalPeriod": "Q1 2024",
                    "fiscalEndDate": "2024-03-31",
                    "revenue": 90_000_000_000u64,
                    "marketCap": 2_600_000_000_000u64,
                    "peRatio": 26.4
                },
                {
                    "actualEPS": "1.52",
                    "estimatedEPS": "1.50",
                    "fiscalPeriod": "Q4 2023"
                }
            ]
        });
        let records = parse_earnings(&body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].estimated_eps, Some(2.36));
        assert_eq!(
            records[0].report_date,
            NaiveDate::from_ymd_opt(2024, 4, 30)
        );
        assert!(records[0].features().is_some());
        assert_eq!(records[1].estimated_eps, Some(1.5));
        assert_eq!(records[1].market_cap, None);
        assert!(records[1].features().is_none());
    }

    #[test]
    fn estimated_takes_precedence_over_consensus() {
        let body = json!([{"actualEPS": 1.0, "estimatedEPS": 0.9, "consensusEPS": 0.8}]);
        assert_eq!(parse_earnings(&body).unwrap()[0].estimated_eps, Some(0.9));
    }

    #[test]
    fn rejects_unexpected_shapes() {
        assert!(parse_earnings(&json!({"symbol": "AAPL"})).is_err());
        assert!(parse_earnings(&json!("nope")).is_err());
    }
}
