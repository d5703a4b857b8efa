//! currencyapi.com v3 exchange-rate adapter.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::http::{get_json, number};
use crate::domain::error::BalanceWheelError;
use crate::ports::fx_port::FxRateSource;

pub const DEFAULT_BASE_URL: &str = "https://api.currencyapi.com/v3";
const PROVIDER: &str = "currencyapi";

#[derive(Debug, Clone)]
pub struct CurrencyApiAdapter {
    client: Client,
    api_key: String,
    base_url: String,
}

impl CurrencyApiAdapter {
    pub fn with_base_url(
        client: Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        CurrencyApiAdapter {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn rate(
        &self,
        endpoint: &str,
        base: &str,
        quote: &str,
        date: Option<&str>,
    ) -> Result<f64, BalanceWheelError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let mut params = vec![
            ("apikey", self.api_key.as_str()),
            ("base_currency", base),
            ("currencies", quote),
        ];
        if let Some(d) = date {
            params.push(("date", d));
        }
        let body = get_json(&self.client, PROVIDER, &url, &params).await?;
        let rate = parse_rate(&body, quote)?;
        debug!(base, quote, ?date, rate, "fetched rate");
        Ok(rate)
    }
}

#[async_trait]
impl FxRateSource for CurrencyApiAdapter {
    async fn latest(&self, base: &str, quote: &str) -> Result<f64, BalanceWheelError> {
        self.rate("latest", base, quote, None).await
    }

    async fn historical(
        &self,
        base: &str,
        quote: &str,
        date: NaiveDate,
    ) -> Result<f64, BalanceWheelError> {
        let day = date.format("%Y-%m-%d").to_string();
        self.rate("historical", base, quote, Some(&day)).await
    }
}

/// Reads `data.{quote}.value`.
pub fn parse_rate(body: &Value, quote: &str) -> Result<f64, BalanceWheelError> {
    let entry = body
        .get("data")
        .and_then(|d| d.get(quote))
        .ok_or_else(|| BalanceWheelError::parse(PROVIDER, format!("no rate for {quote}")))?;
    number(&entry["value"])
        .ok_or_else(|| BalanceWheelError::parse(PROVIDER, format!("non-numeric rate for {quote}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_rate() {
        let body = json!({
            "meta": {"last_updated_at": "2024-03-05T23:59:59Z"},
            "data": {"INR": {"code": "INR", "value": 82.91}}
        });
        assert_eq!(parse_rate(&body, "INR").unwrap(), 82.91);
    }

    #[test]
    fn missing_currency_is_a_parse_error() {
        let body = json!({"data": {"EUR": {"code": "EUR", "value": 0.92}}});
        assert!(matches!(
            parse_rate(&body, "INR").unwrap_err(),
            BalanceWheelError::Parse { .. }
        ));
        let body = json!({"data": {"INR": {"code": "INR"}}});
        assert!(parse_rate(&body, "INR").is_err());
    }
}
