//! Shared reqwest client construction and JSON GET with status mapping.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::error::BalanceWheelError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub fn build_client(timeout_secs: u64) -> Result<Client, BalanceWheelError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("balancewheel/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| BalanceWheelError::http("client", e))
}

/// GET `url` with `query` and decode the body as JSON.
///
/// Query values are never logged since they carry API keys.
pub async fn get_json(
    client: &Client,
    provider: &str,
    url: &str,
    query: &[(&str, &str)],
) -> Result<Value, BalanceWheelError> {
    debug!(provider, url, "GET");
    let response = client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| {
            warn!(provider, url, error = %e, "request failed");
            BalanceWheelError::http(provider, e.without_url())
        })?;

    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        warn!(provider, "rate limited");
        return Err(BalanceWheelError::RateLimited {
            provider: provider.to_string(),
        });
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(provider, status = status.as_u16(), "upstream error");
        return Err(BalanceWheelError::Api {
            provider: provider.to_string(),
            status: status.as_u16(),
            reason: error_reason(&body).unwrap_or_else(|| status.to_string()),
        });
    }

    response.json::<Value>().await.map_err(|e| {
        warn!(provider, error = %e, "invalid JSON body");
        BalanceWheelError::parse(provider, e.without_url().to_string())
    })
}

/// Pull a human-readable message out of a JSON error body, if there is one.
fn error_reason(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error", "Error Message"]
        .iter()
        .find_map(|k| match value.get(*k)? {
            Value::String(s) => Some(s.clone()),
            Value::Object(o) => o.get("message")?.as_str().map(String::from),
            _ => None,
        })
}

/// Numeric field that upstreams send either as a JSON number or a string.
/// Placeholders such as `"None"` and `"-"` read as missing.
pub fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_reason_variants() {
        assert_eq!(
            error_reason(r#"{"status":"error","message":"apiKeyInvalid"}"#).as_deref(),
            Some("apiKeyInvalid")
        );
        assert_eq!(
            error_reason(r#"{"error":{"message":"quota"}}"#).as_deref(),
            Some("quota")
        );
        assert_eq!(error_reason("<html>bad gateway</html>"), None);
    }

    #[test]
    fn number_accepts_strings_and_numbers() {
        assert_eq!(number(&json!(1.5)), Some(1.5));
        assert_eq!(number(&json!("28.91")), Some(28.91));
        assert_eq!(number(&json!("None")), None);
        assert_eq!(number(&json!("-")), None);
        assert_eq!(number(&json!(null)), None);
    }

    #[test]
    fn client_builds() {
        assert!(build_client(DEFAULT_TIMEOUT_SECS).is_ok());
    }
}
