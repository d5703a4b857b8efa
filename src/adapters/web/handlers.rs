//! HTTP request handlers for the web adapter.

use axum::{body::Bytes, extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::domain::analysis::{stock_analysis, StockAnalysis};

use super::{AppState, WebError};

#[derive(Debug, Default, Deserialize)]
pub struct StockAnalysisRequest {
    pub symbol: Option<String>,
    pub stock_api_key: Option<String>,
    pub news_api_key: Option<String>,
}

/// The three fields, trimmed, if every one is present and non-empty.
fn required(req: StockAnalysisRequest) -> Option<(String, String, String)> {
    let field = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    Some((
        field(req.symbol)?.to_ascii_uppercase(),
        field(req.stock_api_key)?,
        field(req.news_api_key)?,
    ))
}

/// `POST /api/stock_analysis`
///
/// The body is decoded by hand so that malformed JSON gets the same 400 as a
/// missing field instead of axum's plain-text rejection.
pub async fn analyze_stock(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<StockAnalysis>, WebError> {
    let request: StockAnalysisRequest =
        serde_json::from_slice(&body).map_err(|_| WebError::missing_parameters())?;
    let (symbol, stock_api_key, news_api_key) =
        required(request).ok_or_else(WebError::missing_parameters)?;

    info!(%symbol, "stock analysis requested");
    let prices = state.sources.price_source(&stock_api_key);
    let news = state.sources.news_source(&news_api_key);
    let analysis = stock_analysis(&symbol, prices.as_ref(), news.as_ref(), &state.settings).await?;
    Ok(Json(analysis))
}

pub async fn not_found() -> WebError {
    WebError::not_found()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(symbol: Option<&str>, stock: Option<&str>, news: Option<&str>) -> StockAnalysisRequest {
        StockAnalysisRequest {
            symbol: symbol.map(String::from),
            stock_api_key: stock.map(String::from),
            news_api_key: news.map(String::from),
        }
    }

    #[test]
    fn required_fields() {
        assert_eq!(
            required(req(Some(" aapl "), Some("k1"), Some("k2"))),
            Some(("AAPL".to_string(), "k1".to_string(), "k2".to_string()))
        );
        assert_eq!(required(req(None, Some("k1"), Some("k2"))), None);
        assert_eq!(required(req(Some("AAPL"), Some(""), Some("k2"))), None);
        assert_eq!(required(req(Some("AAPL"), Some("k1"), Some("   "))), None);
    }
}
