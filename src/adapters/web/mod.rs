//! Web server adapter.
//!
//! Serves `POST /api/stock_analysis` as JSON with permissive CORS. Upstream
//! API keys arrive per request, so the state holds a [`SourceFactory`] that
//! builds price and news sources on demand rather than fixed sources.

mod error;
mod handlers;

pub use error::{WebError, ANALYSIS_FAILED, MISSING_PARAMETERS, NOT_FOUND};
pub use handlers::*;

use axum::{routing::post, Router};
use reqwest::Client;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::adapters::alpha_vantage::AlphaVantageAdapter;
use crate::adapters::news_api::NewsApiAdapter;
use crate::domain::error::BalanceWheelError;
use crate::domain::settings::AnalysisSettings;
use crate::ports::data_port::PriceSource;
use crate::ports::news_port::NewsSource;

/// Builds request-scoped sources from caller-supplied API keys.
pub trait SourceFactory: Send + Sync {
    fn price_source(&self, api_key: &str) -> Box<dyn PriceSource>;
    fn news_source(&self, api_key: &str) -> Box<dyn NewsSource>;
}

/// Alpha Vantage prices and NewsAPI headlines over one shared client.
pub struct HttpSourceFactory {
    pub client: Client,
    pub alpha_vantage_url: String,
    pub news_api_url: String,
}

impl SourceFactory for HttpSourceFactory {
    fn price_source(&self, api_key: &str) -> Box<dyn PriceSource> {
        Box::new(AlphaVantageAdapter::with_base_url(
            self.client.clone(),
            api_key,
            &self.alpha_vantage_url,
        ))
    }

    fn news_source(&self, api_key: &str) -> Box<dyn NewsSource> {
        Box::new(NewsApiAdapter::with_base_url(
            self.client.clone(),
            api_key,
            &self.news_api_url,
        ))
    }
}

pub struct AppState {
    pub sources: Arc<dyn SourceFactory>,
    pub settings: AnalysisSettings,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/stock_analysis", post(handlers::analyze_stock))
        .fallback(handlers::not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

pub async fn serve(addr: SocketAddr, state: AppState) -> Result<(), BalanceWheelError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
