//! NewsAPI `/v2/everything` headline adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::http::get_json;
use crate::domain::error::BalanceWheelError;
use crate::domain::news::NewsArticle;
use crate::ports::news_port::NewsSource;

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";
const PROVIDER: &str = "newsapi";
/// NewsAPI caps `pageSize` at 100.
const MAX_PAGE_SIZE: usize = 100;
const REMOVED: &str = "[Removed]";

#[derive(Debug, Clone)]
pub struct NewsApiAdapter {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    #[serde(default)]
    source: Option<RawSource>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    name: Option<String>,
}

impl NewsApiAdapter {
    pub fn with_base_url(
        client: Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        NewsApiAdapter {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl NewsSource for NewsApiAdapter {
    async fn fetch_headlines(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<NewsArticle>, BalanceWheelError> {
        let url = format!("{}/everything", self.base_url);
        let page_size = limit.clamp(1, MAX_PAGE_SIZE).to_string();
        let body = get_json(
            &self.client,
            PROVIDER,
            &url,
            &[
                ("q", query),
                ("sortBy", "publishedAt"),
                ("language", "en"),
                ("pageSize", page_size.as_str()),
                ("apiKey", self.api_key.as_str()),
            ],
        )
        .await?;
        let mut articles = parse_everything(&body)?;
        articles.truncate(limit);
        info!(query, articles = articles.len(), "fetched headlines");
        Ok(articles)
    }
}

pub fn parse_everything(body: &Value) -> Result<Vec<NewsArticle>, BalanceWheelError> {
    let envelope = Envelope::deserialize(body)
        .map_err(|e| BalanceWheelError::parse(PROVIDER, e.to_string()))?;

    if envelope.status != "ok" {
        return Err(BalanceWheelError::Api {
            provider: PROVIDER.into(),
            status: 200,
            reason: envelope
                .message
                .unwrap_or_else(|| format!("status '{}'", envelope.status)),
        });
    }

    Ok(envelope
        .articles
        .into_iter()
        .filter_map(|raw| {
            let title = raw.title.filter(|t| !t.trim().is_empty() && t != REMOVED)?;
            Some(NewsArticle {
                title,
                description: raw.description.filter(|d| d != REMOVED),
                source: raw.source.and_then(|s| s.name),
                published_at: raw.published_at,
                url: raw.url,
            })
        })
        .collect())
}
