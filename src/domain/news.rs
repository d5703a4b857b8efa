//! News headlines and their aggregate sentiment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::sentiment::{score_text, SentimentLabel, SentimentScore};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub description: Option<String>,
    pub source: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub url: Option<String>,
}

impl NewsArticle {
    pub fn sentiment(&self) -> SentimentScore {
        match &self.description {
            Some(desc) => score_text(&format!("{} {}", self.title, desc)),
            None => score_text(&self.title),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredHeadline {
    pub title: String,
    pub source: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub score: SentimentScore,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsSentiment {
    pub article_count: usize,
    pub mean_score: SentimentScore,
    pub label: SentimentLabel,
    pub headlines: Vec<ScoredHeadline>,
}

impl NewsSentiment {
    pub fn from_articles(articles: &[NewsArticle]) -> Self {
        let headlines: Vec<ScoredHeadline> = articles
            .iter()
            .map(|a| ScoredHeadline {
                title: a.title.clone(),
                source: a.source.clone(),
                published_at: a.published_at,
                score: a.sentiment(),
            })
            .collect();

        let mean_score = if headlines.is_empty() {
            SentimentScore::neutral()
        } else {
            let sum: f64 = headlines.iter().map(|h| h.score.value()).sum();
            SentimentScore::new(sum / headlines.len() as f64)
        };

        NewsSentiment {
            article_count: headlines.len(),
            mean_score,
            label: SentimentLabel::from_score(mean_score),
            headlines,
        }
    }
}
