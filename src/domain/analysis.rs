//! Stock analysis: prices, indicators, risk, news sentiment and a recommendation.

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, info};

use super::error::BalanceWheelError;
use super::financial_metrics::{FinancialMetrics, MovingAverageKind};
use super::indicator::{IndicatorSeries, IndicatorValue};
use super::metrics::RiskMetrics;
use super::news::NewsSentiment;
use super::ohlcv::normalize;
use super::settings::{history_start, AnalysisSettings};
use super::signal::{combine_with_sentiment, generate_signal, Signal};
use crate::ports::data_port::PriceSource;
use crate::ports::news_port::NewsSource;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacdSnapshot {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandsSnapshot {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Latest value of each indicator; `None` where the series has no valid point yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub sma: Option<f64>,
    pub ema: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<MacdSnapshot>,
    pub bollinger: Option<BandsSnapshot>,
}

impl IndicatorSnapshot {
    pub fn compute(metrics: &FinancialMetrics, settings: &AnalysisSettings) -> Self {
        IndicatorSnapshot {
            sma: metrics
                .moving_average(settings.sma_period, MovingAverageKind::Simple)
                .latest_simple(),
            ema: metrics
                .moving_average(settings.ema_period, MovingAverageKind::Exponential)
                .latest_simple(),
            rsi: metrics.rsi(settings.rsi_period).latest_simple(),
            macd: latest_macd(&metrics.macd(
                settings.macd_fast,
                settings.macd_slow,
                settings.macd_signal,
            )),
            bollinger: latest_bands(
                &metrics.bollinger_bands(settings.bollinger_period, settings.bollinger_mult),
            ),
        }
    }
}

fn latest_macd(series: &IndicatorSeries) -> Option<MacdSnapshot> {
    match series.latest()?.value {
        IndicatorValue::Macd {
            line,
            signal,
            histogram,
        } => Some(MacdSnapshot {
            line,
            signal,
            histogram,
        }),
        _ => None,
    }
}

fn latest_bands(series: &IndicatorSeries) -> Option<BandsSnapshot> {
    match series.latest()?.value {
        IndicatorValue::Bollinger {
            upper,
            middle,
            lower,
        } => Some(BandsSnapshot {
            upper,
            middle,
            lower,
        }),
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StockAnalysis {
    pub symbol: String,
    pub as_of: NaiveDate,
    pub bars: usize,
    pub last_close: f64,
    pub indicators: IndicatorSnapshot,
    pub risk: RiskMetrics,
    pub sentiment: NewsSentiment,
    pub technical_signal: Signal,
    pub recommendation: Signal,
}

/// Analyze `symbol` over the `history_days` ending today.
pub async fn stock_analysis(
    symbol: &str,
    prices: &dyn PriceSource,
    news: &dyn NewsSource,
    settings: &AnalysisSettings,
) -> Result<StockAnalysis, BalanceWheelError> {
    stock_analysis_as_of(symbol, Local::now().date_naive(), prices, news, settings).await
}

pub async fn stock_analysis_as_of(
    symbol: &str,
    end: NaiveDate,
    prices: &dyn PriceSource,
    news: &dyn NewsSource,
    settings: &AnalysisSettings,
) -> Result<StockAnalysis, BalanceWheelError> {
    let start = history_start(end, settings.history_days)?;
    info!(symbol, %start, %end, "fetching daily prices");

    let bars = normalize(prices.fetch_daily(symbol, start, end).await?);
    let Some(last) = bars.last() else {
        return Err(BalanceWheelError::NoData {
            symbol: symbol.to_string(),
        });
    };
    let (as_of, last_close) = (last.date, last.close);

    let metrics = FinancialMetrics::new(symbol, bars)?;
    metrics.require_bars(settings.min_bars())?;

    let indicators = IndicatorSnapshot::compute(&metrics, settings);
    let risk = RiskMetrics::compute(&metrics.bars, settings);
    debug!(symbol, ?indicators, "computed indicators");

    info!(symbol, limit = settings.news_limit, "fetching headlines");
    let articles = news.fetch_headlines(symbol, settings.news_limit).await?;
    let sentiment = NewsSentiment::from_articles(&articles);

    let technical_signal = generate_signal(&metrics, settings)?;
    let recommendation =
        combine_with_sentiment(technical_signal, sentiment.mean_score, settings.sentiment_threshold);

    info!(
        symbol,
        bars = metrics.bars.len(),
        articles = sentiment.article_count,
        %technical_signal,
        %recommendation,
        "analysis complete"
    );

    Ok(StockAnalysis {
        symbol: symbol.to_string(),
        as_of,
        bars: metrics.bars.len(),
        last_close,
        indicators,
        risk,
        sentiment,
        technical_signal,
        recommendation,
    })
}
