//! Balance-wheel trading signal: RSI extremes confirmed by price against the SMA.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::BalanceWheelError;
use super::financial_metrics::{FinancialMetrics, MovingAverageKind};
use super::sentiment::SentimentScore;
use super::settings::AnalysisSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "Buy"),
            Signal::Sell => write!(f, "Sell"),
            Signal::Hold => write!(f, "Hold"),
        }
    }
}

/// Overbought (sell) when RSI > overbought and close > SMA.
/// Oversold (buy) when RSI < oversold and close < SMA.
pub fn generate_signal(
    metrics: &FinancialMetrics,
    settings: &AnalysisSettings,
) -> Result<Signal, BalanceWheelError> {
    let insufficient = || BalanceWheelError::InsufficientData {
        symbol: metrics.symbol.clone(),
        bars: metrics.bars.len(),
        minimum: (settings.rsi_period + 1).max(settings.sma_period),
    };

    let rsi = metrics
        .rsi(settings.rsi_period)
        .latest_simple()
        .ok_or_else(insufficient)?;
    let ma = metrics
        .moving_average(settings.sma_period, MovingAverageKind::Simple)
        .latest_simple()
        .ok_or_else(insufficient)?;
    let price = metrics.last_close().ok_or_else(insufficient)?;

    Ok(classify(rsi, ma, price, settings.overbought, settings.oversold))
}

fn classify(rsi: f64, ma: f64, price: f64, overbought: f64, oversold: f64) -> Signal {
    if rsi > overbought && price > ma {
        Signal::Sell
    } else if rsi < oversold && price < ma {
        Signal::Buy
    } else {
        Signal::Hold
    }
}

/// Blend the technical signal with news sentiment.
///
/// Strong sentiment against a technical call neutralizes it; strong sentiment
/// on a neutral call tips it.
pub fn combine_with_sentiment(signal: Signal, sentiment: SentimentScore, threshold: f64) -> Signal {
    let s = sentiment.value();
    let strongly_positive = s >= threshold;
    let strongly_negative = s <= -threshold;
    match signal {
        Signal::Buy if strongly_negative => Signal::Hold,
        Signal::Sell if strongly_positive => Signal::Hold,
        Signal::Hold if strongly_positive => Signal::Buy,
        Signal::Hold if strongly_negative => Signal::Sell,
        other => other,
    }
}
