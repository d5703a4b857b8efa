//! A fetched price series for one symbol plus the indicator and risk formulas over it.

use std::fmt;
use std::str::FromStr;

use super::error::BalanceWheelError;
use super::indicator::{
    calculate_bollinger, calculate_ema, calculate_macd, calculate_rsi, calculate_sma,
    IndicatorSeries,
};
use super::metrics;
use super::ohlcv::{ensure_chronological, PriceBar};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovingAverageKind {
    Simple,
    Exponential,
}

impl FromStr for MovingAverageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SMA" => Ok(MovingAverageKind::Simple),
            "EMA" => Ok(MovingAverageKind::Exponential),
            other => Err(format!("unknown moving average type '{other}'")),
        }
    }
}

impl fmt::Display for MovingAverageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovingAverageKind::Simple => write!(f, "SMA"),
            MovingAverageKind::Exponential => write!(f, "EMA"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FinancialMetrics {
    pub symbol: String,
    pub bars: Vec<PriceBar>,
}

impl FinancialMetrics {
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, BalanceWheelError> {
        ensure_chronological(&bars)?;
        Ok(FinancialMetrics {
            symbol: symbol.into(),
            bars,
        })
    }

    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    /// Fails with `InsufficientData` when fewer than `minimum` bars are held.
    pub fn require_bars(&self, minimum: usize) -> Result<(), BalanceWheelError> {
        if self.bars.len() < minimum {
            return Err(BalanceWheelError::InsufficientData {
                symbol: self.symbol.clone(),
                bars: self.bars.len(),
                minimum,
            });
        }
        Ok(())
    }

    pub fn moving_average(&self, period: usize, kind: MovingAverageKind) -> IndicatorSeries {
        match kind {
            MovingAverageKind::Simple => calculate_sma(&self.bars, period),
            MovingAverageKind::Exponential => calculate_ema(&self.bars, period),
        }
    }

    pub fn rsi(&self, period: usize) -> IndicatorSeries {
        calculate_rsi(&self.bars, period)
    }

    pub fn macd(&self, fast: usize, slow: usize, signal: usize) -> IndicatorSeries {
        calculate_macd(&self.bars, fast, slow, signal)
    }

    pub fn bollinger_bands(&self, period: usize, stddev_mult: f64) -> IndicatorSeries {
        calculate_bollinger(&self.bars, period, (stddev_mult * 100.0).round() as u32)
    }

    pub fn value_at_risk(&self, confidence: f64) -> Option<f64> {
        metrics::value_at_risk(&self.bars, confidence)
    }

    pub fn sharpe_ratio(&self, risk_free_rate: f64, periods_per_year: f64) -> Option<f64> {
        metrics::sharpe_ratio(&self.bars, risk_free_rate, periods_per_year)
    }

    pub fn max_drawdown(&self) -> Option<f64> {
        metrics::max_drawdown(&self.bars)
    }

    pub fn asset_correlation(&self, other: &FinancialMetrics) -> Option<f64> {
        metrics::correlation(&self.bars, &other.bars)
    }

    /// Autocorrelation of daily returns at `lag`, used as a crude cycle detector.
    pub fn cycle_length(&self, lag: usize) -> Option<f64> {
        metrics::autocorrelation(&metrics::daily_returns(&self.bars), lag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::IndicatorType;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                symbol: "TEST".into(),
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn new_rejects_unordered_bars() {
        let mut bars = make_bars(&[1.0, 2.0, 3.0]);
        bars.swap(0, 2);
        assert!(FinancialMetrics::new("TEST", bars).is_err());
    }

    #[test]
    fn moving_average_dispatches_on_kind() {
        let fm = FinancialMetrics::new("TEST", make_bars(&[1.0, 2.0, 3.0])).unwrap();
        assert_eq!(
            fm.moving_average(2, MovingAverageKind::Simple).indicator_type,
            IndicatorType::Sma(2)
        );
        assert_eq!(
            fm.moving_average(2, MovingAverageKind::Exponential).indicator_type,
            IndicatorType::Ema(2)
        );
    }

    #[test]
    fn bollinger_multiplier_is_converted() {
        let fm = FinancialMetrics::new("TEST", make_bars(&[1.0, 2.0, 3.0])).unwrap();
        assert_eq!(
            fm.bollinger_bands(20, 2.5).indicator_type,
            IndicatorType::Bollinger {
                period: 20,
                stddev_mult_x100: 250
            }
        );
    }

    #[test]
    fn require_bars_reports_shortfall() {
        let fm = FinancialMetrics::new("AAPL", make_bars(&[1.0, 2.0])).unwrap();
        assert!(fm.require_bars(2).is_ok());
        match fm.require_bars(15) {
            Err(BalanceWheelError::InsufficientData { bars, minimum, .. }) => {
                assert_eq!(bars, 2);
                assert_eq!(minimum, 15);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn asset_correlation_with_itself_is_one() {
        let fm = FinancialMetrics::new("TEST", make_bars(&[1.0, 3.0, 2.0, 5.0])).unwrap();
        let c = fm.asset_correlation(&fm.clone()).unwrap();
        assert!((c - 1.0).abs() < 1e-12);
    }

    #[test]
    fn moving_average_kind_parses() {
        assert_eq!("sma".parse::<MovingAverageKind>(), Ok(MovingAverageKind::Simple));
        assert_eq!("EMA".parse::<MovingAverageKind>(), Ok(MovingAverageKind::Exponential));
        assert!("wma".parse::<MovingAverageKind>().is_err());
    }

    #[test]
    fn last_close_of_empty_series() {
        let fm = FinancialMetrics::new("TEST", vec![]).unwrap();
        assert_eq!(fm.last_close(), None);
        assert_eq!(fm.max_drawdown(), None);
    }
}
