//! Risk metrics computed from daily close prices.

use serde::Serialize;
use std::collections::HashMap;

use super::indicator_helpers::{mean, pct_change, pearson, quantile, sample_stddev};
use super::ohlcv::{closes, PriceBar};
use super::settings::AnalysisSettings;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskMetrics {
    /// Price-denominated loss threshold at the configured confidence (negative = loss).
    pub value_at_risk: Option<f64>,
    pub var_confidence: f64,
    /// `None` when volatility is zero.
    pub sharpe_ratio: Option<f64>,
    pub max_drawdown: Option<f64>,
    pub annualized_volatility: Option<f64>,
}

impl RiskMetrics {
    pub fn compute(bars: &[PriceBar], settings: &AnalysisSettings) -> Self {
        let returns = daily_returns(bars);
        RiskMetrics {
            value_at_risk: value_at_risk(bars, settings.var_confidence),
            var_confidence: settings.var_confidence,
            sharpe_ratio: sharpe_ratio(bars, settings.risk_free_rate, settings.periods_per_year),
            max_drawdown: max_drawdown(bars),
            annualized_volatility: sample_stddev(&returns)
                .map(|sd| sd * settings.periods_per_year.sqrt()),
        }
    }
}

pub fn daily_returns(bars: &[PriceBar]) -> Vec<f64> {
    pct_change(&closes(bars))
}

/// Historical VaR: the (1 - confidence) quantile of daily returns scaled by the last close.
pub fn value_at_risk(bars: &[PriceBar], confidence: f64) -> Option<f64> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return None;
    }
    let returns = daily_returns(bars);
    let last = bars.last()?.close;
    quantile(&returns, 1.0 - confidence).map(|q| q * last)
}

/// Relative size below which return dispersion counts as rounding noise.
const ZERO_VOLATILITY_EPS: f64 = 1e-12;

/// Annualized Sharpe ratio. Undefined when there is no volatility.
pub fn sharpe_ratio(bars: &[PriceBar], risk_free_rate: f64, periods_per_year: f64) -> Option<f64> {
    let returns = daily_returns(bars);
    let mean_return = mean(&returns)?;
    let sd = sample_stddev(&returns)?;
    if sd <= ZERO_VOLATILITY_EPS * mean_return.abs().max(1.0) {
        return None;
    }
    let volatility = sd * periods_per_year.sqrt();
    let excess = mean_return * periods_per_year - risk_free_rate;
    Some(excess / volatility)
}

/// Largest peak-to-trough decline as a fraction (always <= 0).
pub fn max_drawdown(bars: &[PriceBar]) -> Option<f64> {
    let first = bars.first()?;
    let mut peak = first.close;
    let mut worst = 0.0_f64;
    for bar in bars {
        if bar.close > peak {
            peak = bar.close;
        }
        if peak > 0.0 {
            worst = worst.min(bar.close / peak - 1.0);
        }
    }
    Some(worst)
}

/// Pearson correlation of closes over the dates both series share.
pub fn correlation(a: &[PriceBar], b: &[PriceBar]) -> Option<f64> {
    let by_date: HashMap<_, f64> = b.iter().map(|bar| (bar.date, bar.close)).collect();
    let (xs, ys): (Vec<f64>, Vec<f64>) = a
        .iter()
        .filter_map(|bar| by_date.get(&bar.date).map(|&other| (bar.close, other)))
        .unzip();
    pearson(&xs, &ys)
}

/// Correlation of a series with itself shifted by `lag`.
pub fn autocorrelation(values: &[f64], lag: usize) -> Option<f64> {
    if lag == 0 || lag >= values.len() {
        return None;
    }
    pearson(&values[lag..], &values[..values.len() - lag])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<PriceBar> {
        make_bars_from(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), prices)
    }

    fn make_bars_from(start: NaiveDate, prices: &[f64]) -> Vec<PriceBar> {
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
    fn daily_returns_length() {
        assert_eq!(daily_returns(&make_bars(&[1.0, 2.0, 3.0])).len(), 2);
        assert!(daily_returns(&make_bars(&[1.0])).is_empty());
        // the change out of a zero close is dropped rather than read as flat
        assert_eq!(daily_returns(&make_bars(&[0.0, 2.0, 3.0])), vec![0.5]);
    }

    #[test]
    fn var_is_lower_quantile_times_last_close() {
        // returns: +10%, -10%, +10%, -10% ... final close 100
        let bars = make_bars(&[100.0, 110.0, 99.0, 108.9, 98.01, 100.0]);
        let returns = daily_returns(&bars);
        let expected = quantile(&returns, 0.05).unwrap() * 100.0;
        assert_relative_eq!(value_at_risk(&bars, 0.95).unwrap(), expected);
        assert!(value_at_risk(&bars, 0.95).unwrap() < 0.0);
    }

    #[test]
    fn var_needs_two_bars_and_valid_confidence() {
        assert_eq!(value_at_risk(&make_bars(&[100.0]), 0.95), None);
        assert_eq!(value_at_risk(&make_bars(&[100.0, 101.0]), 1.0), None);
    }

    #[test]
    fn sharpe_undefined_for_zero_volatility() {
        assert_eq!(sharpe_ratio(&make_bars(&[50.0; 10]), 0.01, 252.0), None);
        // constant growth rate also has zero volatility
        let growth: Vec<f64> = (0..10).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
        assert_eq!(sharpe_ratio(&make_bars(&growth), 0.01, 252.0), None);
    }

    #[test]
    fn sharpe_matches_formula() {
        let bars = make_bars(&[100.0, 102.0, 101.0, 104.0, 103.0]);
        let r = daily_returns(&bars);
        let m = mean(&r).unwrap();
        let sd = sample_stddev(&r).unwrap();
        let expected = (m * 252.0 - 0.01) / (sd * 252.0_f64.sqrt());
        assert_relative_eq!(sharpe_ratio(&bars, 0.01, 252.0).unwrap(), expected);
    }

    #[test]
    fn max_drawdown_peak_to_trough() {
        let bars = make_bars(&[100.0, 110.0, 90.0, 95.0, 80.0, 100.0]);
        assert_relative_eq!(max_drawdown(&bars).unwrap(), 80.0 / 110.0 - 1.0);
    }

    #[test]
    fn max_drawdown_monotonic_rise_is_zero() {
        assert_eq!(max_drawdown(&make_bars(&[1.0, 2.0, 3.0])), Some(0.0));
        assert_eq!(max_drawdown(&[]), None);
    }

    #[test]
    fn correlation_uses_shared_dates_only() {
        let a = make_bars(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        // b starts two days later; shared dates are days 3..5
        let b = make_bars_from(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(), &[30.0, 40.0, 50.0, 999.0]);
        assert_relative_eq!(correlation(&a, &b).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn correlation_without_overlap_is_none() {
        let a = make_bars(&[1.0, 2.0]);
        let b = make_bars_from(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), &[1.0, 2.0]);
        assert_eq!(correlation(&a, &b), None);
    }

    #[test]
    fn autocorrelation_of_alternating_series() {
        let v = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        assert_relative_eq!(autocorrelation(&v, 1).unwrap(), -1.0, epsilon = 1e-12);
        assert_relative_eq!(autocorrelation(&v, 2).unwrap(), 1.0, epsilon = 1e-12);
        assert_eq!(autocorrelation(&v, 0), None);
        assert_eq!(autocorrelation(&v, 6), None);
    }

    #[test]
    fn compute_bundles_metrics() {
        let bars = make_bars(&[100.0, 102.0, 101.0, 104.0, 103.0]);
        let metrics = RiskMetrics::compute(&bars, &AnalysisSettings::default());
        assert!(metrics.value_at_risk.is_some());
        assert!(metrics.sharpe_ratio.is_some());
        assert!(metrics.max_drawdown.unwrap() <= 0.0);
        assert!(metrics.annualized_volatility.unwrap() > 0.0);
    }
}
