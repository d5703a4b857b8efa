//! Analysis settings and their validation against the `[analysis]` config section.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::domain::error::BalanceWheelError;
use crate::domain::indicator::{bollinger, macd};
use crate::domain::metrics::TRADING_DAYS_PER_YEAR;
use crate::ports::config_port::ConfigPort;

const SECTION: &str = "analysis";

/// Upper bound on any history window, in calendar days (about a century).
pub const MAX_HISTORY_DAYS: i64 = 36_500;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSettings {
    pub history_days: i64,
    pub sma_period: usize,
    pub ema_period: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_mult: f64,
    pub var_confidence: f64,
    pub risk_free_rate: f64,
    pub periods_per_year: f64,
    pub news_limit: usize,
    pub overbought: f64,
    pub oversold: f64,
    pub sentiment_threshold: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            history_days: 365,
            sma_period: 20,
            ema_period: 20,
            rsi_period: 14,
            macd_fast: macd::DEFAULT_FAST,
            macd_slow: macd::DEFAULT_SLOW,
            macd_signal: macd::DEFAULT_SIGNAL,
            bollinger_period: bollinger::DEFAULT_PERIOD,
            bollinger_mult: bollinger::DEFAULT_MULT_X100 as f64 / 100.0,
            var_confidence: 0.95,
            risk_free_rate: 0.01,
            periods_per_year: TRADING_DAYS_PER_YEAR,
            news_limit: 20,
            overbought: 70.0,
            oversold: 30.0,
            sentiment_threshold: 0.5,
        }
    }
}

impl AnalysisSettings {
    /// Read overrides from `[analysis]`, falling back to defaults, then validate.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, BalanceWheelError> {
        let d = AnalysisSettings::default();
        let settings = AnalysisSettings {
            history_days: get_int(config, "history_days", d.history_days)?,
            sma_period: get_period(config, "sma_period", d.sma_period)?,
            ema_period: get_period(config, "ema_period", d.ema_period)?,
            rsi_period: get_period(config, "rsi_period", d.rsi_period)?,
            macd_fast: get_period(config, "macd_fast", d.macd_fast)?,
            macd_slow: get_period(config, "macd_slow", d.macd_slow)?,
            macd_signal: get_period(config, "macd_signal", d.macd_signal)?,
            bollinger_period: get_period(config, "bollinger_period", d.bollinger_period)?,
            bollinger_mult: get_double(config, "bollinger_mult", d.bollinger_mult)?,
            var_confidence: get_double(config, "var_confidence", d.var_confidence)?,
            risk_free_rate: get_double(config, "risk_free_rate", d.risk_free_rate)?,
            periods_per_year: get_double(config, "periods_per_year", d.periods_per_year)?,
            news_limit: get_period(config, "news_limit", d.news_limit)?,
            overbought: get_double(config, "overbought", d.overbought)?,
            oversold: get_double(config, "oversold", d.oversold)?,
            sentiment_threshold: get_double(config, "sentiment_threshold", d.sentiment_threshold)?,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), BalanceWheelError> {
        if !(1..=MAX_HISTORY_DAYS).contains(&self.history_days) {
            return Err(invalid(
                "history_days",
                &format!("must be between 1 and {MAX_HISTORY_DAYS}"),
            ));
        }
        for (key, value) in [
            ("sma_period", self.sma_period),
            ("ema_period", self.ema_period),
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("news_limit", self.news_limit),
        ] {
            if value == 0 {
                return Err(invalid(key, "must be > 0"));
            }
        }
        if self.bollinger_period < 2 {
            return Err(invalid("bollinger_period", "must be >= 2"));
        }
        if self.macd_fast >= self.macd_slow {
            return Err(invalid("macd_fast", "must be less than macd_slow"));
        }
        if !(self.bollinger_mult > 0.0) {
            return Err(invalid("bollinger_mult", "must be > 0"));
        }
        if !(self.var_confidence > 0.0 && self.var_confidence < 1.0) {
            return Err(invalid("var_confidence", "must be between 0 and 1"));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(invalid("risk_free_rate", "must be finite"));
        }
        if !(self.periods_per_year > 0.0) {
            return Err(invalid("periods_per_year", "must be > 0"));
        }
        if !(self.oversold < self.overbought) {
            return Err(invalid("oversold", "must be below overbought"));
        }
        if !(0.0..=100.0).contains(&self.oversold) || !(0.0..=100.0).contains(&self.overbought) {
            return Err(invalid("overbought", "RSI thresholds must lie in [0, 100]"));
        }
        if !(self.sentiment_threshold > 0.0 && self.sentiment_threshold <= 1.0) {
            return Err(invalid("sentiment_threshold", "must be in (0, 1]"));
        }
        Ok(())
    }

    /// Minimum bars needed for every indicator in the snapshot to carry a value.
    pub fn min_bars(&self) -> usize {
        (self.rsi_period + 1)
            .max(self.sma_period)
            .max(self.bollinger_period)
    }
}

/// First day of a `days`-long window ending at `end`.
pub fn history_start(end: NaiveDate, days: i64) -> Result<NaiveDate, BalanceWheelError> {
    if !(1..=MAX_HISTORY_DAYS).contains(&days) {
        return Err(invalid(
            "history_days",
            &format!("must be between 1 and {MAX_HISTORY_DAYS}"),
        ));
    }
    end.checked_sub_signed(Duration::days(days))
        .ok_or_else(|| invalid("history_days", "window starts before the earliest supported date"))
}

/// A key that is present must parse; only an absent key takes the default.
fn get_parsed<T: std::str::FromStr>(
    config: &dyn ConfigPort,
    key: &str,
    default: T,
    expected: &str,
) -> Result<T, BalanceWheelError> {
    match config.get_string(SECTION, key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| invalid(key, &format!("expected {expected}, got {raw:?}"))),
    }
}

fn get_int(config: &dyn ConfigPort, key: &str, default: i64) -> Result<i64, BalanceWheelError> {
    get_parsed(config, key, default, "an integer")
}

fn get_double(config: &dyn ConfigPort, key: &str, default: f64) -> Result<f64, BalanceWheelError> {
    get_parsed(config, key, default, "a number")
}

fn get_period(
    config: &dyn ConfigPort,
    key: &str,
    default: usize,
) -> Result<usize, BalanceWheelError> {
    let raw = get_int(config, key, default as i64)?;
    usize::try_from(raw).map_err(|_| invalid(key, "must be >= 0"))
}

fn invalid(key: &str, reason: &str) -> BalanceWheelError {
    BalanceWheelError::ConfigInvalid {
        section: SECTION.into(),
        key: key.into(),
        reason: reason.into(),
    }
}
