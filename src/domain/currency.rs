//! Exchange-rate forecast regressed on macroeconomic factors.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::BalanceWheelError;
use super::regression::LinearRegression;
use crate::ports::config_port::ConfigPort;

const SECTION: &str = "currency";

pub const FACTOR_NAMES: [&str; 6] = [
    "gdp_growth",
    "inflation_diff",
    "interest_rate_diff",
    "oil_price",
    "trade_balance",
    "usd_index",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroFactors {
    pub gdp_growth: f64,
    pub inflation_diff: f64,
    pub interest_rate_diff: f64,
    pub oil_price: f64,
    pub trade_balance: f64,
    pub usd_index: f64,
}

impl Default for MacroFactors {
    fn default() -> Self {
        MacroFactors {
            gdp_growth: 6.5,
            inflation_diff: 2.0,
            interest_rate_diff: 2.1,
            oil_price: 85.0,
            trade_balance: -13.0,
            usd_index: 107.0,
        }
    }
}

impl MacroFactors {
    /// Factor overrides from `[currency]`, defaulting each missing key.
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let d = MacroFactors::default();
        MacroFactors {
            gdp_growth: config.get_double(SECTION, "gdp_growth", d.gdp_growth),
            inflation_diff: config.get_double(SECTION, "inflation_diff", d.inflation_diff),
            interest_rate_diff: config.get_double(
                SECTION,
                "interest_rate_diff",
                d.interest_rate_diff,
            ),
            oil_price: config.get_double(SECTION, "oil_price", d.oil_price),
            trade_balance: config.get_double(SECTION, "trade_balance", d.trade_balance),
            usd_index: config.get_double(SECTION, "usd_index", d.usd_index),
        }
    }

    pub fn to_row(&self) -> Vec<f64> {
        vec![
            self.gdp_growth,
            self.inflation_diff,
            self.interest_rate_diff,
            self.oil_price,
            self.trade_balance,
            self.usd_index,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxObservation {
    pub date: NaiveDate,
    pub rate: f64,
    pub factors: MacroFactors,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrencyForecast {
    pub observations: usize,
    pub predicted: f64,
    pub actual: f64,
    pub absolute_error: f64,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

pub fn forecast(
    history: &[FxObservation],
    today: &MacroFactors,
    actual: f64,
) -> Result<CurrencyForecast, BalanceWheelError> {
    if history.len() < 2 {
        return Err(BalanceWheelError::model(format!(
            "need at least 2 exchange-rate observations, have {}",
            history.len()
        )));
    }
    let x: Vec<Vec<f64>> = history.iter().map(|o| o.factors.to_row()).collect();
    let y: Vec<f64> = history.iter().map(|o| o.rate).collect();

    let model = LinearRegression::fit(&x, &y)?;
    let predicted = model.predict_one(&today.to_row())?;

    Ok(CurrencyForecast {
        observations: history.len(),
        predicted,
        actual,
        absolute_error: (predicted - actual).abs(),
        coefficients: model.coefficients,
        intercept: model.intercept,
    })
}
