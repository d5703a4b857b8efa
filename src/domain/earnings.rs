//! Quarterly earnings records and the EPS regression trained on them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::BalanceWheelError;
use super::regression::{mean_squared_error, r2_score, train_test_split, LinearRegression};

/// Complete rows needed before a model is trained.
pub const MIN_TRAINING_ROWS: usize = 5;
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

pub const FEATURE_NAMES: [&str; 4] = ["revenue", "market_cap", "pe_ratio", "surprise_ratio"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningsRecord {
    pub fiscal_period: String,
    pub fiscal_end_date: Option<NaiveDate>,
    pub report_date: Option<NaiveDate>,
    pub actual_eps: Option<f64>,
    pub estimated_eps: Option<f64>,
    pub revenue: Option<f64>,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
}

/// (actual - estimated) / estimated. `None` when either side is missing or the estimate is 0.
pub fn surprise_ratio(actual: Option<f64>, estimated: Option<f64>) -> Option<f64> {
    match (actual, estimated) {
        (Some(a), Some(e)) if e != 0.0 => Some((a - e) / e),
        _ => None,
    }
}

impl EarningsRecord {
    pub fn surprise_ratio(&self) -> Option<f64> {
        surprise_ratio(self.actual_eps, self.estimated_eps)
    }

    /// Feature row in `FEATURE_NAMES` order, or `None` if any input is missing.
    pub fn features(&self) -> Option<[f64; 4]> {
        Some([
            self.revenue?,
            self.market_cap?,
            self.pe_ratio?,
            self.surprise_ratio()?,
        ])
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EarningsModelReport {
    pub model: LinearRegression,
    pub mse: Option<f64>,
    pub r2: Option<f64>,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// Fit EPS on `FEATURE_NAMES`, holding out `test_fraction` of the complete rows.
pub fn train_earnings_model(
    records: &[EarningsRecord],
    test_fraction: f64,
    seed: u64,
) -> Result<EarningsModelReport, BalanceWheelError> {
    let (x, y): (Vec<Vec<f64>>, Vec<f64>) = records
        .iter()
        .filter_map(|r| Some((r.features()?.to_vec(), r.actual_eps?)))
        .unzip();

    if x.len() < MIN_TRAINING_ROWS {
        return Err(BalanceWheelError::model(format!(
            "need at least {MIN_TRAINING_ROWS} complete earnings rows, have {}",
            x.len()
        )));
    }
    if !(0.0..1.0).contains(&test_fraction) {
        return Err(BalanceWheelError::model("test fraction must be in [0, 1)"));
    }

    let (train_idx, test_idx) = train_test_split(x.len(), test_fraction, seed);
    let pick_x = |idx: &[usize]| idx.iter().map(|&i| x[i].clone()).collect::<Vec<_>>();
    let pick_y = |idx: &[usize]| idx.iter().map(|&i| y[i]).collect::<Vec<_>>();

    let model = LinearRegression::fit(&pick_x(&train_idx), &pick_y(&train_idx))?;

    let (mse, r2) = if test_idx.is_empty() {
        (None, None)
    } else {
        let actual = pick_y(&test_idx);
        let predicted = model.predict(&pick_x(&test_idx))?;
        (
            mean_squared_error(&actual, &predicted),
            r2_score(&actual, &predicted),
        )
    };

    info!(
        rows = x.len(),
        dropped = records.len() - x.len(),
        train = train_idx.len(),
        test = test_idx.len(),
        "trained earnings model"
    );

    Ok(EarningsModelReport {
        model,
        mse,
        r2,
        train_rows: train_idx.len(),
        test_rows: test_idx.len(),
    })
}
