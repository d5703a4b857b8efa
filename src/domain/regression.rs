//! Ordinary least squares regression and evaluation helpers.
//!
//! Features and target are centered before solving, so the intercept stays out
//! of the least-squares norm: it is always `mean(y) - beta . mean(x)`. The
//! centered system is solved by SVD, which gives the minimum-norm slope when
//! features are collinear, and zero weight to features that never vary.

use nalgebra::{DMatrix, DVector};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use super::error::BalanceWheelError;
use super::indicator_helpers::mean;

const SVD_EPS: f64 = 1e-10;
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegression {
    pub fn fit(x: &[Vec<f64>], y: &[f64]) -> Result<Self, BalanceWheelError> {
        if x.is_empty() {
            return Err(BalanceWheelError::model("cannot fit on zero rows"));
        }
        if x.len() != y.len() {
            return Err(BalanceWheelError::model(format!(
                "dimension mismatch: {} rows, {} targets",
                x.len(),
                y.len()
            )));
        }
        let n_features = x[0].len();
        if let Some(bad) = x.iter().position(|row| row.len() != n_features) {
            return Err(BalanceWheelError::model(format!(
                "row {bad} has {} features, expected {n_features}",
                x[bad].len()
            )));
        }
        if x.iter().flatten().chain(y).any(|v| !v.is_finite()) {
            return Err(BalanceWheelError::model("non-finite value in training data"));
        }

        let n = x.len() as f64;
        let y_mean = y.iter().sum::<f64>() / n;
        let x_mean: Vec<f64> = (0..n_features)
            .map(|c| x.iter().map(|row| row[c]).sum::<f64>() / n)
            .collect();
        if n_features == 0 {
            return Ok(LinearRegression {
                coefficients: Vec::new(),
                intercept: y_mean,
            });
        }

        let design = DMatrix::from_fn(x.len(), n_features, |r, c| x[r][c] - x_mean[c]);
        let target = DVector::from_iterator(y.len(), y.iter().map(|v| v - y_mean));

        let svd = design.svd(true, true);
        let eps = SVD_EPS * svd.singular_values.max().max(1.0);
        let beta = svd
            .solve(&target, eps)
            .map_err(|e| BalanceWheelError::model(e.to_string()))?;

        let coefficients: Vec<f64> = beta.iter().copied().collect();
        let intercept = y_mean
            - coefficients
                .iter()
                .zip(&x_mean)
                .map(|(b, m)| b * m)
                .sum::<f64>();
        Ok(LinearRegression {
            coefficients,
            intercept,
        })
    }

    pub fn predict_one(&self, row: &[f64]) -> Result<f64, BalanceWheelError> {
        if row.len() != self.coefficients.len() {
            return Err(BalanceWheelError::model(format!(
                "expected {} features, got {}",
                self.coefficients.len(),
                row.len()
            )));
        }
        Ok(self.intercept
            + self
                .coefficients
                .iter()
                .zip(row)
                .map(|(c, v)| c * v)
                .sum::<f64>())
    }

    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, BalanceWheelError> {
        rows.iter().map(|r| self.predict_one(r)).collect()
    }
}

pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    if actual.len() != predicted.len() || actual.is_empty() {
        return None;
    }
    let sse: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    Some(sse / actual.len() as f64)
}

/// Coefficient of determination. `None` when `actual` has no variance.
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    if actual.len() != predicted.len() {
        return None;
    }
    let m = mean(actual)?;
    let ss_tot: f64 = actual.iter().map(|a| (a - m).powi(2)).sum();
    if ss_tot == 0.0 {
        return None;
    }
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    Some(1.0 - ss_res / ss_tot)
}

/// Shuffled (train, test) index split. The test side holds ceil(n * test_fraction) rows.
pub fn train_test_split(n: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut idx: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    idx.shuffle(&mut rng);
    let n_test = ((n as f64) * test_fraction.clamp(0.0, 1.0)).ceil() as usize;
    let test = idx.split_off(n - n_test.min(n));
    (idx, test)
}
