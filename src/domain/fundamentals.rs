//! Company fundamentals. Ratios reported upstream as fractions are stored as percentages.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    pub symbol: String,
    pub pe_ratio: Option<f64>,
    pub pb_ratio: Option<f64>,
    /// Percent.
    pub dividend_yield: Option<f64>,
    pub eps: Option<f64>,
    pub debt_to_equity: Option<f64>,
    /// Percent.
    pub roe: Option<f64>,
}

impl Fundamentals {
    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        [
            self.pe_ratio,
            self.pb_ratio,
            self.dividend_yield,
            self.eps,
            self.debt_to_equity,
            self.roe,
        ]
        .iter()
        .all(Option::is_none)
    }
}

pub fn fraction_to_percent(fraction: Option<f64>) -> Option<f64> {
    fraction.map(|f| f * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_conversion_keeps_missing() {
        assert_eq!(fraction_to_percent(Some(0.015)), Some(1.5));
        assert_eq!(fraction_to_percent(None), None);
    }

    #[test]
    fn empty_detection() {
        let mut f = Fundamentals {
            symbol: "AAPL".into(),
            ..Fundamentals::default()
        };
        assert!(f.is_empty());
        f.eps = Some(6.1);
        assert!(!f.is_empty());
    }
}
