//! Holdings and their valuation against current prices.

use serde::Serialize;
use std::collections::HashMap;

use super::error::BalanceWheelError;
use super::position::Position;
use crate::ports::config_port::ConfigPort;

const SECTION: &str = "portfolio";

/// Used when no `[portfolio]` section is configured.
pub const DEFAULT_HOLDINGS: [(&str, u64); 3] = [("AAPL", 50), ("TSLA", 30), ("MSFT", 20)];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Holdings {
    positions: Vec<Position>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionValuation {
    pub symbol: String,
    pub shares: u64,
    pub price: f64,
    pub purchase_value: f64,
    pub current_value: f64,
    pub gain: f64,
    pub gain_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub positions: Vec<PositionValuation>,
    pub total_purchase_value: f64,
    pub total_current_value: f64,
    pub total_gain: f64,
    pub total_gain_pct: Option<f64>,
    pub missing_prices: Vec<String>,
}

impl Default for Holdings {
    fn default() -> Self {
        let positions = DEFAULT_HOLDINGS
            .iter()
            .map(|&(symbol, shares)| Position {
                symbol: symbol.to_string(),
                shares,
                purchase_price: 0.0,
            })
            .collect();
        Holdings { positions }
    }
}

impl Holdings {
    /// Positions keyed by symbol. A repeated symbol is rejected.
    pub fn new(positions: Vec<Position>) -> Result<Self, BalanceWheelError> {
        let mut seen = std::collections::HashSet::new();
        for p in &positions {
            if !seen.insert(p.symbol.as_str()) {
                return Err(BalanceWheelError::InvalidPosition {
                    symbol: p.symbol.clone(),
                    reason: "listed more than once".into(),
                });
            }
        }
        Ok(Holdings { positions })
    }

    /// Symbol to share count, purchase price 0.
    pub fn from_shares<S: Into<String>>(
        shares: impl IntoIterator<Item = (S, u64)>,
    ) -> Result<Self, BalanceWheelError> {
        let positions = shares
            .into_iter()
            .map(|(symbol, n)| Position::new(symbol, n, 0.0))
            .collect::<Result<Vec<_>, _>>()?;
        Holdings::new(positions)
    }

    /// Read `SYMBOL = shares[,purchase_price]` entries from `[portfolio]`.
    /// Falls back to `DEFAULT_HOLDINGS` when the section is absent.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, BalanceWheelError> {
        if !config.has_section(SECTION) {
            return Ok(Holdings::default());
        }
        let positions = config
            .keys(SECTION)
            .into_iter()
            .map(|symbol| {
                let raw = config.get_string(SECTION, &symbol).unwrap_or_default();
                parse_entry(&symbol, &raw)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Holdings::new(positions)
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.positions.iter().map(|p| p.symbol.as_str())
    }

    /// Value every position with a known price; unpriced symbols are listed, not valued.
    pub fn value(&self, prices: &HashMap<String, f64>) -> PortfolioSummary {
        let mut valuations = Vec::with_capacity(self.positions.len());
        let mut missing_prices = Vec::new();

        for pos in &self.positions {
            match prices.get(&pos.symbol) {
                Some(&price) if price.is_finite() => {
                    let purchase_value = pos.purchase_value();
                    let current_value = pos.market_value(price);
                    let gain = current_value - purchase_value;
                    valuations.push(PositionValuation {
                        symbol: pos.symbol.clone(),
                        shares: pos.shares,
                        price,
                        purchase_value,
                        current_value,
                        gain,
                        gain_pct: percent_of(gain, purchase_value),
                    });
                }
                _ => missing_prices.push(pos.symbol.clone()),
            }
        }

        let total_purchase_value: f64 = valuations.iter().map(|v| v.purchase_value).sum();
        let total_current_value: f64 = valuations.iter().map(|v| v.current_value).sum();
        let total_gain: f64 = valuations.iter().map(|v| v.gain).sum();

        PortfolioSummary {
            positions: valuations,
            total_purchase_value,
            total_current_value,
            total_gain,
            total_gain_pct: percent_of(total_gain, total_purchase_value),
            missing_prices,
        }
    }
}

fn parse_entry(symbol: &str, raw: &str) -> Result<Position, BalanceWheelError> {
    let invalid = |reason: String| BalanceWheelError::ConfigInvalid {
        section: SECTION.into(),
        key: symbol.to_string(),
        reason,
    };
    let mut parts = raw.split(',').map(str::trim);
    let shares = parts
        .next()
        .unwrap_or_default()
        .parse::<u64>()
        .map_err(|e| invalid(format!("share count: {e}")))?;
    let purchase_price = match parts.next() {
        Some(p) if !p.is_empty() => p
            .parse::<f64>()
            .map_err(|e| invalid(format!("purchase price: {e}")))?,
        _ => 0.0,
    };
    if parts.next().is_some() {
        return Err(invalid("expected shares[,purchase_price]".into()));
    }
    Position::new(symbol, shares, purchase_price)
}

fn percent_of(part: f64, whole: f64) -> Option<f64> {
    (whole != 0.0).then(|| part / whole * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;
    use approx::assert_relative_eq;

    fn prices(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|&(s, p)| (s.to_string(), p)).collect()
    }

    #[test]
    fn default_holdings() {
        let h = Holdings::default();
        assert_eq!(h.symbols().collect::<Vec<_>>(), vec!["AAPL", "TSLA", "MSFT"]);
        assert_eq!(h.positions()[0].shares, 50);
    }

    #[test]
    fn values_positions_with_zero_cost_basis() {
        let summary = Holdings::default().value(&prices(&[
            ("AAPL", 200.0),
            ("TSLA", 250.0),
            ("MSFT", 400.0),
        ]));
        assert_relative_eq!(summary.total_current_value, 10_000.0 + 7_500.0 + 8_000.0);
        assert_eq!(summary.total_purchase_value, 0.0);
        assert_eq!(summary.total_gain_pct, None);
        assert!(summary.missing_prices.is_empty());
        assert_eq!(summary.positions[0].gain_pct, None);
    }

    #[test]
    fn gain_against_purchase_price() {
        let h = Holdings::new(vec![
            Position::new("AAPL", 10, 100.0).unwrap(),
            Position::new("MSFT", 5, 300.0).unwrap(),
        ])
        .unwrap();
        let summary = h.value(&prices(&[("AAPL", 110.0), ("MSFT", 270.0)]));

        assert_relative_eq!(summary.positions[0].gain, 100.0);
        assert_relative_eq!(summary.positions[0].gain_pct.unwrap(), 10.0);
        assert_relative_eq!(summary.positions[1].gain, -150.0);
        assert_relative_eq!(summary.total_gain, -50.0);
        assert_relative_eq!(summary.total_purchase_value, 2_500.0);
        assert_relative_eq!(summary.total_gain_pct.unwrap(), -2.0);
    }

    #[test]
    fn missing_prices_are_reported() {
        let summary = Holdings::default().value(&prices(&[("AAPL", 1.0), ("TSLA", f64::NAN)]));
        assert_eq!(summary.positions.len(), 1);
        assert_eq!(summary.missing_prices, vec!["TSLA".to_string(), "MSFT".to_string()]);
    }

    #[test]
    fn from_config_reads_shares_and_prices() {
        let adapter = FileConfigAdapter::from_string(
            "[portfolio]\nAAPL = 50, 120.5\nMSFT = 20\n",
        )
        .unwrap();
        let h = Holdings::from_config(&adapter).unwrap();
        assert_eq!(h.positions().len(), 2);
        assert_eq!(h.positions()[0].symbol, "AAPL");
        assert_eq!(h.positions()[0].purchase_price, 120.5);
        assert_eq!(h.positions()[1].shares, 20);
        assert_eq!(h.positions()[1].purchase_price, 0.0);
    }

    #[test]
    fn from_config_without_section_is_default() {
        let adapter = FileConfigAdapter::from_string("[api]\ntimeout_secs = 5\n").unwrap();
        assert_eq!(Holdings::from_config(&adapter).unwrap(), Holdings::default());
    }

    #[test]
    fn from_config_rejects_negative_shares() {
        let adapter = FileConfigAdapter::from_string("[portfolio]\nTSLA = -30\n").unwrap();
        let err = Holdings::from_config(&adapter).unwrap_err();
        assert!(matches!(err, BalanceWheelError::ConfigInvalid { ref key, .. } if key == "tsla"));
    }

    #[test]
    fn from_config_rejects_negative_price() {
        let adapter = FileConfigAdapter::from_string("[portfolio]\nTSLA = 3, -1\n").unwrap();
        assert!(matches!(
            Holdings::from_config(&adapter).unwrap_err(),
            BalanceWheelError::InvalidPosition { .. }
        ));
    }

    #[test]
    fn duplicate_symbols_rejected() {
        let err = Holdings::from_shares([("AAPL", 1), ("aapl", 2)]).unwrap_err();
        assert!(matches!(err, BalanceWheelError::InvalidPosition { .. }));
    }
}
