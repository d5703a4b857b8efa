//! A held position: symbol, share count and purchase price.

use serde::{Deserialize, Serialize};

use super::error::BalanceWheelError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub shares: u64,
    pub purchase_price: f64,
}

impl Position {
    pub fn new(
        symbol: impl Into<String>,
        shares: u64,
        purchase_price: f64,
    ) -> Result<Self, BalanceWheelError> {
        let symbol = symbol.into().trim().to_ascii_uppercase();
        if symbol.is_empty() {
            return Err(BalanceWheelError::InvalidPosition {
                symbol,
                reason: "empty symbol".into(),
            });
        }
        if !purchase_price.is_finite() || purchase_price < 0.0 {
            return Err(BalanceWheelError::InvalidPosition {
                symbol,
                reason: format!("purchase price {purchase_price} must be finite and >= 0"),
            });
        }
        Ok(Position {
            symbol,
            shares,
            purchase_price,
        })
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.shares as f64 * price
    }

    pub fn purchase_value(&self) -> f64 {
        self.market_value(self.purchase_price)
    }
}
