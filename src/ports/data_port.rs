//! Price and fundamentals source port.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::error::BalanceWheelError;
use crate::domain::fundamentals::Fundamentals;
use crate::domain::ohlcv::PriceBar;

#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Daily bars for `symbol` with `start <= date <= end`, oldest first.
    async fn fetch_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, BalanceWheelError>;

    /// Default: the source carries no fundamentals.
    async fn fetch_fundamentals(&self, symbol: &str) -> Result<Fundamentals, BalanceWheelError> {
        Err(BalanceWheelError::NoData {
            symbol: symbol.to_string(),
        })
    }
}
