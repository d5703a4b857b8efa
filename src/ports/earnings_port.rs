//! Earnings history source port.

use async_trait::async_trait;

use crate::domain::earnings::EarningsRecord;
use crate::domain::error::BalanceWheelError;

#[async_trait]
pub trait EarningsSource: Send + Sync {
    async fn fetch_earnings(&self, symbol: &str) -> Result<Vec<EarningsRecord>, BalanceWheelError>;
}
