//! Exchange-rate source port.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::error::BalanceWheelError;

#[async_trait]
pub trait FxRateSource: Send + Sync {
    /// Latest units of `quote` per one `base`.
    async fn latest(&self, base: &str, quote: &str) -> Result<f64, BalanceWheelError>;

    async fn historical(
        &self,
        base: &str,
        quote: &str,
        date: NaiveDate,
    ) -> Result<f64, BalanceWheelError>;
}
