//! Headline source port.

use async_trait::async_trait;

use crate::domain::error::BalanceWheelError;
use crate::domain::news::NewsArticle;

#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch_headlines(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<NewsArticle>, BalanceWheelError>;
}
