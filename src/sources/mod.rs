//! Upstream daily price sources.

pub mod synthetic;
pub mod yahoo;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::PriceSeries;

pub use synthetic::SyntheticSource;
pub use yahoo::YahooFinanceClient;

/// Anything that can supply a daily close series for a ticker.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Fetch the recent daily series for `symbol`, oldest first.
    async fn fetch_daily(&self, symbol: &str) -> Result<PriceSeries>;
}
