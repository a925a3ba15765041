use async_trait::async_trait;
use chrono::NaiveDate;

use super::market_data_model::PriceBar;
use crate::errors::Result;

/// Trait defining the contract for market data storage.
///
/// The store is read-mostly: the generator writes whole series at once via
/// [`replace_all`](Self::replace_all), everything else reads.
#[async_trait]
pub trait MarketDataRepositoryTrait: Send + Sync {
    /// Returns the bar for (instrument, date), or `None` on non-trading days.
    fn get_bar(&self, instrument_id: &str, date: NaiveDate) -> Result<Option<PriceBar>>;

    /// Returns the most recent bar for the instrument, if any exist.
    fn get_latest_bar(&self, instrument_id: &str) -> Result<Option<PriceBar>>;

    /// Returns all bars in `[start, end]`, ordered by date ascending.
    fn get_bars_in_range(
        &self,
        instrument_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>>;

    /// Replaces the instrument's entire series (delete-then-insert).
    /// Returns the number of bars stored.
    async fn replace_all(&self, instrument_id: &str, bars: Vec<PriceBar>) -> Result<usize>;
}
