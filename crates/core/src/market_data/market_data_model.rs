//! Market data domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::market_data_errors::MarketDataError;
use crate::errors::{Error, Result};

/// One trading day's OHLCV bar for an instrument.
///
/// Bars are keyed by (instrument, date); there is at most one per trading day
/// and none on weekends. Created in bulk by the generator and immutable
/// thereafter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceBar {
    pub instrument_id: String,
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    /// Equal to `close`; no corporate actions are modeled.
    pub adjclose: Decimal,
    pub volume: i64,
}

impl PriceBar {
    /// Checks the bar range invariant: `low <= min(open, close)` and
    /// `high >= max(open, close)`.
    pub fn validate(&self) -> Result<()> {
        let body_high = self.open.max(self.close);
        let body_low = self.open.min(self.close);
        if self.low > body_low || self.high < body_high {
            return Err(Error::MarketData(MarketDataError::InvalidBar(format!(
                "bar for {} on {} has range [{}, {}] not containing body [{}, {}]",
                self.instrument_id, self.date, self.low, self.high, body_low, body_high
            ))));
        }
        if self.volume < 0 {
            return Err(Error::MarketData(MarketDataError::InvalidBar(format!(
                "bar for {} on {} has negative volume {}",
                self.instrument_id, self.date, self.volume
            ))));
        }
        Ok(())
    }
}
