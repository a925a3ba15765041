use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use log::debug;

use papertrader_core::errors::Result;
use papertrader_core::market_data::{MarketDataRepositoryTrait, PriceBar};

/// Market data store: one date-sorted series per instrument.
#[derive(Default)]
pub struct MemoryMarketDataRepository {
    series: DashMap<String, Vec<PriceBar>>,
}

impl MemoryMarketDataRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MarketDataRepositoryTrait for MemoryMarketDataRepository {
    fn get_bar(&self, instrument_id: &str, date: NaiveDate) -> Result<Option<PriceBar>> {
        Ok(self.series.get(instrument_id).and_then(|bars| {
            bars.binary_search_by_key(&date, |bar| bar.date)
                .ok()
                .map(|index| bars[index].clone())
        }))
    }

    fn get_latest_bar(&self, instrument_id: &str) -> Result<Option<PriceBar>> {
        Ok(self
            .series
            .get(instrument_id)
            .and_then(|bars| bars.last().cloned()))
    }

    fn get_bars_in_range(
        &self,
        instrument_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>> {
        Ok(self
            .series
            .get(instrument_id)
            .map(|bars| {
                let from = bars.partition_point(|bar| bar.date < start);
                let to = bars.partition_point(|bar| bar.date <= end);
                bars[from..to].to_vec()
            })
            .unwrap_or_default())
    }

    async fn replace_all(&self, instrument_id: &str, mut bars: Vec<PriceBar>) -> Result<usize> {
        bars.sort_by_key(|bar| bar.date);
        let count = bars.len();
        debug!("Storing {} bars for {}", count, instrument_id);
        self.series.insert(instrument_id.to_string(), bars);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn bar(day: u32, close: rust_decimal::Decimal) -> PriceBar {
        PriceBar {
            instrument_id: "inst-1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            adjclose: close,
            volume: 10_000_000,
        }
    }

    #[tokio::test]
    async fn replace_all_overwrites_the_series() {
        let repository = MemoryMarketDataRepository::new();
        repository
            .replace_all("inst-1", vec![bar(1, dec!(50)), bar(4, dec!(51))])
            .await
            .unwrap();
        let count = repository
            .replace_all("inst-1", vec![bar(5, dec!(60))])
            .await
            .unwrap();
        assert_eq!(count, 1);

        let latest = repository.get_latest_bar("inst-1").unwrap().unwrap();
        assert_eq!(latest.close, dec!(60));
        assert!(repository
            .get_bar("inst-1", NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn range_queries_are_inclusive_and_sorted() {
        let repository = MemoryMarketDataRepository::new();
        // Deliberately unsorted input.
        repository
            .replace_all(
                "inst-1",
                vec![bar(5, dec!(52)), bar(1, dec!(50)), bar(4, dec!(51))],
            )
            .await
            .unwrap();

        let bars = repository
            .get_bars_in_range(
                "inst-1",
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            )
            .unwrap();
        let closes: Vec<_> = bars.iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![dec!(50), dec!(51)]);
    }

    #[tokio::test]
    async fn missing_instrument_reads_as_empty() {
        let repository = MemoryMarketDataRepository::new();
        assert!(repository.get_latest_bar("unknown").unwrap().is_none());
        assert!(repository
            .get_bars_in_range(
                "unknown",
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            )
            .unwrap()
            .is_empty());
    }
}
