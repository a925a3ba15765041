//! Synthetic daily price-series generator.
//!
//! Produces OHLCV bars with geometric Brownian motion: log-returns are
//! normally distributed with a daily drift and volatility derived from the
//! annualized inputs. The RNG is seeded, so the same parameters always
//! produce the same series.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Weekday};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use super::market_data_constants::{
    BASE_VOLUME, INTRADAY_RANGE_FACTOR, VOLUME_JITTER, VOLUME_MOVE_MULTIPLIER,
};
use super::market_data_errors::MarketDataError;
use super::market_data_model::PriceBar;
use super::market_data_traits::MarketDataRepositoryTrait;
use crate::constants::TRADING_DAYS_PER_YEAR;
use crate::errors::{Error, Result};
use crate::instruments::{InstrumentRepositoryTrait, NewInstrument};
use crate::utils::round_money;

/// Parameters for one instrument's series. Same params (including seed)
/// produce the same series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesParams {
    /// First trading day's open. Must be positive.
    pub start_price: f64,
    /// Annualized volatility sigma, in [0, 1]. Zero yields a deterministic
    /// drift-only series.
    pub annual_volatility: f64,
    /// Annualized drift mu (e.g. 0.20 for 20% expected annual growth).
    pub annual_drift: f64,
    /// RNG seed.
    pub seed: u64,
}

impl SeriesParams {
    /// Validates the generator parameters.
    pub fn validate(&self) -> Result<()> {
        if self.start_price <= 0.0 || !self.start_price.is_finite() {
            return Err(Error::MarketData(MarketDataError::InvalidParameters(
                format!("start_price must be positive, got {}", self.start_price),
            )));
        }
        if !(0.0..=1.0).contains(&self.annual_volatility) {
            return Err(Error::MarketData(MarketDataError::InvalidParameters(
                format!(
                    "annual_volatility must be within [0, 1], got {}",
                    self.annual_volatility
                ),
            )));
        }
        if !self.annual_drift.is_finite() {
            return Err(Error::MarketData(MarketDataError::InvalidParameters(
                format!("annual_drift must be finite, got {}", self.annual_drift),
            )));
        }
        Ok(())
    }
}

/// One entry of the built-in instrument catalogue.
#[derive(Debug, Clone)]
pub struct CatalogueEntry {
    pub symbol: &'static str,
    pub name: &'static str,
    pub start_price: f64,
    pub annual_volatility: f64,
    pub annual_drift: f64,
}

/// Built-in catalogue of simulated large-cap stocks with plausible starting
/// prices, volatilities, and growth rates.
pub const DEFAULT_CATALOGUE: &[CatalogueEntry] = &[
    CatalogueEntry { symbol: "AAPL", name: "Apple Inc.", start_price: 30.0, annual_volatility: 0.25, annual_drift: 0.20 },
    CatalogueEntry { symbol: "GOOGL", name: "Alphabet Inc.", start_price: 300.0, annual_volatility: 0.22, annual_drift: 0.18 },
    CatalogueEntry { symbol: "MSFT", name: "Microsoft Corporation", start_price: 25.0, annual_volatility: 0.20, annual_drift: 0.25 },
    CatalogueEntry { symbol: "AMZN", name: "Amazon.com Inc.", start_price: 150.0, annual_volatility: 0.30, annual_drift: 0.22 },
    CatalogueEntry { symbol: "TSLA", name: "Tesla Inc.", start_price: 15.0, annual_volatility: 0.45, annual_drift: 0.35 },
    CatalogueEntry { symbol: "NFLX", name: "Netflix Inc.", start_price: 20.0, annual_volatility: 0.35, annual_drift: 0.28 },
    CatalogueEntry { symbol: "NVDA", name: "NVIDIA Corporation", start_price: 8.0, annual_volatility: 0.40, annual_drift: 0.45 },
    CatalogueEntry { symbol: "INTC", name: "Intel Corporation", start_price: 20.0, annual_volatility: 0.18, annual_drift: 0.08 },
    CatalogueEntry { symbol: "AMD", name: "Advanced Micro Devices", start_price: 5.0, annual_volatility: 0.50, annual_drift: 0.40 },
    CatalogueEntry { symbol: "BABA", name: "Alibaba Group", start_price: 100.0, annual_volatility: 0.35, annual_drift: 0.15 },
    CatalogueEntry { symbol: "JPM", name: "JPMorgan Chase & Co.", start_price: 80.0, annual_volatility: 0.25, annual_drift: 0.12 },
    CatalogueEntry { symbol: "V", name: "Visa Inc.", start_price: 60.0, annual_volatility: 0.20, annual_drift: 0.18 },
    CatalogueEntry { symbol: "MA", name: "Mastercard Inc.", start_price: 50.0, annual_volatility: 0.22, annual_drift: 0.20 },
    CatalogueEntry { symbol: "ORCL", name: "Oracle Corporation", start_price: 15.0, annual_volatility: 0.18, annual_drift: 0.10 },
    CatalogueEntry { symbol: "KO", name: "The Coca-Cola Company", start_price: 35.0, annual_volatility: 0.15, annual_drift: 0.08 },
    CatalogueEntry { symbol: "PFE", name: "Pfizer Inc.", start_price: 25.0, annual_volatility: 0.20, annual_drift: 0.06 },
    CatalogueEntry { symbol: "JNJ", name: "Johnson & Johnson", start_price: 90.0, annual_volatility: 0.15, annual_drift: 0.07 },
    CatalogueEntry { symbol: "BAC", name: "Bank of America", start_price: 10.0, annual_volatility: 0.30, annual_drift: 0.15 },
    CatalogueEntry { symbol: "XOM", name: "Exxon Mobil Corporation", start_price: 60.0, annual_volatility: 0.25, annual_drift: 0.05 },
    CatalogueEntry { symbol: "WMT", name: "Walmart Inc.", start_price: 50.0, annual_volatility: 0.18, annual_drift: 0.10 },
    CatalogueEntry { symbol: "PG", name: "Procter & Gamble", start_price: 55.0, annual_volatility: 0.16, annual_drift: 0.09 },
    CatalogueEntry { symbol: "DIS", name: "The Walt Disney Company", start_price: 70.0, annual_volatility: 0.22, annual_drift: 0.12 },
    CatalogueEntry { symbol: "NKE", name: "Nike Inc.", start_price: 45.0, annual_volatility: 0.24, annual_drift: 0.16 },
    CatalogueEntry { symbol: "HD", name: "The Home Depot", start_price: 40.0, annual_volatility: 0.20, annual_drift: 0.14 },
    CatalogueEntry { symbol: "MCD", name: "McDonald's Corporation", start_price: 60.0, annual_volatility: 0.16, annual_drift: 0.11 },
];

/// Generates synthetic price series and writes them into the market data
/// store.
pub struct PriceSeriesGenerator {
    repository: Arc<dyn MarketDataRepositoryTrait>,
}

impl PriceSeriesGenerator {
    /// Creates a new generator writing through the given repository.
    pub fn new(repository: Arc<dyn MarketDataRepositoryTrait>) -> Self {
        Self { repository }
    }

    /// Generates the full bar series for `[start, end]`, weekends skipped.
    ///
    /// Pure function of its inputs: same params produce the same bars. Prices
    /// are rounded to 2 decimals half-up for storage while the unrounded
    /// close propagates to the next day's open, so rounding error does not
    /// compound.
    pub fn generate_series(
        instrument_id: &str,
        params: &SeriesParams,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>> {
        params.validate()?;
        if start > end {
            return Err(Error::MarketData(MarketDataError::InvalidParameters(
                format!("start date {} is after end date {}", start, end),
            )));
        }

        let mut rng = StdRng::seed_from_u64(params.seed);
        let dt = 1.0 / f64::from(TRADING_DAYS_PER_YEAR);
        let daily_drift = params.annual_drift * dt;
        let daily_vol = params.annual_volatility * dt.sqrt();

        let mut bars = Vec::new();
        let mut current_price = params.start_price;
        let mut date = start;

        loop {
            if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                let shock: f64 = rng.sample(StandardNormal);
                let log_return = daily_drift + daily_vol * shock;
                let new_price = current_price * log_return.exp();

                let open = current_price;
                let close = new_price;
                let body_high = open.max(close);
                let body_low = open.min(close);

                // Widen the range with fresh draws, then clamp so the bar
                // always contains its body.
                let high_shock: f64 = rng.sample(StandardNormal);
                let low_shock: f64 = rng.sample(StandardNormal);
                let high = (body_high * (1.0 + high_shock.abs() * INTRADAY_RANGE_FACTOR))
                    .max(body_high);
                let low =
                    (body_low * (1.0 - low_shock.abs() * INTRADAY_RANGE_FACTOR)).min(body_low);

                // Volume rises with the size of the move, truncated to whole
                // shares.
                let base_volume = BASE_VOLUME + rng.gen_range(0..VOLUME_JITTER);
                let volume = (base_volume as f64
                    * (1.0 + log_return.abs() * VOLUME_MOVE_MULTIPLIER))
                    as i64;

                let close_money = to_money(close)?;
                bars.push(PriceBar {
                    instrument_id: instrument_id.to_string(),
                    date,
                    open: to_money(open)?,
                    high: to_money(high)?,
                    low: to_money(low)?,
                    close: close_money,
                    adjclose: close_money,
                    volume,
                });

                current_price = new_price;
            }

            if date >= end {
                break;
            }
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }

        debug!(
            "Generated {} bars for {} between {} and {}",
            bars.len(),
            instrument_id,
            start,
            end
        );
        Ok(bars)
    }

    /// Regenerates the instrument's series and replaces any stored bars
    /// (delete-then-insert), so a rolling end date stays consistent.
    /// Returns the number of bars written.
    pub async fn regenerate(
        &self,
        instrument_id: &str,
        params: &SeriesParams,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<usize> {
        let bars = Self::generate_series(instrument_id, params, start, end)?;
        let count = self.repository.replace_all(instrument_id, bars).await?;
        info!("Stored {} bars for instrument {}", count, instrument_id);
        Ok(count)
    }

    /// Registers the default catalogue's instruments (skipping symbols that
    /// already exist) and generates history for each. Per-symbol seeds are
    /// derived from `base_seed` by catalogue position, keeping the whole
    /// seeding run reproducible.
    ///
    /// Returns the total number of bars written.
    pub async fn seed_catalogue(
        &self,
        instruments: &dyn InstrumentRepositoryTrait,
        start: NaiveDate,
        end: NaiveDate,
        base_seed: u64,
    ) -> Result<usize> {
        let mut total = 0;
        for (index, entry) in DEFAULT_CATALOGUE.iter().enumerate() {
            let instrument = match instruments.get_by_symbol(entry.symbol)? {
                Some(existing) => existing,
                None => {
                    instruments
                        .create(NewInstrument {
                            id: None,
                            symbol: entry.symbol.to_string(),
                            name: entry.name.to_string(),
                        })
                        .await?
                }
            };

            let params = SeriesParams {
                start_price: entry.start_price,
                annual_volatility: entry.annual_volatility,
                annual_drift: entry.annual_drift,
                seed: base_seed.wrapping_add(index as u64),
            };
            total += self.regenerate(&instrument.id, &params, start, end).await?;
        }
        info!(
            "Seeded {} instruments with {} bars total",
            DEFAULT_CATALOGUE.len(),
            total
        );
        Ok(total)
    }
}

/// Converts an f64 price into a 2-decimal half-up rounded `Decimal`.
fn to_money(value: f64) -> Result<Decimal> {
    if !value.is_finite() {
        warn!("Non-finite price produced by generator: {}", value);
    }
    let decimal = Decimal::from_f64(value).ok_or_else(|| {
        Error::MarketData(MarketDataError::Conversion(format!(
            "cannot represent {} as a decimal price",
            value
        )))
    })?;
    Ok(round_money(decimal))
}
