//! Market data module - price bars, storage traits, and the synthetic
//! series generator.

mod generator;
mod market_data_constants;
mod market_data_errors;
mod market_data_model;
mod market_data_traits;


// Re-export the public interface
pub use generator::{CatalogueEntry, PriceSeriesGenerator, SeriesParams, DEFAULT_CATALOGUE};
pub use market_data_constants::*;
pub use market_data_errors::MarketDataError;
pub use market_data_model::PriceBar;
pub use market_data_traits::MarketDataRepositoryTrait;
