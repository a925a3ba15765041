use async_trait::async_trait;

use super::instruments_model::{Instrument, NewInstrument};
use crate::errors::Result;

/// Trait defining the contract for Instrument repository operations.
#[async_trait]
pub trait InstrumentRepositoryTrait: Send + Sync {
    async fn create(&self, new_instrument: NewInstrument) -> Result<Instrument>;
    fn get_by_id(&self, instrument_id: &str) -> Result<Option<Instrument>>;
    fn get_by_symbol(&self, symbol: &str) -> Result<Option<Instrument>>;
    fn list(&self) -> Result<Vec<Instrument>>;
}
