use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use papertrader_core::errors::{Error, Result, StorageError};
use papertrader_core::instruments::{Instrument, InstrumentRepositoryTrait, NewInstrument};

/// Instrument store keyed by instrument id. Symbols are unique.
#[derive(Default)]
pub struct MemoryInstrumentRepository {
    instruments: DashMap<String, Instrument>,
}

impl MemoryInstrumentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InstrumentRepositoryTrait for MemoryInstrumentRepository {
    async fn create(&self, new_instrument: NewInstrument) -> Result<Instrument> {
        new_instrument.validate()?;

        if self
            .instruments
            .iter()
            .any(|entry| entry.symbol == new_instrument.symbol)
        {
            return Err(Error::Storage(StorageError::UniqueViolation(format!(
                "instrument symbol already registered: {}",
                new_instrument.symbol
            ))));
        }

        let instrument = Instrument {
            id: new_instrument
                .id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            symbol: new_instrument.symbol,
            name: new_instrument.name,
            created_at: Utc::now(),
        };

        if self.instruments.contains_key(&instrument.id) {
            return Err(Error::Storage(StorageError::UniqueViolation(format!(
                "instrument id already registered: {}",
                instrument.id
            ))));
        }
        self.instruments
            .insert(instrument.id.clone(), instrument.clone());
        Ok(instrument)
    }

    fn get_by_id(&self, instrument_id: &str) -> Result<Option<Instrument>> {
        Ok(self
            .instruments
            .get(instrument_id)
            .map(|entry| entry.clone()))
    }

    fn get_by_symbol(&self, symbol: &str) -> Result<Option<Instrument>> {
        Ok(self
            .instruments
            .iter()
            .find(|entry| entry.symbol == symbol)
            .map(|entry| entry.clone()))
    }

    fn list(&self) -> Result<Vec<Instrument>> {
        let mut instruments: Vec<Instrument> = self
            .instruments
            .iter()
            .map(|entry| entry.clone())
            .collect();
        instruments.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Ok(instruments)
    }
}
