//! In-memory storage backend.
//!
//! Implements the repository traits from `papertrader-core` over process-local
//! collections. The ledger store serializes all writes behind a single lock so
//! that fill settlement is atomic; the instrument and market-data stores are
//! sharded maps since their access is read-mostly.

mod instruments;
mod ledger;
mod market_data;

pub use instruments::MemoryInstrumentRepository;
pub use ledger::MemoryLedgerRepository;
pub use market_data::MemoryMarketDataRepository;
