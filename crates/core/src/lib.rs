//! Papertrader Core - domain entities, services, and traits.
//!
//! This crate contains the trading-simulator business logic: the synthetic
//! price-series generator, the order execution engine, and the ledger
//! bookkeeping invariants. It is storage-agnostic and defines repository
//! traits that are implemented by the `storage-memory` crate.

pub mod constants;
pub mod errors;
pub mod execution;
pub mod instruments;
pub mod ledger;
pub mod market_data;
pub mod utils;

// Re-export common types
pub use execution::*;
pub use ledger::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
