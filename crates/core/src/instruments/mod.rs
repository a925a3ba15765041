//! Instruments module - domain models and traits.

mod instruments_model;
mod instruments_traits;

// Re-export the public interface
pub use instruments_model::{Instrument, NewInstrument};
pub use instruments_traits::InstrumentRepositoryTrait;
