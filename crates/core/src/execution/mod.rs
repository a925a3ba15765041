//! Execution module - order validation, fill determination, and settlement.

mod execution_constants;
mod execution_errors;
mod execution_model;
mod execution_traits;
mod executor;


// Re-export the public interface
pub use execution_constants::*;
pub use execution_errors::ExecutionError;
pub use execution_model::{
    ExecutionOutcome, ExecutionReport, Fill, PendingReason, RejectReason,
};
pub use execution_traits::OrderExecutorTrait;
pub use executor::OrderExecutor;
