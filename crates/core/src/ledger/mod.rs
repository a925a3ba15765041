//! Ledger module - accounts, positions, orders, and trades, plus the
//! storage trait the execution engine writes through.

mod ledger_model;
mod ledger_traits;

#[cfg(test)]
mod ledger_model_tests;

// Re-export the public interface
pub use ledger_model::{
    Account, FillSettlement, NewAccount, NewOrder, NewTrade, Order, OrderSide, OrderStatus,
    OrderType, Position, PositionChange, Trade,
};
pub use ledger_traits::LedgerRepositoryTrait;
