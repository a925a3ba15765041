use async_trait::async_trait;
use chrono::NaiveDate;

use super::execution_model::{ExecutionOutcome, ExecutionReport};
use crate::errors::Result;
use crate::ledger::{NewOrder, Order};

/// Trait defining the contract for the order execution engine.
#[async_trait]
pub trait OrderExecutorTrait: Send + Sync {
    /// Validates an order against funds/holdings and persists it as Pending.
    async fn place_order(&self, new_order: NewOrder) -> Result<Order>;

    /// Attempts to fill one pending order against the given trading day.
    async fn execute_order(&self, order: &Order, date: NaiveDate) -> Result<ExecutionOutcome>;

    /// Processes every pending order of the account with `order_date <= date`,
    /// independently.
    async fn execute_pending_orders(
        &self,
        account_id: &str,
        date: NaiveDate,
    ) -> Result<ExecutionReport>;

    /// Recomputes current value and unrealized P&L of every open position
    /// from the latest available close. Touches neither cash nor quantities;
    /// idempotent.
    async fn revalue_positions(&self, account_id: &str) -> Result<()>;
}
