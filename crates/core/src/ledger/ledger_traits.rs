use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::ledger_model::{
    Account, FillSettlement, NewAccount, NewOrder, NewTrade, Order, OrderStatus, Position, Trade,
};
use crate::errors::Result;

/// Trait defining the contract for the account ledger: cash balances,
/// positions, orders, and trade records.
///
/// The execution engine is the sole writer of cash, positions, and order
/// fill fields. Implementations must apply [`apply_fill`](Self::apply_fill)
/// atomically; a failure mid-settlement must leave no partial mutation.
#[async_trait]
pub trait LedgerRepositoryTrait: Send + Sync {
    // --- Accounts ---
    async fn create_account(&self, new_account: NewAccount) -> Result<Account>;
    fn get_account(&self, account_id: &str) -> Result<Option<Account>>;
    fn list_accounts(&self) -> Result<Vec<Account>>;
    async fn set_cash(&self, account_id: &str, new_cash: Decimal) -> Result<()>;

    // --- Positions ---
    fn get_position(&self, account_id: &str, instrument_id: &str) -> Result<Option<Position>>;
    fn list_positions(&self, account_id: &str) -> Result<Vec<Position>>;
    async fn upsert_position(&self, position: Position) -> Result<()>;
    async fn delete_position(&self, account_id: &str, instrument_id: &str) -> Result<()>;

    // --- Orders ---
    async fn create_order(&self, new_order: NewOrder) -> Result<Order>;
    fn get_order(&self, order_id: &str) -> Result<Option<Order>>;
    fn list_orders(&self, account_id: &str) -> Result<Vec<Order>>;
    /// Pending orders with `order_date <= date`, oldest first.
    fn find_pending_orders(&self, account_id: &str, date: NaiveDate) -> Result<Vec<Order>>;
    async fn update_order_fill(
        &self,
        order_id: &str,
        status: OrderStatus,
        filled_quantity: i64,
        filled_price: Option<Decimal>,
        filled_date: Option<NaiveDate>,
    ) -> Result<()>;
    /// User-initiated cancellation. Fails unless the order is still Pending.
    async fn cancel_order(&self, order_id: &str) -> Result<()>;

    // --- Trades ---
    async fn create_trade(&self, new_trade: NewTrade) -> Result<Trade>;
    fn list_trades(&self, account_id: &str) -> Result<Vec<Trade>>;

    /// Applies one fill's cash, position, trade, and order mutations as a
    /// single atomic unit.
    async fn apply_fill(&self, settlement: FillSettlement) -> Result<()>;
}
