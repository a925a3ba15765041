use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use log::debug;
use rust_decimal::Decimal;
use uuid::Uuid;

use papertrader_core::errors::{Error, Result, StorageError, ValidationError};
use papertrader_core::ledger::{
    Account, FillSettlement, LedgerRepositoryTrait, NewAccount, NewOrder, NewTrade, Order,
    OrderStatus, Position, PositionChange, Trade,
};

#[derive(Default)]
struct LedgerState {
    accounts: Vec<Account>,
    positions: Vec<Position>,
    orders: Vec<Order>,
    trades: Vec<Trade>,
}

/// Ledger store. All mutation goes through one write lock, which is what
/// makes [`apply_fill`](LedgerRepositoryTrait::apply_fill) atomic: a fill's
/// precondition checks and its cash/position/trade/order writes happen under
/// the same guard, and the checks run before the first write.
#[derive(Default)]
pub struct MemoryLedgerRepository {
    state: RwLock<LedgerState>,
}

impl MemoryLedgerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, LedgerState>> {
        self.state
            .read()
            .map_err(|_| Error::Storage(StorageError::Internal("ledger lock poisoned".to_string())))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, LedgerState>> {
        self.state
            .write()
            .map_err(|_| Error::Storage(StorageError::Internal("ledger lock poisoned".to_string())))
    }
}

fn position_index(state: &LedgerState, account_id: &str, instrument_id: &str) -> Option<usize> {
    state
        .positions
        .iter()
        .position(|p| p.account_id == account_id && p.instrument_id == instrument_id)
}

#[async_trait]
impl LedgerRepositoryTrait for MemoryLedgerRepository {
    async fn create_account(&self, new_account: NewAccount) -> Result<Account> {
        new_account.validate()?;
        let mut state = self.write()?;

        let id = new_account
            .id
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        if state.accounts.iter().any(|a| a.id == id) {
            return Err(Error::Storage(StorageError::UniqueViolation(format!(
                "account id already exists: {id}"
            ))));
        }

        let account = Account {
            id,
            name: new_account.name,
            initial_cash: new_account.initial_cash,
            current_cash: new_account.initial_cash,
            created_at: Utc::now(),
        };
        state.accounts.push(account.clone());
        Ok(account)
    }

    fn get_account(&self, account_id: &str) -> Result<Option<Account>> {
        Ok(self
            .read()?
            .accounts
            .iter()
            .find(|a| a.id == account_id)
            .cloned())
    }

    fn list_accounts(&self) -> Result<Vec<Account>> {
        Ok(self.read()?.accounts.clone())
    }

    async fn set_cash(&self, account_id: &str, new_cash: Decimal) -> Result<()> {
        let mut state = self.write()?;
        let account = state
            .accounts
            .iter_mut()
            .find(|a| a.id == account_id)
            .ok_or_else(|| Error::Storage(StorageError::NotFound(format!("account {account_id}"))))?;
        account.current_cash = new_cash;
        Ok(())
    }

    fn get_position(&self, account_id: &str, instrument_id: &str) -> Result<Option<Position>> {
        let state = self.read()?;
        Ok(position_index(&state, account_id, instrument_id).map(|i| state.positions[i].clone()))
    }

    fn list_positions(&self, account_id: &str) -> Result<Vec<Position>> {
        Ok(self
            .read()?
            .positions
            .iter()
            .filter(|p| p.account_id == account_id)
            .cloned()
            .collect())
    }

    async fn upsert_position(&self, position: Position) -> Result<()> {
        let mut state = self.write()?;
        match position_index(&state, &position.account_id, &position.instrument_id) {
            Some(index) => state.positions[index] = position,
            None => state.positions.push(position),
        }
        Ok(())
    }

    async fn delete_position(&self, account_id: &str, instrument_id: &str) -> Result<()> {
        let mut state = self.write()?;
        if let Some(index) = position_index(&state, account_id, instrument_id) {
            state.positions.remove(index);
        }
        Ok(())
    }

    async fn create_order(&self, new_order: NewOrder) -> Result<Order> {
        new_order.validate()?;
        let mut state = self.write()?;
        let order = Order {
            id: Uuid::new_v4().to_string(),
            account_id: new_order.account_id,
            instrument_id: new_order.instrument_id,
            order_type: new_order.order_type,
            side: new_order.side,
            quantity: new_order.quantity,
            limit_price: new_order.limit_price,
            status: OrderStatus::Pending,
            filled_quantity: 0,
            filled_price: None,
            order_date: new_order.order_date,
            filled_date: None,
            created_at: Utc::now(),
        };
        state.orders.push(order.clone());
        Ok(order)
    }

    fn get_order(&self, order_id: &str) -> Result<Option<Order>> {
        Ok(self
            .read()?
            .orders
            .iter()
            .find(|o| o.id == order_id)
            .cloned())
    }

    fn list_orders(&self, account_id: &str) -> Result<Vec<Order>> {
        Ok(self
            .read()?
            .orders
            .iter()
            .filter(|o| o.account_id == account_id)
            .cloned()
            .collect())
    }

    fn find_pending_orders(&self, account_id: &str, date: NaiveDate) -> Result<Vec<Order>> {
        // Orders are stored in placement order, so this is oldest-first.
        Ok(self
            .read()?
            .orders
            .iter()
            .filter(|o| {
                o.account_id == account_id
                    && o.status == OrderStatus::Pending
                    && o.order_date <= date
            })
            .cloned()
            .collect())
    }

    async fn update_order_fill(
        &self,
        order_id: &str,
        status: OrderStatus,
        filled_quantity: i64,
        filled_price: Option<Decimal>,
        filled_date: Option<NaiveDate>,
    ) -> Result<()> {
        let mut state = self.write()?;
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or_else(|| Error::Storage(StorageError::NotFound(format!("order {order_id}"))))?;
        order.status = status;
        order.filled_quantity = filled_quantity;
        order.filled_price = filled_price;
        order.filled_date = filled_date;
        Ok(())
    }

    async fn cancel_order(&self, order_id: &str) -> Result<()> {
        let mut state = self.write()?;
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or_else(|| Error::Storage(StorageError::NotFound(format!("order {order_id}"))))?;
        if order.status != OrderStatus::Pending {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "only pending orders can be cancelled; order {} is {:?}",
                order_id, order.status
            ))));
        }
        order.status = OrderStatus::Cancelled;
        Ok(())
    }

    async fn create_trade(&self, new_trade: NewTrade) -> Result<Trade> {
        let mut state = self.write()?;
        let trade = materialize_trade(new_trade);
        state.trades.push(trade.clone());
        Ok(trade)
    }

    fn list_trades(&self, account_id: &str) -> Result<Vec<Trade>> {
        Ok(self
            .read()?
            .trades
            .iter()
            .filter(|t| t.account_id == account_id)
            .cloned()
            .collect())
    }

    async fn apply_fill(&self, settlement: FillSettlement) -> Result<()> {
        let mut state = self.write()?;

        // Precondition checks before the first write.
        let account_index = state
            .accounts
            .iter()
            .position(|a| a.id == settlement.account_id)
            .ok_or_else(|| {
                Error::Storage(StorageError::TransactionFailed(format!(
                    "account {} not found",
                    settlement.account_id
                )))
            })?;
        let order_index = state
            .orders
            .iter()
            .position(|o| o.id == settlement.order_id)
            .ok_or_else(|| {
                Error::Storage(StorageError::TransactionFailed(format!(
                    "order {} not found",
                    settlement.order_id
                )))
            })?;
        if state.orders[order_index].status != OrderStatus::Pending {
            return Err(Error::Storage(StorageError::TransactionFailed(format!(
                "order {} is not pending",
                settlement.order_id
            ))));
        }

        state.accounts[account_index].current_cash = settlement.new_cash;

        match settlement.position_change {
            PositionChange::Upsert(position) => {
                match position_index(&state, &position.account_id, &position.instrument_id) {
                    Some(index) => state.positions[index] = position,
                    None => state.positions.push(position),
                }
            }
            PositionChange::Delete {
                account_id,
                instrument_id,
            } => {
                if let Some(index) = position_index(&state, &account_id, &instrument_id) {
                    state.positions.remove(index);
                }
            }
        }

        let trade = materialize_trade(settlement.trade);
        debug!(
            "Settled fill for order {}: trade {} amount {}",
            settlement.order_id, trade.id, trade.total_amount
        );
        state.trades.push(trade);

        let order = &mut state.orders[order_index];
        order.status = OrderStatus::Filled;
        order.filled_quantity = settlement.filled_quantity;
        order.filled_price = Some(settlement.filled_price);
        order.filled_date = Some(settlement.filled_date);

        Ok(())
    }
}

fn materialize_trade(new_trade: NewTrade) -> Trade {
    Trade {
        id: Uuid::new_v4().to_string(),
        total_amount: new_trade.total_amount(),
        order_id: new_trade.order_id,
        account_id: new_trade.account_id,
        instrument_id: new_trade.instrument_id,
        side: new_trade.side,
        quantity: new_trade.quantity,
        price: new_trade.price,
        commission: new_trade.commission,
        trade_date: new_trade.trade_date,
    }
}
