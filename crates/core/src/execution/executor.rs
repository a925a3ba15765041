//! The order execution engine.
//!
//! Validates orders against funds and holdings, determines fill prices
//! against daily bars, and settles fills atomically through the ledger
//! store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info, warn};
use rust_decimal::Decimal;

use super::execution_constants::{COMMISSION_RATE, MIN_COMMISSION, SLIPPAGE_RATE};
use super::execution_errors::ExecutionError;
use super::execution_model::{
    ExecutionOutcome, ExecutionReport, Fill, PendingReason, RejectReason,
};
use super::execution_traits::OrderExecutorTrait;
use crate::errors::{Error, Result};
use crate::ledger::{
    FillSettlement, LedgerRepositoryTrait, NewOrder, NewTrade, Order, OrderSide, OrderStatus,
    OrderType, Position, PositionChange,
};
use crate::market_data::{MarketDataRepositoryTrait, PriceBar};
use crate::utils::round_money;

/// Order execution engine. Sole writer of account cash, positions, and
/// order fill fields.
pub struct OrderExecutor {
    ledger: Arc<dyn LedgerRepositoryTrait>,
    market_data: Arc<dyn MarketDataRepositoryTrait>,
}

impl OrderExecutor {
    /// Creates a new engine over the given stores.
    pub fn new(
        ledger: Arc<dyn LedgerRepositoryTrait>,
        market_data: Arc<dyn MarketDataRepositoryTrait>,
    ) -> Self {
        Self {
            ledger,
            market_data,
        }
    }

    /// Commission for a trade: 0.1% of the subtotal with a 1.00 floor,
    /// rounded to 2 decimals half-up.
    pub fn commission(subtotal: Decimal) -> Decimal {
        let commission = subtotal * COMMISSION_RATE;
        if commission < MIN_COMMISSION {
            MIN_COMMISSION
        } else {
            round_money(commission)
        }
    }

    /// Determines the execution price for an order against a day's bar.
    ///
    /// Market orders fill at the open adjusted by slippage, which always
    /// works against the trader. Limit orders fill at the limit price only
    /// when the day's range reaches it. Returns `None` when the order does
    /// not fill.
    fn determine_execution_price(order: &Order, bar: &PriceBar) -> Option<Decimal> {
        let raw = match order.order_type {
            OrderType::Market => {
                let slippage = bar.open * SLIPPAGE_RATE;
                match order.side {
                    OrderSide::Buy => bar.open + slippage,
                    OrderSide::Sell => bar.open - slippage,
                }
            }
            OrderType::Limit => {
                // Validation guarantees a limit price on limit orders.
                let limit = order.limit_price?;
                match order.side {
                    OrderSide::Buy if bar.low <= limit => limit,
                    OrderSide::Sell if bar.high >= limit => limit,
                    _ => return None,
                }
            }
        };
        Some(round_money(raw))
    }

    /// Applies the position-update algorithm for a fill.
    ///
    /// Buys blend the average cost quantity-weighted; sells keep it
    /// unchanged. A position reaching exactly zero quantity is deleted.
    fn build_position_change(
        existing: Option<Position>,
        order: &Order,
        price: Decimal,
    ) -> Result<PositionChange> {
        let filled_qty = order.quantity;
        match (existing, order.side) {
            (None, OrderSide::Buy) => Ok(PositionChange::Upsert(Position {
                account_id: order.account_id.clone(),
                instrument_id: order.instrument_id.clone(),
                quantity: filled_qty,
                average_cost: price,
                current_value: price * Decimal::from(filled_qty),
                unrealized_pnl: Decimal::ZERO,
            })),
            (None, OrderSide::Sell) => Err(Error::Execution(ExecutionError::LedgerOutOfSync(
                format!(
                    "sell fill for account {} instrument {} has no backing position",
                    order.account_id, order.instrument_id
                ),
            ))),
            (Some(position), side) => {
                let (new_quantity, new_average_cost) = match side {
                    OrderSide::Buy => {
                        let new_quantity = position.quantity + filled_qty;
                        let old_cost = position.average_cost * Decimal::from(position.quantity);
                        let fill_cost = price * Decimal::from(filled_qty);
                        let new_average_cost =
                            round_money((old_cost + fill_cost) / Decimal::from(new_quantity));
                        (new_quantity, new_average_cost)
                    }
                    OrderSide::Sell => {
                        let new_quantity = position.quantity - filled_qty;
                        if new_quantity < 0 {
                            return Err(Error::Execution(ExecutionError::LedgerOutOfSync(
                                format!(
                                    "sell of {} exceeds held {} for account {} instrument {}",
                                    filled_qty,
                                    position.quantity,
                                    order.account_id,
                                    order.instrument_id
                                ),
                            )));
                        }
                        (new_quantity, position.average_cost)
                    }
                };

                if new_quantity == 0 {
                    return Ok(PositionChange::Delete {
                        account_id: order.account_id.clone(),
                        instrument_id: order.instrument_id.clone(),
                    });
                }

                let current_value = price * Decimal::from(new_quantity);
                let cost_basis = new_average_cost * Decimal::from(new_quantity);
                Ok(PositionChange::Upsert(Position {
                    account_id: order.account_id.clone(),
                    instrument_id: order.instrument_id.clone(),
                    quantity: new_quantity,
                    average_cost: new_average_cost,
                    current_value,
                    unrealized_pnl: current_value - cost_basis,
                }))
            }
        }
    }
}

#[async_trait]
impl OrderExecutorTrait for OrderExecutor {
    async fn place_order(&self, new_order: NewOrder) -> Result<Order> {
        new_order.validate()?;

        if new_order.quantity <= 0 {
            return Err(Error::Execution(ExecutionError::InvalidQuantity(
                new_order.quantity,
            )));
        }

        let account = self
            .ledger
            .get_account(&new_order.account_id)?
            .ok_or_else(|| {
                Error::Execution(ExecutionError::AccountNotFound(
                    new_order.account_id.clone(),
                ))
            })?;

        match new_order.side {
            OrderSide::Buy => {
                let latest = self
                    .market_data
                    .get_latest_bar(&new_order.instrument_id)?
                    .ok_or_else(|| {
                        Error::Execution(ExecutionError::NoMarketData(
                            new_order.instrument_id.clone(),
                        ))
                    })?;

                // Rough affordability estimate; the actual fill price may
                // differ and the hard no-negative-cash guard runs again at
                // settlement.
                let estimated_price = match new_order.order_type {
                    OrderType::Limit => new_order.limit_price.unwrap_or(latest.close),
                    OrderType::Market => latest.close,
                };
                let estimated_cost = estimated_price * Decimal::from(new_order.quantity);
                let estimated_total = estimated_cost + Self::commission(estimated_cost);
                if account.current_cash < estimated_total {
                    return Err(Error::Execution(ExecutionError::InsufficientFunds {
                        required: estimated_total,
                        available: account.current_cash,
                    }));
                }
            }
            OrderSide::Sell => {
                let position = self
                    .ledger
                    .get_position(&new_order.account_id, &new_order.instrument_id)?;
                let available = position.map(|p| p.quantity).unwrap_or(0);
                if available < new_order.quantity {
                    return Err(Error::Execution(ExecutionError::InsufficientShares {
                        required: new_order.quantity,
                        available,
                    }));
                }
            }
        }

        let order = self.ledger.create_order(new_order).await?;
        debug!(
            "Placed {} {} order {} for {} shares",
            order.side.as_str(),
            match order.order_type {
                OrderType::Market => "market",
                OrderType::Limit => "limit",
            },
            order.id,
            order.quantity
        );
        Ok(order)
    }

    async fn execute_order(&self, order: &Order, date: NaiveDate) -> Result<ExecutionOutcome> {
        let bar = match self.market_data.get_bar(&order.instrument_id, date)? {
            Some(bar) => bar,
            // Weekend or holiday: the order stays pending untouched.
            None => return Ok(ExecutionOutcome::Pending(PendingReason::NonTradingDay)),
        };

        let price = match Self::determine_execution_price(order, &bar) {
            Some(price) => price,
            None => return Ok(ExecutionOutcome::Pending(PendingReason::LimitNotReached)),
        };

        let subtotal = price * Decimal::from(order.quantity);
        let commission = Self::commission(subtotal);

        let account = self.ledger.get_account(&order.account_id)?.ok_or_else(|| {
            Error::Execution(ExecutionError::AccountNotFound(order.account_id.clone()))
        })?;

        let new_cash = match order.side {
            OrderSide::Buy => {
                let new_cash = account.current_cash - (subtotal + commission);
                if new_cash < Decimal::ZERO {
                    // The estimate at placement passed but the actual fill
                    // price would drive cash negative. Reject without
                    // touching the ledger.
                    warn!(
                        "Order {} would drive cash negative ({}); rejecting",
                        order.id, new_cash
                    );
                    self.ledger
                        .update_order_fill(&order.id, OrderStatus::Rejected, 0, None, Some(date))
                        .await?;
                    return Ok(ExecutionOutcome::Rejected(RejectReason::NegativeCash));
                }
                new_cash
            }
            OrderSide::Sell => account.current_cash + (subtotal - commission),
        };

        let existing = self
            .ledger
            .get_position(&order.account_id, &order.instrument_id)?;
        let position_change = Self::build_position_change(existing, order, price)?;

        let trade = NewTrade {
            order_id: order.id.clone(),
            account_id: order.account_id.clone(),
            instrument_id: order.instrument_id.clone(),
            side: order.side,
            quantity: order.quantity,
            price,
            commission,
            trade_date: date,
        };
        let total_amount = trade.total_amount();

        self.ledger
            .apply_fill(FillSettlement {
                account_id: order.account_id.clone(),
                new_cash,
                position_change,
                trade,
                order_id: order.id.clone(),
                filled_quantity: order.quantity,
                filled_price: price,
                filled_date: date,
            })
            .await?;

        info!(
            "Executed {} {} shares at {} (commission: {})",
            order.side.as_str(),
            order.quantity,
            price,
            commission
        );

        Ok(ExecutionOutcome::Filled(Fill {
            order_id: order.id.clone(),
            side: order.side,
            quantity: order.quantity,
            price,
            commission,
            total_amount,
        }))
    }

    async fn execute_pending_orders(
        &self,
        account_id: &str,
        date: NaiveDate,
    ) -> Result<ExecutionReport> {
        let pending = self.ledger.find_pending_orders(account_id, date)?;
        debug!(
            "Processing {} pending orders for account {} on {}",
            pending.len(),
            account_id,
            date
        );

        let mut report = ExecutionReport::default();
        for order in pending {
            let outcome = self.execute_order(&order, date).await?;
            report.record(order, outcome);
        }
        Ok(report)
    }

    async fn revalue_positions(&self, account_id: &str) -> Result<()> {
        for mut position in self.ledger.list_positions(account_id)? {
            let latest = match self.market_data.get_latest_bar(&position.instrument_id)? {
                Some(bar) => bar,
                None => {
                    debug!(
                        "No market data for {}; leaving position values as-is",
                        position.instrument_id
                    );
                    continue;
                }
            };
            let quantity = Decimal::from(position.quantity);
            position.current_value = latest.close * quantity;
            position.unrealized_pnl = position.current_value - position.average_cost * quantity;
            self.ledger.upsert_position(position).await?;
        }
        Ok(())
    }
}
