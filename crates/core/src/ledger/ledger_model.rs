//! Ledger domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};

/// A simulated trading account.
///
/// `current_cash` is written only by the execution engine and never drops
/// below zero after a successful fill.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    pub initial_cash: Decimal,
    pub current_cash: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Input model for opening a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub initial_cash: Decimal,
}

impl NewAccount {
    /// Validates the new account data.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Account name cannot be empty".to_string(),
            )));
        }
        if self.initial_cash < Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                format!("Initial cash cannot be negative: {}", self.initial_cash),
            )));
        }
        Ok(())
    }
}

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Market,
    Limit,
}

/// Order lifecycle status.
///
/// Pending transitions one-way to Filled or Rejected when the engine
/// processes the order. Cancelled is user-initiated and never produced by
/// the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Filled,
    Cancelled,
    Rejected,
}

/// A stock order. Fills in full or not at all; there are no partial fills.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub account_id: String,
    pub instrument_id: String,
    pub order_type: OrderType,
    pub side: OrderSide,
    pub quantity: i64,
    /// Present iff `order_type` is Limit.
    pub limit_price: Option<Decimal>,
    pub status: OrderStatus,
    pub filled_quantity: i64,
    pub filled_price: Option<Decimal>,
    pub order_date: NaiveDate,
    pub filled_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Input model for submitting an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub account_id: String,
    pub instrument_id: String,
    pub order_type: OrderType,
    pub side: OrderSide,
    pub quantity: i64,
    pub limit_price: Option<Decimal>,
    pub order_date: NaiveDate,
}

impl NewOrder {
    /// Validates the structural order rules: a limit price is required for
    /// limit orders, must be positive, and must be absent on market orders.
    ///
    /// The quantity check is the engine's business rule and lives there.
    pub fn validate(&self) -> Result<()> {
        match (self.order_type, self.limit_price) {
            (OrderType::Limit, None) => Err(Error::Validation(ValidationError::MissingField(
                "limitPrice".to_string(),
            ))),
            (OrderType::Limit, Some(price)) if price <= Decimal::ZERO => {
                Err(Error::Validation(ValidationError::InvalidInput(format!(
                    "Limit price must be positive: {}",
                    price
                ))))
            }
            (OrderType::Market, Some(_)) => {
                Err(Error::Validation(ValidationError::InvalidInput(
                    "Market orders cannot carry a limit price".to_string(),
                )))
            }
            _ => Ok(()),
        }
    }
}

/// An open position in an account.
///
/// Deleted from storage when quantity reaches exactly zero; a zero-quantity
/// position never lingers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub account_id: String,
    pub instrument_id: String,
    pub quantity: i64,
    /// Quantity-weighted purchase price. Recomputed on buys, untouched on
    /// sells.
    pub average_cost: Decimal,
    pub current_value: Decimal,
    pub unrealized_pnl: Decimal,
}

/// Immutable record of one executed fill.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: String,
    pub order_id: String,
    pub account_id: String,
    pub instrument_id: String,
    pub side: OrderSide,
    pub quantity: i64,
    pub price: Decimal,
    pub commission: Decimal,
    pub total_amount: Decimal,
    pub trade_date: NaiveDate,
}

/// Input model for appending a trade record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewTrade {
    pub order_id: String,
    pub account_id: String,
    pub instrument_id: String,
    pub side: OrderSide,
    pub quantity: i64,
    pub price: Decimal,
    pub commission: Decimal,
    pub trade_date: NaiveDate,
}

impl NewTrade {
    /// Cash impact of the trade: subtotal plus commission on buys, subtotal
    /// minus commission on sells.
    pub fn total_amount(&self) -> Decimal {
        let subtotal = self.price * Decimal::from(self.quantity);
        match self.side {
            OrderSide::Buy => subtotal + self.commission,
            OrderSide::Sell => subtotal - self.commission,
        }
    }
}

/// How a fill changes the account's position for the traded instrument.
#[derive(Debug, Clone, PartialEq)]
pub enum PositionChange {
    Upsert(Position),
    Delete {
        account_id: String,
        instrument_id: String,
    },
}

/// Unit of work for one fill: cash, position, trade, and order status are
/// applied by the ledger store as a single atomic mutation, or not at all.
#[derive(Debug, Clone)]
pub struct FillSettlement {
    pub account_id: String,
    pub new_cash: Decimal,
    pub position_change: PositionChange,
    pub trade: NewTrade,
    pub order_id: String,
    pub filled_quantity: i64,
    pub filled_price: Decimal,
    pub filled_date: NaiveDate,
}
