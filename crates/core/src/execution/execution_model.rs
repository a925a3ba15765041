//! Execution outcome models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::{Order, OrderSide};

/// Result of processing one pending order against a trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "camelCase")]
pub enum ExecutionOutcome {
    /// The order filled; the ledger was updated atomically.
    Filled(Fill),
    /// The order did not fill and stays pending. No state was touched.
    Pending(PendingReason),
    /// The order was rejected at settlement; its status flipped to Rejected
    /// but cash, positions, and trades are untouched.
    Rejected(RejectReason),
}

/// Fill confirmation emitted to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fill {
    pub order_id: String,
    pub side: OrderSide,
    pub quantity: i64,
    pub price: Decimal,
    pub commission: Decimal,
    pub total_amount: Decimal,
}

/// Why a pending order did not fill today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PendingReason {
    /// No bar for this date (weekend or holiday); retry on a later date.
    NonTradingDay,
    /// The day's range never reached the limit price.
    LimitNotReached,
}

/// Why an order was rejected at settlement time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    /// The actual fill price would have driven cash below zero, even though
    /// the pre-trade estimate passed.
    NegativeCash,
}

/// Per-order outcomes of one batch run, with summary counts.
#[derive(Debug, Default)]
pub struct ExecutionReport {
    pub outcomes: Vec<(Order, ExecutionOutcome)>,
    pub filled: usize,
    pub rejected: usize,
    pub still_pending: usize,
}

impl ExecutionReport {
    pub fn record(&mut self, order: Order, outcome: ExecutionOutcome) {
        match outcome {
            ExecutionOutcome::Filled(_) => self.filled += 1,
            ExecutionOutcome::Rejected(_) => self.rejected += 1,
            ExecutionOutcome::Pending(_) => self.still_pending += 1,
        }
        self.outcomes.push((order, outcome));
    }
}
