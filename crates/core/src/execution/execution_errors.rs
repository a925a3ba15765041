use rust_decimal::Decimal;
use thiserror::Error;

/// Order validation and settlement errors.
///
/// Everything here except [`LedgerOutOfSync`](Self::LedgerOutOfSync) is a
/// normal pre-trade rejection the caller surfaces to the user. A sell
/// reaching settlement without a backing position indicates ledger
/// corruption and is not recoverable.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Invalid order quantity: {0}")]
    InvalidQuantity(i64),

    #[error("No market data available for instrument '{0}'")]
    NoMarketData(String),

    #[error("Insufficient funds: need {required}, have {available}")]
    InsufficientFunds {
        required: Decimal,
        available: Decimal,
    },

    #[error("Insufficient shares: need {required}, have {available}")]
    InsufficientShares { required: i64, available: i64 },

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Ledger out of sync: {0}")]
    LedgerOutOfSync(String),
}
