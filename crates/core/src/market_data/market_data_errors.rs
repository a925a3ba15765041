use thiserror::Error;

/// Errors specific to market data operations.
#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("Invalid price bar: {0}")]
    InvalidBar(String),

    #[error("Invalid generator parameters: {0}")]
    InvalidParameters(String),

    #[error("Numeric conversion failed: {0}")]
    Conversion(String),
}
