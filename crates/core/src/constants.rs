//! Shared constants for the trading simulator.

/// Decimal scale for all stored money amounts (prices, commissions, cash).
pub const MONEY_SCALE: u32 = 2;

/// Trading days per year, used to scale annual drift and volatility.
pub const TRADING_DAYS_PER_YEAR: u32 = 252;
