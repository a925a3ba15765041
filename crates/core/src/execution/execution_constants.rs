use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Commission rate applied to the trade subtotal (0.1%).
pub const COMMISSION_RATE: Decimal = dec!(0.001);

/// Commission floor per trade.
pub const MIN_COMMISSION: Decimal = dec!(1.00);

/// Slippage rate applied to market-order fills (0.05%), always against the
/// trader.
pub const SLIPPAGE_RATE: Decimal = dec!(0.0005);
