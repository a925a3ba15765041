use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::MONEY_SCALE;

/// Rounds a money amount to the stored scale using round-half-up.
///
/// Every price, commission, and cash amount the engine or generator produces
/// passes through this before it is persisted or compared.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}
