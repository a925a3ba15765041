//! Shared helpers.

mod decimal_utils;

pub use decimal_utils::round_money;
