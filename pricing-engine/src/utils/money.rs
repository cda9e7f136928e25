//! Money calculation utilities using rust_decimal for precision
//!
//! All engine arithmetic is done on `Decimal`.

use crate::core::MidpointRounding;
use rust_decimal::Decimal;

/// Round a monetary value with the configured decimals and midpoint mode
#[inline]
pub fn round_money(value: Decimal, decimals: u32, mode: MidpointRounding) -> Decimal {
    value.round_dp_with_strategy(decimals, mode.strategy())
}

/// `value * percent / 100`
#[inline]
pub fn percent_of(value: Decimal, percent: Decimal) -> Decimal {
    value * percent / Decimal::ONE_HUNDRED
}
