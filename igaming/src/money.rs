//! Money representation helpers.
//!
//! Amounts are [`Decimal`] values persisted as `NUMERIC(20, 2)`.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits carried by every stored amount.
pub const MONEY_SCALE: u32 = 2;

/// Largest amount a `NUMERIC(20, 2)` column holds: 999,999,999,999,999,999.99
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_661_992_959, 1_808_227_885, 5, false, MONEY_SCALE);

/// Returns true if `amount` is positive and storable without rounding or overflow.
pub fn is_valid_amount(amount: Decimal) -> bool {
    amount > Decimal::ZERO && amount <= MAX_AMOUNT && has_money_scale(amount)
}

/// Returns true if `amount` fits the stored precision without rounding.
pub fn has_money_scale(amount: Decimal) -> bool {
    amount.normalize().scale() <= MONEY_SCALE
}

/// Truncates toward zero to the stored precision.
///
/// Used for prize computation so that a share of the pool never rounds up.
pub fn truncate(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::ToZero)
}
