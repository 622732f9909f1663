//! Rounding helpers shared by the pricing code.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to the nearest whole unit, halves away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use quote_core::calculations::common::round_to_unit;
///
/// assert_eq!(round_to_unit(Decimal::new(19504, 1)), Decimal::from(1950));
/// assert_eq!(round_to_unit(Decimal::new(19505, 1)), Decimal::from(1951));
/// assert_eq!(round_to_unit(Decimal::new(-25, 1)), Decimal::from(-3));
/// ```
pub fn round_to_unit(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
