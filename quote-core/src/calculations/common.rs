//! Common money helpers shared by the pricing engine and the quote aggregate.
//!
//! Rounding is applied only to reported aggregates (subtotal, VAT, total).
//! Line totals and component sums are carried at full precision.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places used for every reported monetary amount.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Rounds `value` to `decimal_places` using half-away-from-zero rounding.
///
/// Values exactly at the midpoint move away from zero, so `0.125` becomes
/// `0.13` and `-0.125` becomes `-0.13`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use quote_core::calculations::common::round;
///
/// assert_eq!(round(dec!(1240.804), 2), dec!(1240.80));
/// assert_eq!(round(dec!(1240.805), 2), dec!(1240.81));
/// assert_eq!(round(dec!(-2.5), 0), dec!(-3));
/// ```
pub fn round(
    value: Decimal,
    decimal_places: u32,
) -> Decimal {
    value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a monetary amount to two decimal places.
///
/// Shorthand for [`round`] with [`MONEY_DECIMAL_PLACES`].
///
/// ```
/// use rust_decimal_macros::dec;
/// use quote_core::calculations::common::round_money;
///
/// assert_eq!(round_money(dec!(69.004)), dec!(69.00));
/// assert_eq!(round_money(dec!(69.005)), dec!(69.01));
/// ```
pub fn round_money(value: Decimal) -> Decimal {
    round(value, MONEY_DECIMAL_PLACES)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round tests
    // =========================================================================

    #[test]
    fn round_rounds_down_below_midpoint() {
        let result = round(dec!(123.454), 2);

        assert_eq!(result, dec!(123.45));
    }

    #[test]
    fn round_rounds_up_at_midpoint() {
        let result = round(dec!(123.455), 2);

        assert_eq!(result, dec!(123.46));
    }

    #[test]
    fn round_moves_negative_midpoint_away_from_zero() {
        let result = round(dec!(-123.455), 2);

        assert_eq!(result, dec!(-123.46));
    }

    #[test]
    fn round_honours_requested_places() {
        assert_eq!(round(dec!(2.5), 0), dec!(3));
        assert_eq!(round(dec!(1.23456), 4), dec!(1.2346));
    }

    #[test]
    fn round_preserves_already_rounded_values() {
        let result = round(dec!(940.80), 2);

        assert_eq!(result, dec!(940.80));
    }

    #[test]
    fn round_handles_zero() {
        let result = round(dec!(0.00), 2);

        assert_eq!(result, dec!(0.00));
    }

    // =========================================================================
    // round_money tests
    // =========================================================================

    #[test]
    fn round_money_uses_two_places() {
        assert_eq!(round_money(dec!(0.001)), dec!(0.00));
        assert_eq!(round_money(dec!(999999.999)), dec!(1000000.00));
    }

    #[test]
    fn round_money_is_stable_under_repeated_application() {
        let once = round_money(dec!(414.0049));
        let twice = round_money(once);

        assert_eq!(once, dec!(414.00));
        assert_eq!(once, twice);
    }
}
