//! VAT-aware totals for a set of priced lines and additional costs.
//!
//! The engine knows nothing about allowances: callers pass the effective
//! unit price of each line (already zeroed for in-allowance items) and the
//! engine only sums `unit_price * quantity`.
//!
//! | Step | Value |
//! |------|-------|
//! | 1    | items subtotal = Σ unit price × quantity |
//! | 2    | taxable total = items subtotal + Σ taxable costs |
//! | 3    | VAT = taxable total × rate / 100, rounded |
//! | 4    | subtotal = taxable total + Σ non-taxable costs, rounded |
//! | 5    | total = taxable total + VAT + Σ non-taxable costs, rounded |
//!
//! Negative prices and amounts are summed as given. Rejecting them is the
//! caller's job; credits and discounts are modelled as negative lines.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use quote_core::calculations::{calculate_totals, CostLine, PricedLine};
//!
//! let lines = [PricedLine { quantity: dec!(2), unit_price: dec!(150.00) }];
//! let costs = [CostLine { amount: dec!(45.00), taxable: true }];
//!
//! let totals = calculate_totals(&lines, &costs, dec!(20)).unwrap();
//!
//! assert_eq!(totals.vat_amount, dec!(69.00));
//! assert_eq!(totals.total, dec!(414.00));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::round_money;
use crate::models::{AdditionalCost, QuoteItem};

/// Errors raised by [`calculate_totals`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// VAT rates are percentages and must be zero or positive.
    #[error("VAT rate must be non-negative, got {0}")]
    NegativeVatRate(Decimal),
}

/// A quantity at an effective unit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedLine {
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

impl PricedLine {
    pub fn amount(&self) -> Decimal {
        self.unit_price * self.quantity
    }
}

impl From<&QuoteItem> for PricedLine {
    fn from(item: &QuoteItem) -> Self {
        Self {
            quantity: item.quantity,
            unit_price: item.unit_price,
        }
    }
}

/// A flat amount that may or may not attract VAT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostLine {
    pub amount: Decimal,
    pub taxable: bool,
}

impl From<&AdditionalCost> for CostLine {
    fn from(cost: &AdditionalCost) -> Self {
        Self {
            amount: cost.amount,
            taxable: cost.taxable,
        }
    }
}

/// Rounded outputs of [`calculate_totals`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTotals {
    pub subtotal: Decimal,
    pub vat_amount: Decimal,
    pub total: Decimal,
}

/// Computes subtotal, VAT and total.
///
/// Pure and cheap; safe to call after every keystroke.
///
/// # Errors
///
/// Returns [`PricingError::NegativeVatRate`] if `vat_rate_percent < 0`.
pub fn calculate_totals(
    lines: &[PricedLine],
    costs: &[CostLine],
    vat_rate_percent: Decimal,
) -> Result<PricingTotals, PricingError> {
    if vat_rate_percent < Decimal::ZERO {
        return Err(PricingError::NegativeVatRate(vat_rate_percent));
    }

    let items_subtotal: Decimal = lines.iter().map(PricedLine::amount).sum();

    let (taxable, non_taxable): (Vec<&CostLine>, Vec<&CostLine>) =
        costs.iter().partition(|cost| cost.taxable);
    let taxable_costs: Decimal = taxable.iter().map(|cost| cost.amount).sum();
    let non_taxable_costs: Decimal = non_taxable.iter().map(|cost| cost.amount).sum();

    let taxable_total = items_subtotal + taxable_costs;
    let vat_amount = round_money(taxable_total * vat_rate_percent / Decimal::ONE_HUNDRED);

    Ok(PricingTotals {
        subtotal: round_money(taxable_total + non_taxable_costs),
        vat_amount,
        total: round_money(taxable_total + vat_amount + non_taxable_costs),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn line(
        quantity: Decimal,
        unit_price: Decimal,
    ) -> PricedLine {
        PricedLine {
            quantity,
            unit_price,
        }
    }

    fn cost(
        amount: Decimal,
        taxable: bool,
    ) -> CostLine {
        CostLine { amount, taxable }
    }

    #[test]
    fn taxable_cost_attracts_vat() {
        let totals =
            calculate_totals(&[line(dec!(2), dec!(150.00))], &[cost(dec!(45.00), true)], dec!(20))
                .unwrap();

        assert_eq!(
            totals,
            PricingTotals {
                subtotal: dec!(345.00),
                vat_amount: dec!(69.00),
                total: dec!(414.00),
            }
        );
    }

    #[test]
    fn non_taxable_cost_is_added_after_vat() {
        let totals = calculate_totals(
            &[line(dec!(1), dec!(100.00))],
            &[cost(dec!(50.00), false)],
            dec!(20),
        )
        .unwrap();

        assert_eq!(totals.vat_amount, dec!(20.00));
        assert_eq!(totals.subtotal, dec!(150.00));
        assert_eq!(totals.total, dec!(170.00));
    }

    #[test]
    fn empty_items_still_counts_costs() {
        let totals = calculate_totals(
            &[],
            &[cost(dec!(10.00), true), cost(dec!(5.00), false)],
            dec!(20),
        )
        .unwrap();

        assert_eq!(totals.subtotal, dec!(15.00));
        assert_eq!(totals.vat_amount, dec!(2.00));
        assert_eq!(totals.total, dec!(17.00));
    }

    #[test]
    fn everything_empty_is_zero() {
        let totals = calculate_totals(&[], &[], dec!(20)).unwrap();

        assert_eq!(totals, PricingTotals::default());
    }

    #[test]
    fn zero_rate_yields_no_vat() {
        let totals = calculate_totals(&[line(dec!(3), dec!(33.33))], &[], dec!(0)).unwrap();

        assert_eq!(totals.vat_amount, dec!(0.00));
        assert_eq!(totals.total, dec!(99.99));
    }

    #[test]
    fn fractional_quantities_are_priced_exactly() {
        let totals = calculate_totals(&[line(dec!(2.35), dec!(42.10))], &[], dec!(0)).unwrap();

        // 2.35 * 42.10 = 98.935
        assert_eq!(totals.subtotal, dec!(98.94));
    }

    #[test]
    fn vat_is_rounded_half_away_from_zero() {
        // 0.025 * 20% = 0.005 -> 0.01
        let totals = calculate_totals(&[line(dec!(1), dec!(0.025))], &[], dec!(20)).unwrap();

        assert_eq!(totals.vat_amount, dec!(0.01));
    }

    #[test]
    fn negative_amounts_are_summed_as_given() {
        let totals = calculate_totals(
            &[line(dec!(1), dec!(100.00)), line(dec!(1), dec!(-20.00))],
            &[cost(dec!(-5.00), false)],
            dec!(0),
        )
        .unwrap();

        assert_eq!(totals.total, dec!(75.00));
    }

    #[test]
    fn negative_vat_rate_is_rejected() {
        let result = calculate_totals(&[], &[], dec!(-1));

        assert_eq!(result, Err(PricingError::NegativeVatRate(dec!(-1))));
    }
}
