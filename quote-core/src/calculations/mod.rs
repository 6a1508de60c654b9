//! Money arithmetic for quotes.
//!
//! `common` holds rounding helpers; `pricing` computes VAT-aware totals.

pub mod common;
pub mod pricing;

pub use common::{round, round_money};
pub use pricing::{CostLine, PricedLine, PricingError, PricingTotals, calculate_totals};
