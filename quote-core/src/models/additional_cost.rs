use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::CostId;

/// A free-form cost added to a quote (delivery, skip hire, etc.).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalCost {
    pub id: CostId,
    pub description: String,
    pub amount: Decimal,
    /// Only taxable costs contribute to the VAT-bearing subtotal.
    pub taxable: bool,
    pub sort_order: u32,
}

/// Partial update for an [`AdditionalCost`]. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CostUpdate {
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub taxable: Option<bool>,
}
