use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AdditionalCost, CustomerInfo, HouseType, QuoteItem};

/// Derived money values for a quote. Recomputed after every mutation and
/// never edited directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteTotals {
    pub house_type_allowance: Decimal,
    pub items_subtotal: Decimal,
    pub additional_costs_total: Decimal,
    pub bespoke_uplift_total: Decimal,
    pub subtotal: Decimal,
    pub vat_amount: Decimal,
    pub total: Decimal,
}

/// The editable state of one quote at a point in time.
///
/// This is the unit the autosave coordinator compares and dispatches, and
/// what the quote store persists. Field order is fixed so the JSON form is
/// stable between two equal snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub customer: CustomerInfo,
    /// Selected house type, copied at selection time.
    pub house_type: Option<HouseType>,
    pub notes: Option<String>,
    pub internal_notes: Option<String>,
    pub valid_until: Option<NaiveDate>,
    pub items: Vec<QuoteItem>,
    pub additional_costs: Vec<AdditionalCost>,
    pub bespoke_uplift_qty: u32,
    pub totals: QuoteTotals,
}

impl QuoteSnapshot {
    /// Stable JSON form used to detect unchanged snapshots.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
