use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::ItemId;
use super::product::{PriceUnit, Product};

/// A line item on a quote.
///
/// `base_price` is captured when the item is added and never changes.
/// `unit_price` is the effective price: zero while the item is in
/// allowance, otherwise equal to `base_price`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteItem {
    pub id: ItemId,
    /// Source catalog product, absent for manually entered items.
    pub product_id: Option<String>,
    pub name: String,
    pub sku: Option<String>,
    pub quantity: Decimal,
    pub price_unit: PriceUnit,
    pub unit_price: Decimal,
    pub base_price: Decimal,
    pub line_total: Decimal,
    pub is_in_allowance: bool,
    pub notes: Option<String>,
    pub sort_order: u32,
}

impl QuoteItem {
    /// Effective unit price for the given allowance state.
    pub fn effective_price(
        base_price: Decimal,
        is_in_allowance: bool,
    ) -> Decimal {
        if is_in_allowance { Decimal::ZERO } else { base_price }
    }

    /// Re-derives `unit_price` from `base_price` and refreshes `line_total`.
    pub(crate) fn apply_allowance(
        &mut self,
        is_in_allowance: bool,
    ) {
        self.is_in_allowance = is_in_allowance;
        self.unit_price = Self::effective_price(self.base_price, is_in_allowance);
        self.refresh_line_total();
    }

    /// `line_total = unit_price * quantity`, kept at full precision.
    pub(crate) fn refresh_line_total(&mut self) {
        self.line_total = self.unit_price * self.quantity;
    }

    /// True when `product_id` names this item's catalog product. Manual items
    /// have no product identity and never match.
    pub fn same_product(
        &self,
        product_id: Option<&str>,
    ) -> bool {
        matches!((self.product_id.as_deref(), product_id), (Some(a), Some(b)) if a == b)
    }
}

/// The data needed to create a new [`QuoteItem`].
///
/// Built from a catalog [`Product`] or entered manually. Name, SKU and
/// price are copied at add time so later catalog edits do not alter the
/// quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemCandidate {
    pub product_id: Option<String>,
    pub name: String,
    pub sku: Option<String>,
    pub base_price: Decimal,
    pub price_unit: PriceUnit,
    pub notes: Option<String>,
}

impl ItemCandidate {
    pub fn manual(
        name: impl Into<String>,
        base_price: Decimal,
        price_unit: PriceUnit,
    ) -> Self {
        Self {
            product_id: None,
            name: name.into(),
            sku: None,
            base_price,
            price_unit,
            notes: None,
        }
    }

    pub fn with_notes(
        mut self,
        notes: impl Into<String>,
    ) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

impl From<&Product> for ItemCandidate {
    fn from(product: &Product) -> Self {
        Self {
            product_id: Some(product.product_id.clone()),
            name: product.name.clone(),
            sku: Some(product.sku.clone()),
            base_price: product.base_price,
            price_unit: product.price_unit,
            notes: None,
        }
    }
}
