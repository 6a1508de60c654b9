//! Line item operations.
//!
//! These work on a bare item list so they can be tested without a full
//! quote. [`crate::quote::Quote`] calls them after its lock check and
//! recomputes totals afterwards.

use rust_decimal::Decimal;

use crate::models::{ItemCandidate, ItemId, QuoteItem};
use crate::quote::QuoteError;

fn validate_quantity(quantity: Decimal) -> Result<(), QuoteError> {
    if quantity <= Decimal::ZERO {
        return Err(QuoteError::InvalidQuantity(quantity));
    }
    Ok(())
}

fn find_mut(
    items: &mut [QuoteItem],
    item_id: ItemId,
) -> Result<&mut QuoteItem, QuoteError> {
    items
        .iter_mut()
        .find(|item| item.id == item_id)
        .ok_or(QuoteError::ItemNotFound(item_id))
}

/// Next sort position: one past the highest in use.
fn next_sort_order(items: &[QuoteItem]) -> u32 {
    items
        .iter()
        .map(|item| item.sort_order + 1)
        .max()
        .unwrap_or(0)
}

/// Adds `quantity` of `candidate` to `items`.
///
/// An existing row for the same product in the same allowance state absorbs
/// the quantity; anything else becomes a new row at the end of the list.
/// Returns the id of the row that was created or grown.
pub fn add_item(
    items: &mut Vec<QuoteItem>,
    candidate: ItemCandidate,
    quantity: Decimal,
    is_in_allowance: bool,
) -> Result<ItemId, QuoteError> {
    validate_quantity(quantity)?;

    if let Some(existing) = items.iter_mut().find(|item| {
        item.same_product(candidate.product_id.as_deref()) && item.is_in_allowance == is_in_allowance
    }) {
        existing.quantity += quantity;
        existing.refresh_line_total();
        return Ok(existing.id);
    }

    let unit_price = QuoteItem::effective_price(candidate.base_price, is_in_allowance);
    let item = QuoteItem {
        id: ItemId::new(),
        product_id: candidate.product_id,
        name: candidate.name,
        sku: candidate.sku,
        quantity,
        price_unit: candidate.price_unit,
        unit_price,
        base_price: candidate.base_price,
        line_total: unit_price * quantity,
        is_in_allowance,
        notes: candidate.notes,
        sort_order: next_sort_order(items),
    };
    let id = item.id;
    items.push(item);
    Ok(id)
}

/// Sets an item's quantity, keeping its current unit price.
pub fn update_quantity(
    items: &mut [QuoteItem],
    item_id: ItemId,
    quantity: Decimal,
) -> Result<(), QuoteError> {
    validate_quantity(quantity)?;
    let item = find_mut(items, item_id)?;
    item.quantity = quantity;
    item.refresh_line_total();
    Ok(())
}

/// Moves an item into or out of allowance.
///
/// The unit price is always re-derived from `base_price`, so toggling any
/// number of times never loses the catalog price.
pub fn set_allowance(
    items: &mut [QuoteItem],
    item_id: ItemId,
    is_in_allowance: bool,
) -> Result<(), QuoteError> {
    find_mut(items, item_id)?.apply_allowance(is_in_allowance);
    Ok(())
}

pub fn set_notes(
    items: &mut [QuoteItem],
    item_id: ItemId,
    notes: Option<String>,
) -> Result<(), QuoteError> {
    find_mut(items, item_id)?.notes = notes;
    Ok(())
}

/// Removes an item. Surviving sort positions are left as they are.
pub fn remove_item(
    items: &mut Vec<QuoteItem>,
    item_id: ItemId,
) -> Result<QuoteItem, QuoteError> {
    let index = items
        .iter()
        .position(|item| item.id == item_id)
        .ok_or(QuoteError::ItemNotFound(item_id))?;
    Ok(items.remove(index))
}
