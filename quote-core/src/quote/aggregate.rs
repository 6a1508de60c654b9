//! The quote being edited.
//!
//! [`Quote`] owns every editable field and every mutation. Each mutation
//! checks the lock, applies the change, and recomputes [`QuoteTotals`]
//! before returning, so totals are never stale when observed.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::calculations::{CostLine, PricedLine, calculate_totals, round_money};
use crate::config::{ConfigError, PricingConfig, VatMode};
use crate::models::{
    AdditionalCost, CostId, CostUpdate, CustomerInfo, HouseType, ItemCandidate, ItemId, QuoteId,
    QuoteItem, QuoteSnapshot, QuoteStatus, QuoteTotals,
};
use crate::quote::QuoteError;
use crate::quote::items;
use crate::quote::lifecycle::{self, QuoteEvent, TransitionContext, TransitionError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    id: Option<QuoteId>,
    status: QuoteStatus,
    customer: CustomerInfo,
    house_type: Option<HouseType>,
    notes: Option<String>,
    internal_notes: Option<String>,
    valid_until: Option<NaiveDate>,
    items: Vec<QuoteItem>,
    additional_costs: Vec<AdditionalCost>,
    bespoke_uplift_qty: u32,
    pricing: PricingConfig,
    totals: QuoteTotals,
}

impl Quote {
    /// Creates an unsaved, empty draft.
    pub fn new(pricing: PricingConfig) -> Result<Self, ConfigError> {
        pricing.validate()?;
        Ok(Self {
            id: None,
            status: QuoteStatus::Draft,
            customer: CustomerInfo::default(),
            house_type: None,
            notes: None,
            internal_notes: None,
            valid_until: None,
            items: Vec::new(),
            additional_costs: Vec::new(),
            bespoke_uplift_qty: 0,
            pricing,
            totals: QuoteTotals::default(),
        })
    }

    /// Rebuilds a quote from stored state.
    ///
    /// Stored totals and each item's `unit_price`/`line_total` are ignored
    /// and derived again from `base_price`, the allowance flag and quantity.
    ///
    /// # Errors
    ///
    /// [`QuoteError::InvalidQuantity`] if a stored item has a non-positive
    /// quantity, [`QuoteError::Config`] if `pricing` is invalid.
    pub fn from_snapshot(
        id: Option<QuoteId>,
        status: QuoteStatus,
        mut snapshot: QuoteSnapshot,
        pricing: PricingConfig,
    ) -> Result<Self, QuoteError> {
        for item in &mut snapshot.items {
            if item.quantity <= Decimal::ZERO {
                return Err(QuoteError::InvalidQuantity(item.quantity));
            }
            item.apply_allowance(item.is_in_allowance);
        }

        let mut quote = Self::new(pricing)?;
        quote.id = id;
        quote.status = status;
        quote.customer = snapshot.customer;
        quote.house_type = snapshot.house_type;
        quote.notes = snapshot.notes;
        quote.internal_notes = snapshot.internal_notes;
        quote.valid_until = snapshot.valid_until;
        quote.items = snapshot.items;
        quote.additional_costs = snapshot.additional_costs;
        quote.bespoke_uplift_qty = snapshot.bespoke_uplift_qty;
        quote.recompute();
        Ok(quote)
    }

    // ── accessors ───────────────────────────────────────────────────────

    pub fn id(&self) -> Option<QuoteId> {
        self.id
    }

    pub fn status(&self) -> QuoteStatus {
        self.status
    }

    pub fn customer(&self) -> &CustomerInfo {
        &self.customer
    }

    pub fn house_type(&self) -> Option<&HouseType> {
        self.house_type.as_ref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn internal_notes(&self) -> Option<&str> {
        self.internal_notes.as_deref()
    }

    pub fn valid_until(&self) -> Option<NaiveDate> {
        self.valid_until
    }

    pub fn items(&self) -> &[QuoteItem] {
        &self.items
    }

    pub fn item(
        &self,
        item_id: ItemId,
    ) -> Option<&QuoteItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub fn additional_costs(&self) -> &[AdditionalCost] {
        &self.additional_costs
    }

    pub fn bespoke_uplift_qty(&self) -> u32 {
        self.bespoke_uplift_qty
    }

    pub fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }

    pub fn totals(&self) -> &QuoteTotals {
        &self.totals
    }

    /// The editable state in the form the store persists.
    pub fn snapshot(&self) -> QuoteSnapshot {
        QuoteSnapshot {
            customer: self.customer.clone(),
            house_type: self.house_type.clone(),
            notes: self.notes.clone(),
            internal_notes: self.internal_notes.clone(),
            valid_until: self.valid_until,
            items: self.items.clone(),
            additional_costs: self.additional_costs.clone(),
            bespoke_uplift_qty: self.bespoke_uplift_qty,
            totals: self.totals.clone(),
        }
    }

    /// Records the identity assigned by the store on first save.
    pub fn assign_id(
        &mut self,
        id: QuoteId,
    ) {
        self.id = Some(id);
    }

    // ── items ───────────────────────────────────────────────────────────

    pub fn add_item(
        &mut self,
        candidate: ItemCandidate,
        quantity: Decimal,
        is_in_allowance: bool,
    ) -> Result<ItemId, QuoteError> {
        self.ensure_editable()?;
        let id = items::add_item(&mut self.items, candidate, quantity, is_in_allowance)?;
        debug!(item = %id, %quantity, is_in_allowance, "item added");
        self.recompute();
        Ok(id)
    }

    pub fn update_quantity(
        &mut self,
        item_id: ItemId,
        quantity: Decimal,
    ) -> Result<(), QuoteError> {
        self.ensure_editable()?;
        items::update_quantity(&mut self.items, item_id, quantity)?;
        debug!(item = %item_id, %quantity, "item quantity updated");
        self.recompute();
        Ok(())
    }

    pub fn set_allowance(
        &mut self,
        item_id: ItemId,
        is_in_allowance: bool,
    ) -> Result<(), QuoteError> {
        self.ensure_editable()?;
        items::set_allowance(&mut self.items, item_id, is_in_allowance)?;
        debug!(item = %item_id, is_in_allowance, "item allowance changed");
        self.recompute();
        Ok(())
    }

    pub fn set_item_notes(
        &mut self,
        item_id: ItemId,
        notes: Option<String>,
    ) -> Result<(), QuoteError> {
        self.ensure_editable()?;
        items::set_notes(&mut self.items, item_id, notes)?;
        self.recompute();
        Ok(())
    }

    pub fn remove_item(
        &mut self,
        item_id: ItemId,
    ) -> Result<QuoteItem, QuoteError> {
        self.ensure_editable()?;
        let removed = items::remove_item(&mut self.items, item_id)?;
        debug!(item = %item_id, "item removed");
        self.recompute();
        Ok(removed)
    }

    // ── additional costs ────────────────────────────────────────────────

    pub fn add_cost(
        &mut self,
        description: impl Into<String>,
        amount: Decimal,
        taxable: bool,
    ) -> Result<CostId, QuoteError> {
        self.ensure_editable()?;
        let sort_order = self
            .additional_costs
            .iter()
            .map(|cost| cost.sort_order + 1)
            .max()
            .unwrap_or(0);
        let cost = AdditionalCost {
            id: CostId::new(),
            description: description.into(),
            amount,
            taxable,
            sort_order,
        };
        let id = cost.id;
        self.additional_costs.push(cost);
        debug!(cost = %id, %amount, taxable, "additional cost added");
        self.recompute();
        Ok(id)
    }

    pub fn update_cost(
        &mut self,
        cost_id: CostId,
        update: CostUpdate,
    ) -> Result<(), QuoteError> {
        self.ensure_editable()?;
        let cost = self
            .additional_costs
            .iter_mut()
            .find(|cost| cost.id == cost_id)
            .ok_or(QuoteError::CostNotFound(cost_id))?;
        if let Some(description) = update.description {
            cost.description = description;
        }
        if let Some(amount) = update.amount {
            cost.amount = amount;
        }
        if let Some(taxable) = update.taxable {
            cost.taxable = taxable;
        }
        debug!(cost = %cost_id, "additional cost updated");
        self.recompute();
        Ok(())
    }

    pub fn remove_cost(
        &mut self,
        cost_id: CostId,
    ) -> Result<AdditionalCost, QuoteError> {
        self.ensure_editable()?;
        let index = self
            .additional_costs
            .iter()
            .position(|cost| cost.id == cost_id)
            .ok_or(QuoteError::CostNotFound(cost_id))?;
        let removed = self.additional_costs.remove(index);
        debug!(cost = %cost_id, "additional cost removed");
        self.recompute();
        Ok(removed)
    }

    // ── scalar fields ───────────────────────────────────────────────────

    pub fn set_bespoke_uplift(
        &mut self,
        quantity: u32,
    ) -> Result<(), QuoteError> {
        self.ensure_editable()?;
        self.bespoke_uplift_qty = quantity;
        debug!(quantity, "bespoke uplift changed");
        self.recompute();
        Ok(())
    }

    /// Replaces the house type. `None` clears it and the allowance drops to
    /// zero.
    pub fn select_house_type(
        &mut self,
        house_type: Option<HouseType>,
    ) -> Result<(), QuoteError> {
        self.ensure_editable()?;
        debug!(
            house_type = house_type.as_ref().map(|h| h.house_type_id.as_str()),
            "house type selected"
        );
        self.house_type = house_type;
        self.recompute();
        Ok(())
    }

    pub fn set_customer(
        &mut self,
        customer: CustomerInfo,
    ) -> Result<(), QuoteError> {
        self.ensure_editable()?;
        self.customer = customer;
        self.recompute();
        Ok(())
    }

    pub fn set_notes(
        &mut self,
        notes: Option<String>,
    ) -> Result<(), QuoteError> {
        self.ensure_editable()?;
        self.notes = notes;
        self.recompute();
        Ok(())
    }

    pub fn set_internal_notes(
        &mut self,
        notes: Option<String>,
    ) -> Result<(), QuoteError> {
        self.ensure_editable()?;
        self.internal_notes = notes;
        self.recompute();
        Ok(())
    }

    pub fn set_valid_until(
        &mut self,
        valid_until: Option<NaiveDate>,
    ) -> Result<(), QuoteError> {
        self.ensure_editable()?;
        self.valid_until = valid_until;
        self.recompute();
        Ok(())
    }

    // ── lifecycle ───────────────────────────────────────────────────────

    fn transition_context(&self) -> TransitionContext {
        TransitionContext {
            item_count: self.items.len(),
            has_customer_email: self.customer.has_email(),
        }
    }

    /// Checks whether `event` would be accepted without applying it.
    pub fn can_apply(
        &self,
        event: QuoteEvent,
    ) -> Result<QuoteStatus, TransitionError> {
        lifecycle::transition(self.status, event, &self.transition_context())
    }

    /// Applies a lifecycle event and returns the new status.
    pub fn apply(
        &mut self,
        event: QuoteEvent,
    ) -> Result<QuoteStatus, TransitionError> {
        let from = self.status;
        let to = self.can_apply(event)?;
        self.status = to;
        info!(quote = ?self.id, %from, %to, %event, "quote status changed");
        Ok(to)
    }

    /// Fails with [`QuoteError::QuoteLocked`] unless the quote is a draft.
    pub fn ensure_editable(&self) -> Result<(), QuoteError> {
        if self.status.permits_editing() {
            Ok(())
        } else {
            warn!(quote = ?self.id, status = %self.status, "edit rejected on locked quote");
            Err(QuoteError::QuoteLocked(self.status))
        }
    }

    // ── totals ──────────────────────────────────────────────────────────

    /// Recomputes every derived value from the current fields.
    fn recompute(&mut self) {
        let house_type_allowance = self
            .house_type
            .as_ref()
            .map_or(Decimal::ZERO, |house_type| house_type.allowance_amount);

        // In-allowance items are already priced at zero; the filter keeps
        // them out even if a stored item disagrees.
        let chargeable: Vec<&QuoteItem> = self
            .items
            .iter()
            .filter(|item| !item.is_in_allowance)
            .collect();
        let items_subtotal: Decimal = chargeable
            .iter()
            .map(|item| item.unit_price * item.quantity)
            .sum();
        let additional_costs_total: Decimal =
            self.additional_costs.iter().map(|cost| cost.amount).sum();
        let bespoke_uplift_total =
            Decimal::from(self.bespoke_uplift_qty) * self.pricing.bespoke_unit_price;

        let gross =
            house_type_allowance + items_subtotal + additional_costs_total + bespoke_uplift_total;
        let inclusive = (round_money(gross), Decimal::ZERO, round_money(gross));

        let (subtotal, vat_amount, total) = match self.pricing.vat_mode {
            VatMode::Inclusive => inclusive,
            VatMode::Exclusive { rate_percent } => {
                let mut lines: Vec<PricedLine> =
                    chargeable.iter().map(|item| PricedLine::from(*item)).collect();
                lines.push(PricedLine {
                    quantity: Decimal::ONE,
                    unit_price: house_type_allowance,
                });
                lines.push(PricedLine {
                    quantity: Decimal::from(self.bespoke_uplift_qty),
                    unit_price: self.pricing.bespoke_unit_price,
                });
                let costs: Vec<CostLine> =
                    self.additional_costs.iter().map(CostLine::from).collect();

                match calculate_totals(&lines, &costs, rate_percent) {
                    Ok(totals) => (totals.subtotal, totals.vat_amount, totals.total),
                    Err(error) => {
                        warn!(%error, "VAT calculation rejected, reporting VAT-inclusive totals");
                        inclusive
                    }
                }
            }
        };

        self.totals = QuoteTotals {
            house_type_allowance,
            items_subtotal,
            additional_costs_total,
            bespoke_uplift_total,
            subtotal,
            vat_amount,
            total,
        };
        debug!(quote = ?self.id, %subtotal, %vat_amount, %total, "totals recomputed");
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{PriceUnit, Product};

    fn worktop() -> Product {
        Product {
            product_id: "p-worktop".to_string(),
            name: "Oak worktop".to_string(),
            sku: "WT-OAK".to_string(),
            base_price: dec!(150.00),
            price_unit: PriceUnit::Unit,
            category: "Worktops".to_string(),
        }
    }

    fn standard_house() -> HouseType {
        HouseType {
            house_type_id: "ht-3bed".to_string(),
            name: "Three bed semi".to_string(),
            allowance_amount: dec!(940.80),
        }
    }

    fn draft() -> Quote {
        Quote::new(PricingConfig::default()).unwrap()
    }

    fn exclusive(rate: Decimal) -> PricingConfig {
        PricingConfig {
            vat_mode: VatMode::Exclusive { rate_percent: rate },
            ..PricingConfig::default()
        }
    }

    /// Total closes over its components after every mutation.
    fn assert_closed(quote: &Quote) {
        let t = quote.totals();
        let sum = t.house_type_allowance
            + t.items_subtotal
            + t.additional_costs_total
            + t.bespoke_uplift_total;
        assert!(
            (t.subtotal - sum).abs() <= dec!(0.01),
            "subtotal {} does not close over components {}",
            t.subtotal,
            sum
        );
        assert_eq!(t.total, t.subtotal + t.vat_amount);
    }

    // =========================================================================
    // pricing scenarios
    // =========================================================================

    #[test]
    fn new_quote_is_empty_draft() {
        let quote = draft();

        assert_eq!(quote.status(), QuoteStatus::Draft);
        assert_eq!(quote.id(), None);
        assert_eq!(quote.totals(), &QuoteTotals::default());
    }

    #[test]
    fn product_and_house_allowance_total() {
        let mut quote = draft();
        quote.select_house_type(Some(standard_house())).unwrap();

        let id = quote.add_item((&worktop()).into(), dec!(2), false).unwrap();

        assert_eq!(quote.item(id).unwrap().line_total, dec!(300.00));
        assert_eq!(quote.totals().total, dec!(1240.80));
        assert_closed(&quote);
    }

    #[test]
    fn allowance_toggle_moves_total_and_back() {
        let mut quote = draft();
        quote.select_house_type(Some(standard_house())).unwrap();
        let id = quote.add_item((&worktop()).into(), dec!(2), false).unwrap();

        quote.set_allowance(id, true).unwrap();
        assert_eq!(quote.totals().total, dec!(940.80));
        assert_eq!(quote.item(id).unwrap().base_price, dec!(150.00));

        quote.set_allowance(id, false).unwrap();
        assert_eq!(quote.totals().total, dec!(1240.80));
        assert_closed(&quote);
    }

    #[test]
    fn bespoke_uplift_contributes_per_unit() {
        let mut quote = draft();

        quote.set_bespoke_uplift(3).unwrap();

        assert_eq!(quote.totals().bespoke_uplift_total, dec!(90.00));
        assert_eq!(quote.totals().subtotal, dec!(90.00));
        assert_closed(&quote);
    }

    #[test]
    fn additional_costs_add_regardless_of_taxable_in_inclusive_mode() {
        let mut quote = draft();

        quote.add_cost("Delivery", dec!(45.00), true).unwrap();
        quote.add_cost("Skip hire", dec!(120.00), false).unwrap();

        assert_eq!(quote.totals().additional_costs_total, dec!(165.00));
        assert_eq!(quote.totals().vat_amount, dec!(0));
        assert_eq!(quote.totals().total, dec!(165.00));
    }

    #[test]
    fn clearing_house_type_drops_allowance_to_zero() {
        let mut quote = draft();
        quote.select_house_type(Some(standard_house())).unwrap();

        quote.select_house_type(None).unwrap();

        assert_eq!(quote.totals().house_type_allowance, dec!(0));
        assert_eq!(quote.totals().total, dec!(0));
    }

    #[test]
    fn changing_house_type_recomputes() {
        let mut quote = draft();
        quote.select_house_type(Some(standard_house())).unwrap();
        quote.add_item((&worktop()).into(), dec!(1), false).unwrap();

        quote
            .select_house_type(Some(HouseType {
                house_type_id: "ht-4bed".to_string(),
                name: "Four bed detached".to_string(),
                allowance_amount: dec!(1500.00),
            }))
            .unwrap();

        assert_eq!(quote.totals().total, dec!(1650.00));
        assert_closed(&quote);
    }

    #[test]
    fn cost_update_and_remove_recompute() {
        let mut quote = draft();
        let id = quote.add_cost("Delivery", dec!(45.00), true).unwrap();

        quote
            .update_cost(
                id,
                CostUpdate {
                    amount: Some(dec!(60.00)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(quote.totals().total, dec!(60.00));
        assert_eq!(quote.additional_costs()[0].description, "Delivery");

        quote.remove_cost(id).unwrap();
        assert_eq!(quote.totals().total, dec!(0));
    }

    #[test]
    fn unknown_cost_is_reported() {
        let mut quote = draft();

        let result = quote.remove_cost(CostId::new());

        assert!(matches!(result, Err(QuoteError::CostNotFound(_))));
    }

    #[test]
    fn exclusive_mode_adds_vat_on_taxable_amounts() {
        let mut quote = Quote::new(exclusive(dec!(20))).unwrap();
        quote.add_item((&worktop()).into(), dec!(2), false).unwrap();
        quote.add_cost("Delivery", dec!(45.00), true).unwrap();
        quote.add_cost("Skip hire", dec!(100.00), false).unwrap();

        let totals = quote.totals();
        assert_eq!(totals.subtotal, dec!(445.00));
        assert_eq!(totals.vat_amount, dec!(69.00));
        assert_eq!(totals.total, dec!(514.00));
        assert_closed(&quote);
    }

    #[test]
    fn exclusive_mode_taxes_allowance_and_uplift() {
        let mut quote = Quote::new(exclusive(dec!(10))).unwrap();
        quote.select_house_type(Some(standard_house())).unwrap();
        quote.set_bespoke_uplift(2).unwrap();

        // (940.80 + 60.00) * 10% = 100.08
        assert_eq!(quote.totals().vat_amount, dec!(100.08));
        assert_eq!(quote.totals().total, dec!(1100.88));
    }

    #[test]
    fn invalid_pricing_config_is_rejected() {
        let result = Quote::new(exclusive(dec!(-20)));

        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejected_mutation_leaves_state_untouched() {
        let mut quote = draft();
        let id = quote.add_item((&worktop()).into(), dec!(2), false).unwrap();
        let before = quote.clone();

        assert!(quote.update_quantity(id, dec!(0)).is_err());
        assert!(quote.set_allowance(ItemId::new(), true).is_err());

        assert_eq!(quote, before);
    }

    // =========================================================================
    // lock enforcement
    // =========================================================================

    #[test]
    fn every_mutation_is_locked_outside_draft() {
        let mut quote = draft();
        let item = quote.add_item((&worktop()).into(), dec!(1), false).unwrap();
        let cost = quote.add_cost("Delivery", dec!(45.00), true).unwrap();
        quote.apply(QuoteEvent::Finalize).unwrap();
        let before = quote.clone();

        let results = [
            quote.add_item((&worktop()).into(), dec!(1), false).map(|_| ()),
            quote.update_quantity(item, dec!(3)),
            quote.set_allowance(item, true),
            quote.set_item_notes(item, Some("note".to_string())),
            quote.remove_item(item).map(|_| ()),
            quote.add_cost("Extra", dec!(1), false).map(|_| ()),
            quote.update_cost(cost, CostUpdate::default()),
            quote.remove_cost(cost).map(|_| ()),
            quote.set_bespoke_uplift(4),
            quote.select_house_type(None),
            quote.set_customer(CustomerInfo::default()),
            quote.set_notes(None),
            quote.set_internal_notes(None),
            quote.set_valid_until(None),
        ];

        for result in results {
            assert!(matches!(
                result,
                Err(QuoteError::QuoteLocked(QuoteStatus::Finalized))
            ));
        }
        assert_eq!(quote, before);
    }

    // =========================================================================
    // lifecycle
    // =========================================================================

    #[test]
    fn finalize_requires_an_item() {
        let mut quote = draft();

        assert_eq!(quote.apply(QuoteEvent::Finalize), Err(TransitionError::NoItems));
        assert_eq!(quote.status(), QuoteStatus::Draft);
    }

    #[test]
    fn send_checks_customer_email() {
        let mut quote = draft();
        quote.add_item((&worktop()).into(), dec!(1), false).unwrap();
        quote.apply(QuoteEvent::Finalize).unwrap();

        assert_eq!(
            quote.can_apply(QuoteEvent::Send),
            Err(TransitionError::MissingCustomerEmail)
        );
    }

    // =========================================================================
    // snapshots
    // =========================================================================

    #[test]
    fn snapshot_restores_with_recomputed_totals() {
        let mut quote = draft();
        quote.select_house_type(Some(standard_house())).unwrap();
        quote.add_item((&worktop()).into(), dec!(2), false).unwrap();
        quote.set_bespoke_uplift(1).unwrap();

        let mut snapshot = quote.snapshot();
        snapshot.totals.total = dec!(1.00);

        let restored = Quote::from_snapshot(
            Some(QuoteId::new()),
            QuoteStatus::Draft,
            snapshot,
            PricingConfig::default(),
        )
        .unwrap();

        assert_eq!(restored.totals(), quote.totals());
        assert_eq!(restored.totals().total, dec!(1270.80));
    }

    #[test]
    fn snapshot_restore_rederives_item_prices() {
        let mut quote = draft();
        quote.add_item((&worktop()).into(), dec!(2), false).unwrap();
        let mut snapshot = quote.snapshot();
        snapshot.items[0].unit_price = dec!(0);
        snapshot.items[0].line_total = dec!(999);

        let restored =
            Quote::from_snapshot(None, QuoteStatus::Draft, snapshot, PricingConfig::default())
                .unwrap();

        let item = &restored.items()[0];
        assert_eq!(item.unit_price, dec!(150.00));
        assert_eq!(item.line_total, dec!(300.00));
        assert_eq!(restored.totals().items_subtotal, dec!(300.00));
        assert_eq!(restored.totals().total, dec!(300.00));
        assert_closed(&restored);
    }

    #[test]
    fn snapshot_restore_keeps_allowance_items_at_zero() {
        let mut quote = draft();
        let id = quote.add_item((&worktop()).into(), dec!(2), true).unwrap();
        let mut snapshot = quote.snapshot();
        snapshot.items[0].line_total = dec!(300);

        let restored =
            Quote::from_snapshot(None, QuoteStatus::Draft, snapshot, PricingConfig::default())
                .unwrap();

        let item = restored.item(id).unwrap();
        assert_eq!(item.line_total, dec!(0));
        assert_eq!(item.base_price, dec!(150.00));
        assert_eq!(restored.totals().items_subtotal, dec!(0));
    }

    #[test]
    fn snapshot_with_non_positive_quantity_is_rejected() {
        let mut quote = draft();
        quote.add_item((&worktop()).into(), dec!(2), false).unwrap();
        let mut snapshot = quote.snapshot();
        snapshot.items[0].quantity = dec!(0);

        let result =
            Quote::from_snapshot(None, QuoteStatus::Draft, snapshot, PricingConfig::default());

        assert!(matches!(result, Err(QuoteError::InvalidQuantity(_))));
    }

    #[test]
    fn equal_edits_give_equal_fingerprints() {
        let mut quote = draft();
        let id = quote.add_item((&worktop()).into(), dec!(2), false).unwrap();
        let first = quote.snapshot().fingerprint().unwrap();

        quote.update_quantity(id, dec!(2)).unwrap();

        assert_eq!(quote.snapshot().fingerprint().unwrap(), first);
    }
}
