//! An editing session for one quote.
//!
//! The session resolves catalog and house-type lookups, applies the change
//! to the [`Quote`] aggregate, and hands the resulting snapshot to the
//! [`AutosaveCoordinator`]. Lookups happen before the aggregate is touched,
//! so a missing product or house type leaves the quote unchanged.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::autosave::{AutosaveCoordinator, SaveStatus};
use crate::config::AutosaveConfig;
use crate::db::{
    CatalogRepository, DeliveryService, HouseTypeRepository, QuoteStore, RepositoryError,
};
use crate::models::{
    AdditionalCost, CostId, CostUpdate, CustomerInfo, ItemCandidate, ItemId, QuoteId, QuoteItem,
    QuoteStatus,
};
use crate::quote::{Quote, QuoteError, QuoteEvent};

/// External services a session talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub store: Arc<dyn QuoteStore>,
    pub catalog: Arc<dyn CatalogRepository>,
    pub house_types: Arc<dyn HouseTypeRepository>,
    pub delivery: Arc<dyn DeliveryService>,
}

pub struct QuoteSession {
    quote: Quote,
    catalog: Arc<dyn CatalogRepository>,
    house_types: Arc<dyn HouseTypeRepository>,
    delivery: Arc<dyn DeliveryService>,
    autosave: AutosaveCoordinator,
}

impl QuoteSession {
    /// Opens a session on `quote`. Autosave runs only while the quote is a
    /// draft and `autosave.enabled` is set. Must be called inside a Tokio
    /// runtime.
    pub fn open(
        quote: Quote,
        collaborators: Collaborators,
        autosave: &AutosaveConfig,
    ) -> Self {
        let config = AutosaveConfig {
            enabled: autosave.enabled && quote.status().permits_editing(),
            ..autosave.clone()
        };
        let coordinator = AutosaveCoordinator::spawn(collaborators.store, quote.id(), &config);

        Self {
            quote,
            catalog: collaborators.catalog,
            house_types: collaborators.house_types,
            delivery: collaborators.delivery,
            autosave: coordinator,
        }
    }

    pub fn quote(&self) -> &Quote {
        &self.quote
    }

    /// Store identity, once the first save has completed.
    pub fn quote_id(&self) -> Option<QuoteId> {
        self.quote.id().or_else(|| self.autosave.quote_id())
    }

    pub fn save_status(&self) -> SaveStatus {
        self.autosave.status()
    }

    pub fn autosave(&self) -> &AutosaveCoordinator {
        &self.autosave
    }

    /// Saves now instead of waiting for the debounce delay.
    pub async fn save_now(&mut self) -> SaveStatus {
        let status = self.autosave.flush().await;
        self.sync_id();
        status
    }

    // ── items ───────────────────────────────────────────────────────────

    /// Looks `product_id` up in the catalog and adds it.
    pub async fn add_product(
        &mut self,
        product_id: &str,
        quantity: Decimal,
        is_in_allowance: bool,
    ) -> Result<ItemId, QuoteError> {
        self.quote.ensure_editable()?;
        let product = self
            .catalog
            .get_product(product_id)
            .await
            .map_err(|error| match error {
                RepositoryError::NotFound => QuoteError::ProductNotFound(product_id.to_string()),
                other => QuoteError::Repository(other),
            })?;

        let id = self
            .quote
            .add_item(ItemCandidate::from(&product), quantity, is_in_allowance)?;
        self.changed();
        Ok(id)
    }

    pub fn add_manual_item(
        &mut self,
        candidate: ItemCandidate,
        quantity: Decimal,
        is_in_allowance: bool,
    ) -> Result<ItemId, QuoteError> {
        let id = self.quote.add_item(candidate, quantity, is_in_allowance)?;
        self.changed();
        Ok(id)
    }

    pub fn update_quantity(
        &mut self,
        item_id: ItemId,
        quantity: Decimal,
    ) -> Result<(), QuoteError> {
        self.quote.update_quantity(item_id, quantity)?;
        self.changed();
        Ok(())
    }

    pub fn set_allowance(
        &mut self,
        item_id: ItemId,
        is_in_allowance: bool,
    ) -> Result<(), QuoteError> {
        self.quote.set_allowance(item_id, is_in_allowance)?;
        self.changed();
        Ok(())
    }

    pub fn set_item_notes(
        &mut self,
        item_id: ItemId,
        notes: Option<String>,
    ) -> Result<(), QuoteError> {
        self.quote.set_item_notes(item_id, notes)?;
        self.changed();
        Ok(())
    }

    pub fn remove_item(
        &mut self,
        item_id: ItemId,
    ) -> Result<QuoteItem, QuoteError> {
        let removed = self.quote.remove_item(item_id)?;
        self.changed();
        Ok(removed)
    }

    // ── costs & scalars ─────────────────────────────────────────────────

    pub fn add_cost(
        &mut self,
        description: impl Into<String>,
        amount: Decimal,
        taxable: bool,
    ) -> Result<CostId, QuoteError> {
        let id = self.quote.add_cost(description, amount, taxable)?;
        self.changed();
        Ok(id)
    }

    pub fn update_cost(
        &mut self,
        cost_id: CostId,
        update: CostUpdate,
    ) -> Result<(), QuoteError> {
        self.quote.update_cost(cost_id, update)?;
        self.changed();
        Ok(())
    }

    pub fn remove_cost(
        &mut self,
        cost_id: CostId,
    ) -> Result<AdditionalCost, QuoteError> {
        let removed = self.quote.remove_cost(cost_id)?;
        self.changed();
        Ok(removed)
    }

    pub fn set_bespoke_uplift(
        &mut self,
        quantity: u32,
    ) -> Result<(), QuoteError> {
        self.quote.set_bespoke_uplift(quantity)?;
        self.changed();
        Ok(())
    }

    /// Selects a house type by id, or clears it with `None`.
    ///
    /// An unknown id is rejected and the current allowance is kept.
    pub async fn select_house_type(
        &mut self,
        house_type_id: Option<&str>,
    ) -> Result<(), QuoteError> {
        self.quote.ensure_editable()?;
        let house_type = match house_type_id {
            Some(id) => Some(self.house_types.get_house_type(id).await.map_err(
                |error| match error {
                    RepositoryError::NotFound => QuoteError::HouseTypeNotFound(id.to_string()),
                    other => QuoteError::Repository(other),
                },
            )?),
            None => None,
        };

        self.quote.select_house_type(house_type)?;
        self.changed();
        Ok(())
    }

    pub fn set_customer(
        &mut self,
        customer: CustomerInfo,
    ) -> Result<(), QuoteError> {
        self.quote.set_customer(customer)?;
        self.changed();
        Ok(())
    }

    pub fn set_notes(
        &mut self,
        notes: Option<String>,
    ) -> Result<(), QuoteError> {
        self.quote.set_notes(notes)?;
        self.changed();
        Ok(())
    }

    pub fn set_internal_notes(
        &mut self,
        notes: Option<String>,
    ) -> Result<(), QuoteError> {
        self.quote.set_internal_notes(notes)?;
        self.changed();
        Ok(())
    }

    pub fn set_valid_until(
        &mut self,
        valid_until: Option<NaiveDate>,
    ) -> Result<(), QuoteError> {
        self.quote.set_valid_until(valid_until)?;
        self.changed();
        Ok(())
    }

    // ── lifecycle ───────────────────────────────────────────────────────

    pub async fn finalize(&mut self) -> Result<QuoteStatus, QuoteError> {
        self.leave_draft(QuoteEvent::Finalize).await
    }

    pub async fn save_as_complete(&mut self) -> Result<QuoteStatus, QuoteError> {
        self.leave_draft(QuoteEvent::SaveAsComplete).await
    }

    pub async fn archive(&mut self) -> Result<QuoteStatus, QuoteError> {
        self.leave_draft(QuoteEvent::Archive).await
    }

    /// Delivers the quote to the customer and, only if delivery succeeds,
    /// moves it to `SENT`. Re-sending a sent quote is allowed.
    pub async fn send(&mut self) -> Result<QuoteStatus, QuoteError> {
        self.quote.can_apply(QuoteEvent::Send)?;
        let recipient = self.quote.customer().email.clone().unwrap_or_default();

        self.delivery
            .deliver(self.quote_id(), &recipient, &self.quote.snapshot())
            .await
            .map_err(|error| {
                warn!(%error, "quote delivery failed");
                QuoteError::Delivery(error.to_string())
            })?;

        let status = self.quote.apply(QuoteEvent::Send)?;
        info!(quote = ?self.quote_id(), %recipient, "quote sent");
        Ok(status)
    }

    /// Applies an event that may take the quote out of `DRAFT`. Any
    /// pending draft edit is saved first; autosave is switched off once the
    /// quote is no longer editable.
    ///
    /// If that save fails the quote stays a draft, so the edit can still be
    /// saved by a later `save_now` or lifecycle call.
    async fn leave_draft(
        &mut self,
        event: QuoteEvent,
    ) -> Result<QuoteStatus, QuoteError> {
        self.quote.can_apply(event)?;
        if self.quote.status().permits_editing() {
            if let SaveStatus::Error(reason) = self.save_now().await {
                warn!(%event, %reason, "draft not saved, quote stays a draft");
                return Err(QuoteError::PersistenceFailure(reason));
            }
        }

        let status = self.quote.apply(event)?;
        if !status.permits_editing() {
            self.autosave.set_enabled(false);
        }
        Ok(status)
    }

    fn sync_id(&mut self) {
        if self.quote.id().is_none() {
            if let Some(id) = self.autosave.quote_id() {
                self.quote.assign_id(id);
            }
        }
    }

    fn changed(&mut self) {
        self.sync_id();
        self.autosave.notify(self.quote.snapshot());
    }
}
