//! In-memory implementations of the quote collaborators.
//!
//! Used by the CLI and by tests. Nothing here survives the process.

use std::collections::HashMap;

use async_trait::async_trait;
use quote_core::{
    CatalogRepository, DeliveryService, HouseType, HouseTypeRepository, Product, QuoteId,
    QuoteSnapshot, QuoteStore, RepositoryError,
};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Product catalog and house types held in memory, in load order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
    house_types: Vec<HouseType>,
}

impl InMemoryCatalog {
    pub fn new(
        products: Vec<Product>,
        house_types: Vec<HouseType>,
    ) -> Self {
        Self {
            products,
            house_types,
        }
    }

    /// Resolves a product by id first, then by SKU (case-insensitive).
    pub fn resolve_product(
        &self,
        key: &str,
    ) -> Option<&Product> {
        self.products
            .iter()
            .find(|p| p.product_id == key)
            .or_else(|| self.products.iter().find(|p| p.sku.eq_ignore_ascii_case(key)))
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn get_product(&self, product_id: &str) -> Result<Product, RepositoryError> {
        self.products
            .iter()
            .find(|p| p.product_id == product_id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.products.clone())
    }
}

#[async_trait]
impl HouseTypeRepository for InMemoryCatalog {
    async fn get_house_type(&self, house_type_id: &str) -> Result<HouseType, RepositoryError> {
        self.house_types
            .iter()
            .find(|h| h.house_type_id == house_type_id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn list_house_types(&self) -> Result<Vec<HouseType>, RepositoryError> {
        Ok(self.house_types.clone())
    }
}

/// Quote store backed by a map. Assigns a fresh [`QuoteId`] on first save.
#[derive(Debug, Default)]
pub struct MemoryQuoteStore {
    quotes: Mutex<HashMap<QuoteId, QuoteSnapshot>>,
}

impl MemoryQuoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.quotes.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.quotes.lock().await.is_empty()
    }
}

#[async_trait]
impl QuoteStore for MemoryQuoteStore {
    async fn save_quote(
        &self,
        id: Option<QuoteId>,
        snapshot: &QuoteSnapshot,
    ) -> Result<QuoteId, RepositoryError> {
        let id = id.unwrap_or_default();
        self.quotes.lock().await.insert(id, snapshot.clone());
        debug!(quote = %id, items = snapshot.items.len(), "stored quote snapshot");
        Ok(id)
    }

    async fn load_quote(&self, id: QuoteId) -> Result<QuoteSnapshot, RepositoryError> {
        self.quotes
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }
}

/// A delivered quote, as recorded by [`OutboxDelivery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredQuote {
    pub quote_id: Option<QuoteId>,
    pub recipient: String,
    pub total: Decimal,
}

/// Delivery service that records each delivery instead of sending it.
#[derive(Debug, Default)]
pub struct OutboxDelivery {
    sent: Mutex<Vec<DeliveredQuote>>,
    offline: bool,
}

impl OutboxDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    /// A delivery service whose every delivery fails.
    pub fn offline() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            offline: true,
        }
    }

    pub async fn sent(&self) -> Vec<DeliveredQuote> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl DeliveryService for OutboxDelivery {
    async fn deliver(
        &self,
        quote_id: Option<QuoteId>,
        recipient: &str,
        snapshot: &QuoteSnapshot,
    ) -> Result<(), RepositoryError> {
        if self.offline {
            return Err(RepositoryError::Connection(
                "delivery service unavailable".to_string(),
            ));
        }

        info!(%recipient, total = %snapshot.totals.total, "quote delivered to outbox");
        self.sent.lock().await.push(DeliveredQuote {
            quote_id,
            recipient: recipient.to_string(),
            total: snapshot.totals.total,
        });
        Ok(())
    }
}
