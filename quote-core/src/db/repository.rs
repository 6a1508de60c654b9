use async_trait::async_trait;
use thiserror::Error;

use crate::models::{HouseType, Product, QuoteId, QuoteSnapshot};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Connection error: {0}")]
    Connection(String),
}

/// Persists quote snapshots.
///
/// Saving the same snapshot twice must leave the same stored state.
///
/// A snapshot holds the editable state only. [`QuoteStatus`] is not part of
/// it and lifecycle changes are never sent through this trait, so a caller
/// reopening a quote with [`Quote::from_snapshot`] must track and supply the
/// status itself.
///
/// [`QuoteStatus`]: crate::models::QuoteStatus
/// [`Quote::from_snapshot`]: crate::quote::Quote::from_snapshot
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Saves `snapshot`. When `id` is `None` the store assigns and returns
    /// a new identity; otherwise it overwrites the quote with that id.
    async fn save_quote(
        &self,
        id: Option<QuoteId>,
        snapshot: &QuoteSnapshot,
    ) -> Result<QuoteId, RepositoryError>;

    async fn load_quote(&self, id: QuoteId) -> Result<QuoteSnapshot, RepositoryError>;
}

/// Product catalog. Consulted only when an item is first added.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn get_product(&self, product_id: &str) -> Result<Product, RepositoryError>;
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError>;
}

/// House types and their allowances. Consulted only on selection.
#[async_trait]
pub trait HouseTypeRepository: Send + Sync {
    async fn get_house_type(&self, house_type_id: &str) -> Result<HouseType, RepositoryError>;
    async fn list_house_types(&self) -> Result<Vec<HouseType>, RepositoryError>;
}

/// Renders and delivers a finalized quote to the customer.
#[async_trait]
pub trait DeliveryService: Send + Sync {
    async fn deliver(
        &self,
        quote_id: Option<QuoteId>,
        recipient: &str,
        snapshot: &QuoteSnapshot,
    ) -> Result<(), RepositoryError>;
}
