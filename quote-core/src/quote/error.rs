use rust_decimal::Decimal;
use thiserror::Error;

use crate::config::ConfigError;
use crate::db::RepositoryError;
use crate::models::{CostId, ItemId, QuoteStatus};
use crate::quote::lifecycle::TransitionError;

/// Errors raised while editing a quote.
///
/// Validation errors are raised before any state is touched, so a failed
/// call always leaves the quote as it was.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("quantity must be greater than zero, got {0}")]
    InvalidQuantity(Decimal),

    #[error("quote is {0} and can no longer be edited")]
    QuoteLocked(QuoteStatus),

    #[error("item {0} not found on quote")]
    ItemNotFound(ItemId),

    #[error("additional cost {0} not found on quote")]
    CostNotFound(CostId),

    #[error("house type '{0}' not found")]
    HouseTypeNotFound(String),

    #[error("product '{0}' not found")]
    ProductNotFound(String),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("quote could not be saved: {0}")]
    PersistenceFailure(String),

    #[error("delivery failed: {0}")]
    Delivery(String),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}
