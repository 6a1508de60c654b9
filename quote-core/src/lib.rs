pub mod autosave;
pub mod calculations;
pub mod config;
pub mod db;
pub mod models;
pub mod quote;
pub mod session;

pub use autosave::{AutosaveCoordinator, SaveStatus};
pub use config::{AutosaveConfig, ConfigError, PricingConfig, QuoteConfig, VatMode};
pub use db::repository::{
    CatalogRepository, DeliveryService, HouseTypeRepository, QuoteStore, RepositoryError,
};
pub use models::*;
pub use quote::{Quote, QuoteError, QuoteEvent};
pub use session::{Collaborators, QuoteSession};
