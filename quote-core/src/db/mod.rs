pub mod repository;

pub use repository::{
    CatalogRepository, DeliveryService, HouseTypeRepository, QuoteStore, RepositoryError,
};
