pub mod loader;
pub mod memory;

pub use loader::{CatalogLoader, CatalogLoaderError, HouseTypeRecord, ProductRecord};
pub use memory::{DeliveredQuote, InMemoryCatalog, MemoryQuoteStore, OutboxDelivery};
