mod additional_cost;
mod customer;
mod house_type;
mod ids;
mod product;
mod quote_item;
mod snapshot;
mod status;

pub use additional_cost::{AdditionalCost, CostUpdate};
pub use customer::CustomerInfo;
pub use house_type::HouseType;
pub use ids::{CostId, ItemId, QuoteId};
pub use product::{PriceUnit, Product};
pub use quote_item::{ItemCandidate, QuoteItem};
pub use snapshot::{QuoteSnapshot, QuoteTotals};
pub use status::QuoteStatus;
