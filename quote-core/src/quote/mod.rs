//! Quote editing: the aggregate, its item operations and its lifecycle.

mod aggregate;
mod error;
pub mod items;
pub mod lifecycle;

pub use aggregate::Quote;
pub use error::QuoteError;
pub use lifecycle::{QuoteEvent, TransitionContext, TransitionError, transition};
