//! Quote lifecycle transitions.
//!
//! | From               | Event            | To        | Guard                   |
//! |--------------------|------------------|-----------|-------------------------|
//! | DRAFT              | finalize         | FINALIZED | at least one item       |
//! | FINALIZED          | send (delivered) | SENT      | customer email present  |
//! | SENT               | send (delivered) | SENT      | customer email present  |
//! | DRAFT              | save-as-complete | SAVED     |                         |
//! | any but ARCHIVED   | archive          | ARCHIVED  |                         |
//!
//! The table is the only authority on status changes. Delivery itself is
//! performed by the caller; [`transition`] is consulted before delivery to
//! check the guard and again afterwards to commit the new status.

use std::fmt;

use thiserror::Error;

use crate::models::QuoteStatus;

/// Events that may move a quote between statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteEvent {
    Finalize,
    Send,
    SaveAsComplete,
    Archive,
}

impl fmt::Display for QuoteEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Finalize => "finalize",
            Self::Send => "send",
            Self::SaveAsComplete => "save-as-complete",
            Self::Archive => "archive",
        };
        f.write_str(name)
    }
}

/// Facts about the quote that transition guards look at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitionContext {
    pub item_count: usize,
    pub has_customer_email: bool,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("cannot {event} a quote in status {from}")]
    NotAllowed { from: QuoteStatus, event: QuoteEvent },

    #[error("cannot finalize a quote with no items")]
    NoItems,

    #[error("cannot send a quote without a customer email")]
    MissingCustomerEmail,
}

/// Returns the status reached by applying `event` in `from`.
///
/// # Errors
///
/// [`TransitionError::NotAllowed`] when the table has no row for the pair,
/// or a guard-specific error when the row exists but its guard fails.
pub fn transition(
    from: QuoteStatus,
    event: QuoteEvent,
    ctx: &TransitionContext,
) -> Result<QuoteStatus, TransitionError> {
    use QuoteEvent::*;
    use QuoteStatus::*;

    match (from, event) {
        (Draft, Finalize) => {
            if ctx.item_count == 0 {
                return Err(TransitionError::NoItems);
            }
            Ok(Finalized)
        }
        (Finalized | Sent, Send) => {
            if !ctx.has_customer_email {
                return Err(TransitionError::MissingCustomerEmail);
            }
            Ok(Sent)
        }
        (Draft, SaveAsComplete) => Ok(Saved),
        (Archived, Archive) => Err(TransitionError::NotAllowed { from, event }),
        (_, Archive) => Ok(Archived),
        _ => Err(TransitionError::NotAllowed { from, event }),
    }
}
