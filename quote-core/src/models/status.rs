use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a quote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteStatus {
    #[default]
    Draft,
    Finalized,
    Sent,
    Saved,
    Archived,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Finalized => "FINALIZED",
            Self::Sent => "SENT",
            Self::Saved => "SAVED",
            Self::Archived => "ARCHIVED",
        }
    }

    /// Only drafts accept item, cost, uplift and customer edits, and only
    /// drafts are autosaved.
    pub fn permits_editing(&self) -> bool {
        matches!(self, Self::Draft)
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
