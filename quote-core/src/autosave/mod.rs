//! Debounced background persistence of quote snapshots.

mod coordinator;

pub use coordinator::AutosaveCoordinator;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of the most recently dispatched save, for UI feedback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum SaveStatus {
    /// Nothing has been dispatched yet.
    #[default]
    Idle,
    Saving,
    Saved,
    /// The store rejected the last save. Editing continues; the next change
    /// schedules another attempt.
    Error(String),
}

impl fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Saving => f.write_str("saving"),
            Self::Saved => f.write_str("saved"),
            Self::Error(reason) => write!(f, "error: {reason}"),
        }
    }
}
