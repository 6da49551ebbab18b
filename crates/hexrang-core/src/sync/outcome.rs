//! Sync outcome taxonomy
//!
//! Sync results are delivered as values, never panics: the application keeps
//! running with the record unsynced whatever happens.

use thiserror::Error;

use super::remote::{BatchError, RemoteError};

/// Result of a sync attempt
#[derive(Debug)]
pub enum SyncOutcome {
    /// Remote write acknowledged and the local flag persisted
    Synced { message: String },
    /// Device is offline; the record stays local until connectivity returns
    ///
    /// This is an informational outcome, not an error.
    OfflineSavedLocally,
    /// Remote write failed; the record stays unsynced until the next trigger
    Failed(SyncError),
}

impl SyncOutcome {
    pub fn is_synced(&self) -> bool {
        matches!(self, SyncOutcome::Synced { .. })
    }
}

/// Why a sync attempt failed
#[derive(Error, Debug)]
pub enum SyncError {
    /// A single remote write failed
    #[error("Remote write failed: {0}")]
    RemoteWrite(#[from] RemoteError),

    /// One or more writes in a batch failed
    #[error(transparent)]
    Batch(#[from] BatchError),
}
