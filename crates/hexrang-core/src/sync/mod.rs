//! Offline-first synchronization
//!
//! Pushes color records to a remote keyed document collection. The record's
//! canonical hex value is the document key, which makes every write an
//! idempotent upsert: re-sending a record overwrites the same document.
//!
//! ## Triggers
//!
//! 1. Immediately after a record is created (`SyncCoordinator::sync_record`)
//! 2. On every offline-to-online transition (`SyncCoordinator::sync_pending`)
//!
//! There is no retry policy beyond those two triggers: a failed write simply
//! leaves the record unsynced until connectivity next returns.

mod coordinator;
mod outcome;
mod remote;

pub use coordinator::{SyncCoordinator, SyncReport};
pub use outcome::{SyncError, SyncOutcome};
pub use remote::{
    BatchError, ColorDocument, HttpRemoteStore, MemoryRemoteStore, RemoteClient, RemoteError,
    RemoteStore,
};
