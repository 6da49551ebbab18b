//! Storage layer
//!
//! SQLite-backed persistence for color records. The local database is the
//! canonical copy of every record; the remote store is a write-only mirror
//! that this layer never reads back from.

pub mod error;
pub mod schema;
mod store;

pub use error::{StorageError, StorageResult};
pub use schema::{init_schema, needs_init, SCHEMA_VERSION};
pub use store::ColorStore;
