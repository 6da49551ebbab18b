//! Hexrang Core Library
//!
//! This crate provides the core functionality for hexrang, an offline-first
//! color collection: colors are generated locally, persisted immediately, and
//! pushed to a remote keyed document store whenever connectivity allows.
//!
//! # Architecture
//!
//! - **Local store**: SQLite holds the canonical copy of every record
//! - **Remote store**: a write-only mirror keyed by the color's hex value
//!
//! A record is flagged `synced` only after a confirmed remote write; records
//! created while offline are swept on the next connectivity transition.
//!
//! # Quick Start
//!
//! ```text
//! let mut store = ColorStore::open(&config)?;
//!
//! // Generate and save a color
//! let record = ColorRecord::random();
//! store.insert(&record)?;
//!
//! // Push it (or report that it was saved locally)
//! let outcome = coordinator.sync_record(&mut store, &record).await?;
//! ```
//!
//! # Modules
//!
//! - `models`: `HexColor` and `ColorRecord` data structures
//! - `storage`: SQLite persistence for color records
//! - `connectivity`: network reachability monitoring
//! - `sync`: remote upsert client and sync coordination
//! - `config`: application configuration

pub mod config;
pub mod connectivity;
pub mod models;
pub mod storage;
pub mod sync;

pub use config::Config;
pub use connectivity::{ConnectivityProbe, MonitorHandle, TcpProbe};
pub use models::{ColorParseError, ColorRecord, HexColor};
pub use storage::{ColorStore, StorageError};
pub use sync::{
    HttpRemoteStore, RemoteClient, RemoteStore, SyncCoordinator, SyncError, SyncOutcome,
};
