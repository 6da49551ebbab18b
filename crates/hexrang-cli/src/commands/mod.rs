//! Command handlers

pub mod config;
pub mod generate;
pub mod list;
pub mod status;
pub mod sync;
pub mod watch;

use std::time::Duration;

use anyhow::{bail, Result};

use hexrang_core::sync::{HttpRemoteStore, RemoteClient, SyncCoordinator};
use hexrang_core::{Config, ConnectivityProbe, TcpProbe};

/// Probe timeout for one-shot connectivity checks
pub(crate) const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Fail with setup instructions unless sync is enabled and configured
pub(crate) fn require_sync(config: &Config) -> Result<&str> {
    if !config.sync_enabled {
        bail!(
            "Sync is not enabled. Enable it with:\n  \
             hexrang config set sync_enabled true\n  \
             hexrang config set remote_url https://your-store.example.com/api"
        );
    }
    match config.remote_url.as_deref() {
        Some(url) => Ok(url),
        None => bail!(
            "Remote URL not configured. Set it with:\n  \
             hexrang config set remote_url https://your-store.example.com/api"
        ),
    }
}

/// Build a coordinator for a one-shot command
///
/// Reachability is probed once; the coordinator acts on the state of the
/// network right now, so the channel sender is dropped on purpose.
pub(crate) async fn oneshot_coordinator(config: &Config) -> Result<SyncCoordinator<HttpRemoteStore>> {
    let remote_url = require_sync(config)?.to_string();
    Ok(build_coordinator(config, remote_url).await)
}

/// Like `oneshot_coordinator`, but `None` when sync is disabled or
/// unconfigured instead of an error (for commands where sync is optional)
pub(crate) async fn optional_coordinator(config: &Config) -> Option<SyncCoordinator<HttpRemoteStore>> {
    if !config.sync_enabled {
        return None;
    }
    let remote_url = config.remote_url.clone()?;
    Some(build_coordinator(config, remote_url).await)
}

async fn build_coordinator(config: &Config, remote_url: String) -> SyncCoordinator<HttpRemoteStore> {
    let probe = TcpProbe::new(config.probe_addr.clone(), PROBE_TIMEOUT);
    let online = probe.check().await;
    let (_tx, rx) = tokio::sync::watch::channel(online);

    let client = RemoteClient::new(HttpRemoteStore::new(remote_url), config.collection.clone());
    SyncCoordinator::new(client, rx)
}
