//! Watch command handler
//!
//! Long-running mode: a background monitor probes reachability and the
//! coordinator sweeps unsynced colors on every transition back online.

use anyhow::Result;
use tracing::info;

use hexrang_core::connectivity::spawn_monitor;
use hexrang_core::sync::{HttpRemoteStore, RemoteClient, SyncCoordinator};
use hexrang_core::{ColorStore, Config, TcpProbe};

use crate::commands::{require_sync, PROBE_TIMEOUT};
use crate::output::Output;

/// Watch connectivity and sync until interrupted
pub async fn run(mut store: ColorStore, config: Config, output: Output) -> Result<()> {
    let remote_url = require_sync(&config)?.to_string();

    let probe = TcpProbe::new(config.probe_addr.clone(), PROBE_TIMEOUT);
    let monitor = spawn_monitor(probe, config.probe_interval());

    let client = RemoteClient::new(HttpRemoteStore::new(remote_url), config.collection.clone());
    let coordinator = SyncCoordinator::new(client, monitor.subscribe());

    info!(probe = %config.probe_addr, interval_secs = config.probe_interval_secs, "watch started");
    output.message("Watching connectivity (ctrl-c to stop)...");

    tokio::select! {
        result = coordinator.run(&mut store) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            output.message("Stopping...");
            monitor.shutdown().await;
        }
    }

    Ok(())
}
