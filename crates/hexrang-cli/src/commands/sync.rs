//! Sync command handler

use anyhow::Result;

use hexrang_core::{ColorStore, Config};

use crate::commands::oneshot_coordinator;
use crate::output::Output;

/// Push all unsynced colors to the remote store
pub async fn run(store: &mut ColorStore, config: &Config, output: &Output) -> Result<()> {
    let coordinator = oneshot_coordinator(config).await?;

    if !coordinator.is_online() {
        output.message("Offline - colors will sync when connectivity returns");
        return Ok(());
    }

    output.message("Syncing pending colors...");
    let report = coordinator.sync_pending(store).await?;

    if report.attempted == 0 {
        output.success("Nothing to sync - all colors are up to date");
        return Ok(());
    }

    match report.error {
        None => {
            output.success(&format!("Synced {} color(s)", report.synced));
            Ok(())
        }
        Some(e) => {
            output.message(&format!("Sync failed: {}", e));
            Err(e.into())
        }
    }
}
