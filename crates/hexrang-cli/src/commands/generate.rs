//! Generate command handler

use anyhow::Result;

use hexrang_core::sync::SyncOutcome;
use hexrang_core::{ColorRecord, ColorStore, Config};

use crate::commands::optional_coordinator;
use crate::output::Output;

/// Generate random colors, saving each locally and syncing immediately
/// when possible
pub async fn run(
    store: &mut ColorStore,
    config: &Config,
    count: usize,
    output: &Output,
) -> Result<()> {
    let coordinator = optional_coordinator(config).await;

    for _ in 0..count {
        let record = ColorRecord::random();
        store.insert(&record)?;
        output.print_record(&record);

        let Some(ref coordinator) = coordinator else {
            continue;
        };

        match coordinator.sync_record(store, &record).await? {
            SyncOutcome::Synced { message } => output.success(&message),
            SyncOutcome::OfflineSavedLocally => {
                output.message("Offline - color saved locally and will sync when back online");
            }
            SyncOutcome::Failed(e) => {
                // The color is saved either way; the sweep retries later
                if !output.is_quiet() {
                    eprintln!("⚠ Sync failed: {}", e);
                }
            }
        }
    }

    Ok(())
}
