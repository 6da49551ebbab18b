//! Status command handler

use anyhow::Result;

use hexrang_core::{ColorStore, Config, ConnectivityProbe, TcpProbe};

use crate::commands::PROBE_TIMEOUT;
use crate::output::{Output, OutputFormat};

/// Show status information
pub async fn run(store: &ColorStore, config: &Config, output: &Output) -> Result<()> {
    let total = store.count()?;
    let unsynced = store.unsynced_count()?;

    let probe = TcpProbe::new(config.probe_addr.clone(), PROBE_TIMEOUT);
    let online = probe.check().await;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "online": online,
                    "sync_enabled": config.sync_enabled,
                    "remote_url": config.remote_url,
                    "collection": config.collection,
                    "counts": {
                        "colors": total,
                        "unsynced": unsynced
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{} {}", total, unsynced);
        }
        OutputFormat::Human => {
            println!("Hexrang Status");
            println!("==============");
            println!();
            println!("Network:");
            println!("  {}", if online { "online" } else { "offline" });
            println!();
            println!("Sync:");
            println!(
                "  Status: {}",
                if config.sync_enabled {
                    "enabled"
                } else {
                    "disabled"
                }
            );
            if let Some(ref url) = config.remote_url {
                println!("  Remote: {}", url);
                println!("  Collection: {}", config.collection);
            }
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            println!();
            println!("Contents:");
            println!("  Colors:   {}", total);
            println!("  Unsynced: {}", unsynced);
        }
    }

    Ok(())
}
