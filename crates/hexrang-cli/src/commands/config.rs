//! Config command handlers

use anyhow::{bail, Context, Result};

use hexrang_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(output: &Output) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "remote_url": config.remote_url,
                    "collection": config.collection,
                    "sync_enabled": config.sync_enabled,
                    "probe_addr": config.probe_addr,
                    "probe_interval_secs": config.probe_interval_secs
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            println!("Configuration:");
            println!("  data_dir:            {}", config.data_dir.display());
            println!(
                "  remote_url:          {}",
                config.remote_url.as_deref().unwrap_or("(not set)")
            );
            println!("  collection:          {}", config.collection);
            println!("  sync_enabled:        {}", config.sync_enabled);
            println!("  probe_addr:          {}", config.probe_addr);
            println!("  probe_interval_secs: {}", config.probe_interval_secs);
            println!();
            println!("Config file: {}", Config::config_file_path().display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(key: String, value: String, output: &Output) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;

    match key.as_str() {
        "data_dir" => {
            config.data_dir = value.clone().into();
        }
        "remote_url" => {
            config.remote_url = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.clone())
            };
        }
        "collection" => {
            config.collection = value.clone();
        }
        "sync_enabled" => {
            config.sync_enabled = value
                .parse()
                .context("Invalid value for sync_enabled. Use 'true' or 'false'.")?;
        }
        "probe_addr" => {
            config.probe_addr = value.clone();
        }
        "probe_interval_secs" => {
            config.probe_interval_secs = value
                .parse()
                .context("Invalid value for probe_interval_secs. Use a number of seconds.")?;
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, remote_url, collection, sync_enabled, probe_addr, probe_interval_secs",
                key
            );
        }
    }

    config.save().context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}
