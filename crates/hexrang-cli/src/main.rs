//! Hexrang CLI
//!
//! Command-line interface for hexrang - random colors, saved locally,
//! synced to the cloud when connectivity allows.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hexrang_core::{ColorStore, Config};

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "hexrang")]
#[command(about = "Hexrang - generate random colors with offline-first sync")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate random colors and sync them
    #[command(alias = "gen")]
    Generate {
        /// How many colors to generate
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
    /// List saved colors
    #[command(alias = "ls")]
    List {
        /// Only show colors not yet synced
        #[arg(long)]
        unsynced: bool,
        /// Limit the number of colors shown
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show store and sync status
    Status,
    /// Push all unsynced colors to the remote store
    Sync,
    /// Watch connectivity and sync whenever it returns
    Watch,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, remote_url, collection, sync_enabled, probe_addr, probe_interval_secs)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hexrang=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need the store
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), &output);
    }

    let config = Config::load()?;
    let mut store = ColorStore::open(&config)?;

    match cli.command {
        Commands::Generate { count } => {
            commands::generate::run(&mut store, &config, count, &output).await
        }
        Commands::List { unsynced, limit } => {
            commands::list::run(&store, unsynced, limit, &output)
        }
        Commands::Status => commands::status::run(&store, &config, &output).await,
        Commands::Sync => commands::sync::run(&mut store, &config, &output).await,
        Commands::Watch => commands::watch::run(store, config, output).await,
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_config_command(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(output),
        Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, output),
    }
}
