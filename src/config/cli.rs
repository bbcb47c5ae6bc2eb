use crate::config::toml_config::{TomlConfig, DEFAULT_ENDPOINT};
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "cart-sync")]
#[command(about = "Stock-checked shopping cart kept in local storage")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Inventory API base URL (overrides the config file)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Directory holding the stored cart (overrides the config file)
    #[arg(long)]
    pub store_dir: Option<String>,

    /// Storage key of the cart snapshot (overrides the config file)
    #[arg(long)]
    pub key: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CartCommand {
    /// Print the stored cart
    Show,
    /// Add one unit of an item
    Add { id: i64 },
    /// Remove an item's line
    Remove { id: i64 },
    /// Set the amount of an item already in the cart
    Update {
        id: i64,
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

impl CliConfig {
    /// Load the config file, if any, and apply command line overrides.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::with_endpoint(DEFAULT_ENDPOINT),
        };

        if let Some(endpoint) = &self.endpoint {
            config.inventory.endpoint = endpoint.clone();
        }
        if let Some(dir) = &self.store_dir {
            config.storage.directory = dir.clone();
        }
        if let Some(key) = &self.key {
            config.storage.key = key.clone();
        }
        if self.verbose || self.json_logs {
            let logging = config.logging.get_or_insert_with(Default::default);
            if self.verbose {
                logging.verbose = Some(true);
            }
            if self.json_logs {
                logging.json = Some(true);
            }
        }

        Ok(config)
    }
}
