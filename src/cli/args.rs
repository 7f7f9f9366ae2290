use crate::config::{load_config, StoreConfig};
use crate::types::Result;
use clap::Parser;
use std::path::PathBuf;

/// Canteen point-of-sale and student wallet ledger
#[derive(Parser, Debug)]
#[command(name = "canteen")]
#[command(about = "Canteen point-of-sale and student wallet ledger", long_about = None)]
pub struct CliArgs {
    /// Directory holding the record files
    #[arg(
        long = "data-dir",
        value_name = "DIR",
        help = "Directory holding the record files (overrides base_dir from --config)"
    )]
    pub data_dir: Option<PathBuf>,

    /// TOML file naming the record files
    #[arg(
        long = "config",
        value_name = "FILE",
        help = "TOML configuration file with base_dir and file names"
    )]
    pub config: Option<PathBuf>,

    /// Do not create missing record files with sample data
    #[arg(long = "no-seed", help = "Skip seeding missing record files")]
    pub no_seed: bool,
}

impl CliArgs {
    /// Build the StoreConfig from CLI arguments
    ///
    /// Starts from the `--config` file when given, otherwise the defaults,
    /// then applies `--data-dir`.
    pub fn to_store_config(&self) -> Result<StoreConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => StoreConfig::default(),
        };
        if let Some(dir) = &self.data_dir {
            config.base_dir = dir.clone();
        }
        Ok(config)
    }
}
