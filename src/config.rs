//! Store configuration
//!
//! The location of every record file is carried by an explicit
//! [`StoreConfig`] handed to the repositories at construction time. A config
//! can be built in code, loaded from a TOML file, or both (command-line
//! overrides are applied by the caller).

use crate::types::{CanteenError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Base directory and file names of the record files
///
/// Every field is optional in a TOML file; missing keys take their defaults.
///
/// ```toml
/// base_dir = "/var/lib/canteen"
/// wallet_file = "wallet.txt"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub base_dir: PathBuf,
    pub users_file: String,
    pub students_file: String,
    pub wallet_file: String,
    pub food_items_file: String,
    pub bill_history_file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            base_dir: PathBuf::from("."),
            users_file: "users.txt".to_string(),
            students_file: "students.txt".to_string(),
            wallet_file: "wallet.txt".to_string(),
            food_items_file: "food_items.txt".to_string(),
            bill_history_file: "bill_history.txt".to_string(),
        }
    }
}

impl StoreConfig {
    /// Default file names under `base_dir`
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        StoreConfig {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }

    pub fn users_path(&self) -> PathBuf {
        self.base_dir.join(&self.users_file)
    }

    pub fn students_path(&self) -> PathBuf {
        self.base_dir.join(&self.students_file)
    }

    pub fn wallet_path(&self) -> PathBuf {
        self.base_dir.join(&self.wallet_file)
    }

    pub fn food_items_path(&self) -> PathBuf {
        self.base_dir.join(&self.food_items_file)
    }

    pub fn bill_history_path(&self) -> PathBuf {
        self.base_dir.join(&self.bill_history_file)
    }
}

/// Load a [`StoreConfig`] from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<StoreConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = fs::read_to_string(path_ref).map_err(|e| {
        CanteenError::config(format!("Failed to read config file {:?}: {}", path_ref, e))
    })?;
    parse_config(&contents).map_err(|e| match e {
        CanteenError::Config { message } => {
            CanteenError::config(format!("{:?}: {}", path_ref, message))
        }
        other => other,
    })
}

/// Parse a [`StoreConfig`] from TOML text
pub fn parse_config(contents: &str) -> Result<StoreConfig> {
    toml::from_str(contents)
        .map_err(|e| CanteenError::config(format!("Failed to parse TOML: {}", e)))
}
