use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::registry::DEFAULT_ACCOUNT_NUMBER_ATTEMPTS;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config `{path}`: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Runtime settings. Every field is optional in the YAML file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Smallest initial balance accepted when opening an account.
    pub min_deposit: Decimal,
    /// How many account numbers are tried before giving up on a collision streak.
    pub max_account_number_attempts: u32,
    /// Load the sample customers and accounts into an empty store on start.
    pub seed_sample_data: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            min_deposit: Decimal::new(50, 0),
            max_account_number_attempts: DEFAULT_ACCOUNT_NUMBER_ATTEMPTS,
            seed_sample_data: false,
        }
    }
}

impl LedgerConfig {
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&source)
    }
}
