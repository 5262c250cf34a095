pub mod accounts;
pub mod defaults;
pub mod error;

pub use accounts::ConfigAccountLookup;
pub use defaults::DeployDefaults;
pub use error::*;

use scaleflow_cloud::StaticAccount;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "SCALEFLOW_CONFIG_PATH";

/// Contents of a ScaleFlow config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleflowConfig {
    #[serde(default)]
    pub defaults: DeployDefaults,

    #[serde(default)]
    pub accounts: Vec<StaticAccount>,
}

impl ScaleflowConfig {
    /// Load and validate a config file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: ScaleflowConfig =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        tracing::debug!(
            path = %path.display(),
            accounts = config.accounts.len(),
            "Loaded config"
        );
        Ok(config)
    }

    /// Load the first config file found by [`find_config_file`]
    pub fn load() -> Result<Self> {
        let path = find_config_file()?;
        Self::from_path(path)
    }

    /// Like [`ScaleflowConfig::load`], but falls back to defaults when no file exists
    pub fn load_or_default() -> Result<Self> {
        match Self::load() {
            Err(ConfigError::ConfigFileNotFound) => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.defaults.validate()?;

        let mut seen = HashSet::new();
        for account in &self.accounts {
            if account.name.trim().is_empty() {
                return Err(ConfigError::Invalid("account with empty name".to_string()));
            }
            if !seen.insert(account.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate account: {}",
                    account.name
                )));
            }
        }
        Ok(())
    }

    /// Account store over the configured accounts
    pub fn account_lookup(&self) -> ConfigAccountLookup {
        ConfigAccountLookup::new(self.accounts.clone())
    }
}

/// ScaleFlow's user config directory
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("scaleflow");

    Ok(config_dir)
}

/// Find the config file
///
/// Search order:
/// 1. `SCALEFLOW_CONFIG_PATH`
/// 2. current directory: scaleflow.yml, scaleflow.yaml
/// 3. ~/.config/scaleflow/config.yml
pub fn find_config_file() -> Result<PathBuf> {
    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
        tracing::warn!(path = %path.display(), "{} points to a missing file", CONFIG_PATH_ENV);
    }

    let current_dir = std::env::current_dir()?;
    for filename in ["scaleflow.yml", "scaleflow.yaml"] {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    if let Ok(config_dir) = get_config_dir() {
        let global_config = config_dir.join("config.yml");
        if global_config.exists() {
            return Ok(global_config);
        }
    }

    Err(ConfigError::ConfigFileNotFound)
}
