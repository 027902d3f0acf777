//! Node configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use craftplan_core::{DataRegistry, GameData};
use thiserror::Error;
use tracing::info;

/// Environment variable holding the listen address.
pub const ADDR_VAR: &str = "CRAFTPLAN_ADDR";

/// Environment variable naming an extra game data file.
pub const DATA_VAR: &str = "CRAFTPLAN_DATA";

/// Environment variable holding the log filter.
pub const LOG_VAR: &str = "CRAFTPLAN_LOG";

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Errors raised while loading the node configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid listen address {value}: {source}")]
    InvalidAddr {
        value: String,
        source: std::net::AddrParseError,
    },

    #[error("Cannot read game data from {path}: {source}")]
    DataFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid game data in {path}: {source}")]
    DataFormat {
        path: PathBuf,
        source: craftplan_core::CraftplanError,
    },
}

/// Settings for one node process.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeConfig {
    pub addr: SocketAddr,
    pub data_path: Option<PathBuf>,
}

impl NodeConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = lookup(ADDR_VAR).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = value
            .parse()
            .map_err(|source| ConfigError::InvalidAddr { value, source })?;
        let data_path = lookup(DATA_VAR).filter(|p| !p.is_empty()).map(PathBuf::from);
        Ok(Self { addr, data_path })
    }

    /// Registry with the built-in catalog plus the configured data file.
    pub fn load_registry(&self) -> Result<DataRegistry, ConfigError> {
        let mut registry = DataRegistry::with_builtin();
        if let Some(path) = &self.data_path {
            let json = std::fs::read_to_string(path).map_err(|source| ConfigError::DataFile {
                path: path.clone(),
                source,
            })?;
            let data = GameData::from_json(&json).map_err(|source| ConfigError::DataFormat {
                path: path.clone(),
                source,
            })?;
            info!(version = data.version(), path = %path.display(), "Loaded game data");
            registry.register(data);
        }
        Ok(registry)
    }
}
