//! Configuration for the catalog service.
//!
//! Supports YAML file and environment variable overrides.

use std::path::Path;

use serde::Deserialize;

/// Service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog store configuration.
    pub storage: StorageConfig,
    /// Event bus configuration.
    pub bus: BusConfig,
}

/// Catalog store configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Store type (memory, dynamo).
    #[serde(rename = "type")]
    pub store_type: String,
    /// Table holding the catalog (dynamo).
    pub table: String,
    /// Custom endpoint URL (for LocalStack or testing).
    pub endpoint_url: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            store_type: "memory".to_string(),
            table: "products".to_string(),
            endpoint_url: None,
        }
    }
}

/// Event bus configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Bus type (mock, eventbridge).
    #[serde(rename = "type")]
    pub bus_type: String,
    /// Name of the event bus to publish to.
    pub name: String,
    /// Custom endpoint URL (for LocalStack or testing).
    pub endpoint_url: Option<String>,
    /// Maximum events per delivery call.
    pub max_batch_size: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            bus_type: "mock".to_string(),
            name: "catalog-events".to_string(),
            endpoint_url: None,
            max_batch_size: 10,
        }
    }
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file
    /// 3. Defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("CATALOG_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            Self::from_file(&config_path)?
        } else {
            Self::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(store_type) = std::env::var("STORE_TYPE") {
            self.storage.store_type = store_type;
        }

        if let Ok(table) = std::env::var("TABLE") {
            self.storage.table = table;
        }

        if let Ok(bus_type) = std::env::var("BUS_TYPE") {
            self.bus.bus_type = bus_type;
        }

        if let Ok(name) = std::env::var("EVENT_BUS_NAME") {
            self.bus.name = name;
        }

        if let Ok(endpoint) = std::env::var("AWS_ENDPOINT_URL") {
            self.storage.endpoint_url = Some(endpoint.clone());
            self.bus.endpoint_url = Some(endpoint);
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}': {1}")]
    FileRead(String, String),

    #[error("Failed to parse config: {0}")]
    Parse(String),
}
