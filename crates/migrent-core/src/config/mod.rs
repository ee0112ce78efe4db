//! Configuration types for the MigRent admin dashboard.
//!
//! Configuration is loaded from a single YAML file (`migrent.yaml`) and
//! deserialized into [`MigrentConfig`]. Every section has defaults, so an
//! empty file yields a dashboard serving the in-memory sample data.
//!
//! # Sections
//!
//! - **backend**: hosted auth + database service (URL and anon key)
//! - **api**: REST server that owns report management
//! - **dashboard**: bind address and route prefixes
//! - **access**: the role required to enter the admin area
//! - **data_source**: sample data or live backend queries

pub mod backend;
pub mod dashboard;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use backend::{ApiConfig, BackendConfig};
pub use dashboard::{AccessConfig, DashboardConfig};

/// Complete MigRent configuration loaded from file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MigrentConfig {
    /// Project name.
    #[serde(default)]
    pub project: Option<String>,

    /// Hosted auth/database service.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Report management REST API.
    #[serde(default)]
    pub api: ApiConfig,

    /// Dashboard server settings.
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Admin access gate settings.
    #[serde(default)]
    pub access: AccessConfig,

    /// Where admin table data comes from.
    #[serde(default)]
    pub data_source: DataSource,

    /// Logging configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Source of the rows shown in the admin tables.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Seeded in-memory repository, one instance per dashboard.
    #[default]
    Sample,
    /// Live queries against the hosted backend.
    Backend,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Sample => "sample",
            DataSource::Backend => "backend",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Default log filter when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MigrentConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not an empty mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Load and validate configuration from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access.required_role.trim().is_empty() {
            return Err(ConfigError::Config(
                "access.required_role must not be empty".to_string(),
            ));
        }

        for (name, path) in [
            ("dashboard.base_path", &self.dashboard.base_path),
            ("dashboard.signin_path", &self.dashboard.signin_path),
            ("dashboard.home_path", &self.dashboard.home_path),
        ] {
            if !path.starts_with('/') {
                return Err(ConfigError::Config(format!(
                    "{} must start with '/', got '{}'",
                    name, path
                )));
            }
        }

        if self.dashboard.base_path == "/" {
            return Err(ConfigError::Config(
                "dashboard.base_path must not be the site root".to_string(),
            ));
        }

        if self.data_source == DataSource::Backend && self.backend.url.is_none() {
            return Err(ConfigError::Config(
                "data_source 'backend' requires backend.url".to_string(),
            ));
        }

        Ok(())
    }
}
