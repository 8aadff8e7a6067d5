//! Binding configuration (TOML)

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Binding configuration
///
/// ```toml
/// manifest = "ghex-bindings.toml"
///
/// [resolver]
/// cache = true
///
/// [logging]
/// filter = "ghex_bind=debug"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct BindConfig {
    /// Binding manifest to check the module against
    #[serde(default)]
    pub manifest: Option<PathBuf>,

    /// Type resolution settings
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Type resolution settings
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ResolverConfig {
    /// Memoize successful resolutions (default: false)
    #[serde(default)]
    pub cache: bool,
}

/// Logging settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `EnvFilter` directives (default: "warn"); `RUST_LOG` takes precedence
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Include event targets in log lines (default: false)
    #[serde(default)]
    pub target: bool,
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            target: false,
        }
    }
}

impl BindConfig {
    /// Parse a config file. A relative manifest path is taken relative to
    /// the directory holding the config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_str(&content)?;
        if let (Some(manifest), Some(dir)) = (&config.manifest, path.parent()) {
            if manifest.is_relative() {
                config.manifest = Some(dir.join(manifest));
            }
        }
        Ok(config)
    }

    /// Parse config from a string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}
