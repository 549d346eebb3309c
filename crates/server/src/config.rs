//! Server configuration with precedence and validation
//!
//! Values are resolved in order: built-in defaults, then the JSON config
//! file, then `CHAINSTORE_*` environment variables, then command line
//! overrides applied by the binary.

use crate::errors::{Error, RecoveryHint, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default upper bound on a single encoded message (64 MiB)
pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 64 * 1024 * 1024;

/// Smallest accepted message limit; a Clear for a one-byte cache id is 6 bytes
pub const MIN_MAX_MESSAGE_BYTES: usize = 16;

pub const ENV_CONFIG_FILE: &str = "CHAINSTORE_CONFIG";
pub const ENV_CACHES: &str = "CHAINSTORE_CACHES";
pub const ENV_AUTO_CREATE: &str = "CHAINSTORE_AUTO_CREATE";
pub const ENV_MAX_MESSAGE_BYTES: &str = "CHAINSTORE_MAX_MESSAGE_BYTES";

/// Configuration for a store service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Caches registered at startup
    pub caches: Vec<String>,
    /// Create a store the first time an operation names an unknown cache
    pub auto_create: bool,
    /// Messages larger than this are rejected without being decoded
    pub max_message_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            caches: Vec::new(),
            auto_create: false,
            max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_message_bytes < MIN_MAX_MESSAGE_BYTES {
            return Err(Error::Configuration {
                message: format!(
                    "max_message_bytes must be at least {MIN_MAX_MESSAGE_BYTES}, got {}",
                    self.max_message_bytes
                ),
                recovery_hint: RecoveryHint::UpdateConfiguration,
            });
        }

        let mut seen = std::collections::HashSet::new();
        for cache in &self.caches {
            if !seen.insert(cache.as_str()) {
                return Err(Error::Configuration {
                    message: format!("cache '{cache}' is listed more than once"),
                    recovery_hint: RecoveryHint::UpdateConfiguration,
                });
            }
        }

        Ok(())
    }
}

/// Source of configuration for debugging and precedence tracking
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Default configuration
    Default,
    /// Configuration file
    ConfigFile(PathBuf),
    /// Environment variable
    EnvironmentVariable(String),
    /// Command line argument
    CommandLine,
}

/// Resolved configuration plus where its last layer came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: ServerConfig,
    pub source: ConfigSource,
}

/// Builder for creating server configurations
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a cache at startup
    pub fn with_cache(mut self, cache: impl Into<String>) -> Self {
        self.config.caches.push(cache.into());
        self
    }

    pub fn with_auto_create(mut self, auto_create: bool) -> Self {
        self.config.auto_create = auto_create;
        self
    }

    pub fn with_max_message_bytes(mut self, limit: usize) -> Self {
        self.config.max_message_bytes = limit;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<ServerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Partial configuration read from one layer; `None` leaves a value alone
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigLayer {
    caches: Option<Vec<String>>,
    auto_create: Option<bool>,
    max_message_bytes: Option<usize>,
}

impl ConfigLayer {
    fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    fn apply(self, config: &mut ServerConfig) {
        if let Some(caches) = self.caches {
            config.caches = caches;
        }
        if let Some(auto_create) = self.auto_create {
            config.auto_create = auto_create;
        }
        if let Some(limit) = self.max_message_bytes {
            config.max_message_bytes = limit;
        }
    }
}

/// Configuration loader that handles precedence
pub struct ServerConfigLoader;

impl ServerConfigLoader {
    /// Load configuration with full precedence handling
    pub fn load() -> Result<LoadedConfig> {
        let mut loaded = LoadedConfig {
            config: ServerConfig::default(),
            source: ConfigSource::Default,
        };

        let path = Self::config_file_path()?;
        if let Some(layer) = Self::load_from_file(&path)? {
            layer.apply(&mut loaded.config);
            loaded.source = ConfigSource::ConfigFile(path);
        }

        let env_layer = Self::load_from_env()?;
        if !env_layer.is_empty() {
            env_layer.apply(&mut loaded.config);
            loaded.source = ConfigSource::EnvironmentVariable("CHAINSTORE_*".to_string());
        }

        loaded.config.validate()?;
        Ok(loaded)
    }

    /// Read one JSON config file; a missing file is not an error
    pub fn load_file(path: &Path) -> Result<ServerConfig> {
        let mut config = ServerConfig::default();
        if let Some(layer) = Self::load_from_file(path)? {
            layer.apply(&mut config);
        }
        config.validate()?;
        Ok(config)
    }

    fn load_from_file(path: &Path) -> Result<Option<ConfigLayer>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::Io {
                    path: path.to_path_buf(),
                    operation: "read config file",
                    source: e,
                    recovery_hint: RecoveryHint::CheckPermissions {
                        path: path.to_path_buf(),
                    },
                })
            }
        };

        let layer = serde_json::from_str(&content).map_err(|e| Error::Serialization {
            path: path.to_path_buf(),
            source: e,
            recovery_hint: RecoveryHint::Manual {
                instructions: "Check config file syntax".to_string(),
            },
        })?;

        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(Some(layer))
    }

    fn load_from_env() -> Result<ConfigLayer> {
        let mut layer = ConfigLayer::default();

        if let Ok(caches) = std::env::var(ENV_CACHES) {
            layer.caches = Some(
                caches
                    .split(',')
                    .map(str::trim)
                    .filter(|cache| !cache.is_empty())
                    .map(str::to_string)
                    .collect(),
            );
        }

        if let Ok(value) = std::env::var(ENV_AUTO_CREATE) {
            layer.auto_create = Some(parse_env(ENV_AUTO_CREATE, &value.to_lowercase())?);
        }

        if let Ok(value) = std::env::var(ENV_MAX_MESSAGE_BYTES) {
            layer.max_message_bytes = Some(parse_env(ENV_MAX_MESSAGE_BYTES, &value)?);
        }

        Ok(layer)
    }

    /// Get the configuration file path
    pub fn config_file_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(ENV_CONFIG_FILE) {
            return Ok(PathBuf::from(path));
        }

        let config_dir = if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config_home)
        } else {
            dirs::config_dir().ok_or_else(|| Error::Configuration {
                message: "Could not determine config directory".to_string(),
                recovery_hint: RecoveryHint::Manual {
                    instructions: format!("Set {ENV_CONFIG_FILE} or XDG_CONFIG_HOME"),
                },
            })?
        };

        Ok(config_dir.join("chainstore").join("config.json"))
    }

    /// Apply command line arguments (highest precedence)
    pub fn apply_cli_args(
        mut loaded: LoadedConfig,
        caches: Vec<String>,
        auto_create: Option<bool>,
        max_message_bytes: Option<usize>,
    ) -> Result<LoadedConfig> {
        let layer = ConfigLayer {
            caches: (!caches.is_empty()).then_some(caches),
            auto_create,
            max_message_bytes,
        };

        if !layer.is_empty() {
            layer.apply(&mut loaded.config);
            loaded.source = ConfigSource::CommandLine;
            loaded.config.validate()?;
        }

        Ok(loaded)
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| Error::Configuration {
        message: format!("{name} has invalid value '{value}'"),
        recovery_hint: RecoveryHint::UpdateConfiguration,
    })
}
