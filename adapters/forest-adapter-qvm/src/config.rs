//! Client configuration.
//!
//! Settings are resolved from, highest precedence first:
//! 1. Process-wide overrides ([`set_api_key`], [`set_endpoint`])
//! 2. Environment variables (`FOREST_API_KEY`, `FOREST_ENDPOINT`, `FOREST_TIMEOUT`)
//! 3. A YAML file at `$FOREST_CONFIG`, or `~/.forest_config.yaml`
//! 4. Default values

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, RwLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{QvmError, QvmResult};

/// Public QVM endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.rigetti.com/qvm";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "FOREST_API_KEY";

/// Environment variable overriding the endpoint URL.
pub const ENDPOINT_ENV: &str = "FOREST_ENDPOINT";

/// Environment variable overriding the request timeout (seconds).
pub const TIMEOUT_ENV: &str = "FOREST_TIMEOUT";

/// Environment variable pointing at an explicit config file.
pub const CONFIG_PATH_ENV: &str = "FOREST_CONFIG";

/// Config file name looked up in the home directory.
pub const CONFIG_FILE_NAME: &str = ".forest_config.yaml";

/// Connection settings for the QVM.
#[derive(Clone, Serialize, Deserialize)]
pub struct ForestConfig {
    /// QVM endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API key sent as `X-Api-Key`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl fmt::Debug for ForestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForestConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout() -> u64 {
    60
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            timeout_seconds: default_timeout(),
        }
    }
}

impl ForestConfig {
    /// Parse configuration from YAML text.
    pub fn from_yaml(yaml: &str) -> QvmResult<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| QvmError::Config(e.to_string()))
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> QvmResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| QvmError::Config(format!("{}: {e}", path.display())))?;
        Self::from_yaml(&contents)
    }

    /// Overlay environment variables onto this configuration.
    ///
    /// A `FOREST_TIMEOUT` that is not a whole number of seconds is a
    /// [`QvmError::Config`].
    pub fn apply_env(self) -> QvmResult<Self> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    fn apply_vars(mut self, var: impl Fn(&str) -> Option<String>) -> QvmResult<Self> {
        if let Some(key) = var(API_KEY_ENV) {
            self.api_key = Some(key);
        }
        if let Some(endpoint) = var(ENDPOINT_ENV) {
            self.endpoint = endpoint;
        }
        if let Some(timeout) = var(TIMEOUT_ENV) {
            self.timeout_seconds = timeout.trim().parse().map_err(|_| {
                QvmError::Config(format!(
                    "{TIMEOUT_ENV} must be a number of seconds, got {timeout:?}"
                ))
            })?;
        }
        Ok(self)
    }

    /// Load from the config file (if any), then apply the environment.
    pub fn load() -> QvmResult<Self> {
        let config = match config_file_path() {
            Some(path) if path.exists() => {
                debug!("Loading Forest config from {}", path.display());
                Self::from_file(&path)?
            }
            _ => Self::default(),
        };
        config.apply_env()
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the endpoint URL.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// The API key, or [`QvmError::MissingApiKey`] if none is set.
    pub fn require_api_key(&self) -> QvmResult<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(QvmError::MissingApiKey)
    }
}

/// Path of the config file: `$FOREST_CONFIG` or `~/.forest_config.yaml`.
pub fn config_file_path() -> Option<PathBuf> {
    std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME)))
}

#[derive(Debug, Default)]
struct Overrides {
    api_key: Option<String>,
    endpoint: Option<String>,
}

static OVERRIDES: LazyLock<RwLock<Overrides>> =
    LazyLock::new(|| RwLock::new(Overrides::default()));

/// Set the API key for every connection created afterwards in this process.
pub fn set_api_key(key: impl Into<String>) {
    OVERRIDES.write().expect("config lock poisoned").api_key = Some(key.into());
}

/// Set the endpoint for every connection created afterwards in this process.
pub fn set_endpoint(endpoint: impl Into<String>) {
    OVERRIDES.write().expect("config lock poisoned").endpoint = Some(endpoint.into());
}

/// Drop all process-wide overrides.
pub fn reset() {
    *OVERRIDES.write().expect("config lock poisoned") = Overrides::default();
}

/// Snapshot of the effective configuration.
pub fn current() -> QvmResult<ForestConfig> {
    let mut config = ForestConfig::load()?;
    let overrides = OVERRIDES.read().expect("config lock poisoned");
    if let Some(key) = &overrides.api_key {
        config.api_key = Some(key.clone());
    }
    if let Some(endpoint) = &overrides.endpoint {
        config.endpoint = endpoint.clone();
    }
    Ok(config)
}
