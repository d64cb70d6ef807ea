//! Client configuration.
//!
//! Configuration is assembled from three sources, in priority order:
//! YAML file > environment variables (after `.env` loading) > defaults.
//!
//! # Example
//! ```rust,no_run
//! use callsim_client::config::ClientConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ClientConfig::from_env()?;
//!
//! // Load from a YAML file with environment variable fallback
//! let config = ClientConfig::from_file(&PathBuf::from("config.yaml"))?;
//!
//! println!("Talking to {}", config.base_url);
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::core::session::Lang;

/// Default backend address (the Flask development server's default port).
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Client configuration for the CallSim backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the CallSim backend, e.g. `https://callsim.example.com`.
    pub base_url: String,
    /// API key sent as `X-API-Key` on every request when present.
    pub api_key: Option<String>,
    /// Default synthesis/recognition language.
    pub lang: Lang,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            lang: Lang::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

/// Shape of the optional YAML config file. Every field is optional; missing
/// fields fall back to the environment and then to defaults.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    base_url: Option<String>,
    api_key: Option<String>,
    lang: Option<String>,
    request_timeout_secs: Option<u64>,
    connect_timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// Build a configuration pointing at `base_url` with everything else at
    /// defaults. Used by front-ends and tests that already know the address.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Call `dotenvy::dotenv()` beforehand to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            base_url: std::env::var("CALLSIM_BASE_URL").unwrap_or(defaults.base_url),
            api_key: std::env::var("CALLSIM_API_KEY").ok().filter(|k| !k.is_empty()),
            lang: std::env::var("CALLSIM_LANG")
                .map(|l| Lang::from_str_or_default(&l))
                .unwrap_or(defaults.lang),
            request_timeout_secs: env_u64("CALLSIM_REQUEST_TIMEOUT_SECS")
                .unwrap_or(defaults.request_timeout_secs),
            connect_timeout_secs: env_u64("CALLSIM_CONNECT_TIMEOUT_SECS")
                .unwrap_or(defaults.connect_timeout_secs),
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file, falling back to environment
    /// variables (and then defaults) for fields the file omits.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        let file: FileConfig = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })?;

        let env = Self::from_env()?;
        let config = Self {
            base_url: file.base_url.unwrap_or(env.base_url),
            api_key: file.api_key.or(env.api_key),
            lang: file
                .lang
                .map(|l| Lang::from_str_or_default(&l))
                .unwrap_or(env.lang),
            request_timeout_secs: file.request_timeout_secs.unwrap_or(env.request_timeout_secs),
            connect_timeout_secs: file.connect_timeout_secs.unwrap_or(env.connect_timeout_secs),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the base URL: absolute, http or https, with a host.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        if parsed.host_str().is_none() {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: "missing host".to_string(),
            });
        }
        Ok(())
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
