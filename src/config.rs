/// Runtime configuration.
///
/// `DashboardConfig` shapes the rendered views; `ServerConfig` is read from
/// the environment by the server binary.
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rows shown in the data preview
pub const DEFAULT_PREVIEW_ROWS: usize = 5;
/// Categories kept by the ranked views
pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub preview_rows: usize,
    pub top_n: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            preview_rows: DEFAULT_PREVIEW_ROWS,
            top_n: DEFAULT_TOP_N,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub dashboard: DashboardConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            dashboard: DashboardConfig::default(),
        }
    }
}

/// An environment variable held a value that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{variable} must be a number, got '{value}'")]
pub struct ConfigError {
    pub variable: &'static str,
    pub value: String,
}

impl ServerConfig {
    /// Read `HOST`, `PORT` and `MAX_UPLOAD_BYTES` from the process
    /// environment, falling back to the defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, with an injectable lookup for tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ServerConfig::default();

        if let Some(host) = lookup("HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("PORT") {
            config.port = port.trim().parse().map_err(|_| ConfigError {
                variable: "PORT",
                value: port.clone(),
            })?;
        }
        if let Some(limit) = lookup("MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = limit.trim().parse().map_err(|_| ConfigError {
                variable: "MAX_UPLOAD_BYTES",
                value: limit.clone(),
            })?;
        }

        Ok(config)
    }
}
