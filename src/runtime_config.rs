// =============================================================================
// Runtime Configuration: service settings loaded at startup
// =============================================================================
//
// The service reads an optional JSON file. Every field carries
// `#[serde(default)]` so that a partial (or empty) file still loads, and a
// missing file falls back to the defaults. Environment variables override
// the file where noted.
//
// Indicator windows and strategy thresholds are fixed constants and are
// not read from this file.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "SIGNALS_CONFIG";
/// Environment variable overriding `bind_addr`.
pub const BIND_ADDR_ENV: &str = "SIGNALS_BIND_ADDR";
pub const DEFAULT_CONFIG_PATH: &str = "signals_config.json";

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_true() -> bool {
    true
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_timeframe() -> String {
    "daily".to_string()
}

fn default_max_candles() -> usize {
    10_000
}

// =============================================================================
// ServiceConfig
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Timeframe label used when a request omits one.
    #[serde(default = "default_timeframe")]
    pub default_timeframe: String,

    /// Upper bound on candles per request.
    #[serde(default = "default_max_candles")]
    pub max_candles: usize,

    /// Allow any origin / method / header.
    #[serde(default = "default_true")]
    pub permissive_cors: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            default_timeframe: default_timeframe(),
            max_candles: default_max_candles(),
            permissive_cors: true,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read service config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse service config from {}", path.display()))?;

        info!(
            path = %path.display(),
            bind_addr = %config.bind_addr,
            max_candles = config.max_candles,
            "service config loaded"
        );

        Ok(config)
    }

    /// Apply environment overrides on top of the loaded values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(addr) = std::env::var(BIND_ADDR_ENV) {
            let addr = addr.trim();
            if !addr.is_empty() {
                self.bind_addr = addr.to_string();
            }
        }
    }
}
