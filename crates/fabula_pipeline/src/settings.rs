//! Generation endpoint configuration.

use config::{Config, Environment, File};
use fabula_error::{ConfigError, FabulaResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Configuration for the external generation endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GenerationSettings {
    /// Base URL of the generation server
    pub base_url: String,
    /// Bearer token, if the server requires one
    #[serde(default)]
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Default sampling temperature
    pub temperature: f32,
    /// Default token budget per response
    pub max_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            api_key: None,
            timeout_secs: 120,
            temperature: 0.7,
            max_tokens: 2048,
        }
    }
}

impl GenerationSettings {
    /// Load settings with precedence: environment > local file > defaults.
    ///
    /// Sources in order of precedence (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. `./fabula.toml` (optional)
    /// 3. `FABULA_*` environment variables (e.g. `FABULA_BASE_URL`)
    ///
    /// # Errors
    ///
    /// Returns an error if a source fails to parse.
    #[instrument]
    pub fn load() -> FabulaResult<Self> {
        debug!("Loading generation settings");

        let defaults = Self::default();

        Config::builder()
            .set_default("base_url", defaults.base_url)
            .map_err(|e| ConfigError::new(e.to_string()))?
            .set_default("timeout_secs", defaults.timeout_secs as i64)
            .map_err(|e| ConfigError::new(e.to_string()))?
            .set_default("temperature", defaults.temperature as f64)
            .map_err(|e| ConfigError::new(e.to_string()))?
            .set_default("max_tokens", defaults.max_tokens as i64)
            .map_err(|e| ConfigError::new(e.to_string()))?
            .add_source(File::with_name("fabula").required(false))
            .add_source(Environment::with_prefix("FABULA"))
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| {
                ConfigError::new(format!("Failed to parse configuration: {}", e)).into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_server_contract() {
        let settings = GenerationSettings::default();
        assert_eq!(settings.temperature, 0.7);
        assert_eq!(settings.max_tokens, 2048);
        assert!(settings.api_key.is_none());
    }
}
