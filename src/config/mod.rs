// Configuration module
// Author: kelexine (https://github.com/kelexine)

mod models;

pub use models::*;

use crate::error::{RelayError, Result};
use config::{Config, Environment, File};
use std::path::PathBuf;

/// Values supplied on the command line. They win over every other source.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. CLI arguments (highest)
    /// 2. Environment variables
    /// 3. Config file
    /// 4. Defaults (lowest)
    pub fn load(overrides: &Overrides) -> Result<Self> {
        // An explicitly named file must exist; the default one is optional
        let file = match &overrides.config_path {
            Some(path) => File::from(path.as_path()).required(true),
            None => File::with_name(&Self::default_config_path()).required(false),
        };

        let config = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&Self::default())?)
            .add_source(file)
            // Override with environment variables, e.g. CROPLY_RELAY_INFERENCE__API_KEY
            .add_source(
                Environment::with_prefix("CROPLY_RELAY")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("server.host", overrides.host.clone())?
            .set_override_option("server.port", overrides.port.map(i64::from))?
            .build()
            .map_err(|e| RelayError::Config(e.to_string()))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| RelayError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the relay cannot serve with.
    pub fn validate(&self) -> Result<()> {
        let inference = &self.inference;

        if inference.api_key.is_empty() {
            return Err(RelayError::Config(
                "inference.api_key is not set (CROPLY_RELAY_INFERENCE__API_KEY)".to_string(),
            ));
        }
        if inference.workspace.trim().is_empty() {
            return Err(RelayError::Config("inference.workspace is not set".to_string()));
        }
        if inference.workflow_id.trim().is_empty() {
            return Err(RelayError::Config("inference.workflow_id is not set".to_string()));
        }
        if self.server.port == 0 {
            return Err(RelayError::Config("server.port must be non-zero".to_string()));
        }

        let url = reqwest::Url::parse(&inference.api_base_url).map_err(|e| {
            RelayError::Config(format!(
                "inference.api_base_url '{}' is invalid: {}",
                inference.api_base_url, e
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(RelayError::Config(format!(
                "inference.api_base_url must be http(s), got '{}'",
                url.scheme()
            )));
        }

        Ok(())
    }

    fn default_config_path() -> String {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".croply-relay")
            .join("config.toml")
            .to_string_lossy()
            .to_string()
    }
}
