use super::types::*;
use crate::audio::RemediationOptions;
use crate::utils::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tools: ToolsConfig,
    pub logging: LoggingConfig,
    pub remediation: RemediationOptions,
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)?;
        Self::from_yaml(&config_str)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `config_path` when it exists, otherwise the built-in defaults.
    pub fn load_with_fallback<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();
        if config_path.exists() {
            Self::load(config_path)
        } else {
            debug!(
                "Configuration file {} not found, using defaults",
                config_path.display()
            );
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::validation(format!(
                "Invalid log level: {} (must be one of {})",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        if self.tools.ffprobe.trim().is_empty() {
            return Err(Error::validation("tools.ffprobe must not be empty"));
        }

        self.remediation.validate()
    }
}
