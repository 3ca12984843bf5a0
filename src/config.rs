use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

/// Wizard timing and reveal settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    /// Delay before leaving the Initializing stage
    pub startup_delay_ms: u64,

    /// Simulated verification delay between question stages
    pub step_delay_ms: u64,

    /// Delay before the Result stage
    pub processing_delay_ms: u64,

    /// Amount the reveal counts up to
    pub reveal_target: u64,

    /// Total length of the reveal animation
    pub reveal_duration_ms: u64,

    /// Number of reveal ticks
    pub reveal_ticks: u32,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            startup_delay_ms: 2500,
            step_delay_ms: 2000,
            processing_delay_ms: 2500,
            reveal_target: 2000,
            reveal_duration_ms: 1500,
            reveal_ticks: 60,
        }
    }
}

impl WizardConfig {
    /// Load and validate configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |source: Box<dyn std::error::Error + Send + Sync>| {
            ConfigError::LoadFailed {
                path: path.display().to_string(),
                source,
            }
        };

        let content = fs::read_to_string(path).map_err(|e| load_failed(Box::new(e)))?;
        let config: WizardConfig =
            serde_json::from_str(&content).map_err(|e| load_failed(Box::new(e)))?;
        config.validate()?;

        tracing::info!("Loaded wizard config from: {}", path.display());
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No wizard config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: WizardConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reveal_ticks == 0 {
            return Err(ConfigError::Invalid(
                "reveal_ticks must be positive".to_string(),
            ));
        }
        if self.reveal_duration_ms == 0 {
            return Err(ConfigError::Invalid(
                "reveal_duration_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }

    pub fn reveal_duration(&self) -> Duration {
        Duration::from_millis(self.reveal_duration_ms)
    }
}
