//! Plugin configuration loaded from TOML.

use crate::error::PluginError;
use crate::host::PlayerId;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

fn default_player() -> u32 {
    1
}

fn default_builder_unit() -> String {
    "SCV".to_string()
}

fn default_structure() -> String {
    "SupplyDepot".to_string()
}

fn default_opening_enabled() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Top-level plugin configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    /// Player slot the plugin controls
    #[serde(default = "default_player")]
    pub player: u32,
    /// The single build order issued at the start of a match
    #[serde(default)]
    pub opening: OpeningSettings,
    /// Logging configuration settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Opening build order.
///
/// The first unit of type `builder_unit` created for our player is told to
/// build one `structure`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningSettings {
    #[serde(default = "default_opening_enabled")]
    pub enabled: bool,
    #[serde(default = "default_builder_unit")]
    pub builder_unit: String,
    #[serde(default = "default_structure")]
    pub structure: String,
}

/// Logging system configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Whether to output logs in JSON format
    #[serde(default)]
    pub json_format: bool,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            player: default_player(),
            opening: OpeningSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for OpeningSettings {
    fn default() -> Self {
        Self {
            enabled: default_opening_enabled(),
            builder_unit: default_builder_unit(),
            structure: default_structure(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

impl AiConfig {
    /// Loads configuration from a TOML file.
    ///
    /// If the file doesn't exist, writes the default configuration to `path`
    /// and returns it.
    pub fn load_from_file(path: &Path) -> Result<Self, PluginError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: AiConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let default_config = AiConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            std::fs::write(path, toml_content)?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    /// Validates the configuration for consistency and correctness.
    pub fn validate(&self) -> Result<(), PluginError> {
        if self.player == 0 {
            return Err(PluginError::InvalidConfig(
                "player slots are numbered from 1".to_string(),
            ));
        }

        if self.opening.builder_unit.trim().is_empty() {
            return Err(PluginError::InvalidConfig(
                "opening.builder_unit cannot be empty".to_string(),
            ));
        }

        if self.opening.structure.trim().is_empty() {
            return Err(PluginError::InvalidConfig(
                "opening.structure cannot be empty".to_string(),
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(PluginError::InvalidConfig(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            )));
        }

        Ok(())
    }

    /// The player slot this plugin controls.
    pub fn player_id(&self) -> PlayerId {
        PlayerId(self.player)
    }
}
