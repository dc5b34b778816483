//! Error types for the example AI plugin.
//!
//! Host errors are never fatal to the plugin; they are logged where they
//! occur. [`PluginError`] covers startup only.

use crate::host::UnitId;

/// Errors reported by the host engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// The host refused to accept an order
    #[error("Order rejected: {0}")]
    OrderRejected(String),

    /// The order referenced a unit the host does not know
    #[error("Unit not found: {0}")]
    UnitNotFound(UnitId),
}

/// Main error type for the plugin.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// Configuration is well-formed but invalid
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Config parse error: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Default configuration could not be written out
    #[error("Config serialization error: {0}")]
    SerializationError(#[from] toml::ser::Error),

    /// Logging could not be initialized
    #[error("Logging setup failed: {0}")]
    LoggingError(String),
}
