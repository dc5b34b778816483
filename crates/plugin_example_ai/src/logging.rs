//! Logging setup for hosts that don't install their own subscriber.

use crate::config::LoggingSettings;
use crate::error::PluginError;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs a global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Fails if a global
/// subscriber is already set, which is the normal case when the host engine
/// owns logging.
pub fn setup_logging(config: &LoggingSettings) -> Result<(), PluginError> {
    let log_level = config.level.as_str();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if config.json_format {
        registry
            .with(fmt::layer().json().with_thread_names(true))
            .try_init()
            .map_err(|e| PluginError::LoggingError(e.to_string()))?;
    } else {
        registry
            .with(fmt::layer().with_ansi(true).with_thread_names(true))
            .try_init()
            .map_err(|e| PluginError::LoggingError(e.to_string()))?;
    }

    info!("🔧 Logging initialized with level: {}", log_level);
    Ok(())
}
