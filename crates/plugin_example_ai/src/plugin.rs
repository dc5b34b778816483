//! Plugin entry point.

use crate::config::AiConfig;
use crate::context::{MatchContext, MatchStats};
use crate::error::PluginError;
use crate::host::{GameEvents, HostApi};
use crate::logging::setup_logging;
use crate::{PLUGIN_NAME, PLUGIN_VERSION};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};
use zycore::{SignalObject, Subscriber};

/// The example AI plugin.
///
/// Owns at most one [`MatchContext`] at a time. The context is created when
/// the host emits `match_started` and dropped on `match_ended` or
/// [`cleanup`](Self::cleanup). Dropping the plugin disconnects it from the
/// match lifecycle signals.
pub struct ExampleAi {
    subscriber: Subscriber,
    events: Arc<GameEvents>,
    host: Arc<dyn HostApi>,
    config: AiConfig,
    current: Mutex<Option<Arc<MatchContext>>>,
}

impl ExampleAi {
    /// Creates the plugin and registers it for the host's match lifecycle
    /// signals.
    ///
    /// # Arguments
    ///
    /// * `events` - Signals the host emits on; kept for the plugin's lifetime
    /// * `host` - Host engine interface used to query players and issue orders
    /// * `config` - Validated plugin configuration
    ///
    /// # Returns
    ///
    /// The plugin, shared. The signals only hold weak references to it, so
    /// dropping the returned `Arc` unloads the plugin and disconnects it.
    pub fn init(events: Arc<GameEvents>, host: Arc<dyn HostApi>, config: AiConfig) -> Arc<Self> {
        let plugin = Arc::new(Self {
            subscriber: Subscriber::new(),
            events,
            host,
            config,
            current: Mutex::new(None),
        });

        plugin
            .events
            .match_started
            .connect_method(&plugin, |plugin: &ExampleAi, _: &()| plugin.on_match_started());
        plugin
            .events
            .match_ended
            .connect_method(&plugin, |plugin: &ExampleAi, _: &()| plugin.on_match_ended());

        info!(
            "🔌 {} v{}: registered for match lifecycle events",
            plugin.name(),
            plugin.version()
        );
        plugin
    }

    /// Loads and validates the config at `config_path`, installs logging if
    /// the host hasn't, then calls [`init`](Self::init).
    ///
    /// # Returns
    ///
    /// The initialized plugin, or an error if the configuration could not be
    /// read or is invalid. Nothing is connected on error.
    pub fn bootstrap(
        events: Arc<GameEvents>,
        host: Arc<dyn HostApi>,
        config_path: &Path,
    ) -> Result<Arc<Self>, PluginError> {
        let config = AiConfig::load_from_file(config_path)?;
        config.validate()?;

        if let Err(e) = setup_logging(&config.logging) {
            debug!("Keeping the host's logging setup: {}", e);
        }

        Ok(Self::init(events, host, config))
    }

    /// Ends the running match, if any, as if the host had ended it.
    pub fn cleanup(&self) {
        let ended = self.current.lock().take();
        if ended.is_some() {
            debug!("{}: cleaning up running match", PLUGIN_NAME);
        }
    }

    /// Plugin name reported to the host.
    pub fn name(&self) -> &str {
        PLUGIN_NAME
    }

    /// Plugin version reported to the host.
    pub fn version(&self) -> &str {
        PLUGIN_VERSION
    }

    /// Whether a match context currently exists.
    pub fn is_match_running(&self) -> bool {
        self.current.lock().is_some()
    }

    /// The running match, if any.
    pub fn current_match(&self) -> Option<Arc<MatchContext>> {
        self.current.lock().clone()
    }

    /// Statistics of the running match, if any.
    pub fn match_stats(&self) -> Option<MatchStats> {
        self.current.lock().as_ref().map(|context| context.stats())
    }

    /// Configuration the plugin was initialized with.
    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    fn on_match_started(&self) {
        let context = MatchContext::start(&self.events, Arc::clone(&self.host), &self.config);
        let previous = self.current.lock().replace(context);
        if previous.is_some() {
            warn!("⚠️ {}: match started while another was running, replacing it", PLUGIN_NAME);
        }
    }

    fn on_match_ended(&self) {
        let ended = self.current.lock().take();
        if ended.is_none() {
            debug!("{}: match ended without a running match", PLUGIN_NAME);
        }
    }
}

impl SignalObject for ExampleAi {
    fn subscriber(&self) -> &Subscriber {
        &self.subscriber
    }
}

impl Drop for ExampleAi {
    fn drop(&mut self) {
        self.cleanup();
        info!("🔌 {}: unloaded", self.name());
    }
}
