//! # Example AI Plugin
//!
//! A minimal game AI built on [`zycore`] signals. The host engine emits match
//! and unit events on a [`GameEvents`] set; the plugin reacts by logging what
//! happens and issuing a single opening build order through [`HostApi`].
//!
//! ## Lifecycle
//!
//! ```text
//! host                      ExampleAi                    MatchContext
//!  │ match_started ───────►  on_match_started ─────────►  start()
//!  │                                                      ├─ connect unit_created
//!  │                                                      └─ connect unit_destroyed
//!  │ unit_created ─────────────────────────────────────►  on_unit_created
//!  │ unit_destroyed ───────────────────────────────────►  on_unit_destroyed
//!  │ match_ended ─────────►  on_match_ended ───────────►  drop (slots released)
//! ```
//!
//! There is no global instance: the plugin owns the match context and
//! hands out `Arc`s to callers that ask for it.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use plugin_example_ai::{AiConfig, ExampleAi, GameEvents, HostApi, HostError, Order, PlayerId, Race};
//!
//! struct Headless;
//!
//! impl HostApi for Headless {
//!     fn player_race(&self, _player: PlayerId) -> Option<Race> {
//!         Some(Race::Terran)
//!     }
//!
//!     fn issue_order(&self, _order: Order) -> Result<(), HostError> {
//!         Ok(())
//!     }
//! }
//!
//! let events = Arc::new(GameEvents::new());
//! let plugin = ExampleAi::init(events.clone(), Arc::new(Headless), AiConfig::default());
//!
//! events.match_started.emit(&());
//! assert!(plugin.is_match_running());
//!
//! events.match_ended.emit(&());
//! assert!(!plugin.is_match_running());
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod host;
pub mod logging;
pub mod plugin;

#[cfg(test)]
mod tests;

pub use config::{AiConfig, LoggingSettings, OpeningSettings};
pub use context::{MatchContext, MatchStats};
pub use error::{HostError, PluginError};
pub use host::{GameEvents, HostApi, Order, PlayerId, Race, Unit, UnitId};
pub use logging::setup_logging;
pub use plugin::ExampleAi;

/// Plugin name reported to the host.
pub const PLUGIN_NAME: &str = "ExampleAI";

/// Version information for compatibility checks
pub const PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");
