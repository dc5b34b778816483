//! The host engine as seen by the plugin.
//!
//! The real engine loads the plugin into its own process and drives it
//! through callbacks. Here it is reduced to two things: a [`HostApi`] the
//! plugin calls into, and a set of [`GameEvents`] signals the host emits on.

use crate::error::HostError;
use serde::{Deserialize, Serialize};
use std::fmt;
use zycore::Signal;

/// Player slot in a match (1-based, as the host numbers them).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.0)
    }
}

/// Host-assigned unit identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u64);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Race a player picked in the lobby.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Race {
    Terran,
    Zerg,
    Protoss,
    Random,
}

impl fmt::Display for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Race::Terran => "Terran",
            Race::Zerg => "Zerg",
            Race::Protoss => "Protoss",
            Race::Random => "Random",
        };
        f.write_str(name)
    }
}

/// Snapshot of a unit as delivered with an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub type_name: String,
    pub owner: PlayerId,
}

impl Unit {
    pub fn new(id: u64, type_name: impl Into<String>, owner: u32) -> Self {
        Self {
            id: UnitId(id),
            type_name: type_name.into(),
            owner: PlayerId(owner),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] ({})", self.type_name, self.id, self.owner)
    }
}

/// Orders the plugin can hand to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Order {
    /// Have `builder` construct a structure of the given type
    Build { builder: UnitId, structure: String },
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Order::Build { builder, structure } => write!(f, "build {structure} with {builder}"),
        }
    }
}

/// Calls the plugin can make into the host engine.
pub trait HostApi: Send + Sync {
    /// Race picked by `player`, or `None` when that slot is not in the match.
    fn player_race(&self, player: PlayerId) -> Option<Race>;

    /// Submits an order for execution.
    fn issue_order(&self, order: Order) -> Result<(), HostError>;
}

/// Signals the host emits from its own callback hooks.
#[derive(Debug, Default)]
pub struct GameEvents {
    pub match_started: Signal<()>,
    pub match_ended: Signal<()>,
    /// Created unit and the player it was created for.
    pub unit_created: Signal<(Unit, PlayerId)>,
    /// Destroyed unit and its killer, if any.
    pub unit_destroyed: Signal<(Unit, Option<Unit>)>,
}

impl GameEvents {
    pub fn new() -> Self {
        Self::default()
    }
}
