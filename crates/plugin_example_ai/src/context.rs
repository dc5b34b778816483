//! Per-match state.
//!
//! A [`MatchContext`] exists exactly while a match is running. It is created
//! by the plugin when the host reports the match start and dropped when the
//! match ends; dropping it disconnects all of its unit event slots.

use crate::config::{AiConfig, OpeningSettings};
use crate::host::{GameEvents, HostApi, Order, PlayerId, Unit};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use zycore::{SignalObject, Subscriber};

/// Counters collected over one match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchStats {
    pub units_created: u64,
    pub units_destroyed: u64,
    pub orders_issued: u64,
    pub orders_rejected: u64,
}

pub struct MatchContext {
    subscriber: Subscriber,
    host: Arc<dyn HostApi>,
    player: PlayerId,
    opening: OpeningSettings,
    opening_issued: AtomicBool,
    units_created: AtomicU64,
    units_destroyed: AtomicU64,
    orders_issued: AtomicU64,
    orders_rejected: AtomicU64,
}

impl MatchContext {
    /// Creates the context and binds it to the unit events of `events`.
    pub fn start(events: &GameEvents, host: Arc<dyn HostApi>, config: &AiConfig) -> Arc<Self> {
        info!("🎮 Game has started.");

        let context = Arc::new(Self {
            subscriber: Subscriber::new(),
            host,
            player: config.player_id(),
            opening: config.opening.clone(),
            opening_issued: AtomicBool::new(false),
            units_created: AtomicU64::new(0),
            units_destroyed: AtomicU64::new(0),
            orders_issued: AtomicU64::new(0),
            orders_rejected: AtomicU64::new(0),
        });

        events
            .unit_created
            .connect_method(&context, MatchContext::on_unit_created);
        events
            .unit_destroyed
            .connect_method(&context, MatchContext::on_unit_destroyed);

        context.log_lobby();
        context
    }

    /// The player slot this context plays for.
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Snapshot of the counters collected so far.
    pub fn stats(&self) -> MatchStats {
        MatchStats {
            units_created: self.units_created.load(Ordering::Relaxed),
            units_destroyed: self.units_destroyed.load(Ordering::Relaxed),
            orders_issued: self.orders_issued.load(Ordering::Relaxed),
            orders_rejected: self.orders_rejected.load(Ordering::Relaxed),
        }
    }

    fn log_lobby(&self) {
        for slot in 1..=2 {
            let player = PlayerId(slot);
            match self.host.player_race(player) {
                Some(race) => info!("Player {} race: {}", slot, race),
                None => debug!("No race available for {}", player),
            }
        }
    }

    fn on_unit_created(&self, (unit, player): &(Unit, PlayerId)) {
        info!("🆕 Unit is created: {} for {}", unit, player);
        self.units_created.fetch_add(1, Ordering::Relaxed);

        if self.is_opening_builder(unit) && !self.opening_issued.swap(true, Ordering::AcqRel) {
            self.issue_opening(unit);
        }
    }

    fn on_unit_destroyed(&self, (unit, killer): &(Unit, Option<Unit>)) {
        match killer {
            Some(killer) => info!("💀 Unit {} is killed by {}", unit, killer),
            None => info!("💀 Unit {} is destroyed", unit),
        }
        self.units_destroyed.fetch_add(1, Ordering::Relaxed);
    }

    fn is_opening_builder(&self, unit: &Unit) -> bool {
        self.opening.enabled && unit.owner == self.player && unit.type_name == self.opening.builder_unit
    }

    fn issue_opening(&self, builder: &Unit) {
        let order = Order::Build {
            builder: builder.id,
            structure: self.opening.structure.clone(),
        };

        match self.host.issue_order(order.clone()) {
            Ok(()) => {
                self.orders_issued.fetch_add(1, Ordering::Relaxed);
                info!("🏗️ Opening order issued: {}", order);
            }
            Err(e) => {
                // Let the next matching builder try again.
                self.opening_issued.store(false, Ordering::Release);
                self.orders_rejected.fetch_add(1, Ordering::Relaxed);
                warn!("⚠️ Opening order '{}' rejected: {}", order, e);
            }
        }
    }
}

impl SignalObject for MatchContext {
    fn subscriber(&self) -> &Subscriber {
        &self.subscriber
    }
}

impl Drop for MatchContext {
    fn drop(&mut self) {
        let stats = self.stats();
        info!(
            "🏁 Game has ended. units created: {}, destroyed: {}, orders issued: {}",
            stats.units_created, stats.units_destroyed, stats.orders_issued
        );
    }
}
