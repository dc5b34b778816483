//! Plugin lifecycle tests against a mock host.

use crate::{
    AiConfig, ExampleAi, GameEvents, HostApi, HostError, MatchStats, Order, PlayerId, Race, Unit, UnitId,
    PLUGIN_NAME, PLUGIN_VERSION,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use zycore::SignalObject;

#[derive(Default)]
struct MockHost {
    races: HashMap<u32, Race>,
    orders: Mutex<Vec<Order>>,
    reject_next: Mutex<u32>,
    lost_units: Mutex<Vec<UnitId>>,
}

impl MockHost {
    fn with_races(races: &[(u32, Race)]) -> Self {
        Self {
            races: races.iter().copied().collect(),
            ..Self::default()
        }
    }

    fn reject_next(&self, count: u32) {
        *self.reject_next.lock().unwrap() = count;
    }

    /// Makes the host treat `id` as gone by the time an order reaches it.
    fn lose_unit(&self, id: u64) {
        self.lost_units.lock().unwrap().push(UnitId(id));
    }

    fn orders(&self) -> Vec<Order> {
        self.orders.lock().unwrap().clone()
    }
}

impl HostApi for MockHost {
    fn player_race(&self, player: PlayerId) -> Option<Race> {
        self.races.get(&player.0).copied()
    }

    fn issue_order(&self, order: Order) -> Result<(), HostError> {
        let mut reject = self.reject_next.lock().unwrap();
        if *reject > 0 {
            *reject -= 1;
            return Err(HostError::OrderRejected("not enough minerals".to_string()));
        }
        let Order::Build { builder, .. } = &order;
        if self.lost_units.lock().unwrap().contains(builder) {
            return Err(HostError::UnitNotFound(*builder));
        }
        self.orders.lock().unwrap().push(order);
        Ok(())
    }
}

fn setup() -> (Arc<GameEvents>, Arc<MockHost>, Arc<ExampleAi>) {
    let events = Arc::new(GameEvents::new());
    let host = Arc::new(MockHost::with_races(&[(1, Race::Terran)]));
    let plugin = ExampleAi::init(events.clone(), host.clone(), AiConfig::default());
    (events, host, plugin)
}

fn create(events: &GameEvents, unit: Unit) {
    let owner = unit.owner;
    events.unit_created.emit(&(unit, owner));
}

#[test]
fn test_match_lifecycle_creates_and_drops_context() {
    let (events, _host, plugin) = setup();
    assert!(!plugin.is_match_running());
    assert_eq!(events.match_started.len(), 1);
    assert_eq!(events.match_ended.len(), 1);

    events.match_started.emit(&());
    assert!(plugin.is_match_running());
    assert_eq!(events.unit_created.len(), 1);
    assert_eq!(events.unit_destroyed.len(), 1);

    events.match_ended.emit(&());
    assert!(!plugin.is_match_running());
    assert!(events.unit_created.is_empty());
    assert!(events.unit_destroyed.is_empty());
}

#[test]
fn test_unit_events_are_counted() {
    let (events, _host, plugin) = setup();
    events.match_started.emit(&());

    create(&events, Unit::new(1, "Marine", 1));
    create(&events, Unit::new(2, "Zergling", 2));
    events
        .unit_destroyed
        .emit(&(Unit::new(2, "Zergling", 2), Some(Unit::new(1, "Marine", 1))));
    events.unit_destroyed.emit(&(Unit::new(1, "Marine", 1), None));

    let stats = plugin.match_stats().expect("match running");
    assert_eq!(stats.units_created, 2);
    assert_eq!(stats.units_destroyed, 2);
}

#[test]
fn test_opening_order_issued_once_for_own_builder() {
    let (events, host, plugin) = setup();
    events.match_started.emit(&());

    // Enemy builder and own non-builder are ignored.
    create(&events, Unit::new(10, "SCV", 2));
    create(&events, Unit::new(11, "Marine", 1));
    assert!(host.orders().is_empty());

    create(&events, Unit::new(12, "SCV", 1));
    create(&events, Unit::new(13, "SCV", 1));

    assert_eq!(
        host.orders(),
        vec![Order::Build {
            builder: UnitId(12),
            structure: "SupplyDepot".to_string(),
        }]
    );
    assert_eq!(plugin.match_stats().map(|s| s.orders_issued), Some(1));
}

#[test]
fn test_rejected_opening_is_retried_by_next_builder() {
    let (events, host, plugin) = setup();
    host.reject_next(1);
    events.match_started.emit(&());

    create(&events, Unit::new(20, "SCV", 1));
    assert!(host.orders().is_empty());

    create(&events, Unit::new(21, "SCV", 1));
    assert_eq!(host.orders().len(), 1);

    assert_eq!(
        plugin.match_stats(),
        Some(MatchStats {
            units_created: 2,
            units_destroyed: 0,
            orders_issued: 1,
            orders_rejected: 1,
        })
    );
}

#[test]
fn test_vanished_builder_is_rejected_and_retried() {
    let (events, host, plugin) = setup();
    host.lose_unit(30);
    events.match_started.emit(&());

    create(&events, Unit::new(30, "SCV", 1));
    assert!(host.orders().is_empty());

    create(&events, Unit::new(31, "SCV", 1));
    assert_eq!(
        host.orders(),
        vec![Order::Build {
            builder: UnitId(31),
            structure: "SupplyDepot".to_string(),
        }]
    );

    let stats = plugin.match_stats().expect("match running");
    assert_eq!(stats.orders_rejected, 1);
    assert_eq!(stats.orders_issued, 1);
}

#[test]
fn test_host_error_messages() {
    assert_eq!(HostError::UnitNotFound(UnitId(30)).to_string(), "Unit not found: 0x1e");
    assert_eq!(
        HostError::OrderRejected("not enough minerals".to_string()).to_string(),
        "Order rejected: not enough minerals"
    );
}

#[test]
fn test_plugin_reports_name_and_version() {
    let (_events, _host, plugin) = setup();
    assert_eq!(plugin.name(), PLUGIN_NAME);
    assert_eq!(plugin.name(), "ExampleAI");
    assert_eq!(plugin.version(), PLUGIN_VERSION);
    assert_eq!(plugin.version(), "0.1.0");
}

#[test]
fn test_disabled_opening_issues_nothing() {
    let events = Arc::new(GameEvents::new());
    let host = Arc::new(MockHost::default());
    let mut config = AiConfig::default();
    config.opening.enabled = false;
    let _plugin = ExampleAi::init(events.clone(), host.clone(), config);

    events.match_started.emit(&());
    create(&events, Unit::new(1, "SCV", 1));
    assert!(host.orders().is_empty());
}

#[test]
fn test_events_after_match_end_are_ignored() {
    let (events, host, plugin) = setup();
    events.match_started.emit(&());
    let context = plugin.current_match().expect("match running");
    let weak = Arc::downgrade(&context);
    drop(context);

    events.match_ended.emit(&());
    assert!(weak.upgrade().is_none());

    create(&events, Unit::new(1, "SCV", 1));
    assert!(host.orders().is_empty());
    assert!(plugin.match_stats().is_none());
}

#[test]
fn test_new_match_starts_fresh() {
    let (events, host, plugin) = setup();

    events.match_started.emit(&());
    create(&events, Unit::new(1, "SCV", 1));
    events.match_ended.emit(&());

    events.match_started.emit(&());
    assert_eq!(plugin.match_stats(), Some(MatchStats::default()));
    create(&events, Unit::new(2, "SCV", 1));

    assert_eq!(host.orders().len(), 2);
}

#[test]
fn test_restart_without_end_replaces_context() {
    let (events, _host, plugin) = setup();

    events.match_started.emit(&());
    let first = Arc::downgrade(&plugin.current_match().expect("first match"));
    events.match_started.emit(&());

    assert!(first.upgrade().is_none());
    assert!(plugin.is_match_running());
    // Only the second context is bound to unit events.
    assert_eq!(events.unit_created.len(), 1);
}

#[test]
fn test_cleanup_ends_running_match() {
    let (events, _host, plugin) = setup();
    events.match_started.emit(&());

    plugin.cleanup();
    assert!(!plugin.is_match_running());
    assert!(events.unit_created.is_empty());

    // Ending after cleanup is harmless.
    events.match_ended.emit(&());
}

#[test]
fn test_dropping_plugin_disconnects_everything() {
    let (events, _host, plugin) = setup();
    events.match_started.emit(&());

    drop(plugin);
    assert!(events.match_started.is_empty());
    assert!(events.match_ended.is_empty());
    assert!(events.unit_created.is_empty());

    // The host may keep emitting.
    events.match_started.emit(&());
    create(&events, Unit::new(1, "SCV", 1));
}

#[test]
fn test_context_tracks_its_connections() {
    let (events, _host, plugin) = setup();
    events.match_started.emit(&());

    let context = plugin.current_match().expect("match running");
    assert_eq!(context.subscriber().connection_count(), 2);

    // Ending the match while a caller still holds the context keeps it alive
    // but the plugin no longer tracks it.
    events.match_ended.emit(&());
    assert!(!plugin.is_match_running());
    assert_eq!(context.subscriber().connection_count(), 2);

    drop(context);
    assert!(events.unit_created.is_empty());
}

#[test]
fn test_missing_opponent_race_is_tolerated() {
    let events = Arc::new(GameEvents::new());
    let host = Arc::new(MockHost::with_races(&[(1, Race::Protoss)]));
    let plugin = ExampleAi::init(events.clone(), host, AiConfig::default());

    events.match_started.emit(&());
    assert!(plugin.is_match_running());
    assert_eq!(plugin.current_match().map(|c| c.player()), Some(PlayerId(1)));
}

#[test]
fn test_bootstrap_from_config_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("example_ai.toml");
    std::fs::write(
        &path,
        r#"
        player = 2

        [opening]
        builder_unit = "Probe"
        structure = "Pylon"
        "#,
    )
    .expect("write config");

    let events = Arc::new(GameEvents::new());
    let host = Arc::new(MockHost::default());
    let plugin = ExampleAi::bootstrap(events.clone(), host.clone(), &path).expect("bootstrap");
    assert_eq!(plugin.config().player, 2);

    events.match_started.emit(&());
    create(&events, Unit::new(5, "Probe", 2));
    assert_eq!(
        host.orders(),
        vec![Order::Build {
            builder: UnitId(5),
            structure: "Pylon".to_string(),
        }]
    );
}

#[test]
fn test_bootstrap_rejects_invalid_config() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("example_ai.toml");
    std::fs::write(&path, "player = 0").expect("write config");

    let events = Arc::new(GameEvents::new());
    let result = ExampleAi::bootstrap(events.clone(), Arc::new(MockHost::default()), &path);
    assert!(matches!(result, Err(crate::PluginError::InvalidConfig(_))));
    assert!(events.match_started.is_empty());
}

#[test]
fn test_unit_display() {
    let unit = Unit::new(255, "Marine", 1);
    assert_eq!(unit.to_string(), "Marine [0xff] (player 1)");
    assert_eq!(Race::Zerg.to_string(), "Zerg");
}
