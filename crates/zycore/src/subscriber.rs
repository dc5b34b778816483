//! Lifetime-bound subscriptions.
//!
//! A [`Subscriber`] is embedded into any object that wants its slots to
//! disappear together with it. Each lifetime-bound slot is recorded twice:
//! once in the signal's slot table and once here as a `(bus, handle)` pair.
//! Whichever side goes away first removes the entry from the other side.

use crate::handle::{BusId, SlotHandle};
use crate::signal::{Signal, SlotRegistry};
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::trace;

/// One lifetime-bound slot targeting this subscriber.
struct Tracked {
    bus: BusId,
    handle: SlotHandle,
    registry: Weak<dyn SlotRegistry>,
}

/// Bookkeeping shared with the signals a subscriber is connected to.
pub(crate) struct SubscriberState {
    tracked: Mutex<Vec<Tracked>>,
}

impl SubscriberState {
    fn new() -> Self {
        Self {
            tracked: Mutex::new(Vec::new()),
        }
    }

    /// Called by a signal while it holds its own lock.
    pub(crate) fn on_attached(&self, bus: BusId, handle: SlotHandle, registry: Weak<dyn SlotRegistry>) {
        self.tracked.lock().push(Tracked { bus, handle, registry });
    }

    /// Forgets a slot. Missing entries are ignored: both sides may tear down
    /// the same pair.
    pub(crate) fn on_detached(&self, bus: BusId, handle: SlotHandle) {
        self.tracked
            .lock()
            .retain(|entry| !(entry.bus == bus && entry.handle == handle));
    }

    fn len(&self) -> usize {
        self.tracked.lock().len()
    }

    fn take_all(&self) -> Vec<Tracked> {
        std::mem::take(&mut *self.tracked.lock())
    }
}

/// Capability granting automatic disconnection on drop.
///
/// Embed one in a struct and implement [`SignalObject`] to be able to bind
/// methods with [`Signal::connect_method`]. Closures can be bound directly
/// with [`Signal::connect_scoped`].
///
/// Dropping the subscriber first emits [`destroyed`](Self::destroyed), then
/// disconnects every lifetime-bound slot from every signal that is still
/// alive. Signals that were already dropped are skipped.
pub struct Subscriber {
    state: Arc<SubscriberState>,
    destroyed: Signal<()>,
}

impl Subscriber {
    /// Creates a subscriber with no connections.
    pub fn new() -> Self {
        Self {
            state: Arc::new(SubscriberState::new()),
            destroyed: Signal::new(),
        }
    }

    /// Signal emitted when the subscriber starts dropping, before any of its
    /// slots are disconnected.
    pub fn destroyed(&self) -> &Signal<()> {
        &self.destroyed
    }

    /// Number of lifetime-bound slots currently targeting this subscriber.
    pub fn connection_count(&self) -> usize {
        self.state.len()
    }

    pub(crate) fn state(&self) -> &Arc<SubscriberState> {
        &self.state
    }
}

impl Default for Subscriber {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Subscriber {
    fn drop(&mut self) {
        self.destroyed.emit(&());

        // Our lock is released before any signal lock is taken.
        let tracked = self.state.take_all();
        for entry in tracked {
            match entry.registry.upgrade() {
                Some(registry) => registry.release_scoped(entry.handle),
                None => trace!("{} already gone, skipping {}", entry.bus, entry.handle),
            }
        }
    }
}

impl fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("connections", &self.state.len())
            .finish()
    }
}

/// Objects that embed a [`Subscriber`].
pub trait SignalObject {
    fn subscriber(&self) -> &Subscriber;
}

impl SignalObject for Subscriber {
    fn subscriber(&self) -> &Subscriber {
        self
    }
}
