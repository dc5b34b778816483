//! Typed multicast signal with plain and lifetime-bound slots.
//!
//! A [`Signal<A>`] owns an ordered table of slots keyed by [`SlotHandle`].
//! Emitting invokes every slot present when the emit started, in ascending
//! handle order. Slots may be connected or disconnected from inside a
//! callback of the same signal: the table lives behind a re-entrant lock and
//! no table borrow is held while a callback runs.
//!
//! # Lock ordering
//!
//! Whenever both a signal and a subscriber lock are held at once, the signal
//! lock is taken first. Subscribers release their own lock before calling
//! back into any signal (see [`Subscriber`]).

use crate::handle::{BusId, SlotHandle};
use crate::subscriber::{SignalObject, Subscriber, SubscriberState};
use parking_lot::ReentrantMutex;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::trace;

/// Callback type stored in a slot.
pub type Callback<A> = dyn Fn(&A) + Send + Sync;

/// Dispatch counters for a single signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalStats {
    /// Number of `emit` calls.
    pub emits: u64,
    /// Number of callback invocations across all emits.
    pub deliveries: u64,
    /// Slots that were part of an emit snapshot but got disconnected before
    /// their turn came.
    pub skipped_deliveries: u64,
    /// Slots ever connected.
    pub total_connected: u64,
    /// Slots ever removed, whichever side removed them.
    pub total_disconnected: u64,
}

enum SlotKind {
    /// No lifetime dependency.
    Plain,
    /// Bound to a subscriber. The back-reference is for bookkeeping only.
    Scoped(Weak<SubscriberState>),
}

struct Slot<A> {
    callback: Arc<Callback<A>>,
    kind: SlotKind,
}

impl<A> Slot<A> {
    /// Tells the bound subscriber (if any, and if still alive) to forget
    /// this slot.
    fn detach(&self, bus: BusId, handle: SlotHandle) {
        if let SlotKind::Scoped(subscriber) = &self.kind {
            if let Some(subscriber) = subscriber.upgrade() {
                subscriber.on_detached(bus, handle);
            }
        }
    }
}

struct SlotTable<A> {
    slots: BTreeMap<SlotHandle, Slot<A>>,
    next_handle: SlotHandle,
    stats: SignalStats,
}

impl<A> SlotTable<A> {
    fn new() -> Self {
        Self {
            slots: BTreeMap::new(),
            next_handle: SlotHandle::FIRST,
            stats: SignalStats::default(),
        }
    }

    fn insert(&mut self, callback: Arc<Callback<A>>, kind: SlotKind) -> SlotHandle {
        let handle = self.next_handle;
        self.next_handle = handle.next();
        self.slots.insert(handle, Slot { callback, kind });
        self.stats.total_connected += 1;
        handle
    }

    fn remove(&mut self, handle: SlotHandle) -> Option<Slot<A>> {
        let slot = self.slots.remove(&handle)?;
        self.stats.total_disconnected += 1;
        Some(slot)
    }

    fn take_all(&mut self) -> BTreeMap<SlotHandle, Slot<A>> {
        let slots = std::mem::take(&mut self.slots);
        self.stats.total_disconnected += slots.len() as u64;
        slots
    }
}

/// Shared part of a signal. Subscribers reach it through a `Weak`.
pub(crate) struct SignalCore<A> {
    id: BusId,
    table: ReentrantMutex<RefCell<SlotTable<A>>>,
}

impl<A> SignalCore<A> {
    /// Removes every slot, notifying bound subscribers.
    ///
    /// Removed slots are dropped after the table borrow ends, since dropping
    /// a callback may run arbitrary code that re-enters this signal.
    fn release_all(&self) -> usize {
        let guard = self.table.lock();
        let released = guard.borrow_mut().take_all();
        let count = released.len();
        for (handle, slot) in &released {
            slot.detach(self.id, *handle);
        }
        drop(released);
        count
    }
}

/// Entry point subscribers use to drop their slots from a signal of any
/// payload type.
pub(crate) trait SlotRegistry: Send + Sync {
    /// Removes a lifetime-bound slot whose subscriber is going away.
    ///
    /// The subscriber has already forgotten the slot, so it is not called
    /// back.
    fn release_scoped(&self, handle: SlotHandle);
}

impl<A> SlotRegistry for SignalCore<A> {
    fn release_scoped(&self, handle: SlotHandle) {
        let guard = self.table.lock();
        let removed = guard.borrow_mut().remove(handle);
        if removed.is_some() {
            trace!("🔌 {} released {} of a dropped subscriber", self.id, handle);
        }
    }
}

/// Typed, thread-safe multicast signal.
///
/// `A` is the payload type; use a tuple for several arguments. Callbacks
/// receive the payload by shared reference, so each of them observes the
/// same value and none can mutate it for the others unless `A` opts into
/// interior mutability.
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use zycore::Signal;
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let signal: Signal<i32> = Signal::new();
///
/// let sink = seen.clone();
/// let handle = signal.connect(move |value| sink.lock().unwrap().push(*value));
///
/// signal.emit(&5);
/// assert!(signal.disconnect(handle));
/// signal.emit(&7);
///
/// assert_eq!(*seen.lock().unwrap(), vec![5]);
/// ```
pub struct Signal<A> {
    core: Arc<SignalCore<A>>,
}

impl<A: 'static> Signal<A> {
    /// Creates a signal with no slots.
    pub fn new() -> Self {
        Self {
            core: Arc::new(SignalCore {
                id: BusId::next(),
                table: ReentrantMutex::new(RefCell::new(SlotTable::new())),
            }),
        }
    }

    /// Process-unique identity of this signal.
    pub fn id(&self) -> BusId {
        self.core.id
    }

    /// Connects a callback with no lifetime tie. It stays connected until
    /// [`disconnect`](Self::disconnect) is called or the signal is dropped.
    pub fn connect<F>(&self, callback: F) -> SlotHandle
    where
        F: Fn(&A) + Send + Sync + 'static,
    {
        let guard = self.core.table.lock();
        let handle = guard.borrow_mut().insert(Arc::new(callback), SlotKind::Plain);
        trace!("🔗 {} connected {}", self.core.id, handle);
        handle
    }

    /// Connects a callback whose lifetime is bound to `subscriber`.
    ///
    /// The slot is removed automatically when the subscriber is dropped.
    /// When the signal is dropped first, the subscriber forgets the slot.
    ///
    /// # Arguments
    ///
    /// * `subscriber` - Owner of the connection; the slot lives no longer than it
    /// * `callback` - Invoked with a shared reference to each emitted payload
    ///
    /// # Returns
    ///
    /// The handle of the new slot. It can be passed to
    /// [`disconnect`](Self::disconnect) to remove the slot before the
    /// subscriber goes away.
    pub fn connect_scoped<F>(&self, subscriber: &Subscriber, callback: F) -> SlotHandle
    where
        F: Fn(&A) + Send + Sync + 'static,
    {
        let state = subscriber.state();
        let guard = self.core.table.lock();
        let handle = guard
            .borrow_mut()
            .insert(Arc::new(callback), SlotKind::Scoped(Arc::downgrade(state)));

        let registry = Arc::downgrade(&self.core);
        let registry: Weak<dyn SlotRegistry> = registry;
        state.on_attached(self.core.id, handle, registry);
        trace!("🔗 {} connected scoped {}", self.core.id, handle);
        handle
    }

    /// Connects a method of `target` as the slot, bound to the lifetime of
    /// the subscriber `target` embeds.
    ///
    /// Only a `Weak` reference to `target` is kept, so connecting never
    /// extends its lifetime.
    pub fn connect_method<T, M>(&self, target: &Arc<T>, method: M) -> SlotHandle
    where
        T: SignalObject + Send + Sync + 'static,
        M: Fn(&T, &A) + Send + Sync + 'static,
    {
        let weak = Arc::downgrade(target);
        self.connect_scoped(target.subscriber(), move |payload: &A| {
            if let Some(target) = weak.upgrade() {
                method(&target, payload);
            }
        })
    }

    /// Disconnects the slot identified by `handle`.
    ///
    /// Returns `false` when no such slot exists, which is an ordinary outcome
    /// (for example disconnecting twice).
    pub fn disconnect(&self, handle: SlotHandle) -> bool {
        let guard = self.core.table.lock();
        let removed = guard.borrow_mut().remove(handle);
        match removed {
            Some(slot) => {
                slot.detach(self.core.id, handle);
                trace!("✂️ {} disconnected {}", self.core.id, handle);
                true
            }
            None => false,
        }
    }

    /// Disconnects every slot.
    pub fn disconnect_all(&self) {
        let count = self.core.release_all();
        trace!("✂️ {} disconnected all {} slots", self.core.id, count);
    }

    /// Invokes every connected slot with `payload`.
    ///
    /// # Arguments
    ///
    /// * `payload` - Value handed by reference to every slot
    ///
    /// # Ordering
    ///
    /// * Slots are visited in ascending handle order
    /// * A slot disconnected by an earlier callback of the same emit is skipped
    /// * A slot connected during the emit is first invoked by the next one
    ///
    /// The signal lock is held for the whole dispatch, so emits from
    /// different threads do not interleave, and a subscriber dropped on
    /// another thread waits for the running emit before its slots go away.
    ///
    /// # Panics
    ///
    /// A panicking callback unwinds out of `emit`. Remaining slots are not
    /// invoked for this payload; the signal stays usable.
    pub fn emit(&self, payload: &A) {
        let guard = self.core.table.lock();
        let snapshot: Vec<(SlotHandle, Arc<Callback<A>>)> = {
            let mut table = guard.borrow_mut();
            table.stats.emits += 1;
            table
                .slots
                .iter()
                .map(|(handle, slot)| (*handle, Arc::clone(&slot.callback)))
                .collect()
        };

        for (handle, callback) in snapshot {
            let live = guard.borrow().slots.contains_key(&handle);
            if !live {
                guard.borrow_mut().stats.skipped_deliveries += 1;
                continue;
            }
            callback(payload);
            guard.borrow_mut().stats.deliveries += 1;
        }
    }

    /// Whether `handle` refers to a connected slot.
    pub fn is_connected(&self, handle: SlotHandle) -> bool {
        let guard = self.core.table.lock();
        let connected = guard.borrow().slots.contains_key(&handle);
        connected
    }

    /// Number of connected slots.
    pub fn len(&self) -> usize {
        let guard = self.core.table.lock();
        let len = guard.borrow().slots.len();
        len
    }

    /// Whether no slot is connected.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the dispatch counters.
    pub fn stats(&self) -> SignalStats {
        let guard = self.core.table.lock();
        let stats = guard.borrow().stats;
        stats
    }
}

impl<A: 'static> Default for Signal<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Drop for Signal<A> {
    fn drop(&mut self) {
        let count = self.core.release_all();
        if count > 0 {
            trace!("🧹 {} dropped with {} slots", self.core.id, count);
        }
    }
}

impl<A> fmt::Debug for Signal<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.core.table.lock();
        let slots = guard.borrow().slots.len();
        f.debug_struct("Signal")
            .field("id", &self.core.id)
            .field("slots", &slots)
            .finish()
    }
}
