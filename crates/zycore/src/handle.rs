//! Identifiers shared between signals and subscribers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque identifier of one slot within one signal.
///
/// Handles are issued in strictly increasing order starting at 1 and are
/// never reused for the lifetime of the issuing signal. The value 0 is
/// reserved as [`SlotHandle::INVALID`] and is never returned by `connect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotHandle(u64);

impl SlotHandle {
    /// The reserved "no slot" handle.
    pub const INVALID: SlotHandle = SlotHandle(0);

    pub(crate) const FIRST: SlotHandle = SlotHandle(1);

    /// Raw numeric value of the handle.
    pub fn get(self) -> u64 {
        self.0
    }

    /// Returns false only for [`SlotHandle::INVALID`].
    pub fn is_valid(self) -> bool {
        self.0 != 0
    }

    pub(crate) fn next(self) -> SlotHandle {
        SlotHandle(self.0 + 1)
    }
}

impl Default for SlotHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for SlotHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Process-unique identity of a signal.
///
/// Subscribers key their bookkeeping on `(BusId, SlotHandle)` since slot
/// handles are only unique within a single signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BusId(u64);

static NEXT_BUS_ID: AtomicU64 = AtomicU64::new(1);

impl BusId {
    pub(crate) fn next() -> Self {
        BusId(NEXT_BUS_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value of the id.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bus-{}", self.0)
    }
}
