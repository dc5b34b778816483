//! # zycore
//!
//! Typed signal/slot event dispatch for in-process use.
//!
//! ## Core Concepts
//!
//! - **[`Signal<A>`]**: a multicast channel carrying payloads of type `A`.
//!   Callbacks are invoked synchronously, in registration order.
//! - **[`SlotHandle`]**: identifies one connected slot; monotonically
//!   increasing per signal, never reused, `0` is reserved.
//! - **[`Subscriber`]**: embeddable capability whose drop disconnects every
//!   lifetime-bound slot it owns, on every signal it touched.
//! - **[`SignalObject`]**: implemented by owners of a `Subscriber` so their
//!   methods can be bound as slots.
//!
//! Either side of a lifetime-bound connection may be dropped first. The
//! signal keeps only a `Weak` reference to the subscriber's bookkeeping and
//! the subscriber keeps only a `Weak` reference to the signal, so neither
//! extends the other's lifetime and neither can touch freed state.
//!
//! ## Example
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use zycore::{Signal, SignalObject, Subscriber};
//!
//! struct Scoreboard {
//!     subscriber: Subscriber,
//!     total: Mutex<u32>,
//! }
//!
//! impl SignalObject for Scoreboard {
//!     fn subscriber(&self) -> &Subscriber {
//!         &self.subscriber
//!     }
//! }
//!
//! impl Scoreboard {
//!     fn on_points(&self, points: &u32) {
//!         *self.total.lock().unwrap() += points;
//!     }
//! }
//!
//! let points: Signal<u32> = Signal::new();
//! let board = Arc::new(Scoreboard { subscriber: Subscriber::new(), total: Mutex::new(0) });
//!
//! points.connect_method(&board, Scoreboard::on_points);
//! points.emit(&3);
//! assert_eq!(*board.total.lock().unwrap(), 3);
//!
//! drop(board);
//! assert!(points.is_empty());
//! ```

pub mod handle;
pub mod signal;
pub mod subscriber;


pub use handle::{BusId, SlotHandle};
pub use signal::{Callback, Signal, SignalStats};
pub use subscriber::{SignalObject, Subscriber};
