//! Notifications emitted by a table.
//!
//! A table announces its state transitions through signals. Listeners connect
//! closures (slots) and receive the payload synchronously, in the thread that
//! triggered the transition. Tables are driven from a single logical thread,
//! so there is no queued delivery.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - A plain notification, e.g. "sorted" or "filtered"
//! - [`VetoSignal<Args>`] - A notification whose listeners may cancel the
//!   default action, e.g. "about to sort"
//! - [`ConnectionId`] - Identifier returned when connecting a slot
//!
//! # Example
//!
//! ```
//! use o_table_core::{Cancelled, Proceed, Signal, VetoSignal};
//!
//! let sorted = Signal::<usize>::new();
//! let id = sorted.connect(|column| println!("sorted column {column}"));
//! sorted.emit(2);
//! sorted.disconnect(id);
//!
//! let sorting = VetoSignal::<usize>::new();
//! sorting.connect(|&column| if column == 0 { Err(Cancelled) } else { Ok(Proceed) });
//! assert_eq!(sorting.emit(&0), Err(Cancelled));
//! assert_eq!(sorting.emit(&1), Ok(Proceed));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via
    /// [`Signal::disconnect`] or [`VetoSignal::disconnect`].
    pub struct ConnectionId;
}

/// Listener verdict allowing the default action to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Proceed;

/// Listener verdict cancelling the default action.
///
/// Cancellation is an expected outcome, not an error: whoever cancels takes
/// over the transition and completes it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;
type VetoSlot<Args> = Arc<dyn Fn(&Args) -> Result<Proceed, Cancelled> + Send + Sync>;

/// A type-safe signal that can have multiple connected slots.
///
/// When emitted, every connected slot is invoked in connection order with a
/// reference to the payload.
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
    blocked: AtomicBool,
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to `emit()` do nothing.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots.
    ///
    /// Slots may connect or disconnect other slots while running; such changes
    /// take effect from the next emission.
    #[tracing::instrument(skip_all, target = "o_table_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return;
        }

        let slots: Vec<Slot<Args>> = self.connections.lock().values().cloned().collect();
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");

        for slot in slots {
            slot(&args);
        }
    }
}

/// A cancellable signal.
///
/// Each slot returns `Ok(Proceed)` or `Err(Cancelled)`. Emission invokes every
/// slot and yields `Err(Cancelled)` if at least one of them cancelled, so all
/// listeners observe the request even after an earlier one vetoed it.
pub struct VetoSignal<Args> {
    connections: Mutex<SlotMap<ConnectionId, VetoSlot<Args>>>,
    blocked: AtomicBool,
}

impl<Args> Default for VetoSignal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> VetoSignal<Args> {
    /// Create a new cancellable signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot that may cancel the default action.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) -> Result<Proceed, Cancelled> + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Disconnect a specific slot by its connection ID.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Block emission. A blocked signal always proceeds.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal and collect the verdict of every slot.
    #[tracing::instrument(skip_all, target = "o_table_core::signal", level = "trace")]
    pub fn emit(&self, args: &Args) -> Result<Proceed, Cancelled> {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "veto signal blocked, proceeding");
            return Ok(Proceed);
        }

        let slots: Vec<VetoSlot<Args>> = self.connections.lock().values().cloned().collect();
        let mut verdict = Ok(Proceed);
        for slot in slots {
            if slot(args).is_err() {
                verdict = Err(Cancelled);
            }
        }

        tracing::trace!(
            target: targets::SIGNAL,
            cancelled = verdict.is_err(),
            "emitted veto signal"
        );
        verdict
    }
}
