//! View state and the single-slot state cache.
//!
//! [`StateSlot`] is the "current state" holder of a pipeline. It keeps
//! exactly one value, replaces it only when the new value differs
//! (distinct-until-changed), and hands the cached value to every new
//! subscriber before any live update (replay-one).

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;

/// Marker trait for view state snapshots
///
/// States should be:
/// - Immutable (new states are built by copy-on-write in the reducer)
/// - Self-contained (everything the UI needs to render)
/// - Comparable (`PartialEq` drives duplicate suppression)
pub trait ViewState: Clone + PartialEq + Send + Sync + 'static {}

struct Slot<S> {
    current: S,
    updates: Option<broadcast::Sender<S>>,
}

/// Single-value cache with live updates
///
/// Cloning a `StateSlot` yields another handle to the same slot.
///
/// # Example
///
/// ```
/// use countries_mvi_core::state::StateSlot;
///
/// let slot = StateSlot::new(0_u32, 8);
/// assert!(slot.replace_if_changed(1));
/// assert!(!slot.replace_if_changed(1));
///
/// let (cached, _updates) = slot.subscribe();
/// assert_eq!(cached, 1);
/// ```
pub struct StateSlot<S> {
    inner: Arc<Mutex<Slot<S>>>,
}

impl<S> Clone for StateSlot<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> std::fmt::Debug for StateSlot<S>
where
    S: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = self.lock();
        f.debug_struct("StateSlot")
            .field("current", &slot.current)
            .field("closed", &slot.updates.is_none())
            .finish()
    }
}

impl<S> StateSlot<S> {
    fn lock(&self) -> MutexGuard<'_, Slot<S>> {
        // The slot holds plain data; a panicking writer cannot leave it half-updated.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stop live updates
    ///
    /// Existing subscribers drain what they already received and then end.
    /// The cached value stays readable.
    pub fn close(&self) {
        self.lock().updates = None;
    }

    #[cfg(test)]
    fn is_closed(&self) -> bool {
        self.lock().updates.is_none()
    }
}

impl<S: Clone> StateSlot<S> {
    /// Create a slot holding `initial`
    ///
    /// `capacity` bounds how many updates a slow subscriber may fall behind
    /// before it starts skipping; it is clamped to at least 1.
    #[must_use]
    pub fn new(initial: S, capacity: usize) -> Self {
        let (updates, _) = broadcast::channel(capacity.max(1));
        Self {
            inner: Arc::new(Mutex::new(Slot {
                current: initial,
                updates: Some(updates),
            })),
        }
    }

    /// Clone of the cached value
    #[must_use]
    pub fn get(&self) -> S {
        self.lock().current.clone()
    }

    /// Store `next` and publish it, unless it equals the cached value
    ///
    /// Returns `true` if the value changed.
    pub fn replace_if_changed(&self, next: S) -> bool
    where
        S: PartialEq,
    {
        let mut slot = self.lock();
        if slot.current == next {
            return false;
        }
        if let Some(updates) = &slot.updates {
            // No receivers is fine: late subscribers read `current`.
            let _ = updates.send(next.clone());
        }
        slot.current = next;
        true
    }

    /// Snapshot the cached value and subscribe to later updates
    ///
    /// Both happen under one lock, so no update can fall between the
    /// snapshot and the first live value. Returns `None` for the receiver
    /// once the slot is closed.
    #[must_use]
    pub fn subscribe(&self) -> (S, Option<broadcast::Receiver<S>>) {
        let slot = self.lock();
        let receiver = slot.updates.as_ref().map(broadcast::Sender::subscribe);
        (slot.current.clone(), receiver)
    }

    /// Number of live subscribers
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.lock()
            .updates
            .as_ref()
            .map_or(0, broadcast::Sender::receiver_count)
    }
}
