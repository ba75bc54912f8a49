//! # Overflow Spawn Events
//!
//! Notification channel for entities constructed past the warm-up count.
//!
//! When an acquire finds every entity of a category active, the pool
//! constructs one more and publishes a [`SpawnEvent`] so observers can
//! react to the new entity. Publishing is decoupled from the acquire
//! path: it never blocks, and a full channel drops the event rather than
//! failing the acquire.
//!
//! Uses crossbeam channels for zero-allocation in the hot path.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::pool::EntityHandle;

/// Notification that a pool constructed an entity on demand.
#[derive(Clone, Debug)]
pub struct SpawnEvent<K> {
    /// Handle of the newly constructed entity.
    pub handle: EntityHandle<K>,
    /// Sub-pool size after the construction.
    pub pool_len: usize,
}

/// Bounded pub/sub channel for overflow spawn notifications.
///
/// Pre-allocates the channel with bounded capacity so observers that
/// stop draining cannot grow memory without bound.
pub struct SpawnBus<K> {
    /// Sender end - held by the pool.
    sender: Sender<SpawnEvent<K>>,
    /// Receiver end - held by observers.
    receiver: Receiver<SpawnEvent<K>>,
}

impl<K> SpawnBus<K> {
    /// Creates a new bus.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum undrained events before new ones are dropped.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Creates a sender handle (clone for multiple producers).
    #[must_use]
    pub fn sender(&self) -> SpawnSender<K> {
        SpawnSender {
            sender: self.sender.clone(),
        }
    }

    /// Creates a receiver handle (clone for multiple consumers).
    #[must_use]
    pub fn receiver(&self) -> SpawnReceiver<K> {
        SpawnReceiver {
            receiver: self.receiver.clone(),
        }
    }
}

/// Handle for publishing spawn events.
#[derive(Clone)]
pub struct SpawnSender<K> {
    sender: Sender<SpawnEvent<K>>,
}

impl<K> SpawnSender<K> {
    /// Publishes an event (non-blocking).
    ///
    /// Returns `false` if the channel is full or every receiver is gone;
    /// the event is dropped in both cases. The caller's acquire must not
    /// be able to fail on this path.
    #[inline]
    pub fn publish(&self, event: SpawnEvent<K>) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Handle for receiving spawn events.
#[derive(Clone)]
pub struct SpawnReceiver<K> {
    receiver: Receiver<SpawnEvent<K>>,
}

impl<K> SpawnReceiver<K> {
    /// Receives all pending events (non-blocking).
    ///
    /// Returns a vector of events. Empty if no events pending.
    #[inline]
    #[must_use]
    pub fn drain(&self) -> Vec<SpawnEvent<K>> {
        let mut events = Vec::with_capacity(self.receiver.len());
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Receives one event (non-blocking).
    ///
    /// Returns `None` if no events pending.
    #[inline]
    #[must_use]
    pub fn try_recv(&self) -> Option<SpawnEvent<K>> {
        self.receiver.try_recv().ok()
    }

    /// Returns the number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Checks if there are pending events.
    #[inline]
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.receiver.is_empty()
    }
}
