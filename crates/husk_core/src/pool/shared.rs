//! # Shared Pool
//!
//! Mutex-guarded wrapper for the multi-threaded extension.
//!
//! The bare [`EntityPool`] assumes one logical thread of control. When
//! worker threads need to acquire entities, this wrapper puts one lock
//! around the whole pool and accepts the scan-under-lock cost; the
//! alternative (confining the pool to one thread and marshalling
//! requests to it) lives outside this crate.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::PoolResult;

use super::entity::{EntityHandle, Recyclable};
use super::registry::EntityPool;

/// Thread-safe handle to a mutex-guarded [`EntityPool`].
///
/// Cloning shares the same underlying pool.
///
/// ## Claim Discipline
///
/// An acquire's scan-then-claim sequence is indivisible only while the
/// lock is held. Releasing the lock between acquiring a handle and
/// activating the entity would let another thread claim the same
/// inactive slot, so configuration and activation go through
/// [`SharedPool::acquire_with`], never a bare acquire.
pub struct SharedPool<K, T> {
    /// The guarded pool.
    inner: Arc<Mutex<EntityPool<K, T>>>,
}

impl<K, T> Clone for SharedPool<K, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, T> SharedPool<K, T>
where
    K: Eq + Hash + Clone + fmt::Debug,
    T: Recyclable,
{
    /// Wraps a pool for cross-thread sharing.
    #[must_use]
    pub fn new(pool: EntityPool<K, T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(pool)),
        }
    }

    /// Acquires an entity and runs `setup` on it under the lock.
    ///
    /// `setup` must activate the entity before returning; once the flag
    /// is up, the slot stays exclusive to this caller until the consumer
    /// deactivates it.
    ///
    /// # Errors
    ///
    /// Propagates the underlying acquire failure.
    pub fn acquire_with<R>(
        &self,
        category: &K,
        setup: impl FnOnce(&mut T) -> R,
    ) -> PoolResult<(EntityHandle<K>, R)> {
        self.inner.lock().acquire_with(category, setup)
    }

    /// Terminates every active entity of `category` under the lock.
    ///
    /// # Errors
    ///
    /// Propagates the underlying bulk-terminate failure.
    pub fn terminate_active(&self, category: &K) -> PoolResult<usize> {
        self.inner.lock().terminate_active(category)
    }

    /// Whether warm-up has completed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.inner.lock().is_ready()
    }

    /// Runs `f` with exclusive access to the pool.
    ///
    /// The escape hatch for multi-step sequences that must stay atomic,
    /// like stepping every entity of a category in one tick.
    pub fn with<R>(&self, f: impl FnOnce(&mut EntityPool<K, T>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
