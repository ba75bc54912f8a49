//! # Entity Pool Registry
//!
//! The categorized pool: per category, a bounded-but-growable set of
//! pre-constructed entities handed out by an oldest-first scan for the
//! first inactive one.
//!
//! ## Recycling Protocol
//!
//! 1. A caller acquires a handle for a category.
//! 2. The caller configures the entity behind it, then activates it -
//!    the pool never activates anything, so a half-initialized entity is
//!    never observable as live.
//! 3. The consumer eventually deactivates the entity as part of its own
//!    shutdown. There is no release call; the pool notices the flag on
//!    the next acquire scan.
//!
//! ## Thread Safety
//!
//! `EntityPool` assumes one logical thread of control and uses no locks;
//! every operation is synchronous and bounded by sub-pool size. For
//! multiple threads, wrap it in [`SharedPool`](super::SharedPool).
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut pool = EntityPool::builder()
//!     .category("hit-effect", 30, |_| Ok(HitEffect::dormant()))
//!     .spawn_events(64)
//!     .build();
//! pool.warm_up()?;
//!
//! let handle = pool.acquire(&"hit-effect")?;
//! if let Some(effect) = pool.get_mut(&handle) {
//!     effect.play_at(x, y); // configures and activates
//! }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::error::{FactoryError, PoolError, PoolResult};
use crate::events::{SpawnBus, SpawnEvent, SpawnReceiver, SpawnSender};
use crate::sync::{ReadinessSignal, ReadinessWatcher};

use super::entity::{EntityHandle, Recyclable};
use super::subpool::SubPool;

/// Factory capability: constructs one new dormant entity for a category.
///
/// Must return a distinct instance on every call, already inactive.
pub type EntityFactory<K, T> = Box<dyn Fn(&K) -> Result<T, FactoryError> + Send>;

/// One category registration held by the builder until `build`.
struct Registration<K, T> {
    /// Category key.
    key: K,
    /// Entities to construct eagerly at warm-up.
    warm_up_count: usize,
    /// Constructor for this category.
    factory: EntityFactory<K, T>,
}

/// Builder for an [`EntityPool`].
///
/// Registers categories with their warm-up counts and factories, then
/// builds an unready pool; [`EntityPool::warm_up`] populates it.
pub struct EntityPoolBuilder<K, T> {
    /// Pending registrations, in registration order.
    registrations: Vec<Registration<K, T>>,
    /// Capacity for the overflow-spawn channel, when enabled.
    spawn_capacity: Option<usize>,
}

impl<K, T> EntityPoolBuilder<K, T>
where
    K: Eq + Hash + Clone + fmt::Debug,
    T: Recyclable,
{
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registrations: Vec::new(),
            spawn_capacity: None,
        }
    }

    /// Registers a category with its warm-up count and factory.
    ///
    /// Factories must hand back dormant (inactive) instances; the pool
    /// reads the active flag but never writes it, so an instance born
    /// active would leak out of the availability scan forever.
    ///
    /// Registering the same category twice replaces the earlier entry.
    #[must_use]
    pub fn category<F>(mut self, key: K, warm_up_count: usize, factory: F) -> Self
    where
        F: Fn(&K) -> Result<T, FactoryError> + Send + 'static,
    {
        self.registrations.retain(|r| r.key != key);
        self.registrations.push(Registration {
            key,
            warm_up_count,
            factory: Box::new(factory),
        });
        self
    }

    /// Enables overflow-spawn notifications on a bounded channel.
    #[must_use]
    pub fn spawn_events(mut self, capacity: usize) -> Self {
        self.spawn_capacity = Some(capacity);
        self
    }

    /// Builds the pool. Not ready until [`EntityPool::warm_up`] runs.
    #[must_use]
    pub fn build(self) -> EntityPool<K, T> {
        let mut subpools = HashMap::with_capacity(self.registrations.len());
        let mut factories = HashMap::with_capacity(self.registrations.len());
        for registration in self.registrations {
            subpools.insert(
                registration.key.clone(),
                SubPool::new(registration.warm_up_count),
            );
            factories.insert(registration.key, registration.factory);
        }

        let (spawn_tx, spawn_rx) = match self.spawn_capacity {
            Some(capacity) => {
                let bus = SpawnBus::new(capacity);
                (Some(bus.sender()), Some(bus.receiver()))
            }
            None => (None, None),
        };

        EntityPool {
            subpools,
            factories,
            readiness: ReadinessSignal::new(),
            spawn_tx,
            spawn_rx,
        }
    }
}

impl<K, T> Default for EntityPoolBuilder<K, T>
where
    K: Eq + Hash + Clone + fmt::Debug,
    T: Recyclable,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Categorized registry of pre-constructed, reusable entities.
///
/// Owns every entity it ever constructs; entities transition between
/// active and inactive through their consumer-owned flag and are never
/// destroyed while the pool lives.
pub struct EntityPool<K, T> {
    /// One ordered sub-pool per category.
    subpools: HashMap<K, SubPool<T>>,
    /// One factory per category.
    factories: HashMap<K, EntityFactory<K, T>>,
    /// Raised exactly once, after warm-up completes.
    readiness: ReadinessSignal,
    /// Publisher for overflow constructions, when enabled.
    spawn_tx: Option<SpawnSender<K>>,
    /// Receiver template handed to subscribers.
    spawn_rx: Option<SpawnReceiver<K>>,
}

/// Runs a factory, converting its failure into a pool error.
fn construct<K, T>(factory: &EntityFactory<K, T>, key: &K) -> PoolResult<T>
where
    K: fmt::Debug,
    T: Recyclable,
{
    match factory(key) {
        Ok(entity) => {
            debug_assert!(
                !entity.is_active(),
                "factories must construct dormant entities"
            );
            Ok(entity)
        }
        Err(source) => {
            tracing::error!(
                "entity construction failed for category {:?}: {}",
                key,
                source
            );
            Err(PoolError::Construction {
                category: format!("{key:?}"),
                source,
            })
        }
    }
}

impl<K, T> EntityPool<K, T>
where
    K: Eq + Hash + Clone + fmt::Debug,
    T: Recyclable,
{
    /// Starts building a pool.
    #[must_use]
    pub fn builder() -> EntityPoolBuilder<K, T> {
        EntityPoolBuilder::new()
    }

    /// Eagerly constructs every category's warm-up count of entities.
    ///
    /// Runs once per pool lifetime, synchronously, in registration-slot
    /// order within each category. No entity is activated here. On
    /// success the readiness signal transitions false to true, exactly
    /// once.
    ///
    /// # Errors
    ///
    /// [`PoolError::AlreadyWarmed`] when the pool is already ready.
    /// [`PoolError::Construction`] when a factory fails; the readiness
    /// signal stays false and the pool must be considered unusable.
    pub fn warm_up(&mut self) -> PoolResult<()> {
        if self.readiness.is_ready() {
            tracing::error!("warm_up called on a pool that is already ready");
            return Err(PoolError::AlreadyWarmed);
        }

        for (key, subpool) in &mut self.subpools {
            let Some(factory) = self.factories.get(key) else {
                return Err(PoolError::unknown_category(key));
            };
            while subpool.len() < subpool.warm_up_count() {
                subpool.push(construct(factory, key)?);
            }
        }

        self.readiness.mark_ready();
        tracing::info!(
            "entity pool ready: {} categories warmed",
            self.subpools.len()
        );
        Ok(())
    }

    /// Whether warm-up has completed.
    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.readiness.is_ready()
    }

    /// Cloneable watcher for the readiness transition.
    #[must_use]
    pub fn readiness(&self) -> ReadinessWatcher {
        self.readiness.watcher()
    }

    /// Receiver for overflow-spawn events, when enabled at build time.
    #[must_use]
    pub fn spawn_events(&self) -> Option<SpawnReceiver<K>> {
        self.spawn_rx.clone()
    }

    /// Returns a handle to a usable (currently inactive) entity.
    ///
    /// Scans the category's sub-pool oldest-first and returns the first
    /// entity whose active flag reads false, without mutating it. When
    /// every entity is active, constructs exactly one more through the
    /// category's factory, appends it, and returns its handle - a logged
    /// signal that the warm-up count is undersized for current load, not
    /// an error.
    ///
    /// Activation is the caller's responsibility immediately after this
    /// returns; until the flag flips, the entity stays eligible for the
    /// next scan.
    ///
    /// # Errors
    ///
    /// [`PoolError::UnknownCategory`] when `category` was never
    /// registered; no sub-pool is modified. [`PoolError::Construction`]
    /// when the factory fails during overflow construction.
    pub fn acquire(&mut self, category: &K) -> PoolResult<EntityHandle<K>> {
        let Some(subpool) = self.subpools.get_mut(category) else {
            tracing::error!("acquire for unknown category {:?}", category);
            return Err(PoolError::unknown_category(category));
        };

        if let Some(slot) = subpool.first_inactive() {
            return Ok(EntityHandle::new(category.clone(), slot));
        }

        let Some(factory) = self.factories.get(category) else {
            tracing::error!("no factory bound to category {:?}", category);
            return Err(PoolError::unknown_category(category));
        };

        subpool.push(construct(factory, category)?);
        let slot = subpool.len() - 1;
        tracing::warn!(
            "pool exhausted for category {:?}: grew to {} entities",
            category,
            subpool.len()
        );

        let handle = EntityHandle::new(category.clone(), slot);
        if let Some(sender) = &self.spawn_tx {
            let published = sender.publish(SpawnEvent {
                handle: handle.clone(),
                pool_len: subpool.len(),
            });
            if !published {
                tracing::debug!("spawn event dropped for category {:?}", category);
            }
        }
        Ok(handle)
    }

    /// Acquires and configures an entity in one indivisible step.
    ///
    /// `setup` receives the entity and must activate it; on a shared
    /// pool this is the only way to keep the scan-then-claim sequence
    /// atomic.
    ///
    /// # Errors
    ///
    /// Same as [`EntityPool::acquire`].
    pub fn acquire_with<R>(
        &mut self,
        category: &K,
        setup: impl FnOnce(&mut T) -> R,
    ) -> PoolResult<(EntityHandle<K>, R)> {
        let handle = self.acquire(category)?;
        match self.get_mut(&handle) {
            Some(entity) => Ok((handle, setup(entity))),
            // The handle was just minted; a miss here is a pool invariant
            // violation, reported rather than unwound.
            None => {
                tracing::error!("freshly minted handle missed for category {:?}", category);
                Err(PoolError::unknown_category(category))
            }
        }
    }

    /// Gets the entity behind `handle`.
    #[must_use]
    pub fn get(&self, handle: &EntityHandle<K>) -> Option<&T> {
        self.subpools.get(handle.category())?.get(handle.slot())
    }

    /// Gets the entity behind `handle` mutably, for configuration,
    /// activation, and deactivation.
    pub fn get_mut(&mut self, handle: &EntityHandle<K>) -> Option<&mut T> {
        self.subpools
            .get_mut(handle.category())?
            .get_mut(handle.slot())
    }

    /// Invokes the terminate capability on every active entity of
    /// `category`.
    ///
    /// Inactive entities and other categories are untouched. Returns the
    /// number of entities terminated.
    ///
    /// # Errors
    ///
    /// [`PoolError::UnknownCategory`] when the category was never
    /// registered. [`PoolError::Operation`] when a terminate fails: the
    /// remaining batch is aborted, and entities already terminated stay
    /// terminated.
    pub fn terminate_active(&mut self, category: &K) -> PoolResult<usize> {
        let Some(subpool) = self.subpools.get_mut(category) else {
            tracing::error!("terminate for unknown category {:?}", category);
            return Err(PoolError::unknown_category(category));
        };

        let active = subpool.active_count();
        let mut terminated = 0;
        for entity in subpool.iter_mut() {
            if !entity.is_active() {
                continue;
            }
            if entity.terminate() {
                terminated += 1;
            } else {
                tracing::error!(
                    "terminate failed for category {:?} after {} of {} entities",
                    category,
                    terminated,
                    active
                );
                return Err(PoolError::Operation {
                    category: format!("{category:?}"),
                    terminated,
                    active,
                });
            }
        }
        Ok(terminated)
    }

    /// Number of entities ever constructed for `category`.
    #[must_use]
    pub fn len(&self, category: &K) -> Option<usize> {
        self.subpools.get(category).map(SubPool::len)
    }

    /// Number of entities of `category` currently flagged active.
    #[must_use]
    pub fn active_count(&self, category: &K) -> Option<usize> {
        self.subpools.get(category).map(SubPool::active_count)
    }

    /// The sub-pool for `category`, for read-only inspection.
    #[must_use]
    pub fn subpool(&self, category: &K) -> Option<&SubPool<T>> {
        self.subpools.get(category)
    }

    /// Registered categories, in no particular order.
    pub fn categories(&self) -> impl Iterator<Item = &K> {
        self.subpools.keys()
    }

    /// Iterates handles and entities of `category` in creation order.
    ///
    /// Empty for an unknown category.
    pub fn iter<'a>(
        &'a self,
        category: &'a K,
    ) -> impl Iterator<Item = (EntityHandle<K>, &'a T)> + 'a {
        self.subpools.get(category).into_iter().flat_map(move |sp| {
            sp.iter()
                .enumerate()
                .map(move |(slot, entity)| (EntityHandle::new(category.clone(), slot), entity))
        })
    }

    /// Iterates entities of `category` mutably, in creation order.
    ///
    /// This is how a simulation steps every pooled entity per tick; the
    /// entities mutate their own active flags as they expire.
    pub fn iter_mut(&mut self, category: &K) -> impl Iterator<Item = &mut T> {
        self.subpools
            .get_mut(category)
            .into_iter()
            .flat_map(SubPool::iter_mut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Probe {
        live: bool,
        stubborn: bool,
    }

    impl Probe {
        fn dormant() -> Self {
            Self {
                live: false,
                stubborn: false,
            }
        }

        fn activate(&mut self) {
            self.live = true;
        }

        fn deactivate(&mut self) {
            self.live = false;
        }
    }

    impl Recyclable for Probe {
        fn is_active(&self) -> bool {
            self.live
        }

        fn terminate(&mut self) -> bool {
            if self.stubborn {
                return false;
            }
            self.live = false;
            true
        }
    }

    fn warmed(count: usize) -> EntityPool<&'static str, Probe> {
        let mut pool = EntityPool::builder()
            .category("hit", count, |_| Ok(Probe::dormant()))
            .build();
        pool.warm_up().unwrap();
        pool
    }

    #[test]
    fn test_warm_up_populates_inactive() {
        let pool = warmed(3);
        assert_eq!(pool.len(&"hit"), Some(3));
        assert_eq!(pool.active_count(&"hit"), Some(0));
        assert!(pool.is_ready());
    }

    #[test]
    fn test_warm_up_twice_rejected() {
        let mut pool = warmed(1);
        assert!(matches!(pool.warm_up(), Err(PoolError::AlreadyWarmed)));
        assert!(pool.is_ready());
    }

    #[test]
    fn test_warm_up_failure_leaves_unready() {
        let mut pool: EntityPool<&str, Probe> = EntityPool::builder()
            .category("hit", 2, |_| Err("out of prefabs".into()))
            .build();
        assert!(matches!(
            pool.warm_up(),
            Err(PoolError::Construction { .. })
        ));
        assert!(!pool.is_ready());
        assert!(!pool.readiness().is_ready());
    }

    #[test]
    fn test_acquire_reuses_before_growth() {
        let mut pool = warmed(2);
        let handle = pool.acquire(&"hit").unwrap();
        assert_eq!(handle.slot(), 0);
        assert_eq!(pool.len(&"hit"), Some(2));
    }

    #[test]
    fn test_acquire_scans_oldest_first() {
        let mut pool = warmed(3);
        let first = pool.acquire(&"hit").unwrap();
        pool.get_mut(&first).unwrap().activate();

        let second = pool.acquire(&"hit").unwrap();
        assert_eq!(second.slot(), 1);
    }

    #[test]
    fn test_acquire_overflow_grows_by_one() {
        let mut pool = warmed(1);
        let first = pool.acquire(&"hit").unwrap();
        pool.get_mut(&first).unwrap().activate();

        let second = pool.acquire(&"hit").unwrap();
        assert_eq!(pool.len(&"hit"), Some(2));
        assert_eq!(second.slot(), 1);
        assert!(pool.subpool(&"hit").unwrap().has_grown());
    }

    #[test]
    fn test_acquire_unknown_category() {
        let mut pool = warmed(1);
        let result = pool.acquire(&"enemy:goblin");
        assert!(matches!(result, Err(PoolError::UnknownCategory { .. })));
        assert_eq!(pool.len(&"hit"), Some(1));
    }

    #[test]
    fn test_single_slot_idempotent_reuse() {
        let mut pool = warmed(1);
        for _ in 0..10 {
            let handle = pool.acquire(&"hit").unwrap();
            assert_eq!(handle.slot(), 0);
            let probe = pool.get_mut(&handle).unwrap();
            probe.activate();
            probe.deactivate();
        }
        assert_eq!(pool.len(&"hit"), Some(1));
    }

    #[test]
    fn test_zero_warm_up_constructs_on_demand() {
        let mut pool = warmed(0);
        assert_eq!(pool.len(&"hit"), Some(0));
        let handle = pool.acquire(&"hit").unwrap();
        assert_eq!(handle.slot(), 0);
        assert_eq!(pool.len(&"hit"), Some(1));
    }

    #[test]
    fn test_overflow_construction_failure() {
        let calls = std::cell::Cell::new(0);
        let mut pool: EntityPool<&str, Probe> = EntityPool::builder()
            .category("hit", 1, move |_| {
                calls.set(calls.get() + 1);
                if calls.get() > 1 {
                    Err("prefab store offline".into())
                } else {
                    Ok(Probe::dormant())
                }
            })
            .build();
        pool.warm_up().unwrap();

        let handle = pool.acquire(&"hit").unwrap();
        pool.get_mut(&handle).unwrap().activate();

        assert!(matches!(
            pool.acquire(&"hit"),
            Err(PoolError::Construction { .. })
        ));
        assert_eq!(pool.len(&"hit"), Some(1));
    }

    #[test]
    fn test_acquire_never_crosses_categories() {
        let mut pool = EntityPool::builder()
            .category("hit", 1, |_| Ok(Probe::dormant()))
            .category("down", 1, |_| Ok(Probe::dormant()))
            .build();
        pool.warm_up().unwrap();

        let handle = pool.acquire(&"down").unwrap();
        assert_eq!(*handle.category(), "down");
        assert_eq!(pool.active_count(&"hit"), Some(0));
    }

    #[test]
    fn test_acquire_with_runs_setup() {
        let mut pool = warmed(1);
        let (handle, ()) = pool.acquire_with(&"hit", Probe::activate).unwrap();
        assert_eq!(pool.active_count(&"hit"), Some(1));
        assert!(pool.get(&handle).unwrap().is_active());
    }

    #[test]
    fn test_terminate_active_filters() {
        let mut pool = warmed(3);
        let handle = pool.acquire(&"hit").unwrap();
        pool.get_mut(&handle).unwrap().activate();

        let terminated = pool.terminate_active(&"hit").unwrap();
        assert_eq!(terminated, 1);
        assert_eq!(pool.active_count(&"hit"), Some(0));
    }

    #[test]
    fn test_terminate_aborts_on_failure() {
        let mut pool = warmed(3);
        // Activate all three, make the middle one refuse to die.
        for slot in 0..3 {
            let handle = pool.acquire(&"hit").unwrap();
            assert_eq!(handle.slot(), slot);
            let probe = pool.get_mut(&handle).unwrap();
            probe.activate();
            probe.stubborn = slot == 1;
        }

        let result = pool.terminate_active(&"hit");
        assert!(matches!(
            result,
            Err(PoolError::Operation {
                terminated: 1,
                active: 3,
                ..
            })
        ));
        // First stays terminated, the rest stay active.
        assert_eq!(pool.active_count(&"hit"), Some(2));
    }

    #[test]
    fn test_spawn_events_emitted_on_overflow() {
        let mut pool = EntityPool::builder()
            .category("hit", 1, |_| Ok(Probe::dormant()))
            .spawn_events(8)
            .build();
        pool.warm_up().unwrap();
        let events = pool.spawn_events().unwrap();

        let first = pool.acquire(&"hit").unwrap();
        pool.get_mut(&first).unwrap().activate();
        assert!(!events.has_events());

        let second = pool.acquire(&"hit").unwrap();
        let drained = events.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].handle, second);
        assert_eq!(drained[0].pool_len, 2);
    }

    #[test]
    fn test_full_event_channel_never_fails_acquire() {
        let mut pool = EntityPool::builder()
            .category("hit", 0, |_| Ok(Probe::dormant()))
            .spawn_events(1)
            .build();
        pool.warm_up().unwrap();

        // Every acquire overflows; the channel holds one event.
        for _ in 0..4 {
            let handle = pool.acquire(&"hit").unwrap();
            pool.get_mut(&handle).unwrap().activate();
        }
        assert_eq!(pool.len(&"hit"), Some(4));
        assert_eq!(pool.spawn_events().unwrap().pending_count(), 1);
    }
}
