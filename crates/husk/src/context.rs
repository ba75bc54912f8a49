//! # Pool Context
//!
//! The shared coordination point handed to spawners and effect
//! triggers.
//!
//! Instead of a hidden global singleton, the context is constructed
//! explicitly from settings and category specs, injected into whatever
//! needs to acquire entities, and torn down explicitly when its scene
//! ends. Nothing in this module touches process-global state.

use std::fmt;
use std::hash::Hash;

use husk_core::{EntityPool, FactoryError, PoolResult, Recyclable, SharedPool};

use crate::config::PoolSettings;

/// One category registration: key, settings name, and factory.
///
/// The settings name is the key used to look up this category's warm-up
/// count in the loaded [`PoolSettings`]; it is usually the display form
/// of the key.
pub struct CategorySpec<K, T> {
    /// Category key.
    key: K,
    /// Settings lookup name.
    name: String,
    /// Constructor for this category.
    factory: Box<dyn Fn(&K) -> Result<T, FactoryError> + Send>,
}

impl<K, T> CategorySpec<K, T> {
    /// Creates a spec for one category.
    pub fn new<F>(key: K, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&K) -> Result<T, FactoryError> + Send + 'static,
    {
        Self {
            key,
            name: name.into(),
            factory: Box::new(factory),
        }
    }
}

/// Explicitly initialized owner of one entity pool and its settings.
///
/// Lives for the duration of the owning scene; dropping (or calling
/// [`PoolContext::teardown`]) releases every pooled entity at once.
pub struct PoolContext<K, T> {
    /// The warmed pool.
    pool: EntityPool<K, T>,
    /// The settings the pool was warmed from.
    settings: PoolSettings,
}

impl<K, T> PoolContext<K, T>
where
    K: Eq + Hash + Clone + fmt::Debug + 'static,
    T: Recyclable + 'static,
{
    /// Builds and warms a pool from settings and category specs.
    ///
    /// Warm-up counts come from the settings document: the per-category
    /// override when one matches the spec name, the shared default
    /// otherwise. The spawn-event channel is enabled when the settings
    /// carry a capacity for it.
    ///
    /// # Errors
    ///
    /// Propagates the warm-up failure when a factory fails; the
    /// readiness signal stays false and no context is created.
    pub fn initialize(
        settings: PoolSettings,
        categories: Vec<CategorySpec<K, T>>,
    ) -> PoolResult<Self> {
        let mut builder = EntityPool::builder();
        if let Some(capacity) = settings.spawn_channel_capacity {
            builder = builder.spawn_events(capacity);
        }
        for spec in categories {
            let count = settings.warm_up_count(&spec.name);
            tracing::debug!("registering category {:?} with warm-up {}", spec.key, count);
            builder = builder.category(spec.key, count, spec.factory);
        }

        let mut pool = builder.build();
        pool.warm_up()?;
        Ok(Self { pool, settings })
    }

    /// The owned pool.
    #[must_use]
    pub fn pool(&self) -> &EntityPool<K, T> {
        &self.pool
    }

    /// The owned pool, mutably.
    pub fn pool_mut(&mut self) -> &mut EntityPool<K, T> {
        &mut self.pool
    }

    /// The settings the pool was warmed from.
    #[must_use]
    pub fn settings(&self) -> &PoolSettings {
        &self.settings
    }

    /// Converts into a thread-safe shared pool.
    ///
    /// The settings are no longer needed once the pool is warm; they
    /// are dropped here.
    #[must_use]
    pub fn into_shared(self) -> SharedPool<K, T> {
        SharedPool::new(self.pool)
    }

    /// Tears the context down, dropping every pooled entity.
    pub fn teardown(self) {
        tracing::info!(
            "pool context torn down: {} categories released",
            self.pool.categories().count()
        );
    }
}
