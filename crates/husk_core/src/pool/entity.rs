//! # Entity Capabilities
//!
//! The contract pooled entities provide, and the handle the pool mints.

/// Capability set required of pooled entities.
///
/// The active flag is owned and mutated by the consumer; the pool reads
/// it to decide availability and never writes it. Deactivating is the
/// whole recycling protocol - there is no release call, the pool simply
/// observes the flag on its next scan.
pub trait Recyclable {
    /// Whether the entity is currently in use by its consumer.
    fn is_active(&self) -> bool;

    /// Forcibly shuts the entity down, leaving it inactive.
    ///
    /// Returns `false` when shutdown fails; a bulk terminate aborts the
    /// rest of its batch on the first failure.
    fn terminate(&mut self) -> bool;
}

/// Opaque reference to one pooled entity.
///
/// A handle is bound to the category it was minted under for its entire
/// lifetime; the pool never reassigns an entity to another category.
/// Handles are cheap values - copyable whenever the key is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityHandle<K> {
    /// Category that owns the entity.
    category: K,
    /// Slot index inside the category's sub-pool (creation order).
    slot: usize,
}

impl<K> EntityHandle<K> {
    /// Mints a handle. Only the pool creates these.
    pub(crate) const fn new(category: K, slot: usize) -> Self {
        Self { category, slot }
    }

    /// The category this handle belongs to.
    #[inline]
    #[must_use]
    pub const fn category(&self) -> &K {
        &self.category
    }

    /// Creation-order slot inside the category's sub-pool.
    #[inline]
    #[must_use]
    pub const fn slot(&self) -> usize {
        self.slot
    }
}
