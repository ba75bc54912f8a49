//! # Poll-Based Waits
//!
//! Observing an external condition becoming true across scheduler
//! steps, without blocking a thread. The owning scheduler re-evaluates
//! the condition once per tick; nothing here suspends mid-operation.

use std::fmt;
use std::hash::Hash;

use husk_core::{EntityPool, Recyclable};

/// A condition re-evaluated once per scheduling tick.
///
/// Once the condition reports true the wait is complete and stays
/// complete; further ticks stop evaluating it.
pub struct PollWait<F> {
    /// The condition under observation.
    condition: F,
    /// Latched completion state.
    complete: bool,
    /// Evaluations performed so far.
    ticks: usize,
}

impl<F: FnMut() -> bool> PollWait<F> {
    /// Creates a wait on `condition`.
    pub fn new(condition: F) -> Self {
        Self {
            condition,
            complete: false,
            ticks: 0,
        }
    }

    /// Evaluates the condition once and returns the completion state.
    pub fn tick(&mut self) -> bool {
        if !self.complete {
            self.ticks += 1;
            self.complete = (self.condition)();
        }
        self.complete
    }

    /// Whether the condition has reported true.
    #[inline]
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.complete
    }

    /// Number of evaluations performed so far.
    #[inline]
    #[must_use]
    pub const fn ticks(&self) -> usize {
        self.ticks
    }
}

/// Whether every entity of `category` is currently inactive.
///
/// The "all particles stopped" query: a scene polls this between ticks
/// before recycling a whole category. False for an unknown category -
/// idleness cannot be confirmed for entities that do not exist.
#[must_use]
pub fn all_idle<K, T>(pool: &EntityPool<K, T>, category: &K) -> bool
where
    K: Eq + Hash + Clone + fmt::Debug,
    T: Recyclable,
{
    pool.active_count(category).is_some_and(|active| active == 0)
}
