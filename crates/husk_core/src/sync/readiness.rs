//! # Readiness Signal
//!
//! One-shot flag a pool raises when warm-up completes.
//!
//! Consumers hold a [`ReadinessWatcher`] and poll it once per scheduling
//! tick until it reads true; nothing here blocks a thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One-shot readiness flag owned by the pool.
///
/// Transitions false to true exactly once, when warm-up completes. A
/// pool whose warm-up fails never raises the flag.
#[derive(Debug, Default)]
pub struct ReadinessSignal {
    /// The shared flag. Watchers hold clones of this Arc.
    ready: Arc<AtomicBool>,
}

impl ReadinessSignal {
    /// Creates an unready signal.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ready: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Current state.
    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Raises the flag. Returns `false` if it was already raised.
    pub(crate) fn mark_ready(&self) -> bool {
        !self.ready.swap(true, Ordering::Release)
    }

    /// Creates a watcher handle sharing this signal.
    #[must_use]
    pub fn watcher(&self) -> ReadinessWatcher {
        ReadinessWatcher {
            ready: Arc::clone(&self.ready),
        }
    }
}

/// Cloneable, pollable view of a [`ReadinessSignal`].
#[derive(Clone, Debug)]
pub struct ReadinessWatcher {
    /// The shared flag.
    ready: Arc<AtomicBool>,
}

impl ReadinessWatcher {
    /// Current state.
    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}
