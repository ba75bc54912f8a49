//! # Synchronization Primitives
//!
//! Readiness signalling between the pool and its consumers.

mod readiness;

pub use readiness::{ReadinessSignal, ReadinessWatcher};
