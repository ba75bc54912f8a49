//! # HUSK Core
//!
//! Categorized entity pool with activation-based recycling, designed
//! for:
//! - Pre-constructed entities handed out by oldest-first inactive scan
//! - Bounded eager warm-up, logged overflow growth on demand
//! - Zero destruction: deactivation is the recycling unit
//!
//! ## Architecture Rules
//!
//! 1. **The pool never activates anything** - activation belongs to the
//!    consumer, after it finishes configuring the entity
//! 2. **The active flag is consumer-owned** - the pool reads it at
//!    acquire time and never writes it
//! 3. **No fault crosses the boundary** - every operation returns an
//!    explicit result, with failures logged where they happen
//!
//! ## Example
//!
//! ```rust,ignore
//! use husk_core::{EntityPool, Recyclable};
//!
//! let mut pool = EntityPool::builder()
//!     .category(Kind::HitEffect, 30, |_| Ok(HitEffect::dormant()))
//!     .build();
//! pool.warm_up()?;
//! let handle = pool.acquire(&Kind::HitEffect)?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod events;
pub mod pool;
pub mod sync;

pub use error::{FactoryError, PoolError, PoolResult};
pub use events::{SpawnBus, SpawnEvent, SpawnReceiver, SpawnSender};
pub use pool::{
    EntityFactory, EntityHandle, EntityPool, EntityPoolBuilder, Recyclable, SharedPool, SubPool,
};
pub use sync::{ReadinessSignal, ReadinessWatcher};
