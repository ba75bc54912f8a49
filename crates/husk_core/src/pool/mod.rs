//! # Entity Pooling
//!
//! Pre-constructed, reusable entities partitioned by category.
//!
//! ## Design Philosophy
//!
//! Entities are constructed at warm-up (or on logged overflow) and then
//! recycled forever. During play:
//! - No entity is ever destroyed
//! - Acquire prefers reuse over construction
//! - Recycling is the consumer flipping its own active flag

mod entity;
mod registry;
mod shared;
mod subpool;

pub use entity::{EntityHandle, Recyclable};
pub use registry::{EntityFactory, EntityPool, EntityPoolBuilder};
pub use shared::SharedPool;
pub use subpool::SubPool;
