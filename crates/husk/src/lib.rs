//! # HUSK
//!
//! Integration layer around [`husk_core`]: externally loaded warm-up
//! settings, an explicitly initialized pool context, and poll-based
//! waits for cooperative schedulers.
//!
//! ## Example
//!
//! ```rust,ignore
//! use husk::{CategorySpec, PoolContext, PoolSettings};
//!
//! let settings = PoolSettings::load("pool.toml")?;
//! let mut context = PoolContext::initialize(settings, vec![
//!     CategorySpec::new(Kind::Bullet, "bullet", |_| Ok(Bullet::dormant())),
//! ])?;
//! let handle = context.pool_mut().acquire(&Kind::Bullet)?;
//! ```

pub mod config;
pub mod context;
pub mod wait;

pub use config::{ConfigError, PoolSettings};
pub use context::{CategorySpec, PoolContext};
pub use wait::{all_idle, PollWait};

// Re-export the pool core under a short path.
pub use husk_core as core;
