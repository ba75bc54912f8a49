//! # Pool Error Types
//!
//! All errors that can cross the pool boundary.
//!
//! Every boundary operation returns an explicit result. Internal faults
//! are caught where they happen, logged with context, and converted into
//! one of these variants - no unhandled fault leaves the pool.

use thiserror::Error;

/// Boxed error returned by entity factories.
pub type FactoryError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors reported by pool operations.
#[derive(Error, Debug)]
pub enum PoolError {
    /// Requested category was never registered with the pool.
    ///
    /// A configuration error: the caller must treat it as a wiring bug,
    /// not a transient condition. No sub-pool is modified.
    #[error("unknown category: {category}")]
    UnknownCategory {
        /// The category that was requested.
        category: String,
    },

    /// A factory failed while constructing an entity.
    ///
    /// Fatal during warm-up (the readiness signal never turns true).
    /// During overflow construction only the failing acquire is lost.
    #[error("construction failed for category {category}")]
    Construction {
        /// The category whose factory failed.
        category: String,
        /// The underlying factory error.
        #[source]
        source: FactoryError,
    },

    /// A terminate capability failed part-way through a bulk operation.
    ///
    /// The remaining batch was aborted. Entities terminated before the
    /// failure stay terminated; there is no rollback.
    #[error(
        "terminate aborted for category {category}: \
         {terminated} of {active} active entities terminated"
    )]
    Operation {
        /// The category being terminated.
        category: String,
        /// Entities terminated before the failure.
        terminated: usize,
        /// Active entities at the start of the operation.
        active: usize,
    },

    /// Warm-up was requested on a pool that is already ready.
    #[error("pool already warmed up")]
    AlreadyWarmed,
}

impl PoolError {
    /// Builds an `UnknownCategory` error from any debuggable key.
    pub(crate) fn unknown_category<K: std::fmt::Debug>(category: &K) -> Self {
        Self::UnknownCategory {
            category: format!("{category:?}"),
        }
    }
}

/// Result type for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;
