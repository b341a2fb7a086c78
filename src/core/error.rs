//! Error types for pool and engine operations.

use thiserror::Error;

/// Errors produced by pools, the pairing engine and the drain reporter.
///
/// `InvalidConfig` is raised before a run starts and `PoolClosed` only after
/// it ends; every other variant aborts the run.
#[derive(Debug, Error)]
pub enum StationError {
    /// Configuration rejected before any pool was created.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A unit was released into a pool that never issued it.
    #[error("pool `{pool}` does not own unit `{unit}`")]
    UnknownUnit {
        /// Pool name.
        pool: String,
        /// Offending unit id.
        unit: String,
    },
    /// A unit was released while already queued.
    #[error("unit `{unit}` released twice into pool `{pool}`")]
    DuplicateRelease {
        /// Pool name.
        pool: String,
        /// Offending unit id.
        unit: String,
    },
    /// A release would push the queue past the pool capacity.
    #[error("pool `{pool}` would exceed capacity {capacity}")]
    CapacityExceeded {
        /// Pool name.
        pool: String,
        /// Fixed pool capacity.
        capacity: usize,
    },
    /// Two units with the same id were handed to one pool.
    #[error("duplicate unit `{unit}` in pool `{pool}`")]
    DuplicateUnit {
        /// Pool name.
        pool: String,
        /// Offending unit id.
        unit: String,
    },
    /// A drain after quiescence did not yield every unit.
    #[error("pool `{pool}` drained {found} of {expected} units")]
    IncompleteDrain {
        /// Pool name.
        pool: String,
        /// Capacity of the pool.
        expected: usize,
        /// Units actually drained.
        found: usize,
    },
    /// A permit was granted but the queue held no unit.
    #[error("pool `{0}` granted a unit it does not hold")]
    QueueDesync(String),
    /// A work task panicked; its units were returned but the run is void.
    #[error("work task failed: {0}")]
    TaskFailed(String),
    /// The pool was torn down after its run; no more units will be handed out.
    #[error("pool closed: {0}")]
    PoolClosed(String),
}

impl StationError {
    /// Whether this error reports a broken pool invariant.
    #[must_use]
    pub const fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::UnknownUnit { .. }
                | Self::DuplicateRelease { .. }
                | Self::CapacityExceeded { .. }
                | Self::DuplicateUnit { .. }
                | Self::IncompleteDrain { .. }
                | Self::QueueDesync(_)
                | Self::TaskFailed(_)
        )
    }
}
