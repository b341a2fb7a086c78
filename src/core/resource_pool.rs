//! Bounded FIFO pool of station or consumer units.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::{Semaphore, TryAcquireError};

use crate::core::{ResourceUnit, StationError};

/// Snapshot of pool occupancy and lifetime counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Pool name.
    pub name: String,
    /// Units owned by the pool, queued or checked out.
    pub capacity: usize,
    /// Units currently queued.
    pub available: usize,
    /// Units currently held by callers.
    pub in_use: usize,
    /// Total successful acquires.
    pub acquired_total: u64,
    /// Total successful releases.
    pub released_total: u64,
}

/// Queue and ownership bookkeeping guarded by a single mutex.
struct PoolState {
    queue: VecDeque<ResourceUnit>,
    /// Every id this pool has ever issued.
    members: HashSet<String>,
    /// Ids handed out and not yet released.
    checked_out: HashSet<String>,
    capacity: usize,
}

/// Fixed set of units with blocking acquire and non-blocking release.
///
/// A `tokio::sync::Semaphore` carries one permit per queued unit and parks
/// acquirers in FIFO order; the queue itself sits behind a
/// `parking_lot::Mutex` that is never held across an await point.
pub struct ResourcePool {
    name: String,
    state: Mutex<PoolState>,
    available: Semaphore,
    acquired_total: AtomicU64,
    released_total: AtomicU64,
}

impl ResourcePool {
    /// Create a pool holding `units` in the given order.
    ///
    /// Capacity is fixed to `units.len()`. Empty pools and duplicate ids are
    /// rejected.
    pub fn new(name: impl Into<String>, units: Vec<ResourceUnit>) -> Result<Self, StationError> {
        let name = name.into();
        if units.is_empty() {
            return Err(StationError::InvalidConfig(format!(
                "pool `{name}` needs at least one unit"
            )));
        }

        let mut members = HashSet::with_capacity(units.len());
        for unit in &units {
            if !members.insert(unit.id().to_string()) {
                return Err(StationError::DuplicateUnit {
                    pool: name,
                    unit: unit.id().to_string(),
                });
            }
        }

        let capacity = units.len();
        tracing::debug!(pool = %name, capacity, "pool created");
        Ok(Self {
            name,
            state: Mutex::new(PoolState {
                queue: units.into(),
                members,
                checked_out: HashSet::with_capacity(capacity),
                capacity,
            }),
            available: Semaphore::new(capacity),
            acquired_total: AtomicU64::new(0),
            released_total: AtomicU64::new(0),
        })
    }

    /// Pool name used in logs and errors.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of units owned by the pool.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.state.lock().capacity
    }

    /// Wait until a unit is queued, then remove and return the oldest one.
    ///
    /// Cancel safe: dropping the future before it resolves takes nothing
    /// from the pool.
    pub async fn acquire(&self) -> Result<ResourceUnit, StationError> {
        let permit = self
            .available
            .acquire()
            .await
            .map_err(|_| StationError::PoolClosed(self.name.clone()))?;
        permit.forget();
        self.take_front()
    }

    /// Take the oldest queued unit without waiting.
    ///
    /// Returns `Ok(None)` when every unit is checked out.
    pub fn try_acquire(&self) -> Result<Option<ResourceUnit>, StationError> {
        match self.available.try_acquire() {
            Ok(permit) => {
                permit.forget();
                self.take_front().map(Some)
            }
            Err(TryAcquireError::NoPermits) => Ok(None),
            Err(TryAcquireError::Closed) => Err(StationError::PoolClosed(self.name.clone())),
        }
    }

    /// Acquire a unit wrapped in a [`Lease`] that returns it on drop.
    pub async fn lease(self: &Arc<Self>) -> Result<Lease, StationError> {
        let unit = self.acquire().await?;
        Ok(Lease::new(Arc::clone(self), unit))
    }

    /// Put a previously acquired unit at the back of the queue.
    ///
    /// Never blocks. Releasing a unit this pool did not issue, releasing the
    /// same unit twice, or overfilling the pool is an invariant violation.
    pub fn release(&self, unit: ResourceUnit) -> Result<(), StationError> {
        let mut state = self.state.lock();
        if !state.members.contains(unit.id()) {
            return Err(StationError::UnknownUnit {
                pool: self.name.clone(),
                unit: unit.id().to_string(),
            });
        }
        if !state.checked_out.remove(unit.id()) {
            return Err(StationError::DuplicateRelease {
                pool: self.name.clone(),
                unit: unit.id().to_string(),
            });
        }
        if state.queue.len() >= state.capacity {
            return Err(StationError::CapacityExceeded {
                pool: self.name.clone(),
                capacity: state.capacity,
            });
        }
        state.queue.push_back(unit);
        // Permit goes out while the lock is held so permits never exceed queue length.
        self.available.add_permits(1);
        drop(state);

        self.released_total.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Add a brand-new unit to a running pool, growing its capacity by one.
    pub fn inject(&self, unit: ResourceUnit) -> Result<(), StationError> {
        let mut state = self.state.lock();
        if self.available.is_closed() {
            return Err(StationError::PoolClosed(self.name.clone()));
        }
        if !state.members.insert(unit.id().to_string()) {
            return Err(StationError::DuplicateUnit {
                pool: self.name.clone(),
                unit: unit.id().to_string(),
            });
        }
        state.capacity += 1;
        tracing::info!(pool = %self.name, unit = unit.id(), capacity = state.capacity, "unit injected");
        state.queue.push_back(unit);
        self.available.add_permits(1);
        Ok(())
    }

    /// Remove every queued unit without waiting, in FIFO order.
    ///
    /// Only yields the full set once all holders have released.
    #[must_use]
    pub fn drain_all(&self) -> Vec<ResourceUnit> {
        let mut drained = Vec::new();
        while let Ok(permit) = self.available.try_acquire() {
            permit.forget();
            match self.take_front() {
                Ok(unit) => drained.push(unit),
                Err(e) => {
                    tracing::error!(pool = %self.name, "drain stopped: {e}");
                    break;
                }
            }
        }
        tracing::debug!(pool = %self.name, count = drained.len(), "pool drained");
        drained
    }

    /// Tear the pool down: pending and future acquires fail with
    /// [`StationError::PoolClosed`] instead of waiting forever.
    pub fn close(&self) {
        self.available.close();
        tracing::debug!(pool = %self.name, "pool closed");
    }

    /// Whether [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.available.is_closed()
    }

    /// Current occupancy and lifetime counters.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        let state = self.state.lock();
        PoolStats {
            name: self.name.clone(),
            capacity: state.capacity,
            available: state.queue.len(),
            in_use: state.checked_out.len(),
            acquired_total: self.acquired_total.load(Ordering::Relaxed),
            released_total: self.released_total.load(Ordering::Relaxed),
        }
    }

    /// Pop the queue head after a permit was consumed.
    fn take_front(&self) -> Result<ResourceUnit, StationError> {
        let mut state = self.state.lock();
        let unit = state
            .queue
            .pop_front()
            .ok_or_else(|| StationError::QueueDesync(self.name.clone()))?;
        state.checked_out.insert(unit.id().to_string());
        drop(state);

        self.acquired_total.fetch_add(1, Ordering::Relaxed);
        Ok(unit)
    }
}

impl std::fmt::Debug for ResourcePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourcePool")
            .field("name", &self.name)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

/// A unit checked out of a pool, returned automatically when dropped.
///
/// Dropping a lease during a panic or a cancelled future still puts the unit
/// back. Call [`Lease::release`] on the normal path to observe errors.
#[derive(Debug)]
pub struct Lease {
    pool: Arc<ResourcePool>,
    unit: Option<ResourceUnit>,
}

impl Lease {
    /// Wrap a unit that was acquired from `pool`.
    #[must_use]
    pub const fn new(pool: Arc<ResourcePool>, unit: ResourceUnit) -> Self {
        Self {
            pool,
            unit: Some(unit),
        }
    }

    /// The leased unit.
    #[must_use]
    pub fn unit(&self) -> &ResourceUnit {
        self.unit.as_ref().unwrap_or_else(|| unreachable!("lease already released"))
    }

    pub(crate) fn unit_mut(&mut self) -> &mut ResourceUnit {
        self.unit.as_mut().unwrap_or_else(|| unreachable!("lease already released"))
    }

    /// Pool the unit came from.
    #[must_use]
    pub const fn pool(&self) -> &Arc<ResourcePool> {
        &self.pool
    }

    /// Return the unit to its pool, surfacing invariant violations.
    pub fn release(mut self) -> Result<(), StationError> {
        match self.unit.take() {
            Some(unit) => self.pool.release(unit),
            None => Ok(()),
        }
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        if let Some(unit) = self.unit.take() {
            let id = unit.id().to_string();
            if let Err(e) = self.pool.release(unit) {
                tracing::error!(pool = %self.pool.name(), unit = %id, "lease drop failed: {e}");
            }
        }
    }
}
