//! One station/consumer pairing executed on its own task.

use serde::{Deserialize, Serialize};

use crate::core::{Lease, StationError, StopSignal};

/// What a finished work task did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOutcome {
    /// Station that served.
    pub station: String,
    /// Consumer that was served.
    pub consumer: String,
    /// Whether the fill delay was cut short by a stop request.
    pub cancelled: bool,
}

/// A paired station and consumer plus the stop signal that can cut the fill short.
#[derive(Debug)]
pub struct WorkTask {
    station: Lease,
    consumer: Lease,
    stop: StopSignal,
}

impl WorkTask {
    /// Pair two leases for one fill.
    #[must_use]
    pub const fn new(station: Lease, consumer: Lease, stop: StopSignal) -> Self {
        Self {
            station,
            consumer,
            stop,
        }
    }

    /// Run the fill and hand both units back.
    ///
    /// A stop request skips the rest of the delay but the consumer is still
    /// counted and both units still go back. If this future is dropped or
    /// panics the leases return the units on drop.
    pub async fn run(self) -> Result<TaskOutcome, StationError> {
        let Self {
            mut station,
            mut consumer,
            mut stop,
        } = self;

        tracing::debug!(
            station = station.unit().id(),
            consumer = consumer.unit().id(),
            "filling"
        );
        station.unit_mut().record_use();

        let delay = consumer.unit().role().work_duration();
        let cancelled = tokio::select! {
            () = tokio::time::sleep(delay) => false,
            () = stop.stopped() => true,
        };
        if cancelled {
            tracing::warn!(consumer = consumer.unit().id(), "fill interrupted by stop");
        }
        consumer.unit_mut().record_use();

        let outcome = TaskOutcome {
            station: station.unit().id().to_string(),
            consumer: consumer.unit().id().to_string(),
            cancelled,
        };

        consumer.release()?;
        station.release()?;
        Ok(outcome)
    }
}
