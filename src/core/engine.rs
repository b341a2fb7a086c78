//! Pairing engine: rendezvous of one station and one consumer per task.
//!
//! The engine moves through `Running -> Draining -> Stopped`:
//!
//! - **Running** acquires a station, then a consumer, and spawns a
//!   [`WorkTask`] for the pair into a `JoinSet`. Elapsed time is checked after
//!   every dispatch. Under [`DeadlinePolicy::Cooperative`] a blocked acquire is
//!   not interrupted by the deadline; under [`DeadlinePolicy::Preemptive`] it is.
//!   An explicit stop interrupts a blocked acquire under either policy.
//! - **Draining** stops acquiring and joins every dispatched task.
//! - **Stopped** hands both pools to the [`DrainReporter`].

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::{JoinError, JoinSet};
use tokio::time::Instant;
use tracing::Instrument;

use crate::config::{DeadlinePolicy, SimulationConfig};
use crate::core::{
    stop_channel, DrainReport, DrainReporter, Lease, ResourcePool, StationError, StopSignal,
    StopTrigger, TaskOutcome, WorkTask,
};

/// Stand-in deadline for run durations too large to add to an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    /// Pairing and dispatching.
    Running,
    /// Waiting for in-flight tasks.
    Draining,
    /// All tasks joined and pools drained.
    Stopped,
}

/// Run parameters consumed by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Wall-clock time spent in `Running`.
    pub run_duration: Duration,
    /// Whether the deadline may interrupt a blocked acquire.
    pub deadline: DeadlinePolicy,
}

impl EngineConfig {
    /// Cooperative engine config for the given run duration.
    #[must_use]
    pub const fn new(run_duration: Duration) -> Self {
        Self {
            run_duration,
            deadline: DeadlinePolicy::Cooperative,
        }
    }

    /// Override the deadline policy.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: DeadlinePolicy) -> Self {
        self.deadline = deadline;
        self
    }
}

impl From<&SimulationConfig> for EngineConfig {
    fn from(cfg: &SimulationConfig) -> Self {
        Self::new(cfg.run_duration()).with_deadline(cfg.deadline)
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Identifier attached to the run's tracing span.
    pub run_id: String,
    /// Time spent in `Running`.
    pub elapsed_running: Duration,
    /// Tasks spawned.
    pub dispatched: u64,
    /// Tasks joined successfully.
    pub completed: u64,
    /// Tasks whose fill delay was cut short by a stop.
    pub cancelled: u64,
    /// Final state, always `Stopped`.
    pub state: EngineState,
    /// Final per-unit counters.
    pub report: DrainReport,
}

/// Cloneable control surface for a running engine.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    stop: Arc<StopTrigger>,
    state: watch::Receiver<EngineState>,
}

impl EngineHandle {
    /// Ask the engine to stop pairing and cut in-flight fills short.
    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> EngineState {
        *self.state.borrow()
    }

    /// Wait until the engine reaches `target` (or any later state).
    pub async fn wait_for(&mut self, target: EngineState) {
        let rank = |s: EngineState| s as u8;
        let _ = self.state.wait_for(|s| rank(*s) >= rank(target)).await;
    }
}

/// Pairs stations with consumers and runs a work task per pair.
#[derive(Debug)]
pub struct PairingEngine {
    stations: Arc<ResourcePool>,
    consumers: Arc<ResourcePool>,
    config: EngineConfig,
    stop: Arc<StopTrigger>,
    state: watch::Sender<EngineState>,
}

/// Running tallies of joined tasks.
#[derive(Debug, Default)]
struct Tally {
    completed: u64,
    cancelled: u64,
}

impl PairingEngine {
    /// Create an engine over two pools.
    #[must_use]
    pub fn new(stations: ResourcePool, consumers: ResourcePool, config: EngineConfig) -> Self {
        let (stop, _) = stop_channel();
        let (state, _) = watch::channel(EngineState::Running);
        Self {
            stations: Arc::new(stations),
            consumers: Arc::new(consumers),
            config,
            stop: Arc::new(stop),
            state,
        }
    }

    /// Station pool; units may be injected while the engine runs.
    #[must_use]
    pub const fn stations(&self) -> &Arc<ResourcePool> {
        &self.stations
    }

    /// Consumer pool; units may be injected while the engine runs.
    #[must_use]
    pub const fn consumers(&self) -> &Arc<ResourcePool> {
        &self.consumers
    }

    /// Engine run parameters.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Control handle usable from other tasks.
    #[must_use]
    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            stop: Arc::clone(&self.stop),
            state: self.state.subscribe(),
        }
    }

    /// Run until the deadline or a stop, join all tasks, then drain.
    ///
    /// Any invariant violation or panicked task aborts the run with an error
    /// instead of a report. Both pools are closed once the run ends.
    pub async fn run(self) -> Result<RunSummary, StationError> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let span = tracing::info_span!("engine_run", run_id = %run_id);
        self.run_inner(run_id).instrument(span).await
    }

    async fn run_inner(self, run_id: String) -> Result<RunSummary, StationError> {
        tracing::info!(
            stations = self.stations.capacity(),
            consumers = self.consumers.capacity(),
            run_duration = ?self.config.run_duration,
            deadline = ?self.config.deadline,
            "engine running"
        );

        let started = Instant::now();
        let deadline = started
            .checked_add(self.config.run_duration)
            .unwrap_or_else(|| started + FAR_FUTURE);
        let mut stop = self.stop.subscribe();
        let mut tasks = JoinSet::new();
        let mut tally = Tally::default();
        let mut dispatched = 0_u64;

        loop {
            let Some((station, consumer)) = self.pair(&mut stop, deadline).await? else {
                break;
            };
            tasks.spawn(WorkTask::new(station, consumer, stop.clone()).run());
            dispatched += 1;

            while let Some(joined) = tasks.try_join_next() {
                Self::settle(joined, &mut tally)?;
            }

            if started.elapsed() >= self.config.run_duration || stop.is_stopped() {
                break;
            }
        }

        let elapsed_running = started.elapsed();
        self.state.send_replace(EngineState::Draining);
        tracing::info!(
            elapsed = ?elapsed_running,
            dispatched,
            in_flight = tasks.len(),
            "waiting for remaining tasks"
        );

        while let Some(joined) = tasks.join_next().await {
            Self::settle(joined, &mut tally)?;
        }

        self.state.send_replace(EngineState::Stopped);
        let report = DrainReporter::collect(&self.stations, &self.consumers);
        self.stations.close();
        self.consumers.close();
        let report = report?;
        tracing::info!(
            completed = tally.completed,
            cancelled = tally.cancelled,
            "engine stopped"
        );

        Ok(RunSummary {
            run_id,
            elapsed_running,
            dispatched,
            completed: tally.completed,
            cancelled: tally.cancelled,
            state: EngineState::Stopped,
            report,
        })
    }

    /// Acquire a station, then a consumer.
    ///
    /// Returns `None` when a stop (or, under the preemptive policy, the
    /// deadline) wins the race; a station taken for that attempt goes back.
    async fn pair(
        &self,
        stop: &mut StopSignal,
        deadline: Instant,
    ) -> Result<Option<(Lease, Lease)>, StationError> {
        let expiry = match self.config.deadline {
            DeadlinePolicy::Cooperative => None,
            DeadlinePolicy::Preemptive => Some(deadline),
        };

        let Some(station) = Self::acquire_until(&self.stations, stop, expiry).await? else {
            return Ok(None);
        };
        let Some(consumer) = Self::acquire_until(&self.consumers, stop, expiry).await? else {
            station.release()?;
            return Ok(None);
        };
        Ok(Some((station, consumer)))
    }

    async fn acquire_until(
        pool: &Arc<ResourcePool>,
        stop: &mut StopSignal,
        expiry: Option<Instant>,
    ) -> Result<Option<Lease>, StationError> {
        let expired = async {
            match expiry {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending().await,
            }
        };

        // A raised stop wins over a unit that is also ready.
        tokio::select! {
            biased;
            () = stop.stopped() => {
                tracing::debug!(pool = pool.name(), "acquire interrupted by stop");
                Ok(None)
            }
            lease = pool.lease() => lease.map(Some),
            () = expired => {
                tracing::debug!(pool = pool.name(), "acquire interrupted by deadline");
                Ok(None)
            }
        }
    }

    fn settle(
        joined: Result<Result<TaskOutcome, StationError>, JoinError>,
        tally: &mut Tally,
    ) -> Result<(), StationError> {
        match joined {
            Ok(Ok(outcome)) => {
                tally.completed += 1;
                if outcome.cancelled {
                    tally.cancelled += 1;
                }
                Ok(())
            }
            Ok(Err(e)) => {
                tracing::error!("pool invariant violated: {e}");
                Err(e)
            }
            Err(e) => {
                tracing::error!("work task did not finish: {e}");
                Err(StationError::TaskFailed(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ResourceUnit;

    fn pumps(n: usize) -> ResourcePool {
        let units = (0..n).map(|i| ResourceUnit::station(format!("Pump #{i}"))).collect();
        ResourcePool::new("stations", units).unwrap()
    }

    fn cars(n: usize, fill: Duration) -> ResourcePool {
        let units = (0..n)
            .map(|i| ResourceUnit::consumer(format!("Vehicle #{i}"), fill))
            .collect();
        ResourcePool::new("consumers", units).unwrap()
    }

    async fn exploding_fill() -> Result<TaskOutcome, StationError> {
        panic!("fill exploded")
    }

    #[test]
    fn test_settle_counts_outcomes() {
        let mut tally = Tally::default();
        let outcome = TaskOutcome {
            station: "Pump #0".into(),
            consumer: "Vehicle #0".into(),
            cancelled: true,
        };
        PairingEngine::settle(Ok(Ok(outcome)), &mut tally).unwrap();
        assert_eq!(tally.completed, 1);
        assert_eq!(tally.cancelled, 1);
    }

    #[test]
    fn test_settle_propagates_invariant_violation() {
        let mut tally = Tally::default();
        let err = PairingEngine::settle(
            Ok(Err(StationError::UnknownUnit {
                pool: "stations".into(),
                unit: "Vehicle #0".into(),
            })),
            &mut tally,
        )
        .unwrap_err();
        assert!(matches!(err, StationError::UnknownUnit { .. }));
        assert_eq!(tally.completed, 0);
    }

    #[tokio::test]
    async fn test_settle_turns_panic_into_task_failed() {
        let mut tasks = JoinSet::new();
        tasks.spawn(exploding_fill());
        let joined = tasks.join_next().await.unwrap();

        let mut tally = Tally::default();
        let err = PairingEngine::settle(joined, &mut tally).unwrap_err();
        assert!(matches!(err, StationError::TaskFailed(ref msg) if msg.contains("panic")));
        assert!(err.is_invariant_violation());
        assert_eq!(tally.completed, 0);
    }

    #[tokio::test]
    async fn test_run_halts_without_report_when_unit_goes_missing() {
        let engine = PairingEngine::new(
            pumps(2),
            cars(1, Duration::from_millis(5)),
            EngineConfig::new(Duration::from_millis(50)),
        );
        let _stolen = engine.stations().try_acquire().unwrap().unwrap();

        let err = engine.run().await.unwrap_err();
        match err {
            StationError::IncompleteDrain {
                pool,
                expected,
                found,
            } => {
                assert_eq!(pool, "stations");
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_huge_run_duration_does_not_overflow() {
        let cfg = SimulationConfig {
            station_count: 1,
            consumer_count: 1,
            run_duration_secs: u64::MAX,
            fill_rate_ms: 5,
            ..SimulationConfig::default()
        };
        assert!(cfg.validate().is_ok());

        for policy in [DeadlinePolicy::Cooperative, DeadlinePolicy::Preemptive] {
            let engine = PairingEngine::new(
                pumps(1),
                cars(1, Duration::from_millis(5)),
                EngineConfig::from(&cfg).with_deadline(policy),
            );
            let handle = engine.handle();
            let run = tokio::spawn(engine.run());

            tokio::time::sleep(Duration::from_millis(30)).await;
            handle.stop();

            let summary = tokio::time::timeout(Duration::from_secs(5), run)
                .await
                .unwrap()
                .unwrap()
                .unwrap();
            assert_eq!(summary.state, EngineState::Stopped);
            assert_eq!(summary.report.station_total(), summary.dispatched);
        }
    }

    #[tokio::test]
    async fn test_pools_closed_after_run() {
        let engine = PairingEngine::new(
            pumps(1),
            cars(1, Duration::ZERO),
            EngineConfig::new(Duration::from_millis(10)),
        );
        let stations = Arc::clone(engine.stations());

        let summary = engine.run().await.unwrap();
        assert_eq!(summary.report.stations.len(), 1);
        assert!(matches!(stations.acquire().await, Err(StationError::PoolClosed(_))));
    }
}
