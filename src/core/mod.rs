//! Pools, pairing engine, work tasks and drain reporting.

pub mod error;
pub mod unit;
pub mod resource_pool;
pub mod shutdown;
pub mod work_task;
pub mod engine;
pub mod report;

pub use error::StationError;
pub use unit::{ResourceUnit, UnitRole};
pub use resource_pool::{Lease, PoolStats, ResourcePool};
pub use shutdown::{stop_channel, StopSignal, StopTrigger};
pub use work_task::{TaskOutcome, WorkTask};
pub use engine::{EngineConfig, EngineHandle, EngineState, PairingEngine, RunSummary};
pub use report::{DrainReport, DrainReporter, UnitReport};
