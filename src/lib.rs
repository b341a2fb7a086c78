//! # Fill Station
//!
//! A bounded station/consumer pairing engine.
//!
//! A fixed pool of stations (pumps) and a fixed pool of consumers (cars) are
//! matched one-to-one. Each match runs a fill on its own task, then returns
//! both units to their pools. After the configured run time the engine stops
//! pairing, waits for every in-flight fill, and reports how often each unit
//! was used.
//!
//! ## Key Features
//!
//! - **Bounded FIFO pools**: async `acquire`, non-blocking `release`, and an
//!   exhaustive `drain_all` once work has quiesced
//! - **Ordered rendezvous**: station first, then consumer, for every pairing
//! - **Structured concurrency**: every fill is tracked in a `JoinSet` and
//!   joined before reporting
//! - **Guaranteed return**: units are held in leases that go back to the pool
//!   on every exit path, including cancellation and panics
//! - **Invariant checks**: foreign units, double releases and lost units halt
//!   the run with a typed error
//!
//! ## Example
//!
//! ```rust,no_run
//! use fill_station::builders::build_engine;
//! use fill_station::config::SimulationConfig;
//!
//! # async fn demo() -> Result<(), fill_station::core::StationError> {
//! let cfg = SimulationConfig {
//!     station_count: 2,
//!     consumer_count: 4,
//!     run_duration_secs: 1,
//!     ..SimulationConfig::default()
//! };
//! let summary = build_engine(&cfg)?.run().await?;
//! assert_eq!(summary.report.station_total(), summary.report.consumer_total());
//! print!("{}", summary.report);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Pools, pairing engine, work tasks and drain reporting.
pub mod core;
/// Configuration models for the simulation.
pub mod config;
/// Builders to construct pools and the engine from configuration.
pub mod builders;
/// Tokio runtime construction.
pub mod runtime;
/// Shared utilities.
pub mod util;
