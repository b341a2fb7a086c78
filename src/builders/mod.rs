//! Builders to construct pools and the engine from configuration.

pub mod pool_builder;

pub use pool_builder::{build_engine, build_pools, build_pools_with_rng, CONSUMER_POOL, STATION_POOL};
