//! Builders to construct pools and the engine from configuration.

use rand::Rng;

use crate::config::SimulationConfig;
use crate::core::{EngineConfig, PairingEngine, ResourcePool, ResourceUnit, StationError};

/// Name of the station pool.
pub const STATION_POOL: &str = "stations";
/// Name of the consumer pool.
pub const CONSUMER_POOL: &str = "consumers";

/// Build the station and consumer pools, drawing random fill rates from the thread RNG.
pub fn build_pools(cfg: &SimulationConfig) -> Result<(ResourcePool, ResourcePool), StationError> {
    build_pools_with_rng(cfg, &mut rand::rng())
}

/// Build the station and consumer pools with a caller-supplied RNG.
///
/// Random fill rates are drawn once per consumer, here, and never again.
pub fn build_pools_with_rng<R: Rng + ?Sized>(
    cfg: &SimulationConfig,
    rng: &mut R,
) -> Result<(ResourcePool, ResourcePool), StationError> {
    cfg.validate()
        .map_err(|e| StationError::InvalidConfig(format!("config invalid: {e}")))?;

    let stations = (0..cfg.station_count)
        .map(|i| ResourceUnit::station(format!("{} #{i}", cfg.station_label)))
        .collect();

    let fill_rate = cfg.fill_rate();
    let consumers = (0..cfg.consumer_count)
        .map(|i| ResourceUnit::consumer(format!("{} #{i}", cfg.consumer_label), fill_rate.sample(rng)))
        .collect();

    Ok((
        ResourcePool::new(STATION_POOL, stations)?,
        ResourcePool::new(CONSUMER_POOL, consumers)?,
    ))
}

/// Build a ready-to-run engine.
pub fn build_engine(cfg: &SimulationConfig) -> Result<PairingEngine, StationError> {
    let (stations, consumers) = build_pools(cfg)?;
    Ok(PairingEngine::new(stations, consumers, EngineConfig::from(cfg)))
}
