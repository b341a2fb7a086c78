//! Tests for pool builders

use std::time::Duration;

use fill_station::builders::{build_pools, build_pools_with_rng, CONSUMER_POOL, STATION_POOL};
use fill_station::config::SimulationConfig;
use fill_station::core::StationError;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_build_pools_names_units_in_order() {
    let cfg = SimulationConfig {
        station_count: 2,
        consumer_count: 3,
        ..SimulationConfig::default()
    };
    let (stations, consumers) = build_pools(&cfg).unwrap();
    assert_eq!(stations.name(), STATION_POOL);
    assert_eq!(consumers.name(), CONSUMER_POOL);

    let pumps: Vec<_> = stations.drain_all().into_iter().map(|u| u.id().to_string()).collect();
    assert_eq!(pumps, vec!["Pump #0", "Pump #1"]);

    let cars = consumers.drain_all();
    assert_eq!(cars.len(), 3);
    assert_eq!(cars[2].id(), "Vehicle #2");
    assert!(cars.iter().all(|c| c.fill_rate() == Some(Duration::from_millis(50))));
}

#[test]
fn test_random_rates_drawn_once_per_consumer() {
    let cfg = SimulationConfig {
        station_count: 1,
        consumer_count: 20,
        fill_rate_ms: 0,
        random_fill_max_ms: 3000,
        ..SimulationConfig::default()
    };
    let (_, first) = build_pools_with_rng(&cfg, &mut StdRng::seed_from_u64(9)).unwrap();
    let (_, second) = build_pools_with_rng(&cfg, &mut StdRng::seed_from_u64(9)).unwrap();

    let a: Vec<_> = first.drain_all().iter().map(|c| c.fill_rate()).collect();
    let b: Vec<_> = second.drain_all().iter().map(|c| c.fill_rate()).collect();
    assert_eq!(a, b);
    assert!(a.iter().all(|r| r.unwrap() < Duration::from_millis(3000)));
}

#[test]
fn test_custom_labels() {
    let cfg = SimulationConfig {
        station_count: 1,
        consumer_count: 1,
        station_label: "Bay".into(),
        consumer_label: "Truck".into(),
        ..SimulationConfig::default()
    };
    let (stations, consumers) = build_pools(&cfg).unwrap();
    assert_eq!(stations.drain_all()[0].id(), "Bay #0");
    assert_eq!(consumers.drain_all()[0].id(), "Truck #0");
}

#[test]
fn test_invalid_config_is_config_error() {
    let cfg = SimulationConfig {
        consumer_count: 0,
        ..SimulationConfig::default()
    };
    assert!(matches!(build_pools(&cfg), Err(StationError::InvalidConfig(_))));
}
