//! Tests for configuration validation

use std::time::Duration;

use fill_station::config::{DeadlinePolicy, FillRate, SimulationConfig};

#[test]
fn test_defaults() {
    let cfg = SimulationConfig::default();
    assert_eq!(cfg.station_count, 4);
    assert_eq!(cfg.consumer_count, 10);
    assert_eq!(cfg.run_duration_secs, 30);
    assert_eq!(cfg.fill_rate_ms, 50);
    assert_eq!(cfg.deadline, DeadlinePolicy::Cooperative);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_invalid_station_count() {
    let cfg = SimulationConfig {
        station_count: 0,
        ..SimulationConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_invalid_consumer_count() {
    let cfg = SimulationConfig {
        consumer_count: 0,
        ..SimulationConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_invalid_duration() {
    let cfg = SimulationConfig {
        run_duration_secs: 0,
        ..SimulationConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_random_fill_needs_upper_bound() {
    let cfg = SimulationConfig {
        fill_rate_ms: 0,
        random_fill_max_ms: 0,
        ..SimulationConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_fixed_fill_rate() {
    let cfg = SimulationConfig::default();
    assert_eq!(cfg.fill_rate(), FillRate::Fixed(Duration::from_millis(50)));
    assert_eq!(cfg.run_duration(), Duration::from_secs(30));
}

#[test]
fn test_from_json_partial() {
    let json = r#"{
        "station_count": 2,
        "consumer_count": 3,
        "fill_rate_ms": 0,
        "random_fill_max_ms": 3000,
        "deadline": "preemptive"
    }"#;

    let cfg = SimulationConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.station_count, 2);
    assert_eq!(cfg.consumer_count, 3);
    assert_eq!(cfg.run_duration_secs, 30);
    assert_eq!(cfg.deadline, DeadlinePolicy::Preemptive);
    assert_eq!(
        cfg.fill_rate(),
        FillRate::Random {
            max: Duration::from_millis(3000)
        }
    );
}

#[test]
fn test_from_json_rejects_invalid() {
    assert!(SimulationConfig::from_json_str(r#"{"station_count": 0}"#).is_err());
    assert!(SimulationConfig::from_json_str("not json").is_err());
}
