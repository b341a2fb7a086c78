//! Tests for error types

use fill_station::core::StationError;

#[test]
fn test_invalid_config_error() {
    let err = StationError::InvalidConfig("station_count must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: station_count must be greater than 0"
    );
    assert!(!err.is_invariant_violation());
}

#[test]
fn test_unknown_unit_error() {
    let err = StationError::UnknownUnit {
        pool: "stations".to_string(),
        unit: "Vehicle #0".to_string(),
    };
    assert_eq!(format!("{}", err), "pool `stations` does not own unit `Vehicle #0`");
    assert!(err.is_invariant_violation());
}

#[test]
fn test_capacity_exceeded_error() {
    let err = StationError::CapacityExceeded {
        pool: "consumers".to_string(),
        capacity: 10,
    };
    assert_eq!(format!("{}", err), "pool `consumers` would exceed capacity 10");
}

#[test]
fn test_incomplete_drain_error() {
    let err = StationError::IncompleteDrain {
        pool: "stations".to_string(),
        expected: 4,
        found: 3,
    };
    assert_eq!(format!("{}", err), "pool `stations` drained 3 of 4 units");
    assert!(err.is_invariant_violation());
}

#[test]
fn test_pool_closed_error() {
    let err = StationError::PoolClosed("consumers".to_string());
    assert_eq!(format!("{}", err), "pool closed: consumers");
    assert!(!err.is_invariant_violation());
}
