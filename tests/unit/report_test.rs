//! Tests for drain reporting

use std::time::Duration;

use fill_station::core::{DrainReporter, ResourcePool, ResourceUnit};

#[test]
fn test_report_follows_pool_fifo_order() {
    let stations = ResourcePool::new(
        "stations",
        vec![ResourceUnit::station("Pump #0"), ResourceUnit::station("Pump #1")],
    )
    .unwrap();
    let consumers = ResourcePool::new(
        "consumers",
        vec![ResourceUnit::consumer("Vehicle #0", Duration::from_millis(50))],
    )
    .unwrap();

    let pump = stations.try_acquire().unwrap().unwrap();
    stations.release(pump).unwrap();

    let report = DrainReporter::collect(&stations, &consumers).unwrap();
    let ids: Vec<_> = report.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, vec!["Pump #1", "Pump #0", "Vehicle #0"]);
    assert_eq!(
        report.to_string(),
        "Pump #1 pumped 0 times.\nPump #0 pumped 0 times.\nVehicle #0 filled 0 times with a 50ms fill rate.\n"
    );
}

#[test]
fn test_report_serializes() {
    let stations = ResourcePool::new("stations", vec![ResourceUnit::station("Pump #0")]).unwrap();
    let consumers = ResourcePool::new(
        "consumers",
        vec![ResourceUnit::consumer("Vehicle #0", Duration::ZERO)],
    )
    .unwrap();

    let report = DrainReporter::collect(&stations, &consumers).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["stations"][0]["id"], "Pump #0");
    assert_eq!(json["stations"][0]["role"], "station");
    assert_eq!(json["consumers"][0]["usage_count"], 0);
}
