//! Tests for InMemoryDataService: JSON loading and timezone-aware windows.

use std::io::Write;

use chrono::{TimeZone, Utc};
use rill_core::{DeviceType, TimeUnit};
use rill_query::*;
use uuid::Uuid;

#[test]
fn test_load_measurements_from_json() {
    let account = Uuid::new_v4();
    let json = serde_json::json!([
        {
            "account": account,
            "device_type": "amphiro",
            "timestamp": "2024-06-03T07:15:00Z",
            "volume": 42.5,
            "temperature": 37.0
        },
        {
            "account": account,
            "device_type": "amphiro",
            "timestamp": "2024-06-03T19:40:00Z",
            "volume": 30.0
        }
    ]);

    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    write!(file, "{}", json).expect("write");

    let service = InMemoryDataService::from_json_file(file.path()).expect("load");
    assert_eq!(service.len(), 2);

    let query = DataQueryBuilder::new()
        .user("user", account)
        .device_type(DeviceType::Amphiro)
        .sum()
        .average()
        .base()
        .expect("base")
        .sliding(
            chrono_tz::UTC.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap(),
            1,
            TimeUnit::Day,
            TimeAggregation::All,
        );

    let response = service.execute(&query).expect("execute");
    let facade = response.facade(DeviceType::Amphiro).expect("facade");
    assert_eq!(facade.get(DataField::Volume, Metric::Sum), Some(72.5));
    assert_eq!(facade.get(DataField::Volume, Metric::Average), Some(36.25));
    assert_eq!(facade.get(DataField::Temperature, Metric::Sum), Some(37.0));
}

#[test]
fn test_missing_file_is_unavailable() {
    let err = InMemoryDataService::from_json_file(std::path::Path::new("/definitely/not/here.json"))
        .unwrap_err();
    assert!(matches!(err, QueryError::Unavailable(_)));
}

#[test]
fn test_malformed_file_is_not_unavailable() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    file.write_all(br#"[{"account": "not-a-uuid", "#).expect("write");

    let err = InMemoryDataService::from_json_file(file.path()).unwrap_err();
    assert!(matches!(err, QueryError::Malformed(_)), "got {err:?}");
    assert!(err.to_string().contains(&file.path().display().to_string()));
}

#[test]
fn test_window_follows_local_midnight() {
    // 23:30 UTC on June 2nd is already June 3rd in Athens (UTC+3).
    let account = Uuid::new_v4();
    let service = InMemoryDataService::new(vec![
        Measurement::volume(
            account,
            DeviceType::Meter,
            Utc.with_ymd_and_hms(2024, 6, 2, 23, 30, 0).unwrap(),
            8.0,
        ),
        Measurement::volume(
            account,
            DeviceType::Meter,
            Utc.with_ymd_and_hms(2024, 6, 3, 21, 30, 0).unwrap(),
            9.0,
        ),
    ]);

    let tz = chrono_tz::Europe::Athens;
    let query = DataQueryBuilder::new()
        .timezone(tz)
        .user("user", account)
        .device_type(DeviceType::Meter)
        .sum()
        .base()
        .expect("base")
        .sliding(
            tz.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap(),
            1,
            TimeUnit::Day,
            TimeAggregation::All,
        );

    let response = service.execute(&query).expect("execute");
    let facade = response.facade(DeviceType::Meter).expect("facade");
    // The 21:30 UTC reading is 00:30 on June 4th locally.
    assert_eq!(facade.get(DataField::Volume, Metric::Sum), Some(8.0));
}
