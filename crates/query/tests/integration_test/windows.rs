//! Tests for reusing one QueryBase across many sliding windows.

use chrono::{Datelike, TimeZone};
use rill_core::{time, DeviceType, TimeUnit};
use rill_query::*;
use uuid::Uuid;

#[test]
fn test_weekly_walk_back_keeps_weekday() {
    let tz = chrono_tz::Europe::Madrid;
    let base = DataQueryBuilder::new()
        .timezone(tz)
        .user("user", Uuid::new_v4())
        .device_type(DeviceType::Meter)
        .sum()
        .base()
        .expect("base");

    let mut start = tz.with_ymd_and_hms(2024, 4, 10, 0, 0, 0).unwrap();
    let weekday = start.weekday();
    let mut queries = Vec::new();
    for _ in 0..12 {
        start = time::shift(&start, -1, TimeUnit::Week).expect("shift");
        queries.push(base.sliding(start, 1, TimeUnit::Day, TimeAggregation::All));
    }

    assert_eq!(queries.len(), 12);
    for q in &queries {
        let (from, to) = q.window().bounds().expect("bounds");
        assert_eq!(from.weekday(), weekday);
        assert_eq!(from.naive_local().time(), chrono::NaiveTime::MIN);
        assert_eq!(to.naive_local().time(), chrono::NaiveTime::MIN);
        assert_eq!(q.account(), base.account());
    }
    // Windows are distinct values, newest first.
    assert!(queries[0].window().anchor > queries[11].window().anchor);
}

#[test]
fn test_query_serializes() {
    let tz = chrono_tz::UTC;
    let q = DataQueryBuilder::new()
        .timezone(tz)
        .user("user", Uuid::nil())
        .device_type(DeviceType::Amphiro)
        .sum()
        .base()
        .expect("base")
        .sliding(
            tz.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            1,
            TimeUnit::Day,
            TimeAggregation::All,
        );

    let json = serde_json::to_value(&q).expect("serialize");
    assert_eq!(json["source"], "amphiro");
    assert_eq!(json["metrics"][0], "sum");
    assert_eq!(json["window"]["unit"], "day");
    assert_eq!(json["account"]["label"], "user");
}
