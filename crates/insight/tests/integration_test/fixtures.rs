//! A small town of households with Europe/Athens meters.

use std::path::PathBuf;

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use uuid::Uuid;

use rill_core::time::start_of_day;
use rill_core::{AccountKey, DeviceType};
use rill_query::{InMemoryDataService, Measurement};
use rill_rules::RuleSet;

pub const TZ: Tz = chrono_tz::Europe::Athens;

pub fn alice() -> AccountKey {
    Uuid::from_u128(0xA11CE)
}

pub fn bob() -> AccountKey {
    Uuid::from_u128(0xB0B)
}

pub fn carol() -> AccountKey {
    Uuid::from_u128(0xCA201)
}

pub fn dave() -> AccountKey {
    Uuid::from_u128(0xDA7E)
}

/// Wednesday, three days after the switch to summer time.
pub fn ref_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 3).unwrap()
}

pub fn ref_date() -> DateTime<Tz> {
    start_of_day(TZ, ref_day())
}

pub fn rules() -> RuleSet {
    let dir = PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/rules"));
    RuleSet::from_dir(dir).expect("shipped rules compile")
}

fn at(day: NaiveDate, hour: u32) -> DateTime<Utc> {
    TZ.from_local_datetime(&day.and_hms_opt(hour, 0, 0).unwrap())
        .earliest()
        .unwrap()
        .with_timezone(&Utc)
}

fn weeks_back(n: u64) -> NaiveDate {
    ref_day().checked_sub_days(Days::new(7 * n)).unwrap()
}

pub fn town() -> InMemoryDataService {
    let mut m = Vec::new();

    // Alice: a steady 60 l every Wednesday, 90 l today. The 01:00 reading
    // is still the previous day in UTC.
    for week in 1..=12 {
        m.push(Measurement::volume(alice(), DeviceType::Meter, at(weeks_back(week), 8), 30.0));
        m.push(Measurement::volume(alice(), DeviceType::Meter, at(weeks_back(week), 20), 30.0));
        // Heavy Tuesdays must not leak into the Wednesday baseline.
        let tuesday = weeks_back(week).pred_opt().unwrap();
        m.push(Measurement::volume(alice(), DeviceType::Meter, at(tuesday, 12), 500.0));
    }
    m.push(Measurement::volume(alice(), DeviceType::Meter, at(ref_day(), 1), 40.0));
    m.push(Measurement::volume(alice(), DeviceType::Meter, at(ref_day(), 18), 50.0));

    // Bob: barely showers today.
    for week in 1..=12 {
        m.push(Measurement::volume(bob(), DeviceType::Amphiro, at(weeks_back(week), 7), 40.0));
    }
    m.push(Measurement::volume(bob(), DeviceType::Amphiro, at(ref_day(), 7), 2.0));

    // Carol: new customer, four weeks of history.
    for week in 1..=4 {
        m.push(Measurement::volume(carol(), DeviceType::Meter, at(weeks_back(week), 9), 120.0));
    }
    m.push(Measurement::volume(carol(), DeviceType::Meter, at(ref_day(), 9), 400.0));

    // Dave: 100 ± 10 l on Wednesdays, 80 l today.
    for week in 1..=12u64 {
        let volume = if week % 2 == 0 { 110.0 } else { 90.0 };
        m.push(Measurement::volume(dave(), DeviceType::Meter, at(weeks_back(week), 19), volume));
    }
    m.push(Measurement::volume(dave(), DeviceType::Meter, at(ref_day(), 19), 80.0));

    InMemoryDataService::new(m)
}
