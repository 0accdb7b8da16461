//! Calendar helpers shared by the query model and the resolvers.
//!
//! All window arithmetic happens on local dates in the account's timezone,
//! so a window always starts at the beginning of a local day even across
//! DST changes.

use chrono::{
    DateTime, Days, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike,
};
use chrono_tz::Tz;

use crate::entity::TimeUnit;

/// Upper bound on the forward search out of a DST gap, in minutes.
const GAP_SEARCH_MINUTES: i64 = 24 * 60;

/// First instant of `date` in `tz`.
///
/// Usually local midnight. On days where midnight falls in a DST gap this is
/// the first valid instant after the gap; on days where midnight repeats it
/// is the earlier of the two.
pub fn start_of_day(tz: Tz, date: NaiveDate) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    resolve_local(tz, midnight).unwrap_or_else(|| tz.from_utc_datetime(&midnight))
}

/// First instant of the local day containing `instant`.
pub fn day_start(instant: &DateTime<Tz>) -> DateTime<Tz> {
    start_of_day(instant.timezone(), instant.date_naive())
}

/// Shift `anchor` by `amount` calendar units.
///
/// Hours are absolute. Larger units move the local date and keep the
/// wall-clock time, except that an anchor at the start of its day maps to
/// the start of the target day. A wall-clock time inside a DST gap moves
/// forward to the end of the gap.
///
/// Returns `None` when the result falls outside chrono's representable range.
pub fn shift(anchor: &DateTime<Tz>, amount: i32, unit: TimeUnit) -> Option<DateTime<Tz>> {
    let tz = anchor.timezone();
    let date = anchor.date_naive();
    let magnitude = amount.unsigned_abs();

    let target = match unit {
        TimeUnit::Hour => return anchor.checked_add_signed(Duration::hours(i64::from(amount))),
        TimeUnit::Day => shift_days(date, amount, u64::from(magnitude))?,
        TimeUnit::Week => shift_days(date, amount, u64::from(magnitude) * 7)?,
        TimeUnit::Month => shift_months(date, amount, magnitude)?,
        TimeUnit::Year => shift_months(date, amount, magnitude.checked_mul(12)?)?,
    };

    if *anchor == start_of_day(tz, date) {
        return Some(start_of_day(tz, target));
    }
    resolve_local(tz, target.and_time(anchor.time()))
}

/// Earliest instant at or after the local time `naive`.
fn resolve_local(tz: Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    if let Some(instant) = tz.from_local_datetime(&naive).earliest() {
        return Some(instant);
    }
    // Inside a gap. Gaps end on a whole minute.
    let mut candidate = naive.with_second(0)?.with_nanosecond(0)?;
    for _ in 0..GAP_SEARCH_MINUTES {
        candidate = candidate.checked_add_signed(Duration::minutes(1))?;
        if let Some(instant) = tz.from_local_datetime(&candidate).earliest() {
            return Some(instant);
        }
    }
    None
}

fn shift_days(date: NaiveDate, sign: i32, days: u64) -> Option<NaiveDate> {
    if sign >= 0 {
        date.checked_add_days(Days::new(days))
    } else {
        date.checked_sub_days(Days::new(days))
    }
}

fn shift_months(date: NaiveDate, sign: i32, months: u32) -> Option<NaiveDate> {
    if sign >= 0 {
        date.checked_add_months(Months::new(months))
    } else {
        date.checked_sub_months(Months::new(months))
    }
}
