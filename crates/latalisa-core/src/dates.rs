//! Conversions between instants and Brazilian local date/time values.
//!
//! Local values use a fixed UTC-03:00 offset.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    Timelike, Utc,
};

const BRAZIL_OFFSET_SECONDS: i32 = 3 * 3600;

/// Units for [`date_diff`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

/// The fixed Brazilian offset, UTC-03:00.
pub fn brazil_offset() -> FixedOffset {
    FixedOffset::west_opt(BRAZIL_OFFSET_SECONDS).unwrap_or_else(|| Utc.fix())
}

/// Views an instant in the Brazilian offset.
pub fn to_zoned(instant: DateTime<Utc>) -> DateTime<FixedOffset> {
    instant.with_timezone(&brazil_offset())
}

pub fn to_local_date_time(instant: DateTime<Utc>) -> NaiveDateTime {
    to_zoned(instant).naive_local()
}

pub fn to_local_date(instant: DateTime<Utc>) -> NaiveDate {
    to_local_date_time(instant).date()
}

pub fn to_local_time(instant: DateTime<Utc>) -> NaiveTime {
    to_local_date_time(instant).time()
}

/// Interprets a Brazilian local date-time as an instant.
pub fn from_local_date_time(value: NaiveDateTime) -> DateTime<Utc> {
    (value + Duration::seconds(i64::from(BRAZIL_OFFSET_SECONDS))).and_utc()
}

/// The instant at which `value` starts in Brazil.
pub fn from_local_date(value: NaiveDate) -> DateTime<Utc> {
    from_local_date_time(value.and_time(NaiveTime::MIN))
}

/// The instant at which `value` occurs today in Brazil.
pub fn from_local_time(value: NaiveTime) -> DateTime<Utc> {
    from_local_date_time(to_local_date(Utc::now()).and_time(value))
}

/// Whole `unit`s elapsed from `start` to `end`, in Brazilian local time.
///
/// Partial units are truncated toward zero; the result is negative when
/// `end` precedes `start`.
///
/// ```
/// use chrono::NaiveDate;
/// use latalisa_core::dates::{date_diff, from_local_date_time, DateUnit};
///
/// let start = from_local_date_time(NaiveDate::from_ymd_opt(1979, 9, 7).unwrap().and_hms_opt(10, 15, 0).unwrap());
/// let end = from_local_date_time(NaiveDate::from_ymd_opt(2021, 9, 7).unwrap().and_hms_opt(10, 15, 0).unwrap());
/// assert_eq!(date_diff(start, end, DateUnit::Days), 15341);
/// assert_eq!(date_diff(start, end, DateUnit::Years), 42);
/// ```
pub fn date_diff(start: DateTime<Utc>, end: DateTime<Utc>, unit: DateUnit) -> i64 {
    let elapsed = end - start;
    match unit {
        DateUnit::Seconds => elapsed.num_seconds(),
        DateUnit::Minutes => elapsed.num_minutes(),
        DateUnit::Hours => elapsed.num_hours(),
        DateUnit::Days => elapsed.num_days(),
        DateUnit::Weeks => elapsed.num_weeks(),
        DateUnit::Months => months_between(to_local_date_time(start), to_local_date_time(end)),
        DateUnit::Years => months_between(to_local_date_time(start), to_local_date_time(end)) / 12,
    }
}

fn months_between(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    let months = i64::from(end.year() - start.year()) * 12
        + i64::from(end.month()) - i64::from(start.month());
    let tail = |v: NaiveDateTime| (v.day(), v.num_seconds_from_midnight(), v.nanosecond());
    if months > 0 && tail(end) < tail(start) {
        months - 1
    } else if months < 0 && tail(end) > tail(start) {
        months + 1
    } else {
        months
    }
}

/// The current local date-time truncated to whole seconds.
pub fn now_seconds() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Midnight of the current local date.
pub fn today() -> NaiveDateTime {
    Local::now().date_naive().and_time(NaiveTime::MIN)
}
