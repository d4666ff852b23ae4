//! Date-times stored as UTC epoch milliseconds.
//!
//! Some schemas keep timestamps in a plain `BIGINT` column. These helpers convert
//! between chrono values and that representation; anything below millisecond
//! precision is dropped.

use crate::error::{DataAccessError, DataAccessResult};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

/// Interpret `value` as wall-clock time in the system zone and convert it to UTC millis.
///
/// Ambiguous times (clocks turned back) resolve to the earlier instant. Times that do not
/// exist in the system zone (clocks turned forward) are rejected.
pub fn local_to_epoch_millis(value: NaiveDateTime) -> DataAccessResult<i64> {
    Local
        .from_local_datetime(&value)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .ok_or_else(|| {
            DataAccessError::usage(format!("{value} does not exist in the local time zone"))
        })
}

/// Convert a zoned date-time to UTC millis.
pub fn zoned_to_epoch_millis<Tz: TimeZone>(value: &DateTime<Tz>) -> i64 {
    value.timestamp_millis()
}

/// Convert UTC millis to a date-time in the system zone.
pub fn epoch_millis_to_zoned(millis: i64) -> DataAccessResult<DateTime<Local>> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.with_timezone(&Local))
        .ok_or_else(|| DataAccessError::usage(format!("{millis} ms is out of range")))
}

/// Convert UTC millis to wall-clock time in the system zone.
pub fn epoch_millis_to_local(millis: i64) -> DataAccessResult<NaiveDateTime> {
    epoch_millis_to_zoned(millis).map(|dt| dt.naive_local())
}
