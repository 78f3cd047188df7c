//! Date/time helpers shared by the codecs: local-day bounds, CSV
//! date/time parsing, and the ICS UTC timestamp format.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Resolve the local midnight of `date` in `tz` to an absolute instant.
///
/// Ambiguous midnights (DST fall-back) take the earlier instant. If a DST
/// gap removes midnight entirely, the day starts when the clock resumes.
fn local_midnight(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => (naive + Duration::hours(1))
            .and_local_timezone(tz)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&naive)),
    }
}

/// The absolute bounds of one local day in `tz`: `[midnight, next midnight)`.
pub fn day_bounds(date: NaiveDate, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    (local_midnight(date, tz), local_midnight(date + Duration::days(1), tz))
}

/// True iff `instant` falls inside the local day `date` in `tz`.
pub fn is_within_day(instant: DateTime<Utc>, date: NaiveDate, tz: Tz) -> bool {
    let (day_start, day_end) = day_bounds(date, tz);
    instant >= day_start && instant < day_end
}

/// Normalize a CSV date/time string: accept a space in place of the `T`
/// separator ("2025-11-12 13:00" → "2025-11-12T13:00").
fn normalize_datetime(raw: &str) -> String {
    raw.trim().replacen(' ', "T", 1)
}

/// Parse a CSV date/time value into a naive local datetime.
///
/// Accepts `YYYY-MM-DDTHH:MM` with optional seconds, with either a `T` or
/// a space between the date and time components. Returns `None` when the
/// value does not match either form.
pub fn parse_csv_datetime(raw: &str) -> Option<NaiveDateTime> {
    let normalized = normalize_datetime(raw);
    NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M"))
        .ok()
}

/// Format an instant as an ICS UTC timestamp: `YYYYMMDD'T'HHMMSS'Z'`.
pub fn format_ics_utc(instant: DateTime<Utc>) -> String {
    instant.format("%Y%m%dT%H%M%SZ").to_string()
}
