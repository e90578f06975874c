//! Civil-time handling for the dispatch backend.
//!
//! The backend expects query boundaries in UTC (`casOd`/`casDo`) but its
//! stored instants are actually Europe/Prague civil times labeled as UTC.
//! User-facing inputs are therefore interpreted as Prague civil time and
//! converted to real UTC here before they reach the wire; for analysis the
//! inverse shift lives on the event record itself.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone as _, Utc};
use chrono_tz::OffsetComponents as _;
use dispatch_stats_event_models::BACKEND_TZ;

use crate::SourceError;

/// Parses a CLI date argument into a civil datetime.
///
/// Accepts `YYYY-MM-DD` (expanded to the start or end of the day depending
/// on `end_of_day`) or a full `YYYY-MM-DDTHH:MM:SS`, with an optional `Z`
/// suffix which is ignored (inputs are civil Prague time by definition).
///
/// # Errors
///
/// Returns [`SourceError::InvalidDate`] for anything else.
pub fn parse_civil_arg(input: &str, end_of_day: bool) -> Result<NaiveDateTime, SourceError> {
    let trimmed = input.trim().trim_end_matches('Z');

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        let time = if end_of_day {
            chrono::NaiveTime::from_hms_opt(23, 59, 59)
        } else {
            chrono::NaiveTime::from_hms_opt(0, 0, 0)
        };
        if let Some(time) = time {
            return Ok(date.and_time(time));
        }
    }
    Err(SourceError::InvalidDate {
        input: input.to_string(),
    })
}

/// Converts a Prague civil datetime to UTC.
///
/// Ambiguous local times (the autumn DST fold) resolve to the earlier
/// offset; nonexistent local times (the spring gap) resolve one hour later.
#[must_use]
pub fn local_to_utc(local: NaiveDateTime) -> DateTime<Utc> {
    match BACKEND_TZ.from_local_datetime(&local) {
        chrono::LocalResult::Single(dt) | chrono::LocalResult::Ambiguous(dt, _) => {
            dt.with_timezone(&Utc)
        }
        chrono::LocalResult::None => BACKEND_TZ
            .from_local_datetime(&(local + Duration::hours(1)))
            .earliest()
            .map_or_else(
                // Unreachable for real zone data; fall back to the standard
                // CET offset so conversion still returns something sane.
                || Utc.from_utc_datetime(&(local - Duration::hours(1))),
                |dt| dt.with_timezone(&Utc),
            ),
    }
}

/// Formats an instant the way the backend expects query parameters:
/// `YYYY-MM-DDTHH:MM:SS.000Z`.
#[must_use]
pub fn format_query_instant(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%S.000Z").to_string()
}

/// The UTC offset (in hours) the backend zone has at the given civil time.
/// Used only for log output.
#[must_use]
pub fn offset_hours_at(local: NaiveDateTime) -> i64 {
    BACKEND_TZ
        .from_local_datetime(&local)
        .earliest()
        .map_or(1, |dt| {
            let offset = dt.offset().base_utc_offset() + dt.offset().dst_offset();
            offset.num_hours()
        })
}
