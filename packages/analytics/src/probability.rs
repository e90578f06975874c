//! Weekday × day-part probability table.
//!
//! Given the observed date span of an event set, counts how many calendar
//! instances of each weekday occurred (the "opportunity count") and how many
//! events fell into each (weekday, day-part) bucket, then derives
//! `event_count / opportunities * 100` for every one of the 28 buckets.

use chrono::{Datelike as _, Duration, NaiveDateTime, NaiveTime, Timelike as _};
use dispatch_stats_analytics_models::{BucketStat, DayPart, ProbabilityTable, Weekday};
use dispatch_stats_event_models::DispatchEvent;

use crate::AnalyticsError;

/// Computes the full 28-entry probability table for the given events.
///
/// Events without a resolvable report time are silently excluded from both
/// the date-range derivation and the bucket counting. All 28 buckets are
/// present in the result, in weekday-major, day-part-minor order, including
/// buckets with zero events.
///
/// # Errors
///
/// Returns [`AnalyticsError::InsufficientData`] when the slice is empty or
/// no event has a resolvable report time.
pub fn probability_table(events: &[DispatchEvent]) -> Result<ProbabilityTable, AnalyticsError> {
    let times: Vec<NaiveDateTime> = events
        .iter()
        .filter_map(DispatchEvent::local_report_time)
        .collect();

    let (Some(&range_start), Some(&range_end)) = (times.iter().min(), times.iter().max()) else {
        return Err(AnalyticsError::InsufficientData);
    };

    let opportunities = weekday_opportunities(range_start, range_end);

    let mut counts = [[0_u64; 4]; 7];
    for time in &times {
        let weekday = Weekday::from(time.weekday());
        let part = DayPart::from_hour(time.hour());
        counts[weekday.index()][part.index()] += 1;
    }

    let mut buckets = Vec::with_capacity(28);
    for &weekday in Weekday::all() {
        for &day_part in DayPart::all() {
            let event_count = counts[weekday.index()][day_part.index()];
            let opportunity_count = opportunities[weekday.index()];
            // A weekday absent from the span has zero opportunities and
            // yields 0.0.
            #[allow(clippy::cast_precision_loss)]
            let probability = if opportunity_count == 0 {
                0.0
            } else {
                event_count as f64 / opportunity_count as f64 * 100.0
            };
            buckets.push(BucketStat {
                weekday,
                day_part,
                event_count,
                opportunity_count,
                probability,
            });
        }
    }

    Ok(ProbabilityTable {
        buckets,
        range_start,
        range_end,
        total_events: times.len() as u64,
    })
}

/// Counts how many calendar days of each weekday fall within the span.
///
/// The cursor starts at the midnight of the earliest instant and steps one
/// whole day while `cursor <= end`. `end` keeps its time of day, so the
/// final partial day is counted exactly once; this intentionally mirrors
/// the upstream system's semantics: both boundary days count fully even
/// when the end instant is early in its day.
fn weekday_opportunities(start: NaiveDateTime, end: NaiveDateTime) -> [u64; 7] {
    let mut counts = [0_u64; 7];
    let mut cursor = start.date().and_time(NaiveTime::MIN);
    while cursor <= end {
        counts[Weekday::from(cursor.weekday()).index()] += 1;
        cursor += Duration::days(1);
    }
    counts
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone as _, Utc};
    use dispatch_stats_event_models::BACKEND_TZ;

    use super::*;

    /// Builds an event whose *backend-local* report time is the given civil
    /// date and hour.
    fn event_at(y: i32, m: u32, d: u32, h: u32) -> DispatchEvent {
        let local = NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap();
        let utc = BACKEND_TZ
            .from_local_datetime(&local)
            .single()
            .unwrap()
            .with_timezone(&Utc);
        DispatchEvent {
            report_time: Some(utc),
            type_id: None,
            subtype_id: None,
            state_id: None,
            zoc: None,
        }
    }

    fn event_without_time() -> DispatchEvent {
        DispatchEvent {
            report_time: None,
            type_id: None,
            subtype_id: None,
            state_id: None,
            zoc: None,
        }
    }

    #[test]
    fn empty_input_is_insufficient() {
        assert!(matches!(
            probability_table(&[]),
            Err(AnalyticsError::InsufficientData)
        ));
    }

    #[test]
    fn timestamp_less_input_is_insufficient() {
        let events = vec![event_without_time(), event_without_time()];
        assert!(matches!(
            probability_table(&events),
            Err(AnalyticsError::InsufficientData)
        ));
    }

    #[test]
    fn table_always_has_28_distinct_buckets() {
        let table = probability_table(&[event_at(2024, 1, 1, 8)]).unwrap();
        assert_eq!(table.buckets.len(), 28);
        let mut seen = std::collections::BTreeSet::new();
        for bucket in &table.buckets {
            assert!(seen.insert((bucket.weekday, bucket.day_part)));
        }
    }

    #[test]
    fn single_day_span_has_one_opportunity() {
        // 2024-01-01 is a Monday.
        let table = probability_table(&[event_at(2024, 1, 1, 8)]).unwrap();
        for bucket in &table.buckets {
            let expected = u64::from(bucket.weekday == Weekday::Monday);
            assert_eq!(bucket.opportunity_count, expected, "{bucket:?}");
        }
        let monday_morning = table.get(Weekday::Monday, DayPart::Morning).unwrap();
        assert_eq!(monday_morning.event_count, 1);
        assert!((monday_morning.probability - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn two_mondays_a_week_apart() {
        // Mondays 2024-01-01 and 2024-01-08, both 08:00.
        let events = vec![event_at(2024, 1, 1, 8), event_at(2024, 1, 8, 8)];
        let table = probability_table(&events).unwrap();

        let morning = table.get(Weekday::Monday, DayPart::Morning).unwrap();
        assert_eq!(morning.opportunity_count, 2);
        assert_eq!(morning.event_count, 2);
        assert!((morning.probability - 100.0).abs() < f64::EPSILON);

        for part in [DayPart::Night, DayPart::Afternoon, DayPart::Evening] {
            let bucket = table.get(Weekday::Monday, part).unwrap();
            assert_eq!(bucket.opportunity_count, 2);
            assert_eq!(bucket.event_count, 0);
            assert!(bucket.probability.abs() < f64::EPSILON);
        }

        // Every other weekday occurred exactly once in the span.
        for bucket in &table.buckets {
            if bucket.weekday != Weekday::Monday {
                assert_eq!(bucket.opportunity_count, 1, "{bucket:?}");
            }
        }
        assert_eq!(table.total_events, 2);
    }

    #[test]
    fn partial_final_day_counts_once() {
        // Monday 23:00 to Tuesday 01:00: the Tuesday is a partial day but
        // still contributes one opportunity.
        let events = vec![event_at(2024, 1, 1, 23), event_at(2024, 1, 2, 1)];
        let table = probability_table(&events).unwrap();
        let monday = table.get(Weekday::Monday, DayPart::Evening).unwrap();
        let tuesday = table.get(Weekday::Tuesday, DayPart::Night).unwrap();
        assert_eq!(monday.opportunity_count, 1);
        assert_eq!(tuesday.opportunity_count, 1);
        assert_eq!(monday.event_count, 1);
        assert_eq!(tuesday.event_count, 1);
    }

    #[test]
    fn counts_sum_to_qualifying_events() {
        let events = vec![
            event_at(2024, 3, 4, 2),
            event_at(2024, 3, 9, 13),
            event_at(2024, 3, 17, 19),
            event_without_time(),
        ];
        let table = probability_table(&events).unwrap();
        let total: u64 = table.buckets.iter().map(|b| b.event_count).sum();
        assert_eq!(total, 3);
        assert_eq!(table.total_events, 3);
    }

    #[test]
    fn probabilities_stay_in_range() {
        // One event per day across a full week: every bucket holds at most
        // one event per opportunity.
        let events: Vec<DispatchEvent> = (1..=7).map(|d| event_at(2024, 1, d, 9)).collect();
        let table = probability_table(&events).unwrap();
        for bucket in &table.buckets {
            assert!(bucket.probability >= 0.0, "{bucket:?}");
            assert!(bucket.probability <= 100.0, "{bucket:?}");
            if bucket.event_count == 0 {
                assert!(bucket.probability.abs() < f64::EPSILON);
            }
        }
    }

    #[test]
    fn unparseable_timestamps_are_skipped_not_fatal() {
        let events = vec![event_without_time(), event_at(2024, 1, 3, 10)];
        let table = probability_table(&events).unwrap();
        assert_eq!(table.total_events, 1);
        let wednesday = table.get(Weekday::Wednesday, DayPart::Morning).unwrap();
        assert_eq!(wednesday.event_count, 1);
    }

    #[test]
    fn range_boundaries_are_local_instants() {
        let events = vec![event_at(2024, 1, 1, 8), event_at(2024, 1, 8, 8)];
        let table = probability_table(&events).unwrap();
        assert_eq!(table.range_start.to_string(), "2024-01-01 08:00:00");
        assert_eq!(table.range_end.to_string(), "2024-01-08 08:00:00");
    }
}
