#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Result types for the dispatch statistics calculators.
//!
//! Defines the fixed weekday and day-part enumerations, the weekday ×
//! day-part probability table, and the summary-statistics records that the
//! reporting layer consumes.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Day of the week, Monday first.
///
/// A fixed-order enumeration rather than `chrono::Weekday` so that the
/// serialized form and the iteration order are owned by this crate.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Weekday {
    /// First day of the week.
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All seven weekdays in week order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Monday,
            Self::Tuesday,
            Self::Wednesday,
            Self::Thursday,
            Self::Friday,
            Self::Saturday,
            Self::Sunday,
        ]
    }

    /// Position within the week, Monday = 0.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Human-readable English name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
            chrono::Weekday::Sun => Self::Sunday,
        }
    }
}

/// One of the four fixed six-hour parts of a day.
///
/// The parts are half-open hour ranges that partition the 24-hour day:
/// Night [0,6), Morning [6,12), Afternoon [12,18), Evening [18,24).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DayPart {
    /// 00:00–06:00
    Night,
    /// 06:00–12:00
    Morning,
    /// 12:00–18:00
    Afternoon,
    /// 18:00–24:00
    Evening,
}

impl DayPart {
    /// All four day parts in chronological order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Night, Self::Morning, Self::Afternoon, Self::Evening]
    }

    /// Maps an hour (0–23) to its day part. Total over valid hours; out of
    /// range values fall into Evening, matching the final catch-all range.
    #[must_use]
    pub const fn from_hour(hour: u32) -> Self {
        match hour {
            0..=5 => Self::Night,
            6..=11 => Self::Morning,
            12..=17 => Self::Afternoon,
            _ => Self::Evening,
        }
    }

    /// Position within the day, Night = 0.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Human-readable English name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Night => "Night",
            Self::Morning => "Morning",
            Self::Afternoon => "Afternoon",
            Self::Evening => "Evening",
        }
    }

    /// The covered hour range as a display string (e.g. `"0-6h"`).
    #[must_use]
    pub const fn hour_range(self) -> &'static str {
        match self {
            Self::Night => "0-6h",
            Self::Morning => "6-12h",
            Self::Afternoon => "12-18h",
            Self::Evening => "18-24h",
        }
    }
}

/// Statistics for a single (weekday, day-part) bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketStat {
    /// Which weekday this bucket covers.
    pub weekday: Weekday,
    /// Which part of the day this bucket covers.
    pub day_part: DayPart,
    /// Number of events that fell into the bucket.
    pub event_count: u64,
    /// How many calendar instances of this weekday occurred in the observed
    /// span. Day-part is irrelevant here; every day contains all four parts.
    pub opportunity_count: u64,
    /// `event_count / opportunity_count * 100`, or 0.0 when there were no
    /// opportunities. Always within [0, 100] for per-bucket singleton counts
    /// bounded by the opportunity count.
    pub probability: f64,
}

/// The complete weekday × day-part probability table for one event set.
///
/// Always holds exactly 28 entries in enumeration order (weekday-major,
/// day-part-minor), including buckets with zero events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbabilityTable {
    /// All 28 bucket statistics.
    pub buckets: Vec<BucketStat>,
    /// Earliest qualifying event instant (backend-local civil time).
    pub range_start: NaiveDateTime,
    /// Latest qualifying event instant (backend-local civil time).
    pub range_end: NaiveDateTime,
    /// Number of events with a resolvable report time.
    pub total_events: u64,
}

impl ProbabilityTable {
    /// Looks up the bucket for a (weekday, day-part) pair.
    #[must_use]
    pub fn get(&self, weekday: Weekday, day_part: DayPart) -> Option<&BucketStat> {
        self.buckets
            .iter()
            .find(|b| b.weekday == weekday && b.day_part == day_part)
    }

    /// The `n` buckets with the highest probability. Stable sort, so ties
    /// keep enumeration order.
    #[must_use]
    pub fn top(&self, n: usize) -> Vec<&BucketStat> {
        let mut ranked: Vec<&BucketStat> = self.buckets.iter().collect();
        ranked.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        ranked.truncate(n);
        ranked
    }

    /// The `n` buckets with the lowest probability. Stable sort, so ties
    /// keep enumeration order.
    #[must_use]
    pub fn bottom(&self, n: usize) -> Vec<&BucketStat> {
        let mut ranked: Vec<&BucketStat> = self.buckets.iter().collect();
        ranked.sort_by(|a, b| a.probability.total_cmp(&b.probability));
        ranked.truncate(n);
        ranked
    }

    /// Mean probability across all buckets.
    #[must_use]
    pub fn average_probability(&self) -> f64 {
        if self.buckets.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let len = self.buckets.len() as f64;
        self.buckets.iter().map(|b| b.probability).sum::<f64>() / len
    }

    /// Highest probability in the table, for chart scaling.
    #[must_use]
    pub fn max_probability(&self) -> f64 {
        self.buckets
            .iter()
            .map(|b| b.probability)
            .fold(0.0, f64::max)
    }
}

/// A name with an associated event count (types, subtypes, states).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedCount {
    /// Display name resolved via the catalog.
    pub name: String,
    /// Number of matching events.
    pub count: u64,
}

/// A calendar period (`YYYY-MM` month or `YYYY-Qn` quarter) with its count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodCount {
    /// Period key, e.g. `"2024-03"` or `"2024-Q1"`.
    pub period: String,
    /// Number of events reported within the period.
    pub count: u64,
}

/// Subtype counts grouped under their parent type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtypeGroup {
    /// Parent type display name.
    pub type_name: String,
    /// Subtype counts, sorted descending.
    pub subtypes: Vec<NamedCount>,
}

/// Event count for one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayCount {
    /// The weekday.
    pub weekday: Weekday,
    /// Number of events reported on that weekday.
    pub count: u64,
}

/// Event count for one hour of the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourCount {
    /// Hour of the day, 0–23.
    pub hour: u32,
    /// Number of events reported within that hour.
    pub count: u64,
}

/// ZOC (special-response) event breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZocStats {
    /// Events carrying the ZOC flag.
    pub total_zoc: u64,
    /// Events without the ZOC flag.
    pub total_non_zoc: u64,
    /// ZOC share of all events, in percent rounded to two decimals. Zero
    /// when there are no events.
    pub percentage_zoc: f64,
}

/// The full descriptive-statistics report for one event set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    /// Total number of events, including those without a usable timestamp.
    pub total_events: u64,
    /// Counts per event type, descending.
    pub by_type: Vec<NamedCount>,
    /// Subtype counts grouped by parent type (types alphabetical, subtypes
    /// descending within each group).
    pub by_subtype: Vec<SubtypeGroup>,
    /// Counts per month, every month in the observed span present.
    pub by_month: Vec<PeriodCount>,
    /// Counts per quarter, every quarter in the observed span present.
    pub by_quarter: Vec<PeriodCount>,
    /// Counts per state, descending.
    pub by_state: Vec<NamedCount>,
    /// Counts for all seven weekdays in week order.
    pub by_weekday: Vec<WeekdayCount>,
    /// Counts for all 24 hours.
    pub by_hour: Vec<HourCount>,
    /// ZOC breakdown.
    pub zoc: ZocStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_parts_partition_the_day() {
        for hour in 0..24 {
            let part = DayPart::from_hour(hour);
            let expected = match hour {
                0..=5 => DayPart::Night,
                6..=11 => DayPart::Morning,
                12..=17 => DayPart::Afternoon,
                _ => DayPart::Evening,
            };
            assert_eq!(part, expected, "hour {hour}");
        }
    }

    #[test]
    fn weekday_order_matches_chrono() {
        let chrono_days = [
            chrono::Weekday::Mon,
            chrono::Weekday::Tue,
            chrono::Weekday::Wed,
            chrono::Weekday::Thu,
            chrono::Weekday::Fri,
            chrono::Weekday::Sat,
            chrono::Weekday::Sun,
        ];
        for (ours, theirs) in Weekday::all().iter().zip(chrono_days) {
            assert_eq!(*ours, Weekday::from(theirs));
            assert_eq!(ours.index(), theirs.num_days_from_monday() as usize);
        }
    }

    fn table_with_probabilities(probs: &[f64]) -> ProbabilityTable {
        let buckets = Weekday::all()
            .iter()
            .flat_map(|&weekday| {
                DayPart::all().iter().map(move |&day_part| (weekday, day_part))
            })
            .zip(probs.iter().copied())
            .map(|((weekday, day_part), probability)| BucketStat {
                weekday,
                day_part,
                event_count: 0,
                opportunity_count: 1,
                probability,
            })
            .collect();
        ProbabilityTable {
            buckets,
            range_start: chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            range_end: chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            total_events: 0,
        }
    }

    #[test]
    fn ranking_ties_keep_enumeration_order() {
        let table = table_with_probabilities(&[10.0; 28]);
        let top = table.top(5);
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].weekday, Weekday::Monday);
        assert_eq!(top[0].day_part, DayPart::Night);
        assert_eq!(top[4].day_part, DayPart::Night);
        assert_eq!(top[4].weekday, Weekday::Tuesday);

        let bottom = table.bottom(3);
        assert_eq!(bottom[0].weekday, Weekday::Monday);
        assert_eq!(bottom[0].day_part, DayPart::Night);
    }

    #[test]
    fn ranking_sorts_by_probability() {
        let mut probs = [0.0; 28];
        probs[7] = 50.0;
        probs[13] = 25.0;
        let table = table_with_probabilities(&probs);
        let top = table.top(2);
        assert!((top[0].probability - 50.0).abs() < f64::EPSILON);
        assert!((top[1].probability - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn average_probability_over_all_buckets() {
        let mut probs = [0.0; 28];
        probs[0] = 28.0;
        let table = table_with_probabilities(&probs);
        assert!((table.average_probability() - 1.0).abs() < f64::EPSILON);
    }
}
