//! Descriptive statistics over a dispatch event set.
//!
//! Counts events by type, subtype, month, quarter, state, weekday, and hour,
//! plus the ZOC special-response breakdown. Name-keyed breakdowns cover all
//! events; time-keyed breakdowns skip records without a resolvable report
//! time. Month and quarter breakdowns are zero-filled across the whole
//! observed span so gaps show up as explicit zeros.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike as _, NaiveDateTime, Timelike as _};
use dispatch_stats_analytics_models::{
    HourCount, NamedCount, PeriodCount, SubtypeGroup, SummaryStats, Weekday, WeekdayCount,
    ZocStats,
};
use dispatch_stats_event_models::{Catalog, DispatchEvent};

/// Computes the full summary report for the given events.
///
/// Unlike the probability table this never fails: an empty slice produces
/// all-zero sections, matching how the upstream reports render.
#[must_use]
pub fn summarize(events: &[DispatchEvent], catalog: &Catalog) -> SummaryStats {
    let local_times: Vec<NaiveDateTime> = events
        .iter()
        .filter_map(DispatchEvent::local_report_time)
        .collect();

    SummaryStats {
        total_events: events.len() as u64,
        by_type: by_type(events, catalog),
        by_subtype: by_subtype(events, catalog),
        by_month: by_month(&local_times),
        by_quarter: by_quarter(&local_times),
        by_state: by_state(events, catalog),
        by_weekday: by_weekday(&local_times),
        by_hour: by_hour(&local_times),
        zoc: zoc_stats(events),
    }
}

/// Sorts name→count pairs descending by count, ties alphabetical for a
/// deterministic report order.
fn sorted_counts(counts: HashMap<String, u64>) -> Vec<NamedCount> {
    let mut rows: Vec<NamedCount> = counts
        .into_iter()
        .map(|(name, count)| NamedCount { name, count })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    rows
}

fn by_type(events: &[DispatchEvent], catalog: &Catalog) -> Vec<NamedCount> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for event in events {
        *counts.entry(catalog.type_name(event.type_id)).or_default() += 1;
    }
    sorted_counts(counts)
}

fn by_state(events: &[DispatchEvent], catalog: &Catalog) -> Vec<NamedCount> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for event in events {
        *counts.entry(catalog.state_name(event.state_id)).or_default() += 1;
    }
    sorted_counts(counts)
}

fn by_subtype(events: &[DispatchEvent], catalog: &Catalog) -> Vec<SubtypeGroup> {
    let mut groups: BTreeMap<String, HashMap<String, u64>> = BTreeMap::new();
    for event in events {
        let type_name = catalog.type_name(event.type_id);
        let subtype_name = catalog.subtype_name(event.subtype_id);
        *groups
            .entry(type_name)
            .or_default()
            .entry(subtype_name)
            .or_default() += 1;
    }
    groups
        .into_iter()
        .map(|(type_name, subtypes)| SubtypeGroup {
            type_name,
            subtypes: sorted_counts(subtypes),
        })
        .collect()
}

fn by_month(times: &[NaiveDateTime]) -> Vec<PeriodCount> {
    let (Some(min), Some(max)) = (times.iter().min(), times.iter().max()) else {
        return Vec::new();
    };

    let mut counts: HashMap<(i32, u32), u64> = HashMap::new();
    for time in times {
        *counts.entry((time.year(), time.month())).or_default() += 1;
    }

    // Walk first-of-month to first-of-month across the span, zero-filling.
    let mut rows = Vec::new();
    let (mut year, mut month) = (min.year(), min.month());
    let (max_year, max_month) = (max.year(), max.month());
    while (year, month) <= (max_year, max_month) {
        rows.push(PeriodCount {
            period: format!("{year:04}-{month:02}"),
            count: counts.get(&(year, month)).copied().unwrap_or(0),
        });
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
    rows
}

const fn quarter_of(month: u32) -> u32 {
    (month - 1) / 3 + 1
}

fn by_quarter(times: &[NaiveDateTime]) -> Vec<PeriodCount> {
    let (Some(min), Some(max)) = (times.iter().min(), times.iter().max()) else {
        return Vec::new();
    };

    let mut counts: HashMap<(i32, u32), u64> = HashMap::new();
    for time in times {
        *counts
            .entry((time.year(), quarter_of(time.month())))
            .or_default() += 1;
    }

    let mut rows = Vec::new();
    let (mut year, mut quarter) = (min.year(), quarter_of(min.month()));
    let (max_year, max_quarter) = (max.year(), quarter_of(max.month()));
    while (year, quarter) <= (max_year, max_quarter) {
        rows.push(PeriodCount {
            period: format!("{year:04}-Q{quarter}"),
            count: counts.get(&(year, quarter)).copied().unwrap_or(0),
        });
        if quarter == 4 {
            year += 1;
            quarter = 1;
        } else {
            quarter += 1;
        }
    }
    rows
}

fn by_weekday(times: &[NaiveDateTime]) -> Vec<WeekdayCount> {
    let mut counts = [0_u64; 7];
    for time in times {
        counts[Weekday::from(time.weekday()).index()] += 1;
    }
    Weekday::all()
        .iter()
        .map(|&weekday| WeekdayCount {
            weekday,
            count: counts[weekday.index()],
        })
        .collect()
}

fn by_hour(times: &[NaiveDateTime]) -> Vec<HourCount> {
    let mut counts = [0_u64; 24];
    for time in times {
        counts[time.hour() as usize] += 1;
    }
    (0..24)
        .map(|hour| HourCount {
            hour,
            count: counts[hour as usize],
        })
        .collect()
}

fn zoc_stats(events: &[DispatchEvent]) -> ZocStats {
    let total = events.len() as u64;
    let total_zoc = events.iter().filter(|e| e.is_zoc()).count() as u64;
    #[allow(clippy::cast_precision_loss)]
    let percentage_zoc = if total == 0 {
        0.0
    } else {
        (total_zoc as f64 / total as f64 * 100.0 * 100.0).round() / 100.0
    };
    ZocStats {
        total_zoc,
        total_non_zoc: total - total_zoc,
        percentage_zoc,
    }
}
