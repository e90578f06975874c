//! CSV exports of the statistics tables.
//!
//! Each section of the summary report becomes one file; the probability
//! table gets its own. Writers are generic over `io::Write` so the row
//! formatting is testable without touching the filesystem.

use std::io::Write;
use std::path::{Path, PathBuf};

use dispatch_stats_analytics_models::{ProbabilityTable, SummaryStats};

use crate::ReportError;

fn write_type_stats<W: Write>(writer: W, stats: &SummaryStats) -> Result<(), ReportError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Type", "Count"])?;
    for row in &stats.by_type {
        csv.write_record([row.name.clone(), row.count.to_string()])?;
    }
    csv.flush()?;
    Ok(())
}

fn write_subtype_stats<W: Write>(writer: W, stats: &SummaryStats) -> Result<(), ReportError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Type", "Subtype", "Count"])?;
    for group in &stats.by_subtype {
        for row in &group.subtypes {
            csv.write_record([
                group.type_name.clone(),
                row.name.clone(),
                row.count.to_string(),
            ])?;
        }
    }
    csv.flush()?;
    Ok(())
}

fn write_month_stats<W: Write>(writer: W, stats: &SummaryStats) -> Result<(), ReportError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Month", "Count"])?;
    for row in &stats.by_month {
        csv.write_record([row.period.clone(), row.count.to_string()])?;
    }
    csv.flush()?;
    Ok(())
}

fn write_hour_stats<W: Write>(writer: W, stats: &SummaryStats) -> Result<(), ReportError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Hour", "Count"])?;
    for row in &stats.by_hour {
        csv.write_record([row.hour.to_string(), row.count.to_string()])?;
    }
    csv.flush()?;
    Ok(())
}

fn write_state_stats<W: Write>(writer: W, stats: &SummaryStats) -> Result<(), ReportError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["State", "Count"])?;
    for row in &stats.by_state {
        csv.write_record([row.name.clone(), row.count.to_string()])?;
    }
    csv.flush()?;
    Ok(())
}

fn write_probability<W: Write>(writer: W, table: &ProbabilityTable) -> Result<(), ReportError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Weekday", "Day part", "Count", "Opportunities", "Probability"])?;
    for bucket in &table.buckets {
        csv.write_record([
            bucket.weekday.name().to_string(),
            bucket.day_part.name().to_string(),
            bucket.event_count.to_string(),
            bucket.opportunity_count.to_string(),
            format!("{:.2}", bucket.probability),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Exports the summary statistics as five CSV files under `dir`, returning
/// the written paths.
///
/// # Errors
///
/// Returns [`ReportError`] if a file cannot be created or written.
pub fn export_summary(stats: &SummaryStats, dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
    std::fs::create_dir_all(dir)?;

    let exports: [(&str, fn(std::fs::File, &SummaryStats) -> Result<(), ReportError>); 5] = [
        ("stats_by_type.csv", write_type_stats),
        ("stats_by_subtype.csv", write_subtype_stats),
        ("stats_by_month.csv", write_month_stats),
        ("stats_by_hour.csv", write_hour_stats),
        ("stats_by_state.csv", write_state_stats),
    ];

    let mut written = Vec::with_capacity(exports.len());
    for (name, write) in exports {
        let path = dir.join(name);
        write(std::fs::File::create(&path)?, stats)?;
        written.push(path);
    }
    log::info!("CSV files exported to {}", dir.display());
    Ok(written)
}

/// Exports the probability table as a single CSV file.
///
/// # Errors
///
/// Returns [`ReportError`] if the file cannot be created or written.
pub fn export_probability(table: &ProbabilityTable, path: &Path) -> Result<(), ReportError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    write_probability(std::fs::File::create(path)?, table)?;
    log::info!("Probability table exported to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use dispatch_stats_analytics_models::{
        BucketStat, DayPart, HourCount, NamedCount, PeriodCount, SubtypeGroup, Weekday,
        WeekdayCount, ZocStats,
    };

    use super::*;

    fn sample_stats() -> SummaryStats {
        SummaryStats {
            total_events: 3,
            by_type: vec![
                NamedCount {
                    name: "Fire".to_string(),
                    count: 2,
                },
                NamedCount {
                    name: "Technical assistance".to_string(),
                    count: 1,
                },
            ],
            by_subtype: vec![SubtypeGroup {
                type_name: "Fire".to_string(),
                subtypes: vec![NamedCount {
                    name: "Low building".to_string(),
                    count: 2,
                }],
            }],
            by_month: vec![PeriodCount {
                period: "2024-01".to_string(),
                count: 3,
            }],
            by_quarter: vec![PeriodCount {
                period: "2024-Q1".to_string(),
                count: 3,
            }],
            by_state: vec![NamedCount {
                name: "Closed".to_string(),
                count: 3,
            }],
            by_weekday: vec![WeekdayCount {
                weekday: Weekday::Monday,
                count: 3,
            }],
            by_hour: vec![HourCount { hour: 8, count: 3 }],
            zoc: ZocStats {
                total_zoc: 1,
                total_non_zoc: 2,
                percentage_zoc: 33.33,
            },
        }
    }

    fn to_string(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn type_csv_has_header_and_rows() {
        let mut out = Vec::new();
        write_type_stats(&mut out, &sample_stats()).unwrap();
        let text = to_string(out);
        assert_eq!(
            text,
            "Type,Count\nFire,2\nTechnical assistance,1\n"
        );
    }

    #[test]
    fn subtype_csv_repeats_parent_type() {
        let mut out = Vec::new();
        write_subtype_stats(&mut out, &sample_stats()).unwrap();
        let text = to_string(out);
        assert!(text.starts_with("Type,Subtype,Count\n"));
        assert!(text.contains("Fire,Low building,2\n"));
    }

    #[test]
    fn probability_csv_lists_every_bucket() {
        let table = ProbabilityTable {
            buckets: vec![BucketStat {
                weekday: Weekday::Monday,
                day_part: DayPart::Morning,
                event_count: 2,
                opportunity_count: 2,
                probability: 100.0,
            }],
            range_start: chrono_sample(),
            range_end: chrono_sample(),
            total_events: 2,
        };
        let mut out = Vec::new();
        write_probability(&mut out, &table).unwrap();
        let text = to_string(out);
        assert!(text.contains("Monday,Morning,2,2,100.00\n"));
    }

    fn chrono_sample() -> chrono::NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }
}
