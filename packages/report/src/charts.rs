//! SVG chart rendering.
//!
//! Charts are written as plain SVG documents: a probability heatmap
//! (weekday rows × day-part columns) and horizontal bar charts for the
//! summary breakdowns. SVG keeps the output dependency-free and scales
//! cleanly in browsers and wikis.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use dispatch_stats_analytics_models::{DayPart, ProbabilityTable, SummaryStats, Weekday};

use crate::ReportError;

const CELL_W: u32 = 150;
const CELL_H: u32 = 62;
const LEFT_MARGIN: u32 = 120;
const TOP_MARGIN: u32 = 80;
const BAR_ROW_H: u32 = 26;
const BAR_LEFT: u32 = 220;
const BAR_MAX_W: u32 = 420;

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Linear yellow→red ramp for `t` in [0, 1].
#[allow(clippy::cast_possible_truncation)]
fn ramp(t: f64) -> String {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: f64, b: f64| (t.mul_add(b - a, a)).round() as i64;
    format!(
        "rgb({},{},{})",
        lerp(255.0, 189.0),
        lerp(237.0, 0.0),
        lerp(160.0, 38.0)
    )
}

/// Renders the probability table as a heatmap SVG document.
#[must_use]
pub fn heatmap_svg(table: &ProbabilityTable) -> String {
    let width = LEFT_MARGIN + 4 * CELL_W + 20;
    let height = TOP_MARGIN + 7 * CELL_H + 20;
    let max_prob = table.max_probability();

    let mut svg = String::new();
    write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" font-family="sans-serif">"#
    )
    .unwrap();
    write!(
        svg,
        r#"<text x="{}" y="24" font-size="16" font-weight="bold">Event probability {} to {}</text>"#,
        LEFT_MARGIN,
        table.range_start.date(),
        table.range_end.date()
    )
    .unwrap();

    for (col, part) in DayPart::all().iter().enumerate() {
        let x = LEFT_MARGIN + u32::try_from(col).unwrap_or(0) * CELL_W + CELL_W / 2;
        write!(
            svg,
            r#"<text x="{x}" y="{}" font-size="12" text-anchor="middle">{} ({})</text>"#,
            TOP_MARGIN - 12,
            part.name(),
            part.hour_range()
        )
        .unwrap();
    }

    for (row, weekday) in Weekday::all().iter().enumerate() {
        let y = TOP_MARGIN + u32::try_from(row).unwrap_or(0) * CELL_H;
        write!(
            svg,
            r#"<text x="{}" y="{}" font-size="12" text-anchor="end">{}</text>"#,
            LEFT_MARGIN - 8,
            y + CELL_H / 2 + 4,
            weekday.name()
        )
        .unwrap();

        for (col, part) in DayPart::all().iter().enumerate() {
            let x = LEFT_MARGIN + u32::try_from(col).unwrap_or(0) * CELL_W;
            let Some(bucket) = table.get(*weekday, *part) else {
                continue;
            };
            let t = if max_prob > 0.0 {
                bucket.probability / max_prob
            } else {
                0.0
            };
            let text_color = if t > 0.6 { "white" } else { "black" };
            write!(
                svg,
                r#"<rect x="{x}" y="{y}" width="{CELL_W}" height="{CELL_H}" fill="{}" stroke="white" stroke-width="2"/>"#,
                ramp(t)
            )
            .unwrap();
            write!(
                svg,
                r#"<text x="{}" y="{}" font-size="12" font-weight="bold" text-anchor="middle" fill="{text_color}">{:.1}% ({})</text>"#,
                x + CELL_W / 2,
                y + CELL_H / 2 + 4,
                bucket.probability,
                bucket.event_count
            )
            .unwrap();
        }
    }

    svg.push_str("</svg>");
    svg
}

/// Renders labeled counts as a horizontal bar chart SVG document.
#[must_use]
pub fn bar_chart_svg(title: &str, rows: &[(String, u64)]) -> String {
    let width = BAR_LEFT + BAR_MAX_W + 80;
    let height = TOP_MARGIN + u32::try_from(rows.len()).unwrap_or(0) * BAR_ROW_H + 20;
    let max = rows.iter().map(|(_, count)| *count).max().unwrap_or(0);

    let mut svg = String::new();
    write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" font-family="sans-serif">"#
    )
    .unwrap();
    write!(
        svg,
        r#"<text x="16" y="24" font-size="16" font-weight="bold">{}</text>"#,
        xml_escape(title)
    )
    .unwrap();

    for (i, (label, count)) in rows.iter().enumerate() {
        let y = TOP_MARGIN + u32::try_from(i).unwrap_or(0) * BAR_ROW_H;
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let bar_w = if max == 0 {
            0
        } else {
            (*count as f64 / max as f64 * f64::from(BAR_MAX_W)) as u32
        };
        write!(
            svg,
            r#"<text x="{}" y="{}" font-size="12" text-anchor="end">{}</text>"#,
            BAR_LEFT - 8,
            y + BAR_ROW_H / 2 + 4,
            xml_escape(label)
        )
        .unwrap();
        write!(
            svg,
            r##"<rect x="{BAR_LEFT}" y="{}" width="{bar_w}" height="{}" fill="#2e86ab"/>"##,
            y + 4,
            BAR_ROW_H - 8
        )
        .unwrap();
        write!(
            svg,
            r#"<text x="{}" y="{}" font-size="12">{count}</text>"#,
            BAR_LEFT + bar_w + 6,
            y + BAR_ROW_H / 2 + 4
        )
        .unwrap();
    }

    svg.push_str("</svg>");
    svg
}

/// Most common subtypes across all types, labeled `Type: Subtype`, capped
/// at 15 rows.
fn top_subtype_rows(stats: &SummaryStats) -> Vec<(String, u64)> {
    let mut rows: Vec<(String, u64)> = stats
        .by_subtype
        .iter()
        .flat_map(|group| {
            group.subtypes.iter().map(|r| {
                (format!("{}: {}", group.type_name, r.name), r.count)
            })
        })
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    rows.truncate(15);
    rows
}

/// Writes bar charts for the summary breakdowns under `dir`, returning the
/// written paths.
///
/// # Errors
///
/// Returns [`ReportError`] if a file cannot be created or written.
pub fn export_summary(stats: &SummaryStats, dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
    std::fs::create_dir_all(dir)?;

    let type_rows: Vec<(String, u64)> = stats
        .by_type
        .iter()
        .map(|r| (r.name.clone(), r.count))
        .collect();
    let month_rows: Vec<(String, u64)> = stats
        .by_month
        .iter()
        .map(|r| (r.period.clone(), r.count))
        .collect();
    let quarter_rows: Vec<(String, u64)> = stats
        .by_quarter
        .iter()
        .map(|r| (r.period.clone(), r.count))
        .collect();
    let weekday_rows: Vec<(String, u64)> = stats
        .by_weekday
        .iter()
        .map(|r| (r.weekday.name().to_string(), r.count))
        .collect();
    let hour_rows: Vec<(String, u64)> = stats
        .by_hour
        .iter()
        .map(|r| (format!("{:02}:00", r.hour), r.count))
        .collect();
    let subtype_rows = top_subtype_rows(stats);
    let state_rows: Vec<(String, u64)> = stats
        .by_state
        .iter()
        .take(10)
        .map(|r| (r.name.clone(), r.count))
        .collect();

    let charts = [
        ("chart_types.svg", bar_chart_svg("Events by type", &type_rows)),
        ("chart_months.svg", bar_chart_svg("Events by month", &month_rows)),
        (
            "chart_quarters.svg",
            bar_chart_svg("Events by quarter", &quarter_rows),
        ),
        (
            "chart_weekdays.svg",
            bar_chart_svg("Events by weekday", &weekday_rows),
        ),
        ("chart_hours.svg", bar_chart_svg("Events by hour", &hour_rows)),
        (
            "chart_subtypes.svg",
            bar_chart_svg("Most common subtypes", &subtype_rows),
        ),
        (
            "chart_states.svg",
            bar_chart_svg("Events by state", &state_rows),
        ),
    ];

    let mut written = Vec::with_capacity(charts.len());
    for (name, svg) in charts {
        let path = dir.join(name);
        std::fs::write(&path, svg)?;
        written.push(path);
    }
    log::info!("Charts exported to {}", dir.display());
    Ok(written)
}

/// Writes the probability heatmap SVG to `path`.
///
/// # Errors
///
/// Returns [`ReportError`] if the file cannot be created or written.
pub fn export_heatmap(table: &ProbabilityTable, path: &Path) -> Result<(), ReportError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, heatmap_svg(table))?;
    log::info!("Heatmap saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use dispatch_stats_analytics_models::{BucketStat, NamedCount, SubtypeGroup, ZocStats};

    use super::*;

    fn full_table() -> ProbabilityTable {
        let buckets = Weekday::all()
            .iter()
            .flat_map(|&weekday| {
                DayPart::all().iter().map(move |&day_part| BucketStat {
                    weekday,
                    day_part,
                    event_count: 1,
                    opportunity_count: 2,
                    probability: 50.0,
                })
            })
            .collect();
        ProbabilityTable {
            buckets,
            range_start: chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            range_end: chrono::NaiveDate::from_ymd_opt(2024, 1, 14)
                .unwrap()
                .and_hms_opt(23, 0, 0)
                .unwrap(),
            total_events: 28,
        }
    }

    #[test]
    fn heatmap_has_one_cell_per_bucket() {
        let svg = heatmap_svg(&full_table());
        assert_eq!(svg.matches("<rect").count(), 28);
        assert!(svg.contains("Monday"));
        assert!(svg.contains("Evening (18-24h)"));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn bar_chart_escapes_labels() {
        let rows = vec![("Fire & rescue".to_string(), 3)];
        let svg = bar_chart_svg("Events by type", &rows);
        assert!(svg.contains("Fire &amp; rescue"));
        assert!(svg.contains(">3</text>"));
    }

    #[test]
    fn bar_chart_handles_all_zero_counts() {
        let rows = vec![("Empty".to_string(), 0)];
        let svg = bar_chart_svg("Nothing", &rows);
        assert!(svg.contains(r#"width="0""#));
    }

    #[test]
    fn subtype_rows_flatten_and_cap_at_fifteen() {
        let groups = (0..4_u32)
            .map(|g| SubtypeGroup {
                type_name: format!("Type {g}"),
                subtypes: (0..5_u32)
                    .map(|s| NamedCount {
                        name: format!("Subtype {g}-{s}"),
                        count: u64::from(20 - g * 5 - s),
                    })
                    .collect(),
            })
            .collect();
        let stats = SummaryStats {
            total_events: 0,
            by_type: Vec::new(),
            by_subtype: groups,
            by_month: Vec::new(),
            by_quarter: Vec::new(),
            by_state: Vec::new(),
            by_weekday: Vec::new(),
            by_hour: Vec::new(),
            zoc: ZocStats {
                total_zoc: 0,
                total_non_zoc: 0,
                percentage_zoc: 0.0,
            },
        };

        let rows = top_subtype_rows(&stats);
        assert_eq!(rows.len(), 15);
        assert_eq!(rows[0], ("Type 0: Subtype 0-0".to_string(), 20));
        // Descending across group boundaries, parent name in the label.
        assert!(rows.windows(2).all(|w| w[0].1 >= w[1].1));
        assert_eq!(rows[14].1, 6);
    }

    #[test]
    fn ramp_endpoints() {
        assert_eq!(ramp(0.0), "rgb(255,237,160)");
        assert_eq!(ramp(1.0), "rgb(189,0,38)");
    }
}
