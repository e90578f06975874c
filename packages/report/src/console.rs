//! Console rendering of the statistics reports.

use dispatch_stats_analytics_models::{BucketStat, DayPart, ProbabilityTable, SummaryStats, Weekday};

const WIDE_RULE: usize = 105;
const RULE: usize = 80;

#[allow(clippy::cast_precision_loss)]
fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Prints the full summary report.
#[allow(clippy::too_many_lines)]
pub fn print_summary(stats: &SummaryStats) {
    println!("{}", "=".repeat(RULE));
    println!("DISPATCH EVENT STATISTICS");
    println!("{}", "=".repeat(RULE));
    println!("\nTotal events: {}\n", stats.total_events);

    println!("{}", "-".repeat(RULE));
    println!("EVENTS BY TYPE");
    println!("{}", "-".repeat(RULE));
    for row in &stats.by_type {
        println!(
            "{:.<50} {:>5} ({:>5.1}%)",
            row.name,
            row.count,
            percentage(row.count, stats.total_events)
        );
    }

    println!("\n{}", "-".repeat(RULE));
    println!("EVENTS BY SUBTYPE (grouped by type)");
    println!("{}", "-".repeat(RULE));
    for group in &stats.by_subtype {
        println!("\n{}:", group.type_name);
        for row in &group.subtypes {
            println!("  {:.<48} {:>5}", row.name, row.count);
        }
    }

    println!("\n{}", "-".repeat(RULE));
    println!("MONTHLY DISTRIBUTION");
    println!("{}", "-".repeat(RULE));
    for row in &stats.by_month {
        println!("{:.<50} {:>5}", row.period, row.count);
    }

    println!("\n{}", "-".repeat(RULE));
    println!("QUARTERLY DISTRIBUTION");
    println!("{}", "-".repeat(RULE));
    for row in &stats.by_quarter {
        println!("{:.<50} {:>5}", row.period, row.count);
    }

    println!("\n{}", "-".repeat(RULE));
    println!("DISTRIBUTION BY WEEKDAY");
    println!("{}", "-".repeat(RULE));
    for row in &stats.by_weekday {
        println!(
            "{:.<50} {:>5} ({:>5.1}%)",
            row.weekday.name(),
            row.count,
            percentage(row.count, stats.total_events)
        );
    }

    println!("\n{}", "-".repeat(RULE));
    println!("DISTRIBUTION BY HOUR");
    println!("{}", "-".repeat(RULE));
    let max_hour_count = stats.by_hour.iter().map(|h| h.count).max().unwrap_or(0);
    for row in &stats.by_hour {
        let bar = if max_hour_count == 0 {
            String::new()
        } else {
            #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_sign_loss)]
            let width = (row.count as f64 / max_hour_count as f64 * 40.0) as usize;
            "█".repeat(width)
        };
        println!("{:02}:00 {:>5} {bar}", row.hour, row.count);
    }

    println!("\n{}", "-".repeat(RULE));
    println!("ZOC EVENTS (special response)");
    println!("{}", "-".repeat(RULE));
    println!("{:.<50} {:>5}", "ZOC events", stats.zoc.total_zoc);
    println!("{:.<50} {:>5}", "Non-ZOC events", stats.zoc.total_non_zoc);
    println!(
        "{:.<50} {:>5.1}%",
        "ZOC percentage", stats.zoc.percentage_zoc
    );

    println!("\n{}", "-".repeat(RULE));
    println!("EVENTS BY STATE");
    println!("{}", "-".repeat(RULE));
    for row in &stats.by_state {
        println!(
            "{:.<50} {:>5} ({:>5.1}%)",
            row.name,
            row.count,
            percentage(row.count, stats.total_events)
        );
    }

    println!("\n{}", "=".repeat(RULE));
}

fn print_ranked(rows: &[&BucketStat]) {
    for (i, bucket) in rows.iter().enumerate() {
        let label = format!(
            "{} {} ({})",
            bucket.weekday.name(),
            bucket.day_part.name(),
            bucket.day_part.hour_range()
        );
        println!(
            "  {}. {:<34} {:>6.2}% ({} events)",
            i + 1,
            label,
            bucket.probability,
            bucket.event_count
        );
    }
}

/// Prints the weekday × day-part probability table with top/bottom ranking.
pub fn print_probability(table: &ProbabilityTable) {
    let total_days = (table.range_end.date() - table.range_start.date()).num_days() + 1;

    println!("{}", "=".repeat(WIDE_RULE));
    println!("EVENT PROBABILITY: WEEKDAY × DAY PART");
    println!("{}", "=".repeat(WIDE_RULE));
    println!();
    println!(
        "Period: {} to {} ({total_days} days, {} events)",
        table.range_start.date(),
        table.range_end.date(),
        table.total_events
    );
    println!();
    println!("Day parts:");
    for part in DayPart::all() {
        println!("  {:<10} {}", format!("{}:", part.name()), part.hour_range());
    }
    println!();

    print!("{:.<15}", "Day");
    for part in DayPart::all() {
        print!("{:>22}", format!("{} ({})", part.name(), part.hour_range()));
    }
    println!();
    println!("{}", "-".repeat(WIDE_RULE));

    for weekday in Weekday::all() {
        print!("{:.<15}", weekday.name());
        for part in DayPart::all() {
            if let Some(bucket) = table.get(*weekday, *part) {
                print!(
                    "{:>22}",
                    format!("{:>6.2}% ({:>2})", bucket.probability, bucket.event_count)
                );
            }
        }
        println!();
    }

    println!();
    println!("{}", "=".repeat(WIDE_RULE));
    println!("OVERVIEW");
    println!("{}", "=".repeat(WIDE_RULE));
    println!(
        "Average probability: {:.2}%",
        table.average_probability()
    );
    println!("Total events: {}", table.total_events);
    println!();

    println!("Top 5 highest-risk combinations:");
    print_ranked(&table.top(5));
    println!();
    println!("Top 5 safest combinations:");
    print_ranked(&table.bottom(5));
    println!();
    println!("{}", "=".repeat(WIDE_RULE));
}
