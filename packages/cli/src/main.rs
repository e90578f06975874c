#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the dispatch event statistics tool.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use dispatch_stats_analytics::{probability_table, summarize};
use dispatch_stats_report::{charts, console, csv_export, json_export};
use dispatch_stats_source::client::{ApiClient, EventQuery, Unit};
use dispatch_stats_source::files::{self, DataFiles};
use dispatch_stats_source::timezone;
use dispatch_stats_source::units::best_unit_match;

#[derive(Parser)]
#[command(name = "dispatch_stats", about = "Fire dispatch event statistics tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct UnitSelector {
    /// Backend unit id (e.g. 8102157)
    #[arg(long)]
    unit_id: Option<i64>,
    /// Unit name to search for (fuzzy matched, diacritics ignored)
    #[arg(long)]
    unit: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download events and enumerators for a unit and time window, saving
    /// them as local JSON files
    Fetch {
        /// Window start, `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS` (local civil time)
        #[arg(long)]
        from: String,
        /// Window end, `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS` (local civil time)
        #[arg(long)]
        to: String,
        #[command(flatten)]
        unit: UnitSelector,
        /// Directory for the saved data files
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,
        /// API base URL override
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Print summary statistics over previously fetched events
    Stats {
        /// Directory holding the fetched data files
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,
        /// Also write the breakdowns as CSV files
        #[arg(long)]
        export_csv: bool,
        /// Also write the full report as JSON
        #[arg(long)]
        export_json: bool,
        /// Also render the breakdowns as SVG bar charts
        #[arg(long)]
        export_charts: bool,
        /// Directory for exported files
        #[arg(long, default_value = "reports")]
        output_dir: PathBuf,
    },
    /// Print the weekday/day-part probability table over previously fetched
    /// events
    Probability {
        /// Directory holding the fetched data files
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,
        /// Also write the table as a CSV file
        #[arg(long)]
        export_csv: bool,
        /// Also write the table as JSON
        #[arg(long)]
        export_json: bool,
        /// Also render the table as an SVG heatmap
        #[arg(long)]
        chart: bool,
        /// Directory for exported files
        #[arg(long, default_value = "reports")]
        output_dir: PathBuf,
    },
    /// Search units by name and show their ids
    Units {
        /// Name fragment to search for
        term: String,
        /// API base URL override
        #[arg(long)]
        base_url: Option<String>,
    },
}

fn make_client(base_url: Option<String>) -> ApiClient {
    base_url.map_or_else(ApiClient::default, ApiClient::new)
}

async fn resolve_unit(client: &ApiClient, selector: &UnitSelector) -> Result<i64, Box<dyn std::error::Error>> {
    if let Some(id) = selector.unit_id {
        return Ok(id);
    }
    // clap's group guarantees exactly one of the two is present.
    let term = selector.unit.as_deref().unwrap_or_default();
    let candidates = client.search_units(term).await?;
    let unit = best_unit_match(term, &candidates)?;
    log::info!("Matched unit '{}' (id={})", unit.name, unit.id);
    Ok(unit.id)
}

async fn fetch(
    from: &str,
    to: &str,
    unit: &UnitSelector,
    data_dir: &Path,
    base_url: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let from_local = timezone::parse_civil_arg(from, false)?;
    let to_local = timezone::parse_civil_arg(to, true)?;
    log::info!(
        "Query window {from_local} to {to_local} (UTC{:+})",
        timezone::offset_hours_at(from_local)
    );

    let client = make_client(base_url);
    let unit_id = resolve_unit(&client, unit).await?;

    let types = client.fetch_types().await?;
    let subtypes = client.fetch_subtypes().await?;
    let states = client.fetch_states().await?;
    let catalog =
        dispatch_stats_event_models::Catalog::from_values(&types, &subtypes, &states);

    let query = EventQuery {
        from_utc: timezone::format_query_instant(timezone::local_to_utc(from_local)),
        to_utc: timezone::format_query_instant(timezone::local_to_utc(to_local)),
        unit_id,
        state_ids: catalog.state_ids(),
    };
    let events = client.fetch_events(&query).await?;

    let data_files = DataFiles::in_dir(data_dir);
    files::save_values(&data_files.types, &types)?;
    files::save_values(&data_files.subtypes, &subtypes)?;
    files::save_values(&data_files.states, &states)?;
    files::save_values(&data_files.events, &events)?;
    log::info!(
        "Saved {} events to {}",
        events.len(),
        data_files.events.display()
    );
    Ok(())
}

fn stats(
    data_dir: &Path,
    export_csv: bool,
    export_json: bool,
    export_charts: bool,
    output_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let data_files = DataFiles::in_dir(data_dir);
    let events = files::load_events(&data_files.events)?;
    let catalog = files::load_catalog(&data_files)?;
    let summary = summarize(&events, &catalog);

    console::print_summary(&summary);

    if export_csv {
        csv_export::export_summary(&summary, output_dir)?;
    }
    if export_json {
        json_export::export_summary(&summary, &output_dir.join("stats.json"))?;
    }
    if export_charts {
        charts::export_summary(&summary, output_dir)?;
    }
    Ok(())
}

fn probability(
    data_dir: &Path,
    export_csv: bool,
    export_json: bool,
    chart: bool,
    output_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let data_files = DataFiles::in_dir(data_dir);
    let events = files::load_events(&data_files.events)?;
    let table = probability_table(&events)?;

    console::print_probability(&table);

    if export_csv {
        csv_export::export_probability(&table, &output_dir.join("probability.csv"))?;
    }
    if export_json {
        json_export::export_probability(&table, &output_dir.join("probability.json"))?;
    }
    if chart {
        charts::export_heatmap(&table, &output_dir.join("probability.svg"))?;
    }
    Ok(())
}

async fn units(term: &str, base_url: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let client = make_client(base_url);
    let candidates = client.search_units(term).await?;
    if candidates.is_empty() {
        println!("No units matching '{term}'");
        return Ok(());
    }

    println!("{:<12} NAME", "ID");
    println!("{}", "-".repeat(50));
    for Unit { id, name } in &candidates {
        println!("{id:<12} {name}");
    }
    if let Ok(best) = best_unit_match(term, &candidates) {
        println!("\nBest match: {} (id={})", best.name, best.id);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            from,
            to,
            unit,
            data_dir,
            base_url,
        } => fetch(&from, &to, &unit, &data_dir, base_url).await,
        Commands::Stats {
            data_dir,
            export_csv,
            export_json,
            export_charts,
            output_dir,
        } => stats(&data_dir, export_csv, export_json, export_charts, &output_dir),
        Commands::Probability {
            data_dir,
            export_csv,
            export_json,
            chart,
            output_dir,
        } => probability(&data_dir, export_csv, export_json, chart, &output_dir),
        Commands::Units { term, base_url } => units(&term, base_url).await,
    }
}
