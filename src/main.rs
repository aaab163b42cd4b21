//! CLI entry point for the trip dashboard.
//!
//! Loads summary, chart and trip-table data for a date range from the trip
//! analytics backend, exports the aggregate rows behind the chart as CSV,
//! reports dataset-wide data quality, or builds chart series offline from a
//! saved aggregates response.

mod report;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use trip_dashboard::{
    charts::{bucket_rows, build_series},
    config::DashboardConfig,
    coordinator::{Coordinator, DashboardEvent, Runner},
    export::write_csv,
    infra::taxi_api::TaxiApiClient,
    models::DateRangeFilter,
    parser::{parse_aggregates, parse_summary},
    services::DashboardApi,
    session::MemorySessionStore,
};

#[derive(Parser)]
#[command(name = "trip-dashboard")]
#[command(about = "Explore NYC taxi trip aggregates from the analytics backend", long_about = None)]
struct Cli {
    /// Optional JSON config file; environment variables are used otherwise
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the dashboard for a date range and log its cards, charts and table
    Dashboard {
        #[arg(long, value_name = "YYYY-MM-DD")]
        start: NaiveDate,

        #[arg(long, value_name = "YYYY-MM-DD")]
        end: NaiveDate,

        /// yellow, green, fhv or fhvhv (default: all)
        #[arg(short, long)]
        service_type: Option<String>,

        /// Pickup borough for the trip table
        #[arg(short, long)]
        borough: Option<String>,

        /// Trip table page to show
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Print the chart series as JSON on stdout
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Export the daily aggregate rows for a date range as CSV
    Export {
        #[arg(long, value_name = "YYYY-MM-DD")]
        start: NaiveDate,

        #[arg(long, value_name = "YYYY-MM-DD")]
        end: NaiveDate,

        #[arg(short, long)]
        service_type: Option<String>,

        /// CSV file to write
        #[arg(short, long, default_value = "aggregates.csv")]
        output: String,
    },
    /// Show whole-dataset totals and data quality per service type
    Stats,
    /// Build chart series from a saved aggregates response without the backend
    Chart {
        /// Saved `/api/aggregates/daily` response or array of rows
        #[arg(value_name = "FILE")]
        source: String,

        /// Saved `/api/summary` response for the distribution charts
        #[arg(long)]
        summary: Option<String>,

        /// Range start (default: earliest row)
        #[arg(long, value_name = "YYYY-MM-DD")]
        start: Option<NaiveDate>,

        /// Range end (default: latest row)
        #[arg(long, value_name = "YYYY-MM-DD")]
        end: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/trip_dashboard.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("trip_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive(LevelFilter::INFO.into()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive(LevelFilter::DEBUG.into()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::from_env()?,
    };

    match cli.command {
        Commands::Dashboard {
            start,
            end,
            service_type,
            borough,
            page,
            json,
        } => {
            let mut filter = DateRangeFilter::new(start, end, service_type.as_deref())?;
            if let Some(borough) = borough.as_deref() {
                filter = filter.with_borough(borough);
            }

            let mut runner = connect(&config).await?;
            load(&mut runner, filter).await?;

            if page > 1 {
                runner.dispatch(DashboardEvent::PageChanged(page));
                runner.run_until_settled().await;
                if runner.redirected() {
                    bail!("backend rejected the session; log in again");
                }
            }

            let coordinator = runner.coordinator();
            report::log_summary(coordinator.summary());
            report::log_chart(coordinator.chart());
            report::log_table(coordinator.table(), coordinator.pagination());

            if json {
                let series = coordinator.series();
                println!("{}", serde_json::to_string_pretty(&series)?);
            }
        }
        Commands::Export {
            start,
            end,
            service_type,
            output,
        } => {
            let filter = DateRangeFilter::new(start, end, service_type.as_deref())?;
            let mut runner = connect(&config).await?;
            load(&mut runner, filter).await?;

            let chart = runner.coordinator().chart();
            let Some(view) = chart.data() else {
                let reason = chart
                    .error()
                    .map(|e| e.user_message())
                    .unwrap_or("no chart data was loaded");
                bail!("nothing to export: {reason}");
            };

            write_csv(&output, &view.rows)
                .with_context(|| format!("failed to write '{output}'"))?;
            info!(rows = view.rows.len(), output = %output, "Export written");
        }
        Commands::Stats => {
            let (client, token) = authenticate(&config).await?;
            let stats = client.fetch_statistics(&token).await?;
            report::log_statistics(&stats);
        }
        Commands::Chart {
            source,
            summary,
            start,
            end,
        } => {
            let bytes = std::fs::read(&source)
                .with_context(|| format!("failed to read '{source}'"))?;
            let rows = parse_aggregates(&bytes)?;

            let summary = match summary {
                Some(path) => {
                    let bytes = std::fs::read(&path)
                        .with_context(|| format!("failed to read '{path}'"))?;
                    Some(parse_summary(&bytes)?)
                }
                None => None,
            };

            let first = rows.iter().map(|r| r.date).min();
            let last = rows.iter().map(|r| r.date).max();
            let (Some(start), Some(end)) = (start.or(first), end.or(last)) else {
                bail!("'{source}' has no rows; pass --start and --end to chart an empty range");
            };

            let filter = DateRangeFilter::new(start, end, None)?;
            let buckets = bucket_rows(&rows, &filter);
            let series = build_series(&buckets, summary.as_ref());

            info!(
                rows = rows.len(),
                buckets = buckets.len(),
                granularity = ?buckets.granularity,
                "Chart built"
            );
            println!("{}", serde_json::to_string_pretty(&series)?);
        }
    }

    Ok(())
}

/// Builds a client and a token from `TAXI_API_TOKEN`, or from logging in
/// with `TAXI_API_USERNAME` / `TAXI_API_PASSWORD`.
async fn authenticate(config: &DashboardConfig) -> Result<(TaxiApiClient, String)> {
    let client = TaxiApiClient::from_config(config).context("failed to build HTTP client")?;

    let token = match std::env::var("TAXI_API_TOKEN") {
        Ok(token) if !token.is_empty() => token,
        _ => {
            let username = std::env::var("TAXI_API_USERNAME")
                .context("set TAXI_API_TOKEN or TAXI_API_USERNAME/TAXI_API_PASSWORD")?;
            let password = std::env::var("TAXI_API_PASSWORD")
                .context("TAXI_API_PASSWORD must be set with TAXI_API_USERNAME")?;
            client.login(&username, &password).await?
        }
    };
    Ok((client, token))
}

async fn connect(
    config: &DashboardConfig,
) -> Result<Runner<TaxiApiClient, MemorySessionStore>> {
    let (client, token) = authenticate(config).await?;
    let coordinator = Coordinator::from_config(MemorySessionStore::with_token(token), config)?;
    Ok(Runner::new(Arc::new(client), coordinator))
}

/// Applies `filter` and waits for all three views.
#[tracing::instrument(skip_all, fields(start = %filter.start(), end = %filter.end()))]
async fn load(
    runner: &mut Runner<TaxiApiClient, MemorySessionStore>,
    filter: DateRangeFilter,
) -> Result<()> {
    runner.dispatch(DashboardEvent::FilterChanged(filter));
    runner.run_until_settled().await;

    if runner.redirected() {
        bail!("backend rejected the session; log in again");
    }
    if !runner.coordinator().is_settled() {
        warn!("Some views are still loading");
    }
    Ok(())
}
