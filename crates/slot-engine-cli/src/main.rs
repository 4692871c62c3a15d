//! `slotfinder` CLI -- compute free intervals, bookable slots and proposed
//! meeting times from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Free intervals for the next two weeks (busy ranges on stdin)
//! cat busy.json | slotfinder --config slotfinder.toml free
//!
//! # 45-minute slots in an explicit window
//! slotfinder --timezone Asia/Tokyo --work-start 8 --work-end 18 \
//!   slots --start 2026-03-16T00:00:00+09:00 --end 2026-03-21T00:00:00+09:00 \
//!   --slot-minutes 45 -i busy.json
//!
//! # Busy overview per business day, all-day events included
//! slotfinder --config slotfinder.toml overview -i events.json --summary
//!
//! # Fold selected grid cells into proposed intervals
//! slotfinder --config slotfinder.toml propose -i selection.json --free free.json
//!
//! # Validate a guest's submission
//! slotfinder --config slotfinder.toml intake -i proposal.json --summary
//! ```

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use slot_engine::availability::{
    free_intervals_response, overview_response, slots_response, AvailabilityQuery,
};
use slot_engine::freebusy::{parse_datetime, BusyEntry};
use slot_engine::proposal::{ProposalRecord, ProposalRequest};
use slot_engine::selection::{DayAvailability, SelectedCell, Selection};
use slot_engine::{FreeIntervalsResponse, SchedulerConfig, SlotError, SlotLength};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slotfinder",
    version,
    about = "Business-hours availability and meeting proposal tool"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML config file (timezone, work hours, slot defaults)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// IANA timezone; overrides the config file
    #[arg(long, global = true)]
    timezone: Option<String>,

    /// First work hour (0-23); overrides the config file
    #[arg(long, global = true)]
    work_start: Option<u32>,

    /// Work end hour (1-24); overrides the config file
    #[arg(long, global = true)]
    work_end: Option<u32>,

    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print free intervals within business hours
    Free {
        #[command(flatten)]
        window: WindowArgs,
        /// Busy ranges JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Print fixed-length bookable slots
    Slots {
        #[command(flatten)]
        window: WindowArgs,
        /// Slot length in minutes (15-180); defaults to the config value
        #[arg(long)]
        slot_minutes: Option<u32>,
        /// Busy ranges JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Print the business windows of a query range
    Windows {
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Summarize busy time per business day
    Overview {
        #[command(flatten)]
        window: WindowArgs,
        /// Busy entries JSON file, timed or all-day (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Print one line per day instead of JSON
        #[arg(long)]
        summary: bool,
    },
    /// Aggregate selected grid cells into proposed intervals
    Propose {
        /// Slot length the cells were selected with; defaults to the config value
        #[arg(long)]
        slot_minutes: Option<u32>,
        /// Selected cells JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Free-intervals JSON (output of `free`); unavailable cells are pruned
        #[arg(long)]
        free: Option<String>,
    },
    /// Validate a proposal submission
    Intake {
        /// Proposal request JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Print numbered suggestion lines instead of the JSON record
        #[arg(long)]
        summary: bool,
    },
}

#[derive(clap::Args)]
struct WindowArgs {
    /// Query start (RFC 3339); defaults to now
    #[arg(long)]
    start: Option<String>,
    /// Query end (RFC 3339); defaults to now plus the configured range
    #[arg(long)]
    end: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    let calendar = config
        .calendar()
        .context("Invalid business calendar configuration")?;
    debug!(
        timezone = calendar.timezone_name(),
        work_start = calendar.work_start_hour(),
        work_end = calendar.work_end_hour(),
        "configuration loaded"
    );

    match cli.command {
        Commands::Free { window, input } => {
            let query = resolve_query(&window, &config)?;
            let busy = read_busy(input.as_deref())?;
            print_json(&free_intervals_response(&query, &busy, &calendar))?;
        }
        Commands::Slots {
            window,
            slot_minutes,
            input,
        } => {
            let query = resolve_query(&window, &config)?;
            let slot = resolve_slot(slot_minutes, &config)?;
            let busy = read_busy(input.as_deref())?;
            print_json(&slots_response(&query, &busy, &calendar, slot))?;
        }
        Commands::Windows { window } => {
            let query = resolve_query(&window, &config)?;
            print_json(&calendar.business_windows(&query.range))?;
        }
        Commands::Overview {
            window,
            input,
            summary,
        } => {
            let query = resolve_query(&window, &config)?;
            let busy = read_busy(input.as_deref())?;
            let response = overview_response(&query, &busy, &calendar);
            if summary {
                for day in &response.days {
                    println!("{}", day.summary_line(&calendar));
                }
            } else {
                print_json(&response)?;
            }
        }
        Commands::Propose {
            slot_minutes,
            input,
            free,
        } => {
            let slot = resolve_slot(slot_minutes, &config)?;
            let raw = read_input(input.as_deref())?;
            let cells: Vec<SelectedCell> =
                serde_json::from_str(&raw).context("Failed to parse selected cells")?;
            let mut selection: Selection = cells.into_iter().collect();

            if let Some(path) = free {
                let response: FreeIntervalsResponse =
                    serde_json::from_str(&read_input(Some(path.as_str()))?)
                        .context("Failed to parse free intervals")?;
                let availability =
                    DayAvailability::from_free_intervals(&response.intervals, &calendar);
                selection.prune(&availability, slot);
            }

            let mut proposed = selection.aggregate(slot, &calendar);
            if proposed.is_empty() {
                return Err(SlotError::NothingSelected.into());
            }
            proposed.truncate(config.max_suggestions);
            print_json(&proposed)?;
        }
        Commands::Intake { input, summary } => {
            let raw = read_input(input.as_deref())?;
            let request: ProposalRequest =
                serde_json::from_str(&raw).context("Failed to parse proposal request")?;
            let record = ProposalRecord::from_request(&request, Utc::now(), config.max_suggestions)
                .context("Proposal rejected")?;
            if summary {
                for line in record.summary_lines(&calendar) {
                    println!("{}", line);
                }
            } else {
                print_json(&record)?;
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Config file first, then command-line overrides.
fn load_config(cli: &Cli) -> Result<SchedulerConfig> {
    let mut config = match &cli.config {
        Some(path) => SchedulerConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => SchedulerConfig::default(),
    };
    if let Some(tz) = &cli.timezone {
        config.timezone = Some(tz.clone());
    }
    if let Some(hour) = cli.work_start {
        config.work_start_hour = Some(hour);
    }
    if let Some(hour) = cli.work_end {
        config.work_end_hour = Some(hour);
    }
    Ok(config)
}

fn resolve_query(window: &WindowArgs, config: &SchedulerConfig) -> Result<AvailabilityQuery> {
    let start = parse_bound(window.start.as_deref())?;
    let end = parse_bound(window.end.as_deref())?;
    AvailabilityQuery::resolve(start, end, Utc::now(), config.default_range_days)
        .context("Invalid query window")
}

fn parse_bound(value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    value
        .map(|s| parse_datetime(s).with_context(|| format!("Invalid datetime: {}", s)))
        .transpose()
}

fn resolve_slot(slot_minutes: Option<u32>, config: &SchedulerConfig) -> Result<SlotLength> {
    let minutes = slot_minutes.unwrap_or(config.default_slot_minutes);
    SlotLength::new(minutes).context("Invalid slot length")
}

/// Busy ranges as a JSON array of `{start, end}`; blank input means none.
fn read_busy(path: Option<&str>) -> Result<Vec<BusyEntry>> {
    let raw = read_input(path)?;
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&raw).context("Failed to parse busy ranges")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let pretty = serde_json::to_string_pretty(value)?;
    println!("{}", pretty);
    Ok(())
}
