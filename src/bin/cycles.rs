//! Cycles CLI - Command-line interface for cycletrace
//!
//! Commands:
//! - detect: Detect period cycles in a journal document
//! - resolve: Resolve one date against the detected cycles
//! - calendar: Resolve every day of a range (NDJSON rows)
//! - status: One-line cycle status for the current day

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use cycletrace::{
    next_predicted_period_start, CycleConfig, CycleEngine, CycleError, CycleInfo, DateRange,
    JournalSource, ENGINE_VERSION, PRODUCER_NAME,
};

/// cycles - Cycle inference over sparse daily symptom journals
#[derive(Parser)]
#[command(name = "cycles")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Infer menstrual-cycle structure from a symptom journal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect period cycles in a journal document
    Detect {
        /// Journal document path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,

        /// Merge-gap tolerance in days
        #[arg(long, default_value_t = cycletrace::config::DEFAULT_MERGE_GAP_DAYS)]
        merge_gap: i64,
    },

    /// Resolve one date against the detected cycles
    Resolve {
        /// Journal document path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Date to resolve (YYYY-MM-DD)
        #[arg(short, long)]
        date: NaiveDate,

        /// Reference "today" for predictions (defaults to the local date)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,
    },

    /// Resolve every day of an inclusive range (one JSON row per line)
    Calendar {
        /// Journal document path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// First day of the range (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,

        /// Last day of the range (YYYY-MM-DD)
        #[arg(long)]
        to: NaiveDate,

        /// Reference "today" for predictions (defaults to the local date)
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Print a one-line cycle status for today
    Status {
        /// Journal document path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Reference "today" (defaults to the local date)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
    /// Newline-delimited JSON
    Ndjson,
}

#[derive(Debug, thiserror::Error)]
enum CyclesCliError {
    #[error(transparent)]
    Engine(#[from] CycleError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Journal contains no observations")]
    NoObservations,
}

#[derive(Serialize)]
struct CliError {
    error: String,
}

impl From<CyclesCliError> for CliError {
    fn from(e: CyclesCliError) -> Self {
        Self {
            error: e.to_string(),
        }
    }
}

#[derive(Serialize)]
struct DetectReport {
    producer: &'static str,
    version: &'static str,
    cycles: Vec<cycletrace::PeriodCycle>,
    flags: Vec<cycletrace::DetectionFlag>,
}

#[derive(Serialize)]
struct CalendarRow {
    date: NaiveDate,
    #[serde(flatten)]
    info: CycleInfo,
}

#[derive(Serialize)]
struct StatusReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    cycle_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cycle_day: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phase: Option<cycletrace::Phase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_predicted_period_start: Option<NaiveDate>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CyclesCliError> {
    match cli.command {
        Commands::Detect {
            input,
            output_format,
            merge_gap,
        } => cmd_detect(&input, output_format, merge_gap),

        Commands::Resolve {
            input,
            date,
            today,
            output_format,
        } => cmd_resolve(&input, date, today.unwrap_or_else(local_today), output_format),

        Commands::Calendar {
            input,
            from,
            to,
            today,
        } => cmd_calendar(&input, from, to, today.unwrap_or_else(local_today)),

        Commands::Status { input, today } => cmd_status(&input, today.unwrap_or_else(local_today)),
    }
}

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parse the journal document from a path or stdin.
fn read_source(input: &PathBuf) -> Result<JournalSource, CyclesCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(JournalSource::from_json(&buffer)?)
    } else {
        Ok(JournalSource::from_path(input)?)
    }
}

/// Load an engine over the document's full record span.
fn load_engine(
    source: &JournalSource,
    config: CycleConfig,
) -> Result<CycleEngine, CyclesCliError> {
    let range = source.full_range().ok_or(CyclesCliError::NoObservations)?;
    let mut engine = CycleEngine::with_config(config);
    engine.load(source, range)?;
    Ok(engine)
}

fn cmd_detect(
    input: &PathBuf,
    output_format: OutputFormat,
    merge_gap: i64,
) -> Result<(), CyclesCliError> {
    let source = read_source(input)?;
    let config = CycleConfig {
        merge_gap_days: merge_gap,
        ..CycleConfig::default()
    };
    let engine = load_engine(&source, config)?;
    let data = engine.data().ok_or(CyclesCliError::NoObservations)?;

    let report = DetectReport {
        producer: PRODUCER_NAME,
        version: ENGINE_VERSION,
        cycles: data.cycles.clone(),
        flags: data.flags.clone(),
    };

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&report)?),
        OutputFormat::JsonPretty => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Ndjson => {
            for cycle in &report.cycles {
                println!("{}", serde_json::to_string(cycle)?);
            }
        }
    }

    Ok(())
}

fn cmd_resolve(
    input: &PathBuf,
    date: NaiveDate,
    today: NaiveDate,
    output_format: OutputFormat,
) -> Result<(), CyclesCliError> {
    let source = read_source(input)?;
    let engine = load_engine(&source, CycleConfig::default())?;

    let info = engine.resolve(date, today);
    match output_format {
        OutputFormat::Json | OutputFormat::Ndjson => {
            println!("{}", serde_json::to_string(&info)?)
        }
        OutputFormat::JsonPretty => println!("{}", serde_json::to_string_pretty(&info)?),
    }

    Ok(())
}

fn cmd_calendar(
    input: &PathBuf,
    from: NaiveDate,
    to: NaiveDate,
    today: NaiveDate,
) -> Result<(), CyclesCliError> {
    let source = read_source(input)?;
    let engine = load_engine(&source, CycleConfig::default())?;
    let range = DateRange::new(from, to)?;

    for (date, info) in engine.resolve_range(range, today) {
        println!("{}", serde_json::to_string(&CalendarRow { date, info })?);
    }

    Ok(())
}

fn cmd_status(input: &PathBuf, today: NaiveDate) -> Result<(), CyclesCliError> {
    let source = read_source(input)?;
    let engine = load_engine(&source, CycleConfig::default())?;

    let info = engine.resolve(today, today);
    let next_start = engine
        .data()
        .and_then(|data| next_predicted_period_start(&data.cycles, engine.config()));

    if atty::is(atty::Stream::Stdout) {
        match &info {
            Some(info) => {
                print!(
                    "Day {} of {} ({})",
                    info.cycle_day,
                    info.cycle.id,
                    info.phase.as_str()
                );
                match next_start {
                    Some(next) => println!(", next period expected {next}"),
                    None => println!(),
                }
            }
            None => println!("No period data recorded yet"),
        }
    } else {
        let report = StatusReport {
            cycle_id: info.as_ref().map(|i| i.cycle.id.clone()),
            cycle_day: info.as_ref().map(|i| i.cycle_day),
            phase: info.as_ref().map(|i| i.phase),
            next_predicted_period_start: next_start,
        };
        println!("{}", serde_json::to_string(&report)?);
    }

    Ok(())
}
