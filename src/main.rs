//! CLI entry point for the bikeshare explorer.
//!
//! Provides an interactive explore session and a one-shot report command
//! over the Chicago, New York City and Washington trip logs.

use anyhow::Result;
use bikeshare_explorer::{
    city::City,
    config::DatasetConfig,
    filter::{FilterSpec, apply, parse_month_choice, parse_weekday_choice},
    loader::load,
    output::{FormatConfig, export_rows, render_report, write_json},
    prompt::{InputProvider, ScriptedInput, StdinPrompt},
    reporters::TripReport,
    session::Session,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::Directive,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_explorer")]
#[command(about = "Explore US bikeshare trip data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DataArgs {
    /// Directory holding chicago.csv, new_york_city.csv and washington.csv
    #[arg(short, long, env = "BIKESHARE_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,

    /// Optional JSON file mapping city names to dataset paths
    #[arg(long, value_name = "FILE")]
    datasets: Option<PathBuf>,

    /// Hide gender and birth year in raw rows and truncate station names
    #[arg(short, long, default_value_t = false)]
    narrow: bool,
}

impl DataArgs {
    fn dataset_config(&self) -> Result<DatasetConfig> {
        let config = DatasetConfig::new(&self.data_dir);
        Ok(match &self.datasets {
            Some(path) => config.with_overrides_file(path)?,
            None => config,
        })
    }

    fn format(&self) -> FormatConfig {
        if self.narrow {
            FormatConfig::narrow()
        } else {
            FormatConfig::default()
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactively pick filters, view statistics and page through raw rows
    Explore {
        #[command(flatten)]
        data: DataArgs,

        /// Read answers from a file (one per line) instead of the terminal
        #[arg(long, value_name = "FILE")]
        script: Option<PathBuf>,
    },
    /// Print statistics for one selection and exit
    Report {
        /// chicago, new york city or washington
        #[arg(short, long)]
        city: City,

        /// Month name (January to June) or all
        #[arg(short, long, default_value = "all")]
        month: String,

        /// Day of the week or all
        #[arg(long, default_value = "all")]
        day: String,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,

        /// Also write the filtered rows to this CSV file
        #[arg(short, long, value_name = "FILE")]
        export: Option<PathBuf>,

        #[command(flatten)]
        data: DataArgs,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_logging()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Explore { data, script } => {
            let input: Box<dyn InputProvider> = match script {
                Some(path) => Box::new(ScriptedInput::from_file(&path)?),
                None => Box::new(StdinPrompt::new()),
            };
            let stdout = std::io::stdout();
            let mut session =
                Session::new(input, stdout.lock(), data.dataset_config()?, data.format());
            session.run()?;
        }
        Commands::Report {
            city,
            month,
            day,
            format,
            export,
            data,
        } => {
            let spec = FilterSpec::new(city)
                .with_month(parse_month_choice(&month)?)
                .with_weekday(parse_weekday_choice(&day)?);
            run_report(spec, format, export.as_deref(), &data)?;
        }
    }

    Ok(())
}

/// Logging setup: colored stderr + JSON rolling log file.
///
/// Stderr defaults to `warn` so log lines do not interleave with prompts.
fn init_logging() -> Result<WorkerGuard> {
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/bikeshare_explorer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_explorer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("warn".parse::<Directive>()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse::<Directive>()?),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(file_guard)
}

/// Loads, filters and prints one report, optionally exporting the filtered rows.
#[tracing::instrument(skip(format, data), fields(filter = %spec))]
fn run_report(
    spec: FilterSpec,
    format: OutputFormat,
    export: Option<&Path>,
    data: &DataArgs,
) -> Result<()> {
    let table = load(spec.city, &data.dataset_config()?)?;
    let filtered = apply(&table, &spec);
    let report = TripReport::build(spec, &filtered);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Pretty => write!(out, "{}", render_report(&report))?,
        OutputFormat::Json => write_json(&mut out, &report)?,
    }

    if let Some(path) = export {
        export_rows(path, &filtered)?;
        info!(path = %path.display(), rows = filtered.len(), "Filtered rows exported");
    }

    Ok(())
}
