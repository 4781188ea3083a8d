//! CLI entry point for the course evaluation report tool.
//!
//! Provides subcommands for aggregating raw survey exports into a per-question
//! report and for reconciling reports against the registrar's offering list.

use anyhow::Result;
use clap::{Parser, Subcommand};
use course_eval::analyzers::analyzer::analyze;
use course_eval::config::PipelineConfig;
use course_eval::ingest::DirectorySource;
use course_eval::output::CsvReportSink;
use course_eval::reconcile::{load_registry, reconcile_reports};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::Directive,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "course_eval")]
#[command(
    about = "Aggregate course evaluation surveys and reconcile offering ids",
    long_about = None
)]
struct Cli {
    /// JSON config overriding departments, filters and classification rules
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate survey exports into a per-question report
    Aggregate {
        /// Directory containing the survey export CSVs
        #[arg(short, long, value_name = "DIR")]
        input_dir: PathBuf,

        /// Report file to write
        #[arg(short, long, default_value = "transformation/uwide.csv")]
        output: PathBuf,
    },
    /// Replace report course offerings with registrar identifiers
    Reconcile {
        /// Registrar CSV with a "Course Offering ID" column
        #[arg(short, long)]
        registrar: PathBuf,

        /// Report files produced by `aggregate`
        #[arg(value_name = "REPORT", required = true)]
        reports: Vec<PathBuf>,

        /// Directory for the `<name>-final.csv` outputs
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/course_eval.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("course_eval.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse::<Directive>()?));

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

    let cli = Cli::parse();
    let config = PipelineConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Aggregate { input_dir, output } => {
            let source = DirectorySource::new(
                &input_dir,
                &config.file_pattern,
                &config.excluded_file_prefix,
            );
            let mut sink = CsvReportSink::new(&output);
            let rows = analyze(&source, &mut sink, &config)?;

            let written = std::path::absolute(sink.path()).unwrap_or_else(|_| output.clone());
            info!(rows, path = %written.display(), "Aggregate report complete");
        }
        Commands::Reconcile {
            registrar,
            reports,
            output_dir,
        } => {
            let registry = load_registry(&registrar, config.duplicate_policy)?;
            let written = reconcile_reports(&reports, &registry, &output_dir)?;

            for path in &written {
                info!(path = %path.display(), "Final report written");
            }
        }
    }

    Ok(())
}
