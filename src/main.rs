//! CLI entry point for the bikeshare statistics explorer.
//!
//! Prompts for a city and optional month/weekday filters, prints trip
//! statistics for the matching rows, and optionally pages through raw data.

use anyhow::Result;
use bikeshare_stats::config::{Config, OutputFormat};
use bikeshare_stats::session::{LinePrompt, run_session};
use clap::Parser;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_stats")]
#[command(about = "Explore US bikeshare trip data interactively", long_about = None)]
struct Cli {
    /// Directory containing chicago.csv, new_york_city.csv and washington.csv
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Report output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let cli = Cli::parse();
    let config = Config::from_env().with_overrides(cli.data_dir, cli.format);

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = config
        .log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = config
        .log_file_path
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    // stderr stays quiet by default so it does not interleave with the prompts
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("warn".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    info!(data_dir = %config.data_dir.display(), format = ?config.format, "Starting session");

    let stdin = io::stdin();
    let mut prompt = LinePrompt::new(stdin.lock(), io::stdout());
    let mut out = io::stdout();

    run_session(&mut prompt, &mut out, &config.data_dir, config.format)
}
