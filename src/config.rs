//! Runtime configuration loaded from environment variables.

use clap::ValueEnum;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_LOG_FILE: &str = "logs/bikeshare_stats.log";

/// How reports are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the three city CSVs.
    pub data_dir: PathBuf,
    pub log_file_path: PathBuf,
    pub format: OutputFormat,
}

impl Config {
    /// Reads `BIKESHARE_DATA_DIR` and `LOG_FILE_PATH`.
    ///
    /// The data directory defaults to the working directory.
    pub fn from_env() -> Self {
        let data_dir = env::var("BIKESHARE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        let log_file_path = env::var("LOG_FILE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_FILE));

        Self {
            data_dir,
            log_file_path,
            format: OutputFormat::default(),
        }
    }

    /// Applies command-line overrides on top of the environment.
    pub fn with_overrides(mut self, data_dir: Option<PathBuf>, format: Option<OutputFormat>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        if let Some(format) = format {
            self.format = format;
        }
        self
    }
}
