//! Logging setup for the annoyb binary
//!
//! The `log` section of the configuration file picks the output format and
//! level. `ANNOYB_LOG_FORMAT` and `ANNOYB_LOG_LEVEL` override it, and
//! `RUST_LOG` takes precedence over the level when set. Output goes to
//! stderr unless the section names a `file`, which is appended to.
//!
//! ```no_run
//! use libannoyb::config::LogConfig;
//! use libannoyb::logging::LoggingConfig;
//!
//! let section = LogConfig::default();
//! let _ = LoggingConfig::from_section(&section, false).init();
//! ```

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::config::LogConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable text output (no colors, for piping)
    Text,
    /// Machine-parseable JSON (one JSON object per line)
    Json,
    /// Pretty-printed with colors (for development)
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(format!(
                "Invalid log format: '{}'. Valid options: text, json, pretty",
                s
            )),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
            LogFormat::Pretty => write!(f, "pretty"),
        }
    }
}

/// Configuration for logging initialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: String,
    pub verbose: bool,
    /// Log file to append to; stderr when unset
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn new(format: LogFormat, level: String, verbose: bool) -> Self {
        Self {
            format,
            level,
            verbose,
            file: None,
        }
    }

    pub fn with_file(mut self, file: Option<PathBuf>) -> Self {
        self.file = file;
        self
    }

    /// Build from the config file's `log` section plus environment overrides
    ///
    /// An unknown format falls back to text rather than failing the run.
    pub fn from_section(section: &LogConfig, verbose: bool) -> Self {
        let format = std::env::var("ANNOYB_LOG_FORMAT")
            .ok()
            .and_then(|s| s.parse().ok())
            .or_else(|| section.format.parse().ok())
            .unwrap_or(LogFormat::Text);

        let level = std::env::var("ANNOYB_LOG_LEVEL").unwrap_or_else(|_| section.level.clone());

        Self::new(format, level, verbose).with_file(section.file_path())
    }

    /// Writer for the configured sink
    pub fn make_writer(&self) -> std::io::Result<BoxMakeWriter> {
        match &self.file {
            Some(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                Ok(BoxMakeWriter::new(Mutex::new(file)))
            }
            None => Ok(BoxMakeWriter::new(std::io::stderr)),
        }
    }

    /// Initialize the global subscriber
    ///
    /// Returns an error if the log file cannot be opened or a subscriber is
    /// already installed.
    pub fn init(&self) -> Result<(), String> {
        use tracing_subscriber::EnvFilter;

        let writer = self.make_writer().map_err(|e| match &self.file {
            Some(path) => format!("Failed to open log file {}: {}", path.display(), e),
            None => e.to_string(),
        })?;
        let ansi = self.file.is_none();

        let filter = if self.verbose {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
        };

        let result = match self.format {
            LogFormat::Json => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(writer)
                .flatten_event(true)
                .with_target(true)
                .try_init(),
            LogFormat::Pretty => tracing_subscriber::fmt()
                .pretty()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(ansi)
                .with_target(true)
                .with_line_number(true)
                .with_file(true)
                .try_init(),
            LogFormat::Text => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(ansi)
                .with_target(true)
                .with_level(true)
                .try_init(),
        };

        result.map_err(|e| e.to_string())
    }
}
