//! Logging System
//!
//! Structured logging on top of `tracing`. Level, format and destination come from
//! the `[logging]` config section, with `PHOTOTAG_LOG`, `PHOTOTAG_LOG_FORMAT` and
//! `PHOTOTAG_LOG_OUTPUT` taking precedence.

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Install a subscriber at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file (default: stderr)
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path, required when output is "file"
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: BTreeMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: BTreeMap::new(),
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), String> {
        const LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];
        if !LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(format!("Invalid log level: {}", self.level));
        }
        parse_format(&self.format).map_err(|e| e.to_string())?;
        let output = parse_output(&self.output).map_err(|e| e.to_string())?;
        if output == Output::File && self.file.is_none() {
            return Err("output = \"file\" requires a log file path".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Stdout,
    Stderr,
    File,
}

fn parse_format(format: &str) -> Result<Format, CatalogError> {
    match format {
        "text" => Ok(Format::Text),
        "json" => Ok(Format::Json),
        other => Err(CatalogError::ConfigError(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            other
        ))),
    }
}

fn parse_output(output: &str) -> Result<Output, CatalogError> {
    match output {
        "stdout" => Ok(Output::Stdout),
        "stderr" => Ok(Output::Stderr),
        "file" => Ok(Output::File),
        other => Err(CatalogError::ConfigError(format!(
            "Invalid log output: {} (must be 'stdout', 'stderr', or 'file')",
            other
        ))),
    }
}

/// Initialize the global subscriber.
///
/// Priority order (highest to lowest):
/// 1. Environment variables (PHOTOTAG_LOG, PHOTOTAG_LOG_FORMAT, PHOTOTAG_LOG_OUTPUT)
/// 2. The given config (CLI flags are already folded in by the caller)
/// 3. Defaults
pub fn init_logging(config: &LoggingConfig) -> Result<(), CatalogError> {
    if !config.enabled {
        return Ok(());
    }
    let filter = build_env_filter(config)?;
    let format = match std::env::var("PHOTOTAG_LOG_FORMAT") {
        Ok(value) => parse_format(&value)?,
        Err(_) => parse_format(&config.format)?,
    };
    let output = match std::env::var("PHOTOTAG_LOG_OUTPUT") {
        Ok(value) => parse_output(&value)?,
        Err(_) => parse_output(&config.output)?,
    };

    let writer = make_writer(output, config)?;
    let use_color = config.color && output != Output::File;
    let subscriber = Registry::default().with(filter);

    let result = match format {
        Format::Json => subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init(),
        Format::Text => subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(use_color)
                    .with_writer(writer),
            )
            .try_init(),
    };

    result.map_err(|e| CatalogError::ConfigError(format!("Failed to initialize logging: {}", e)))
}

fn make_writer(output: Output, config: &LoggingConfig) -> Result<BoxMakeWriter, CatalogError> {
    match output {
        Output::Stdout => Ok(BoxMakeWriter::new(std::io::stdout)),
        Output::Stderr => Ok(BoxMakeWriter::new(std::io::stderr)),
        Output::File => {
            let path = config.file.as_ref().ok_or_else(|| {
                CatalogError::ConfigError("Log output is 'file' but no file is set".to_string())
            })?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    CatalogError::ConfigError(format!("Failed to create log directory: {}", e))
                })?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    CatalogError::ConfigError(format!("Failed to open log file {:?}: {}", path, e))
                })?;
            Ok(BoxMakeWriter::new(Mutex::new(file)))
        }
    }
}

/// Build the level filter from `PHOTOTAG_LOG` or the config.
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, CatalogError> {
    if let Ok(filter) = EnvFilter::try_from_env("PHOTOTAG_LOG") {
        return Ok(filter);
    }

    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::new(&config.level);
    for (module, level) in &config.modules {
        let directive = format!("{}={}", module, level);
        filter = filter.add_directive(
            directive
                .parse()
                .map_err(|e| CatalogError::ConfigError(format!("Invalid log directive: {}", e)))?,
        );
    }
    Ok(filter)
}
