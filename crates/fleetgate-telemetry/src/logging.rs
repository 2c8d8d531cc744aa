//! `tracing-subscriber` setup: level, format and directive overrides.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::{TelemetryError, TelemetryResult};

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, multi-line.
    #[default]
    Pretty,
    /// Single-line JSON, for log aggregation.
    Json,
    /// Single-line, compact text.
    Compact,
}

/// Where log lines are written. The core only ever writes to process
/// streams; file/rotation policy is a host concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogTarget {
    /// Standard output.
    #[default]
    Stdout,
    /// Standard error.
    Stderr,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    level: String,
    format: LogFormat,
    target: LogTarget,
    directives: Vec<String>,
}

impl LogConfig {
    /// Start a config at the given base level (`"error"`, `"warn"`,
    /// `"info"`, `"debug"`, `"trace"`).
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            format: LogFormat::default(),
            target: LogTarget::default(),
            directives: Vec::new(),
        }
    }

    /// Set the output format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the output target.
    #[must_use]
    pub fn with_target(mut self, target: LogTarget) -> Self {
        self.target = target;
        self
    }

    /// Add a per-module directive, e.g. `"fleetgate_classifier=trace"`.
    #[must_use]
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    fn env_filter(&self) -> TelemetryResult<EnvFilter> {
        let mut filter = EnvFilter::try_new(&self.level)
            .map_err(|e| TelemetryError::ConfigError(e.to_string()))?;
        for directive in &self.directives {
            filter = filter.add_directive(
                directive
                    .parse()
                    .map_err(|e: tracing_subscriber::filter::ParseError| {
                        TelemetryError::ConfigError(e.to_string())
                    })?,
            );
        }
        Ok(filter)
    }
}

/// Install a global `tracing` subscriber built from `config`. Must be
/// called at most once per process.
pub fn setup_logging(config: &LogConfig) -> TelemetryResult<()> {
    let filter = config.env_filter()?;
    let writer_is_stderr = matches!(config.target, LogTarget::Stderr);

    let result = match config.format {
        LogFormat::Json => {
            let layer = fmt::layer().json().with_writer(move || -> Box<dyn std::io::Write> {
                if writer_is_stderr {
                    Box::new(std::io::stderr())
                } else {
                    Box::new(std::io::stdout())
                }
            });
            tracing_subscriber::registry().with(filter).with(layer).try_init()
        }
        LogFormat::Compact => {
            let layer = fmt::layer().compact().with_writer(move || -> Box<dyn std::io::Write> {
                if writer_is_stderr {
                    Box::new(std::io::stderr())
                } else {
                    Box::new(std::io::stdout())
                }
            });
            tracing_subscriber::registry().with(filter).with(layer).try_init()
        }
        LogFormat::Pretty => {
            let layer = fmt::layer().pretty().with_writer(move || -> Box<dyn std::io::Write> {
                if writer_is_stderr {
                    Box::new(std::io::stderr())
                } else {
                    Box::new(std::io::stdout())
                }
            });
            tracing_subscriber::registry().with(filter).with(layer).try_init()
        }
    };

    result.map_err(|e| TelemetryError::InitError(e.to_string()))
}

/// Install logging with the level taken from `RUST_LOG`, falling back to
/// `"info"`, and the default pretty format.
pub fn setup_default_logging() -> TelemetryResult<()> {
    let level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    setup_logging(&LogConfig::new(level))
}
