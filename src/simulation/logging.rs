//! Logging and tracing configuration
//!
//! Console output goes to stderr so that a JSON summary written to stdout stays
//! machine-readable. File output, when enabled, rolls daily and is always JSON.

use std::io;
use tracing::{debug, Level};
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

use crate::types::config::CliArgs;

/// Error returned when the global subscriber cannot be installed
pub type LoggingError = Box<dyn std::error::Error + Send + Sync>;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for the crate
    pub level: Level,
    /// Whether to emit JSON on the console
    pub json_format: bool,
    /// Directory for daily-rolling log files, if any
    pub log_directory: Option<String>,
    /// Log file prefix
    pub log_file_prefix: String,
    /// Whether to emit span open/close events
    pub enable_span_events: bool,
    /// Whether to enable ANSI colors in console output
    pub enable_ansi: bool,
    /// Custom environment filter, overriding `level`
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            json_format: false,
            log_directory: None,
            log_file_prefix: "airport-departure-sim".to_string(),
            enable_span_events: false,
            enable_ansi: true,
            env_filter: None,
        }
    }
}

/// Keeps the non-blocking writers flushing until dropped
#[derive(Debug)]
pub struct LogGuard {
    _guards: Vec<WorkerGuard>,
}

impl LoggingConfig {
    /// Create a new logging configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Enable JSON formatting on the console
    pub fn with_json_format(mut self) -> Self {
        self.json_format = true;
        self
    }

    /// Enable daily-rolling file logging into `directory`
    pub fn with_file_logging(mut self, directory: impl Into<String>) -> Self {
        self.log_directory = Some(directory.into());
        self
    }

    /// Enable span events
    pub fn with_span_events(mut self) -> Self {
        self.enable_span_events = true;
        self
    }

    /// Disable ANSI colors
    pub fn without_ansi(mut self) -> Self {
        self.enable_ansi = false;
        self
    }

    /// Set custom environment filter
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    fn span_events(&self) -> FmtSpan {
        if self.enable_span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    fn filter(&self) -> Result<EnvFilter, LoggingError> {
        if let Some(filter) = &self.env_filter {
            return Ok(EnvFilter::try_new(filter)?);
        }
        Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                self.level
            ))
        }))
    }

    /// Install the global tracing subscriber
    ///
    /// The returned guard must be held for as long as logs should be flushed.
    pub fn init(self) -> Result<LogGuard, LoggingError> {
        let registry = Registry::default().with(self.filter()?);
        let (console_writer, console_guard) = non_blocking(io::stderr());
        let mut guards = vec![console_guard];

        let console_json = self.json_format.then(|| {
            fmt::layer()
                .json()
                .with_writer(console_writer.clone())
                .with_span_events(self.span_events())
        });
        let console_text = (!self.json_format).then(|| {
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(console_writer)
                .with_ansi(self.enable_ansi)
                .with_span_events(self.span_events())
        });

        let file_layer = match &self.log_directory {
            Some(directory) => {
                let appender = rolling::daily(directory, &self.log_file_prefix);
                let (file_writer, file_guard) = non_blocking(appender);
                guards.push(file_guard);
                Some(
                    fmt::layer()
                        .json()
                        .with_writer(file_writer)
                        .with_span_events(self.span_events()),
                )
            }
            None => None,
        };

        registry.with(console_json).with(console_text).with(file_layer).try_init()?;

        debug!(level = %self.level, json = self.json_format, "Logging initialized");
        Ok(LogGuard { _guards: guards })
    }

    /// Console configuration for the command line verbosity flags
    ///
    /// `debug` wins over `verbose`; both turn on span events. Without either
    /// only warnings are shown.
    pub fn from_flags(debug: bool, verbose: bool, json: bool) -> Self {
        let config = match (debug, verbose) {
            (true, _) => Self::new().with_level(Level::DEBUG).with_span_events(),
            (false, true) => Self::new().with_level(Level::INFO).with_span_events(),
            (false, false) => Self::new(),
        };
        if json {
            config.with_json_format()
        } else {
            config
        }
    }

    /// Logging configuration for a parsed command line
    pub fn from_cli_args(args: &CliArgs) -> Self {
        let mut config = Self::from_flags(args.debug, args.verbose, args.json_logs);
        if let Some(directory) = &args.log_dir {
            config = config.with_file_logging(directory.clone());
        }
        if let Some(filter) = &args.log_filter {
            config = config.with_env_filter(filter.clone());
        }
        if args.no_color {
            config = config.without_ansi();
        }
        config
    }
}

/// Structured event tagged with the simulated time it happened at
#[macro_export]
macro_rules! sim_event {
    ($level:ident, $now:expr, $message:expr, $($key:ident = $value:expr),* $(,)?) => {
        tracing::$level!(
            sim_time = $now,
            component = "departure",
            $($key = $value,)*
            $message
        );
    };
    ($level:ident, $now:expr, $message:expr) => {
        tracing::$level!(sim_time = $now, component = "departure", $message);
    };
}
