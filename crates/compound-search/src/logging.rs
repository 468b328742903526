//! Logging setup for applications embedding compound search.
//!
//! The library itself only emits `tracing` events: one `info` event per
//! search, one `debug` event per batch and a `warn` event on failure. This
//! module installs a subscriber for binaries that have none of their own.

use compound_core::{Error, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Default log file name when a path has no file component
const DEFAULT_LOG_FILE: &str = "compound-search.log";

/// Log output destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutput {
    /// Output to stdout
    Stdout,
    /// Output to a daily-rotated file
    File(PathBuf),
    /// Output to stdout and a daily-rotated file
    Both(PathBuf),
}

impl LogOutput {
    fn writes_stdout(&self) -> bool {
        matches!(self, LogOutput::Stdout | LogOutput::Both(_))
    }

    fn file(&self) -> Option<&Path> {
        match self {
            LogOutput::Stdout => None,
            LogOutput::File(path) | LogOutput::Both(path) => Some(path.as_path()),
        }
    }
}

/// Log format style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line human-readable output
    Pretty,
    /// Single-line output
    Compact,
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

impl LogFormat {
    fn layer<W>(self, writer: W, ansi: bool) -> BoxedLayer
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let base = fmt::layer().with_writer(writer).with_ansi(ansi);
        match self {
            LogFormat::Pretty => base.pretty().boxed(),
            LogFormat::Compact => base.compact().boxed(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset, e.g. `info` or
    /// `compound_search=debug`
    pub level: String,
    /// Output destination
    pub output: LogOutput,
    /// Format style
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            output: LogOutput::Stdout,
            format: LogFormat::Compact,
        }
    }
}

impl LogConfig {
    /// Info level to stdout
    pub fn info() -> Self {
        Self::default()
    }

    /// Debug level to stdout; shows one event per batch
    pub fn debug() -> Self {
        Self::default().with_level("debug")
    }

    /// Set log output to a rotated file
    pub fn with_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output = LogOutput::File(path.into());
        self
    }

    /// Set log output to stdout and a rotated file
    pub fn with_both<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output = LogOutput::Both(path.into());
        self
    }

    /// Set log format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the fallback filter directive
    pub fn with_level<S: Into<String>>(mut self, level: S) -> Self {
        self.level = level.into();
        self
    }

    /// The filter in effect: `RUST_LOG` if set and valid, else `level`.
    fn filter(&self) -> Result<EnvFilter> {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .map_err(|err| {
                Error::InvalidConfig(format!("invalid log filter '{}': {}", self.level, err))
            })
    }

    /// Installs the global subscriber.
    ///
    /// Returns the file writer guard when logging to a file; keep it alive
    /// for the life of the process or buffered lines are lost.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if the filter directive is invalid or
    /// a global subscriber is already installed.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use compound_search::logging::LogConfig;
    ///
    /// let _guard = LogConfig::debug().with_both("logs/search.log").init()?;
    /// # Ok::<(), compound_search::Error>(())
    /// ```
    pub fn init(self) -> Result<Option<WorkerGuard>> {
        let filter = self.filter()?;
        let mut layers: Vec<BoxedLayer> = Vec::new();
        let mut guard = None;

        if self.output.writes_stdout() {
            layers.push(self.format.layer(std::io::stdout, true));
        }
        if let Some(path) = self.output.file() {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(DEFAULT_LOG_FILE);
            let appender = tracing_appender::rolling::daily(directory, file_name);
            let (writer, file_guard) = tracing_appender::non_blocking(appender);
            layers.push(self.format.layer(writer, false));
            guard = Some(file_guard);
        }

        tracing_subscriber::registry()
            .with(layers)
            .with(filter)
            .try_init()
            .map_err(|err| Error::InvalidConfig(format!("logging already initialised: {}", err)))?;

        Ok(guard)
    }
}
