//! Diagnostic logging to stderr.

use std::io;
use std::str::FromStr;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::{CliError, Result};

/// Level used when none is configured.
pub const DEFAULT_LEVEL: &str = "warn";

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "text" | "console" | "human" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(CliError::validation(format!(
                "unsupported log format \"{other}\" (expected text or json)"
            ))),
        }
    }
}

/// Logging configuration, usually read from the `log.*` keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Line format.
    pub format: LogFormat,
    /// Filter directive such as `info` or `triton_sdk=debug`.
    pub level: String,
    /// Emit ANSI colors.
    pub color: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            level: DEFAULT_LEVEL.to_string(),
            color: false,
        }
    }
}

impl LogSettings {
    /// Builds the event filter; an empty level falls back to [`DEFAULT_LEVEL`].
    pub fn filter(&self) -> Result<EnvFilter> {
        let level = if self.level.trim().is_empty() {
            DEFAULT_LEVEL
        } else {
            self.level.trim()
        };
        EnvFilter::try_new(level)
            .map_err(|e| CliError::validation(format!("invalid log level \"{level}\": {e}")))
    }
}

/// Installs the global subscriber.
///
/// A second call is a no-op so that hooks may run more than once in a
/// process (tests, embedded use).
pub fn init_logging(settings: &LogSettings) -> Result<()> {
    let filter = settings.filter()?;
    let installed = match settings.format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_ansi(settings.color),
            )
            .with(filter)
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(io::stderr))
            .with(filter)
            .try_init(),
    };
    if installed.is_err() {
        tracing::debug!("logging already initialized");
    }
    Ok(())
}
