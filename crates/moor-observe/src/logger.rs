use std::{io::IsTerminal, str::FromStr};

use thiserror::Error;
use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter, fmt, fmt::time::OffsetTime, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Output shape of the process logger.
///
/// Text is for a human at a terminal; JSON is one object per line for a
/// log collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggerFormat {
    Text,
    Json,
}

impl FromStr for LoggerFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LoggerFormat::Text),
            "json" => Ok(LoggerFormat::Json),
            _ => Err(LoggerError::InvalidFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// EnvFilter directive string, e.g. `info` or `moor_probe=debug`.
    pub level: String,
    pub with_targets: bool,
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::Text,
            level: "info".to_string(),
            with_targets: true,
            use_color: cfg!(test) || std::io::stdout().is_terminal(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Invalid logger format: {0} (expected: text|json)")]
    InvalidFormat(String),
    #[error("Logger has been already initialized")]
    AlreadyInitialized,
    #[error("Failed to initialize logger: {0}")]
    InitializationFailed(String),
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}

/// Install the global tracing subscriber described by `cfg`.
///
/// Called once by the bootstrap before any component starts; a second
/// call fails with [`LoggerError::AlreadyInitialized`].
pub fn logger_init(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    let filter = EnvFilter::try_new(&cfg.level)
        .map_err(|_| LoggerError::InvalidLogLevel(cfg.level.clone()))?;
    let timer = OffsetTime::new(
        UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
        Rfc3339,
    );

    match cfg.format {
        LoggerFormat::Text => {
            let layer = fmt::layer()
                .with_ansi(cfg.use_color)
                .with_target(cfg.with_targets)
                .with_timer(timer);
            init_with(tracing_subscriber::registry().with(filter).with(layer))
        }
        LoggerFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_ansi(false)
                .with_target(cfg.with_targets)
                .with_timer(timer);
            init_with(tracing_subscriber::registry().with(filter).with(layer))
        }
    }
}

fn init_with<S>(subscriber: S) -> Result<(), LoggerError>
where
    S: Subscriber + Send + Sync + 'static,
{
    subscriber.try_init().map_err(|e| {
        let s = e.to_string();
        if s.contains("SetGlobalDefaultError") {
            LoggerError::AlreadyInitialized
        } else {
            LoggerError::InitializationFailed(s)
        }
    })
}
