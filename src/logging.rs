//! Structured logging through `tracing`.
//!
//! Nothing is printed unless the embedding program calls [`init_logging`];
//! the crate itself only emits events.

use crate::error::{Error, Result};

use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Environment variable whose directives replace the configured level
pub const LOG_ENV: &str = "MERKLE_SYNC_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// trace, debug, info, warn, error, off, or any `EnvFilter` directive
    #[serde(default = "default_level")]
    pub level: String,

    /// text or json
    #[serde(default = "default_format")]
    pub format: String,

    /// stdout or stderr
    #[serde(default = "default_output")]
    pub output: String,

    /// ANSI colors, text format only
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_level() -> String {
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
            level: default_level(),
            format: default_format(),
            output: default_output(),
            color: default_true(),
        }
    }
}

fn invalid<T: std::fmt::Display>(field: &str, value: T) -> Error {
    Error::Config {
        src: String::from("could not initialize logging"),
        err: format!("invalid {field}: {value}"),
    }
}

/// Install the global subscriber described by `config`. If a subscriber is
/// already installed it is kept and this is a no-op
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = build_env_filter(config)?;
    let writer = match config.output.as_str() {
        "stdout" => BoxMakeWriter::new(std::io::stdout),
        "stderr" => BoxMakeWriter::new(std::io::stderr),
        other => return Err(invalid("output", other)),
    };

    let base_subscriber = Registry::default().with(filter);
    let installed = match config.format.as_str() {
        "json" => base_subscriber
            .with(fmt::layer().json().with_target(true).with_writer(writer))
            .try_init(),
        "text" => base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(config.color)
                    .with_writer(writer),
            )
            .try_init(),
        other => return Err(invalid("format", other)),
    };
    if installed.is_err() {
        tracing::debug!("Global subscriber already installed, keeping it");
    }
    Ok(())
}

fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|err| invalid("level", err))
}
