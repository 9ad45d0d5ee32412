//! Log level decoding and subscriber setup

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

/// Decode a log level given by name or by its conventional number.
///
/// Names are case-insensitive; `warning` and `critical` are accepted as
/// aliases. Numbers follow the 10/20/30/40/50 scale, anything at or above
/// 40 maps to `error`, and 0 turns logging off.
pub fn parse_log_level(value: &str) -> Result<LevelFilter> {
    let value = value.trim();
    if let Ok(number) = value.parse::<u32>() {
        return match number {
            0 => Ok(LevelFilter::OFF),
            1..=9 => Ok(LevelFilter::TRACE),
            10..=19 => Ok(LevelFilter::DEBUG),
            20..=29 => Ok(LevelFilter::INFO),
            30..=39 => Ok(LevelFilter::WARN),
            40..=50 => Ok(LevelFilter::ERROR),
            _ => Err(Error::InvalidInput(format!("unknown log level {}", number))),
        };
    }

    match value.to_ascii_lowercase().as_str() {
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warn" | "warning" => Ok(LevelFilter::WARN),
        "error" | "critical" => Ok(LevelFilter::ERROR),
        "off" => Ok(LevelFilter::OFF),
        _ => Err(Error::InvalidInput(format!("unknown log level {:?}", value))),
    }
}

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::new(format!("sark={level},teloxide={level}"))
}

/// Install the global fmt subscriber. `RUST_LOG` wins over `level`.
pub fn init(level: LevelFilter) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))
}
