//! Sark - a small Telegram command bot
//!
//! This library provides:
//! - Command parsing with a configurable prefix (`!wiki`, `!barcode`, ...)
//! - Static replies (links, an HTML info card)
//! - A UPC-A style barcode generator with a triangular digit distribution
//! - YAML configuration, log level decoding and Prometheus metrics

pub mod barcode;
pub mod bot;
pub mod card;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;

// Re-export common types
pub use barcode::{checksum, generate_barcode, Barcode, DigitSource, RngSource};
pub use card::InfoCard;
pub use config::BotConfig;
pub use error::{Error, Result};
