//! Sark CLI - main entry point
//!
//! Resolves the bot token and configuration, then runs the Telegram bot.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use sark::config::{resolve_token, BotConfig};
use sark::{bot, logging, metrics};

#[derive(Parser)]
#[command(name = "sark")]
#[command(about = "Telegram command bot: links, info card and barcodes", long_about = None)]
#[command(version)]
struct Cli {
    /// Bot token
    #[arg(long, env = "SARK_BOT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// File containing the bot token (used when --token is empty)
    #[arg(long)]
    file: Option<PathBuf>,

    /// Resolve token and configuration but do not connect
    #[arg(long, default_value_t = false)]
    offline: bool,

    /// Configuration file (defaults to config.yml, then ../config.yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Command prefix, overrides the configured one
    #[arg(long)]
    prefix: Option<String>,

    /// Log level: trace, debug, info, warn, error, off or 10..50
    #[arg(long)]
    log_level: Option<String>,

    /// Address to expose Prometheus metrics (e.g., 0.0.0.0:9898)
    #[arg(long, env = "METRICS_ADDR")]
    metrics_addr: Option<String>,
}

fn load_config(cli: &Cli) -> anyhow::Result<BotConfig> {
    let mut config = match &cli.config {
        Some(path) => BotConfig::load_from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => BotConfig::new(),
    };

    if let Some(prefix) = &cli.prefix {
        config.prefix = prefix.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for local development
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let level = logging::parse_log_level(&config.log_level)
        .with_context(|| format!("decoding log level {:?}", config.log_level))?;
    logging::init(level)?;

    if let Some(addr) = cli.metrics_addr.as_deref() {
        match addr.parse::<SocketAddr>() {
            Ok(socket) => metrics::spawn_metrics_server(socket),
            Err(err) => warn!(%addr, "Invalid metrics address: {}", err),
        }
    }

    let token = resolve_token(
        cli.token.as_deref(),
        cli.file.as_deref(),
        config.token.as_deref(),
    )?;

    if cli.offline {
        info!("Token provided, but offline mode was forced.");
        return Ok(());
    }

    bot::run(token, config).await?;
    Ok(())
}
