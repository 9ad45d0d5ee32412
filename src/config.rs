//! Configuration for the bot
//!
//! Loads configuration from config.yml file

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::card::InfoCard;
use crate::error::{Error, Result};

/// Default constants (fallback if config.yml not found)
pub const DEFAULT_PREFIX: &str = "!";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_OSTICKET_URL: &str = "https://osticket.at.freegeekarkansas.org/";
pub const DEFAULT_WIKI_URL: &str = "https://wiki.at.freegeekarkansas.org/";
pub const CONFIG_FILE: &str = "config.yml";

/// Environment fallbacks
pub const TOKEN_ENV: &str = "SARK_BOT_TOKEN";
pub const PREFIX_ENV: &str = "SARK_PREFIX";
pub const LOG_LEVEL_ENV: &str = "SARK_LOG_LEVEL";

/// YAML config structures
#[derive(Debug, Default, Deserialize)]
struct YamlConfig {
    bot: Option<YamlBot>,
    links: Option<YamlLinks>,
    info: Option<InfoCard>,
    logging: Option<YamlLogging>,
}

#[derive(Debug, Default, Deserialize)]
struct YamlBot {
    token: Option<String>,
    prefix: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct YamlLinks {
    osticket: Option<String>,
    wiki: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct YamlLogging {
    level: Option<String>,
}

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: Option<String>,
    pub prefix: String,
    pub osticket_url: String,
    pub wiki_url: String,
    pub info: InfoCard,
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl BotConfig {
    /// Load configuration from config.yml or use defaults
    pub fn new() -> Self {
        Self::load_from_file(CONFIG_FILE)
            .or_else(|_| Self::load_from_file(Path::new("..").join(CONFIG_FILE)))
            .unwrap_or_else(|_| Self::defaults())
    }

    /// Resolve a value: prefer env var if config value looks like ${VAR}
    fn resolve_env_string(value: Option<String>, env_key: &str) -> Option<String> {
        if let Some(ref v) = value {
            if let Some(var_name) = v.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
                if let Ok(env_val) = std::env::var(var_name) {
                    return Some(env_val);
                }
                // Unresolved placeholder is not a value
                return std::env::var(env_key).ok();
            }
            return value;
        }
        std::env::var(env_key).ok()
    }

    /// Load .env file into environment variables using dotenvy
    fn load_dotenv() {
        if dotenvy::dotenv().is_err() {
            let _ = dotenvy::from_filename("../.env");
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_dotenv();

        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!(
                "failed to read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_yaml_str(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let yaml: YamlConfig = if content.trim().is_empty() {
            YamlConfig::default()
        } else {
            serde_yaml::from_str(content)?
        };

        let bot = yaml.bot.unwrap_or_default();
        let links = yaml.links.unwrap_or_default();
        let logging = yaml.logging.unwrap_or_default();

        let config = Self {
            token: Self::resolve_env_string(bot.token, TOKEN_ENV)
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
            prefix: Self::resolve_env_string(bot.prefix, PREFIX_ENV)
                .unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            osticket_url: links
                .osticket
                .unwrap_or_else(|| DEFAULT_OSTICKET_URL.to_string()),
            wiki_url: links.wiki.unwrap_or_else(|| DEFAULT_WIKI_URL.to_string()),
            info: yaml.info.unwrap_or_default(),
            log_level: Self::resolve_env_string(logging.level, LOG_LEVEL_ENV)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Create config with built-in defaults (fallback)
    pub fn defaults() -> Self {
        Self {
            token: None,
            prefix: DEFAULT_PREFIX.to_string(),
            osticket_url: DEFAULT_OSTICKET_URL.to_string(),
            wiki_url: DEFAULT_WIKI_URL.to_string(),
            info: InfoCard::default(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }

    /// Check invariants that the command parser relies on
    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            return Err(Error::Config("command prefix must not be empty".into()));
        }
        if self.prefix.chars().any(char::is_whitespace) {
            return Err(Error::Config(format!(
                "command prefix {:?} must not contain whitespace",
                self.prefix
            )));
        }
        Ok(())
    }
}

/// Pick the bot token: explicit flag, then token file, then config.
///
/// Every candidate is trimmed; blank candidates are skipped.
pub fn resolve_token(
    flag: Option<&str>,
    file: Option<&Path>,
    configured: Option<&str>,
) -> Result<String> {
    if let Some(token) = flag.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(token.to_string());
    }

    if let Some(path) = file {
        let content = fs::read_to_string(path)?;
        let token = content.trim();
        if !token.is_empty() {
            return Ok(token.to_string());
        }
    }

    configured
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or(Error::TokenMissing)
}
