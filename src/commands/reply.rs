//! Building the answer for a parsed command

use crate::barcode::generate_barcode;
use crate::card::InfoCard;
use crate::config::BotConfig;

use super::ChatCommand;

/// What the bot sends back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Sent verbatim.
    Text(String),
    /// Sent as an HTML formatted message.
    Card(InfoCard),
}

impl Reply {
    /// Message body as it goes over the wire.
    pub fn body(&self) -> String {
        match self {
            Reply::Text(text) => text.clone(),
            Reply::Card(card) => card.to_html(),
        }
    }
}

/// Answer `command` using the links and card from `config`.
pub fn reply(command: ChatCommand, config: &BotConfig) -> Reply {
    match command {
        ChatCommand::Osticket => Reply::Text(config.osticket_url.clone()),
        ChatCommand::Wiki => Reply::Text(config.wiki_url.clone()),
        ChatCommand::Barcode => Reply::Text(generate_barcode()),
        ChatCommand::Info => Reply::Card(config.info.clone()),
        ChatCommand::Help => Reply::Text(help_text(&config.prefix)),
    }
}

fn help_text(prefix: &str) -> String {
    let mut lines = vec!["Commands:".to_string()];
    lines.extend(
        ChatCommand::ALL
            .iter()
            .map(|cmd| format!("{}{} - {}", prefix, cmd.name(), cmd.description())),
    );
    lines.join("\n")
}
