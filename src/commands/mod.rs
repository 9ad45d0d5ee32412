//! Chat commands understood by the bot
//!
//! A message is a command when it starts with the configured prefix
//! immediately followed by a command name, e.g. `!wiki`. Anything after the
//! name is ignored.

pub mod parse;
pub mod reply;

pub use parse::parse;
pub use reply::{reply, Reply};

/// Commands the bot answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatCommand {
    /// Link to the ticket system
    Osticket,
    /// Link to the wiki
    Wiki,
    /// Freshly generated barcode
    Barcode,
    /// The info card
    Info,
    /// List of commands
    Help,
}

impl ChatCommand {
    pub const ALL: [ChatCommand; 5] = [
        ChatCommand::Osticket,
        ChatCommand::Wiki,
        ChatCommand::Barcode,
        ChatCommand::Info,
        ChatCommand::Help,
    ];

    /// Name as typed after the prefix. Also used as the metrics label.
    pub fn name(&self) -> &'static str {
        match self {
            ChatCommand::Osticket => "osticket",
            ChatCommand::Wiki => "wiki",
            ChatCommand::Barcode => "barcode",
            ChatCommand::Info => "info",
            ChatCommand::Help => "help",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ChatCommand::Osticket => "link to the ticket system",
            ChatCommand::Wiki => "link to the wiki",
            ChatCommand::Barcode => "generate a barcode",
            ChatCommand::Info => "about this bot",
            ChatCommand::Help => "show this list",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|cmd| cmd.name().eq_ignore_ascii_case(name))
    }
}
