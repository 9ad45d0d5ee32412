//! Prefix matching for incoming message text

use super::ChatCommand;

/// Parse `text` as a command introduced by `prefix`.
///
/// Leading whitespace is skipped. The command word runs up to the first
/// whitespace; a trailing `@botname` (Telegram's addressed-command form) is
/// dropped before lookup. Returns `None` for plain chatter and unknown
/// commands.
pub fn parse(text: &str, prefix: &str) -> Option<ChatCommand> {
    if prefix.is_empty() {
        return None;
    }
    let rest = text.trim_start().strip_prefix(prefix)?;
    let word = rest.split_whitespace().next()?;
    // the word must follow the prefix directly: "! wiki" is not a command
    if !rest.starts_with(word) {
        return None;
    }
    let name = word.split('@').next().unwrap_or(word);
    ChatCommand::from_name(name)
}
