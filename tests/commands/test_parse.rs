//! Tests for command parsing

use sark::commands::{parse, ChatCommand};

#[test]
fn test_parse_every_command_with_default_prefix() {
    for cmd in ChatCommand::ALL {
        let text = format!("!{}", cmd.name());
        assert_eq!(parse(&text, "!"), Some(cmd));
    }
}

#[test]
fn test_parse_with_custom_prefix() {
    assert_eq!(parse(">>info", ">>"), Some(ChatCommand::Info));
    assert_eq!(parse(">info", ">>"), None);
}

#[test]
fn test_parse_ignores_chatter() {
    assert_eq!(parse("what is the wiki url?", "!"), None);
    assert_eq!(parse("!!wiki", "!"), None);
}
