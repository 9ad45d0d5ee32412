//! Tests for command replies

use sark::commands::{parse, reply, ChatCommand, Reply};
use sark::config::BotConfig;

#[test]
fn test_barcode_command_end_to_end() {
    let config = BotConfig::defaults();
    let command = parse("!barcode please", &config.prefix).unwrap();
    assert_eq!(command, ChatCommand::Barcode);

    let body = reply(command, &config).body();
    assert_eq!(body.len(), 12);
    assert!(body.bytes().all(|b| b.is_ascii_digit()));
}

#[test]
fn test_osticket_reply_is_the_url() {
    let config = BotConfig::defaults();
    assert_eq!(
        reply(ChatCommand::Osticket, &config),
        Reply::Text("https://osticket.at.freegeekarkansas.org/".into())
    );
}

#[test]
fn test_info_reply_renders_html() {
    let config = BotConfig::defaults();
    let body = reply(ChatCommand::Info, &config).body();
    assert!(body.starts_with("<b>"));
    assert!(body.contains(&config.info.title));
}
