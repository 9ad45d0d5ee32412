//! Telegram session and message dispatch

use std::sync::Arc;

use teloxide::dispatching::UpdateFilterExt;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::{Message, ParseMode};
use tracing::{debug, info};

use crate::commands::{self, ChatCommand, Reply};
use crate::config::BotConfig;
use crate::error::Result;
use crate::metrics::{self, CommandTimer};

/// Decide what to answer to a message, if anything.
///
/// Messages from other bots and messages without text are ignored.
pub fn answer_for(
    text: Option<&str>,
    from_bot: bool,
    config: &BotConfig,
) -> Option<(ChatCommand, Reply)> {
    if from_bot {
        return None;
    }
    let command = commands::parse(text?, &config.prefix)?;
    Some((command, commands::reply(command, config)))
}

async fn handle_message(bot: Bot, msg: Message, config: Arc<BotConfig>) -> ResponseResult<()> {
    let from_bot = msg.from().map(|user| user.is_bot).unwrap_or(false);
    let Some((command, reply)) = answer_for(msg.text(), from_bot, &config) else {
        metrics::record_ignored_message();
        return Ok(());
    };

    info!(
        command = command.name(),
        chat_id = msg.chat.id.0,
        "Handling command"
    );
    let timer = CommandTimer::start(command);

    match reply {
        Reply::Text(text) => {
            bot.send_message(msg.chat.id, text).await?;
        }
        Reply::Card(card) => {
            bot.send_message(msg.chat.id, card.to_html())
                .parse_mode(ParseMode::Html)
                .await?;
        }
    }

    timer.finish(true);
    debug!(command = command.name(), "Replied to command");
    Ok(())
}

/// Connect with `token` and answer commands until Ctrl-C.
pub async fn run(token: String, config: BotConfig) -> Result<()> {
    let bot = Bot::new(token);

    let me = bot.get_me().await?;
    info!(
        username = %me.username(),
        id = me.user.id.0,
        prefix = %config.prefix,
        "We're in, sweet!"
    );

    let config = Arc::new(config);

    Dispatcher::builder(bot, Update::filter_message().endpoint(handle_message))
        .dependencies(dptree::deps![config])
        .default_handler(|_| async {})
        .error_handler(LoggingErrorHandler::with_custom_text(
            "Error while handling a message",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Dispatcher stopped");
    Ok(())
}
