//! Update endpoints for both bot variants.

use crate::commands::{self, CheckCommand, ManualCommand};
use crate::settings::BotSettings;
use maps_scraper::{chunk_blocks, Scraper, StatusReporter};
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::MessageId;
use tracing::{debug, info};

/// Everything the endpoints share, built once at startup.
pub struct AppState {
    pub settings: BotSettings,
    /// Present for the automated variant only.
    pub scraper: Option<Scraper>,
}

impl AppState {
    /// Outbound messages for one `/check` reply.
    pub fn reply_chunks(&self, blocks: &[String]) -> Vec<String> {
        chunk_blocks(blocks, self.settings.max_message_len)
    }
}

/// What the manual variant does with a free-text message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relay {
    UnknownCommand,
    Forward(ChatId),
    Keep,
}

fn relay_action(text: &str, relay_chat_id: Option<i64>) -> Relay {
    if text.starts_with('/') {
        return Relay::UnknownCommand;
    }
    match relay_chat_id {
        Some(id) => Relay::Forward(ChatId(id)),
        None => Relay::Keep,
    }
}

/// Edits one status message in place. Failed edits (message deleted, text
/// unchanged, rate limit) are dropped.
pub struct TelegramStatus {
    bot: Bot,
    chat_id: ChatId,
    message_id: MessageId,
}

impl TelegramStatus {
    pub fn new(bot: Bot, chat_id: ChatId, message_id: MessageId) -> Self {
        Self {
            bot,
            chat_id,
            message_id,
        }
    }
}

impl StatusReporter for TelegramStatus {
    async fn report(&self, status: &str) {
        let text = commands::status_text(status);
        if let Err(e) = self
            .bot
            .edit_message_text(self.chat_id, self.message_id, text)
            .await
        {
            debug!("Status update dropped: {}", e);
        }
    }
}

pub async fn manual_command(bot: Bot, msg: Message, cmd: ManualCommand) -> ResponseResult<()> {
    info!("/{:?} from chat {}", cmd, msg.chat.id);
    bot.send_message(msg.chat.id, cmd.reply()).await?;
    Ok(())
}

pub async fn check_command(
    bot: Bot,
    msg: Message,
    cmd: CheckCommand,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    info!("/{:?} from chat {}", cmd, msg.chat.id);
    match cmd.reply() {
        Some(text) => {
            bot.send_message(msg.chat.id, text).await?;
        }
        None => run_check(&bot, msg.chat.id, &state).await?,
    }
    Ok(())
}

async fn run_check(bot: &Bot, chat_id: ChatId, state: &AppState) -> ResponseResult<()> {
    let Some(ref scraper) = state.scraper else {
        bot.send_message(chat_id, commands::UNKNOWN_COMMAND).await?;
        return Ok(());
    };

    let status_msg = bot.send_message(chat_id, commands::CHECKING_LABEL).await?;
    let status = TelegramStatus::new(bot.clone(), chat_id, status_msg.id);

    let blocks = scraper.check(&status).await;
    let chunks = state.reply_chunks(&blocks);
    info!("Check for chat {} done: {} message(s)", chat_id, chunks.len());

    for chunk in chunks {
        bot.send_message(chat_id, chunk).await?;
    }
    Ok(())
}

/// Manual variant: any non-command text is passed on as-is.
pub async fn relay_text(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    match relay_action(text, state.settings.relay_chat_id) {
        Relay::UnknownCommand => {
            bot.send_message(msg.chat.id, commands::UNKNOWN_COMMAND).await?;
        }
        Relay::Forward(target) => {
            info!("Relaying message from chat {} to {}", msg.chat.id, target);
            bot.forward_message(target, msg.chat.id, msg.id).await?;
            bot.send_message(msg.chat.id, commands::RELAYED).await?;
        }
        Relay::Keep => {
            debug!("No relay chat configured, message from {} kept", msg.chat.id);
            bot.send_message(msg.chat.id, commands::RECEIVED).await?;
        }
    }
    Ok(())
}

/// Automated variant: anything that is not a known command.
pub async fn unknown_text(bot: Bot, msg: Message) -> ResponseResult<()> {
    if msg.text().is_some() {
        bot.send_message(msg.chat.id, commands::UNKNOWN_COMMAND).await?;
    }
    Ok(())
}
