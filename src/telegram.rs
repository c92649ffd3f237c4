//! Telegram transport binding
//!
//! The only module that knows about the messaging transport. It hands each
//! text message and its sender to the [`ConversationHandler`] and sends back
//! the single reply.

use std::sync::Arc;

use anyhow::Result;
use teloxide::{
    dispatching::{Dispatcher, UpdateFilterExt},
    dptree,
    error_handlers::LoggingErrorHandler,
    prelude::*,
    types::LinkPreviewOptions,
};
use tracing::{debug, error, info, warn};

use crate::auth::UserId;
use crate::config::BotConfig;
use crate::conversation::{ConversationHandler, Reply};

/// Run the long-polling dispatcher until ctrl-c
pub async fn run(config: &BotConfig, handler: ConversationHandler) -> Result<()> {
    let bot = Bot::new(config.require_token()?);

    match bot.get_me().await {
        Ok(me) => info!(username = %me.username(), "bot token verified"),
        Err(e) => warn!(error = %e, "could not verify bot token, polling anyway"),
    }

    let schema = Update::filter_message().endpoint(message_handler);

    info!("starting dispatcher with long polling");
    Dispatcher::builder(bot, schema)
        .dependencies(dptree::deps![Arc::new(handler)])
        .default_handler(|upd| async move {
            debug!(?upd, "unhandled update");
        })
        .error_handler(LoggingErrorHandler::with_custom_text("Error in message handler"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    warn!("dispatcher stopped");
    Ok(())
}

async fn message_handler(
    bot: Bot,
    msg: Message,
    handler: Arc<ConversationHandler>,
) -> ResponseResult<()> {
    let (Some(text), Some(sender)) = (msg.text(), msg.from.as_ref()) else {
        debug!(chat = msg.chat.id.0, "ignoring message without text or sender");
        return Ok(());
    };

    let requester = UserId(sender.id.0);
    debug!(%requester, chat = msg.chat.id.0, "message received");

    let Reply {
        text: reply_text,
        disable_link_preview,
    } = handler.handle(requester, text).await;

    let mut request = bot.send_message(msg.chat.id, reply_text);
    if disable_link_preview {
        request = request.link_preview_options(disabled_preview());
    }

    if let Err(e) = request.await {
        error!(%requester, error = %e, "failed to send reply");
        return Err(e);
    }
    Ok(())
}

fn disabled_preview() -> LinkPreviewOptions {
    LinkPreviewOptions {
        is_disabled: true,
        url: None,
        prefer_small_media: false,
        prefer_large_media: false,
        show_above_text: false,
    }
}
