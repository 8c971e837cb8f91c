//! `/start` command poller.
//!
//! Replies with the relay endpoints for wherever the command was posted: a
//! send link bound to the current topic (or the default stream) plus the
//! chat-wide edit/delete/get/log links. Tokens are self-describing, so
//! nothing is remembered server-side about the links that were handed out.

use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*, types::ParseMode};

use trelay_core::{config::Config, domain::GENERAL_THREAD, format::escape_html, token, Result};

pub async fn run_polling(cfg: Arc<Config>, bot: Bot) -> anyhow::Result<()> {
    if let Ok(me) = bot.get_me().await {
        tracing::info!("relay bot started: @{}", me.username());
    }

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![cfg])
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_message(bot: Bot, msg: Message, cfg: Arc<Config>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let command = text.split_whitespace().next().unwrap_or_default();
    if command != "/start" && !command.starts_with("/start@") {
        return Ok(());
    }

    let menu = match relay_menu(&cfg.public_base_url, msg.chat.id.0, msg.thread_id) {
        Ok(menu) => menu,
        Err(e) => {
            // Chat ids are always numeric here, so this cannot fire.
            tracing::warn!("building relay links failed: {e}");
            return Ok(());
        }
    };

    let mut req = bot
        .send_message(msg.chat.id, menu)
        .parse_mode(ParseMode::Html);
    if let Some(topic) = msg.thread_id {
        req = req.message_thread_id(topic);
    }
    req.await?;

    Ok(())
}

/// Human-readable link menu for one chat/topic.
fn relay_menu(base_url: &str, chat_id: i64, thread_id: Option<i32>) -> Result<String> {
    let chat = chat_id.to_string();
    let thread = thread_id
        .map(|t| t.to_string())
        .unwrap_or_else(|| GENERAL_THREAD.to_string());

    let send_token = token::encode(&chat, Some(&thread))?;
    let chat_token = token::encode(&chat, None)?;

    let target = if thread_id.is_some() {
        format!("topic {thread}")
    } else {
        "the default stream".to_string()
    };

    Ok(format!(
        "<b>Relay endpoints for {target}:</b>\n\
         POST {base}/post/{send_token}\n\
         POST {base}/edit/{chat_token}/{{message_id}}\n\
         POST {base}/delete/{chat_token}/{{message_id}}\n\
         GET {base}/get/{chat_token}/{{message_id}}\n\
         POST {base}/log/{{level}}/{send_token}",
        base = escape_html(base_url),
    ))
}
