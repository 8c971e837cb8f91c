//! Telegram adapter (teloxide).
//!
//! Implements the `trelay-core` MessagingPort over the Telegram Bot API and
//! classifies Bot API failures into the core taxonomy.

use async_trait::async_trait;

use teloxide::{prelude::*, types::ParseMode, ApiError, RequestError};

pub mod commands;

use trelay_core::{
    domain::{ChatId, Destination, MessageId, MessageRef},
    errors::Error,
    port::MessagingPort,
    Result,
};

#[derive(Clone)]
pub struct TelegramRelay {
    bot: Bot,
}

impl TelegramRelay {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    pub fn bot(&self) -> Bot {
        self.bot.clone()
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn tg_msg_id(message_id: MessageId) -> teloxide::types::MessageId {
        teloxide::types::MessageId(message_id.0)
    }
}

/// Map a Bot API failure into the core taxonomy.
///
/// "Can't be edited/deleted" is how Telegram reports the retention window
/// (48h for deletes by default); "not found" targets are already absent.
/// Everything else, flood-wait included, is a plain backend error — the
/// relay never retries a mutation against a stateful external system.
fn classify(e: RequestError) -> Error {
    match e {
        RequestError::Api(api) => match api {
            ApiError::MessageToDeleteNotFound
            | ApiError::MessageToEditNotFound
            | ApiError::MessageIdInvalid => Error::AlreadyAbsent(api.to_string()),
            // Editing twice with identical text is as idempotent as deleting
            // twice: a warning, not a failure.
            ApiError::MessageNotModified => Error::AlreadyAbsent(api.to_string()),
            ApiError::MessageCantBeDeleted | ApiError::MessageCantBeEdited => {
                Error::RetentionWindow(api.to_string())
            }
            ApiError::Unknown(text) => classify_unknown(text),
            other => Error::Backend(format!("telegram error: {other}")),
        },
        other => Error::Backend(format!("telegram error: {other}")),
    }
}

/// Telegram reports plenty of conditions only as free-text descriptions;
/// match the known ones before giving up.
fn classify_unknown(text: String) -> Error {
    let lower = text.to_lowercase();
    if lower.contains("not found") {
        return Error::AlreadyAbsent(text);
    }
    if lower.contains("can't be edited") || lower.contains("can't be deleted") {
        return Error::RetentionWindow(text);
    }
    Error::Backend(format!("telegram error: {text}"))
}

/// Parse the thread component of a destination into a Bot API topic id.
fn thread_id(dest: &Destination) -> Result<Option<i32>> {
    match dest.effective_thread() {
        None => Ok(None),
        Some(t) => t
            .parse::<i32>()
            .map(Some)
            .map_err(|_| Error::Validation(format!("thread id must be numeric, got {t:?}"))),
    }
}

#[async_trait]
impl MessagingPort for TelegramRelay {
    async fn send(&self, dest: &Destination, html: &str) -> Result<MessageRef> {
        let mut req = self
            .bot
            .send_message(Self::tg_chat(dest.chat), html.to_string())
            .parse_mode(ParseMode::Html);
        if let Some(topic) = thread_id(dest)? {
            req = req.message_thread_id(topic);
        }

        let msg = req.await.map_err(classify)?;
        Ok(MessageRef {
            chat_id: dest.chat,
            message_id: MessageId(msg.id.0),
        })
    }

    async fn edit(&self, msg: MessageRef, html: &str) -> Result<()> {
        self.bot
            .edit_message_text(
                Self::tg_chat(msg.chat_id),
                Self::tg_msg_id(msg.message_id),
                html.to_string(),
            )
            .parse_mode(ParseMode::Html)
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn delete(&self, msg: MessageRef) -> Result<()> {
        self.bot
            .delete_message(Self::tg_chat(msg.chat_id), Self::tg_msg_id(msg.message_id))
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn fetch(&self, _msg: MessageRef) -> Result<String> {
        // The Bot API offers no read-message-by-id call, and workarounds
        // (forwarding the message somewhere to read it back) are worse than
        // admitting the gap.
        Err(Error::Unsupported(
            "telegram bot api has no message retrieval call".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trelay_core::domain::GENERAL_THREAD;

    fn dest(chat: i64, thread: Option<&str>) -> Destination {
        Destination {
            chat: ChatId(chat),
            thread: thread.map(str::to_string),
        }
    }

    #[test]
    fn absent_targets_classify_as_warnings() {
        let e = classify(RequestError::Api(ApiError::MessageToDeleteNotFound));
        assert!(matches!(e, Error::AlreadyAbsent(_)));
        let e = classify(RequestError::Api(ApiError::MessageIdInvalid));
        assert!(matches!(e, Error::AlreadyAbsent(_)));
    }

    #[test]
    fn age_limit_classifies_as_retention_window() {
        let e = classify(RequestError::Api(ApiError::MessageCantBeDeleted));
        assert!(matches!(e, Error::RetentionWindow(_)));
        let e = classify(RequestError::Api(ApiError::MessageCantBeEdited));
        assert!(matches!(e, Error::RetentionWindow(_)));
    }

    #[test]
    fn unknown_descriptions_match_by_substring() {
        let e = classify_unknown("Bad Request: message to edit not found".into());
        assert!(matches!(e, Error::AlreadyAbsent(_)));
        let e = classify_unknown("Bad Request: message can't be deleted for everyone".into());
        assert!(matches!(e, Error::RetentionWindow(_)));
        let e = classify_unknown("Internal Server Error".into());
        assert!(matches!(e, Error::Backend(_)));
    }

    #[test]
    fn thread_parsing_resolves_sentinel_and_rejects_junk() {
        assert_eq!(thread_id(&dest(1, None)).unwrap(), None);
        assert_eq!(thread_id(&dest(1, Some(GENERAL_THREAD))).unwrap(), None);
        assert_eq!(thread_id(&dest(1, Some("42"))).unwrap(), Some(42));
        assert!(matches!(
            thread_id(&dest(1, Some("lobby"))),
            Err(Error::Validation(_))
        ));
    }
}
