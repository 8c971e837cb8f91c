/// Telegram chat id (numeric, negative for groups/channels).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a backend message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// Sentinel thread component meaning "the chat's default stream".
pub const GENERAL_THREAD: &str = "general";

/// Where a relayed message is delivered: a chat plus an optional sub-thread.
///
/// The thread component is kept as the decoded string; it is parsed into a
/// numeric topic id only at the backend boundary, because the `"general"`
/// sentinel travels in the same token position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Destination {
    pub chat: ChatId,
    pub thread: Option<String>,
}

impl Destination {
    pub fn chat_wide(chat: ChatId) -> Self {
        Self { chat, thread: None }
    }

    /// The thread to address on send, with the `"general"` sentinel resolved
    /// to "no specific thread".
    pub fn effective_thread(&self) -> Option<&str> {
        self.thread
            .as_deref()
            .filter(|t| !t.is_empty() && *t != GENERAL_THREAD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_sentinel_means_default_stream() {
        let d = Destination {
            chat: ChatId(-100),
            thread: Some(GENERAL_THREAD.to_string()),
        };
        assert_eq!(d.effective_thread(), None);
    }

    #[test]
    fn concrete_thread_is_kept() {
        let d = Destination {
            chat: ChatId(-100),
            thread: Some("42".to_string()),
        };
        assert_eq!(d.effective_thread(), Some("42"));
    }
}
