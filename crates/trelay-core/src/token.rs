//! Routing-token codec.
//!
//! A token is URL-safe base64 of `"{chat}"` or `"{chat}:{thread}"`. Tokens
//! are self-describing; there is no server-side registry behind them.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use crate::{
    domain::{ChatId, Destination},
    errors::Error,
    Result,
};

/// Separates the chat component from the optional thread component in the
/// token plaintext. A thread value may therefore never contain it; decode
/// splits on the first occurrence only.
const THREAD_DELIMITER: char = ':';

/// Encode a destination into an opaque routing token.
///
/// `chat` must be numeric (a leading `-` is allowed). The thread component
/// is carried verbatim, including the `"general"` sentinel.
pub fn encode(chat: &str, thread: Option<&str>) -> Result<String> {
    let chat = chat.trim();
    validate_chat(chat)?;

    let plain = match thread {
        Some(t) => format!("{chat}{THREAD_DELIMITER}{t}"),
        None => chat.to_string(),
    };
    Ok(URL_SAFE_NO_PAD.encode(plain))
}

/// Decode a routing token back into a destination.
///
/// All-or-nothing: an empty, non-base64, non-UTF-8 or non-numeric-chat token
/// fails with `Error::Validation` and never yields a partial result. Padding
/// that a caller kept (or stripped) is tolerated either way.
pub fn decode(token: &str) -> Result<Destination> {
    let token = token.trim().trim_end_matches('=');
    if token.is_empty() {
        return Err(Error::Validation("empty routing token".to_string()));
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|e| Error::Validation(format!("malformed routing token: {e}")))?;
    let plain = String::from_utf8(bytes)
        .map_err(|_| Error::Validation("routing token is not valid UTF-8".to_string()))?;

    let (chat, thread) = match plain.split_once(THREAD_DELIMITER) {
        Some((c, t)) => (c, Some(t.to_string())),
        None => (plain.as_str(), None),
    };

    validate_chat(chat)?;
    let chat_id = chat
        .parse::<i64>()
        .map_err(|_| Error::Validation(format!("chat id out of range: {chat}")))?;

    Ok(Destination {
        chat: ChatId(chat_id),
        thread,
    })
}

fn validate_chat(chat: &str) -> Result<()> {
    let digits = chat.strip_prefix('-').unwrap_or(chat);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::Validation(format!(
            "chat id must be numeric, got {chat:?}"
        )));
    }
    Ok(())
}
