//! The five relay routes.
//!
//! Every handler runs the same validation ladder: decode the token (fail
//! closed), check numeric path arguments, check payload shape, then make
//! exactly one backend call inside an isolated execution context. Wrong-verb
//! requests never reach a handler; axum's method routing answers 405.

use axum::{
    body::Bytes,
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};

use trelay_core::{
    context,
    domain::{Destination, MessageId, MessageRef},
    format,
    notify::Severity,
    token, Error,
};

use crate::{reply::ApiError, state::AppState};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/post/{token}", post(send_message))
        .route("/edit/{token}/{message_id}", post(edit_message))
        .route("/delete/{token}/{message_id}", post(delete_message))
        .route("/get/{token}/{message_id}", get(fetch_message))
        .route("/log/{level}/{token}", post(relay_log))
        .with_state(state)
}

async fn send_message(
    State(state): State<AppState>,
    Path(token): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let dest = decode_token(&state, &token).await?;
    let html = render_payload(&state, &dest, &body).await?;

    let msg = backend_call(&state, "send", {
        let port = state.port.clone();
        let dest = dest.clone();
        async move { port.send(&dest, &html).await }
    })
    .await?;

    Ok(Json(json!({ "message_id": msg.message_id.0 })))
}

async fn edit_message(
    State(state): State<AppState>,
    Path((token, message_id)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let dest = decode_token(&state, &token).await?;
    let message_id = parse_message_id(&message_id)?;
    let html = render_payload(&state, &dest, &body).await?;

    let msg = MessageRef {
        chat_id: dest.chat,
        message_id,
    };
    backend_call(&state, "edit", {
        let port = state.port.clone();
        async move { port.edit(msg, &html).await }
    })
    .await?;

    Ok(Json(json!({ "success": "message edited" })))
}

async fn delete_message(
    State(state): State<AppState>,
    Path((token, message_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let dest = decode_token(&state, &token).await?;
    let message_id = parse_message_id(&message_id)?;

    let msg = MessageRef {
        chat_id: dest.chat,
        message_id,
    };
    backend_call(&state, "delete", {
        let port = state.port.clone();
        async move { port.delete(msg).await }
    })
    .await?;

    Ok(Json(json!({ "success": "message deleted" })))
}

async fn fetch_message(
    State(state): State<AppState>,
    Path((token, message_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let dest = decode_token(&state, &token).await?;
    let message_id = parse_message_id(&message_id)?;

    let msg = MessageRef {
        chat_id: dest.chat,
        message_id,
    };
    // Known capability gap: the adapter answers Unsupported rather than
    // fabricating content. No sink traffic for it; nothing went wrong.
    let text = context::run_isolated({
        let port = state.port.clone();
        async move { port.fetch(msg).await }
    })
    .await?;

    Ok(Json(json!({ "text": text })))
}

async fn relay_log(
    State(state): State<AppState>,
    Path((level, token)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let dest = decode_token(&state, &token).await?;
    if level.trim().is_empty() {
        return Err(Error::Validation("empty log level".to_string()).into());
    }
    let rendered = render_payload(&state, &dest, &body).await?;

    // A log line is an ordinary send with a level label; it echoes into the
    // originating thread when the token carries one.
    let label = format::escape_html(&level.trim().to_uppercase());
    let html = format!("<b>[{label}]</b>\n{rendered}");

    backend_call(&state, "log", {
        let port = state.port.clone();
        let dest = dest.clone();
        async move { port.send(&dest, &html).await }
    })
    .await?;

    Ok(Json(json!({ "success": "log relayed" })))
}

/// Decode the routing token, failing closed. On failure the token names no
/// destination, so only the globally configured operational one is safe for
/// the rejection notice — the sink never re-decodes.
async fn decode_token(state: &AppState, token: &str) -> Result<Destination, ApiError> {
    match token::decode(token) {
        Ok(dest) => Ok(dest),
        Err(e) => {
            state
                .sink
                .notify(Severity::Warning, &format!("rejected request: {e}"), None)
                .await;
            Err(e.into())
        }
    }
}

fn parse_message_id(raw: &str) -> Result<MessageId, ApiError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::Validation(format!(
            "message id must be digits only, got {raw:?}"
        ))
        .into());
    }
    raw.parse::<i32>()
        .map(MessageId)
        .map_err(|_| Error::Validation(format!("message id out of range: {raw}")).into())
}

/// Parse and render the request payload. An empty rendering is reported as a
/// diagnostic to the request's own destination, then rejected as validation.
async fn render_payload(
    state: &AppState,
    dest: &Destination,
    body: &Bytes,
) -> Result<String, ApiError> {
    let payload: Value = serde_json::from_slice(body)
        .map_err(|e| Error::Validation(format!("invalid JSON payload: {e}")))?;

    let html = format::render(&payload);
    if html.is_empty() {
        state
            .sink
            .notify(
                Severity::Warning,
                "empty payload: nothing to relay",
                Some(dest),
            )
            .await;
        return Err(Error::Validation("payload produced no content".to_string()).into());
    }
    Ok(html)
}

/// One backend call in a fresh execution context, with failures logged
/// through the sink before they are translated to a response.
async fn backend_call<T, F>(state: &AppState, op: &str, call: F) -> Result<T, ApiError>
where
    F: std::future::Future<Output = trelay_core::Result<T>> + Send + 'static,
    T: Send + 'static,
{
    tracing::debug!("dispatching {op}");
    match context::run_isolated(call).await {
        Ok(v) => Ok(v),
        Err(e) => {
            let severity = match &e {
                Error::AlreadyAbsent(_) => Severity::Warning,
                _ => Severity::Error,
            };
            state
                .sink
                .notify(severity, &format!("{op} failed: {e}"), None)
                .await;
            Err(e.into())
        }
    }
}
