//! Dual-target notification sink.
//!
//! Every event lands in the process log; ERROR and WARNING events are
//! additionally relayed, best-effort, to an already-resolved destination.
//! The sink deliberately has no access to the token codec: re-decoding a
//! possibly-invalid token from inside failure handling is the recursion
//! hazard this type exists to rule out.

use std::{fmt, sync::Arc};

use crate::{
    context,
    domain::Destination,
    format::escape_html,
    port::MessagingPort,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Info => write!(f, "INFO"),
        }
    }
}

pub struct NotificationSink {
    port: Arc<dyn MessagingPort>,
    /// Global operational destination, resolved once at startup. Used when a
    /// caller has no request-local destination to hand over.
    operational: Option<Destination>,
}

impl NotificationSink {
    pub fn new(port: Arc<dyn MessagingPort>, operational: Option<Destination>) -> Self {
        Self { port, operational }
    }

    /// Log `text`, then relay ERROR/WARNING events to `dest` (falling back
    /// to the configured operational destination).
    ///
    /// `dest` must already be resolved; the sink never decodes tokens. A
    /// relay failure is logged locally and swallowed, so notifying can never
    /// raise from inside error handling.
    pub async fn notify(&self, severity: Severity, text: &str, dest: Option<&Destination>) {
        match severity {
            Severity::Error => tracing::error!("{text}"),
            Severity::Warning => tracing::warn!("{text}"),
            Severity::Info => tracing::info!("{text}"),
        }

        if severity == Severity::Info {
            return;
        }
        let Some(dest) = dest.or(self.operational.as_ref()) else {
            return;
        };

        let html = format!("<b>[{severity}]</b> {}", escape_html(text));
        let port = self.port.clone();
        let dest = dest.clone();
        if let Err(e) = context::run_isolated(async move { port.send(&dest, &html).await }).await
        {
            tracing::warn!("notification relay failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ChatId, MessageId, MessageRef},
        errors::Error,
        Result,
    };
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct RecordingPort {
        sent: Mutex<Vec<(Destination, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl MessagingPort for RecordingPort {
        async fn send(&self, dest: &Destination, html: &str) -> Result<MessageRef> {
            if self.fail {
                return Err(Error::Backend("down".into()));
            }
            self.sent.lock().await.push((dest.clone(), html.to_string()));
            Ok(MessageRef {
                chat_id: dest.chat,
                message_id: MessageId(1),
            })
        }

        async fn edit(&self, _msg: MessageRef, _html: &str) -> Result<()> {
            Ok(())
        }

        async fn delete(&self, _msg: MessageRef) -> Result<()> {
            Ok(())
        }

        async fn fetch(&self, _msg: MessageRef) -> Result<String> {
            Err(Error::Unsupported("no fetch".into()))
        }
    }

    fn dest(chat: i64) -> Destination {
        Destination::chat_wide(ChatId(chat))
    }

    #[tokio::test]
    async fn relays_errors_to_request_destination() {
        let port = Arc::new(RecordingPort::default());
        let sink = NotificationSink::new(port.clone(), Some(dest(1)));

        sink.notify(Severity::Error, "send failed", Some(&dest(2))).await;

        let sent = port.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, dest(2));
        assert_eq!(sent[0].1, "<b>[ERROR]</b> send failed");
    }

    #[tokio::test]
    async fn falls_back_to_operational_destination() {
        let port = Arc::new(RecordingPort::default());
        let sink = NotificationSink::new(port.clone(), Some(dest(9)));

        sink.notify(Severity::Warning, "odd payload", None).await;

        let sent = port.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, dest(9));
    }

    #[tokio::test]
    async fn info_and_unconfigured_events_stay_local() {
        let port = Arc::new(RecordingPort::default());
        let sink = NotificationSink::new(port.clone(), None);

        sink.notify(Severity::Info, "started", Some(&dest(3))).await;
        sink.notify(Severity::Error, "no target", None).await;

        assert!(port.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn relay_failure_is_swallowed() {
        let port = Arc::new(RecordingPort {
            fail: true,
            ..Default::default()
        });
        let sink = NotificationSink::new(port, Some(dest(1)));

        // Must not panic or propagate.
        sink.notify(Severity::Error, "backend down", None).await;
    }
}
