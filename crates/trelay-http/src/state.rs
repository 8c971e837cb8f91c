use std::sync::Arc;

use trelay_core::{notify::NotificationSink, port::MessagingPort};

/// Shared app state. Holds only read-only handles; nothing here is mutated
/// between requests.
#[derive(Clone)]
pub struct AppState {
    pub port: Arc<dyn MessagingPort>,
    pub sink: Arc<NotificationSink>,
}
