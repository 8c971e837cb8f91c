use async_trait::async_trait;

use crate::{
    domain::{Destination, MessageRef},
    Result,
};

/// Chat-backend port.
///
/// Telegram is the first implementation; the shape is small enough that other
/// backends can fit behind it. Implementations map their own failures into
/// the core taxonomy (`AlreadyAbsent`, `RetentionWindow`, `Unsupported`,
/// `Backend`).
#[async_trait]
pub trait MessagingPort: Send + Sync {
    /// Send `html` to the destination, honoring its effective thread.
    async fn send(&self, dest: &Destination, html: &str) -> Result<MessageRef>;

    async fn edit(&self, msg: MessageRef, html: &str) -> Result<()>;

    async fn delete(&self, msg: MessageRef) -> Result<()>;

    /// Best-effort only; backends without a read-by-id primitive return
    /// `Error::Unsupported` instead of fabricating content.
    async fn fetch(&self, msg: MessageRef) -> Result<String>;
}
