/// Core error type for the relay.
///
/// Adapter crates map their specific failures into this taxonomy so the HTTP
/// layer can translate every outcome to a stable response shape (status code
/// plus a `kind` discriminator).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("config error: {0}")]
    Config(String),

    /// Delete/edit target is already gone. Surfaced as a warning, not a
    /// failure, so delete stays idempotent.
    #[error("already absent: {0}")]
    AlreadyAbsent(String),

    /// The backend refused because the message aged past its mutation
    /// window. No retry can fix this, so it is kept distinct from
    /// `Backend`.
    #[error("retention window exceeded: {0}")]
    RetentionWindow(String),

    /// The backend offers no capability for this operation at all.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Stable discriminator used in response bodies. Status codes overlap
    /// across kinds (retention-window errors answer 200), so this string is
    /// what callers branch on.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation",
            Error::Config(_) => "config",
            Error::AlreadyAbsent(_) => "already_absent",
            Error::RetentionWindow(_) => "retention_window",
            Error::Unsupported(_) => "unsupported",
            Error::Backend(_) => "backend",
            Error::Io(_) => "io",
            Error::Json(_) => "json",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
