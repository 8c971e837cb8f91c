//! Error → HTTP response mapping.
//!
//! Status codes overlap across kinds (a retention-window refusal answers 200
//! just like an idempotent-delete warning), so every failure body carries a
//! stable `kind` discriminator alongside the `error`/`warning` text.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

use trelay_core::Error;

pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

#[derive(Serialize)]
struct FailureBody {
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = self.0.to_string();
        let kind = self.0.kind();

        let (status, warning) = match &self.0 {
            Error::Validation(_) => (StatusCode::BAD_REQUEST, false),
            // The target was already gone; for an idempotent operation that
            // is a warning, not a failure.
            Error::AlreadyAbsent(_) => (StatusCode::OK, true),
            // Actionable but unfixable: no retry exists once the backend's
            // mutation window has passed, so this is not a 5xx.
            Error::RetentionWindow(_) => (StatusCode::OK, false),
            Error::Unsupported(_) => (StatusCode::NOT_FOUND, false),
            Error::Backend(_) | Error::Config(_) | Error::Io(_) | Error::Json(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, false)
            }
        };

        let body = if warning {
            FailureBody {
                kind,
                error: None,
                warning: Some(detail),
            }
        } else {
            FailureBody {
                kind,
                error: Some(detail),
                warning: None,
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(e: Error) -> StatusCode {
        ApiError(e).into_response().status()
    }

    #[test]
    fn status_mapping() {
        assert_eq!(
            status_of(Error::Validation("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(Error::AlreadyAbsent("x".into())), StatusCode::OK);
        assert_eq!(
            status_of(Error::RetentionWindow("x".into())),
            StatusCode::OK
        );
        assert_eq!(
            status_of(Error::Unsupported("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(Error::Backend("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
