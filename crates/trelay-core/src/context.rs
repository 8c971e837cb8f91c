//! Isolated per-request execution contexts.
//!
//! Every backend call runs on a task of its own, never on a shared or pooled
//! one. The task is spawned eagerly, so it runs to completion even if the
//! inbound connection drops and the request future is cancelled mid call; no
//! context leaks on abnormal client disconnect.

use std::future::Future;

use crate::{errors::Error, Result};

/// Run exactly one backend call inside a fresh single-use context.
///
/// The context is released on every exit path; a panic inside the call
/// surfaces as `Error::Backend`, never as an unhandled fault.
pub fn run_isolated<T, F>(call: F) -> impl Future<Output = Result<T>>
where
    F: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    let handle = tokio::spawn(call);
    async move {
        match handle.await {
            Ok(result) => result,
            Err(join) => Err(Error::Backend(format!("backend task failed: {join}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn passes_through_success() {
        let out = run_isolated(async { Ok(7) }).await.unwrap();
        assert_eq!(out, 7);
    }

    #[tokio::test]
    async fn passes_through_errors_unchanged() {
        let err = run_isolated::<(), _>(async { Err(Error::Unsupported("nope".into())) })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
    }

    #[tokio::test]
    async fn maps_panics_to_backend_errors() {
        let err = run_isolated::<(), _>(async { panic!("boom") })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Backend(_)));
    }

    #[tokio::test]
    async fn call_completes_after_caller_disconnects() {
        let (tx, rx) = tokio::sync::oneshot::channel::<u8>();

        let fut = run_isolated(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            let _ = tx.send(1);
            Ok(())
        });
        // Simulate a client disconnect: the request future is dropped before
        // the backend call finishes.
        drop(fut);

        let got = tokio::time::timeout(Duration::from_secs(1), rx)
            .await
            .expect("backend call should still run")
            .expect("sender must not be dropped unfired");
        assert_eq!(got, 1);
    }
}
