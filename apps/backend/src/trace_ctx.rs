//! Task-local trace id for the request being served.
//!
//! `RequestTrace` establishes the scope; error rendering and DB error mapping
//! read it so problem responses and logs share one id.

use std::future::Future;

use tokio::task_local;

const UNKNOWN: &str = "unknown";

task_local! {
    static TRACE_ID: String;
}

/// Trace id of the current task, if one is in scope.
pub fn current() -> Option<String> {
    TRACE_ID.try_with(|id| id.clone()).ok()
}

/// Trace id of the current task, or `"unknown"` outside a request.
pub fn trace_id() -> String {
    current().unwrap_or_else(|| UNKNOWN.to_string())
}

/// Run `future` with `trace_id` in scope.
pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: Future<Output = R>,
{
    TRACE_ID.scope(trace_id, future).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_outside_scope() {
        assert_eq!(trace_id(), "unknown");
        assert!(current().is_none());
    }

    #[tokio::test]
    async fn scoped_and_restored() {
        let out = with_trace_id("abc-123".to_string(), async {
            assert_eq!(trace_id(), "abc-123");
            let inner = with_trace_id("inner".to_string(), async { trace_id() }).await;
            assert_eq!(trace_id(), "abc-123");
            inner
        })
        .await;

        assert_eq!(out, "inner");
        assert_eq!(trace_id(), "unknown");
    }
}
