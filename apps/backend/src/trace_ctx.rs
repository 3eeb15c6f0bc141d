//! Task-local trace context.
//!
//! Holds the current request's trace id so the error contract can stamp
//! `trace_id` into Problem Details bodies without threading the id through
//! every signature. Established by the `RequestTrace` middleware; anything
//! outside a request scope reads "unknown".

use std::cell::RefCell;

use tokio::task_local;

task_local! {
    static TRACE_ID: RefCell<Option<String>>;
}

/// Get the trace id for the current task, or "unknown" outside a request.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(|cell| {
            cell.borrow()
                .as_ref()
                .cloned()
                .unwrap_or_else(|| "unknown".to_string())
        })
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Run a future within a trace scope.
pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    TRACE_ID.scope(RefCell::new(Some(trace_id)), future).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn outside_a_scope_reads_unknown() {
        assert_eq!(trace_id(), "unknown");
    }

    #[tokio::test]
    async fn inside_a_scope_reads_the_set_id() {
        let result = with_trace_id("trace-abc".to_string(), async {
            assert_eq!(trace_id(), "trace-abc");
            "done"
        })
        .await;

        assert_eq!(result, "done");
        assert_eq!(trace_id(), "unknown");
    }
}
