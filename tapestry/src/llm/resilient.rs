//! Resilient invocation: single-attempt fallback and non-cancelling wait notice.
//!
//! Two small combinators wrap every model call made by the graph:
//!
//! - [`invoke_with_fallback`]: run the main call once; on failure (or an empty
//!   result, by default) run the fallback once and return its outcome. The main
//!   call is never retried.
//! - [`invoke_with_wait_notice`]: race the call against a timer purely for
//!   observability; when the timer wins, surface a "still waiting" notice and
//!   keep awaiting the original call. Nothing is ever cancelled — a call that
//!   never resolves suspends its task, by design.

use std::future::Future;
use std::time::Duration;

use crate::error::AgentError;

/// Delay before surfacing the "still waiting" notice.
pub const DEFAULT_WAIT_NOTICE: Duration = Duration::from_secs(10);

/// Runs `main` once; on error — or an empty result when `empty_is_failure` —
/// logs and runs `fallback` once, returning the fallback's outcome (success or
/// failure). `main` is never retried.
pub async fn invoke_with_fallback<T, M, F, MFut, FFut>(
    main: M,
    fallback: F,
    empty_is_failure: bool,
) -> Result<Option<T>, AgentError>
where
    M: FnOnce() -> MFut,
    F: FnOnce() -> FFut,
    MFut: Future<Output = Result<Option<T>, AgentError>>,
    FFut: Future<Output = Result<Option<T>, AgentError>>,
{
    match main().await {
        Ok(Some(value)) => Ok(Some(value)),
        Ok(None) if empty_is_failure => {
            tracing::warn!("main inference returned an empty result, falling back");
            fallback().await
        }
        Ok(None) => Ok(None),
        Err(e) => {
            tracing::warn!(error = %e, "main inference failed, falling back");
            fallback().await
        }
    }
}

/// Awaits `call`, surfacing a "still waiting" notice if it has not resolved
/// after `notice_after`. The call's result is returned unchanged; the timer
/// never cancels or retries anything.
pub async fn invoke_with_wait_notice<T, Fut>(call: Fut, notice_after: Duration) -> T
where
    Fut: Future<Output = T>,
{
    tokio::pin!(call);
    tokio::select! {
        result = &mut call => return result,
        _ = tokio::time::sleep(notice_after) => {
            tracing::info!("still waiting for model response...");
        }
    }
    call.await
}
