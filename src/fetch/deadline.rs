//! Timeout enforcement for outbound calls.
//!
//! # Responsibilities
//! - Wrap one upstream call with a hard wall-clock deadline
//! - Own the cancellation token handed to the call
//! - Cancel the call cleanly when the deadline fires
//!
//! # Design Decisions
//! - Uses Tokio's timer; the sleep is dropped with the wrapper on every path
//! - The token is cancelled on exit through a drop guard, success included
//! - Timeout errors are distinct from other errors

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::fetch::FetchError;

/// Run `operation` under a deadline.
///
/// `operation` receives a token that is cancelled when the deadline passes and,
/// in any case, when this function returns. If the deadline wins, the operation
/// future is dropped and [`FetchError::Timeout`] is returned.
pub async fn with_deadline<F, Fut, T>(timeout: Duration, operation: F) -> Result<T, FetchError>
where
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let token = CancellationToken::new();
    let _dispose = token.clone().drop_guard();

    tokio::select! {
        result = operation(token.clone()) => result,
        _ = tokio::time::sleep(timeout) => {
            token.cancel();
            tracing::debug!(timeout_ms = timeout.as_millis() as u64, "Fetch deadline elapsed");
            Err(FetchError::Timeout(timeout))
        }
    }
}
