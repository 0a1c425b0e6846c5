//! Bounded immediate retry for flaky mutations.

use std::future::Future;

use crate::error::Result;

/// Run `operation` until it succeeds or `max_attempts` attempts have failed.
///
/// Every error is treated as retryable and the next attempt starts
/// immediately. The last error is returned once attempts run out. A
/// `max_attempts` of zero still runs the operation once.
///
/// Dropping the returned future cancels the loop at its current attempt.
///
/// # Errors
///
/// Returns the error of the final attempt.
pub async fn with_retry<T, F, Fut>(max_attempts: u32, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt >= max_attempts => {
                tracing::warn!(attempt, max_attempts, error = %err, "giving up after final attempt");
                return Err(err);
            }
            Err(err) => {
                tracing::warn!(attempt, max_attempts, error = %err, "attempt failed, retrying");
                attempt += 1;
            }
        }
    }
}
