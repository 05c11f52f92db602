//! Guaranteed release of the browser on every exit path.

use std::future::Future;
use std::panic::AssertUnwindSafe;

use anyhow::Result;
use futures_util::FutureExt as _;

use crate::application::ports::Releasable;

/// Drive `work` to completion, then release `resource` exactly once.
///
/// Release happens after success, after an error, and after a panic inside
/// `work`; a panic is re-raised once the resource is released. A release
/// failure is logged and only surfaces as the result when `work` succeeded.
///
/// # Errors
///
/// Returns the error of `work`, or the release error if `work` succeeded.
pub async fn run_then_release<R, T, F>(resource: &R, work: F) -> Result<T>
where
    R: Releasable,
    F: Future<Output = Result<T>>,
{
    let outcome = AssertUnwindSafe(work).catch_unwind().await;
    let released = resource.release().await;

    match outcome {
        Err(panic) => {
            if let Err(e) = released {
                tracing::error!(error = %format!("{e:#}"), "release after panic failed");
            }
            std::panic::resume_unwind(panic)
        }
        Ok(result) => match (result, released) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) => Err(e.context("releasing browser")),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(release_err)) => {
                tracing::error!(error = %format!("{release_err:#}"), "release after failure failed");
                Err(e)
            }
        },
    }
}
