//! Cancellation plumbing.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use sqsx_core::error::{Result, SqsxError};

/// Race `fut` against `cancel`.
///
/// The token is checked first, so a token that is already cancelled never
/// polls `fut` and the collaborator call is never issued.
pub async fn run_cancellable<T, F>(cancel: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(SqsxError::Cancelled),
        res = fut => res,
    }
}
