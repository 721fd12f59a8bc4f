//! Shared utilities for the deliberation stages.
//!
//! Cancellation checks and the timeout/cancellation wrapper every single
//! collaborator call goes through.

use crate::ports::collaborators::CollaboratorError;
use crate::ports::progress::ProgressNotifier;
use crate::use_cases::run_deliberation::RunDeliberationError;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Per-round call settings shared by every stage.
pub(crate) struct StageEnv<'a> {
    pub timeout: Option<Duration>,
    pub token: &'a Option<CancellationToken>,
    pub progress: &'a dyn ProgressNotifier,
}

/// Check if cancellation has been requested.
pub(crate) fn check_cancelled(token: &Option<CancellationToken>) -> Result<(), RunDeliberationError> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(RunDeliberationError::Cancelled);
    }
    Ok(())
}

/// Apply the per-call timeout; an elapsed call becomes [`CollaboratorError::Timeout`].
pub(crate) async fn with_timeout<T>(
    timeout: Option<Duration>,
    call: impl Future<Output = Result<T, CollaboratorError>>,
) -> Result<T, CollaboratorError> {
    match timeout {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(CollaboratorError::Timeout(limit)),
        },
        None => call.await,
    }
}

/// Run one collaborator call with timeout and cancellation support.
pub(crate) async fn call_collaborator<T>(
    timeout: Option<Duration>,
    token: &Option<CancellationToken>,
    call: impl Future<Output = Result<T, CollaboratorError>>,
) -> Result<T, CollaboratorError> {
    let timed = with_timeout(timeout, call);
    if let Some(token) = token {
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(CollaboratorError::Cancelled),
            result = timed => result,
        }
    } else {
        timed.await
    }
}

/// The session error for a collaborator error that must not be degraded.
///
/// Quota exhaustion and cancellation end the session; every other failure
/// is handled by the calling stage's fallback and yields `None`.
pub(crate) fn fatal_error(e: &CollaboratorError) -> Option<RunDeliberationError> {
    match e {
        CollaboratorError::QuotaExhausted(msg) => {
            Some(RunDeliberationError::QuotaExhausted(msg.clone()))
        }
        CollaboratorError::Cancelled => Some(RunDeliberationError::Cancelled),
        _ => None,
    }
}
