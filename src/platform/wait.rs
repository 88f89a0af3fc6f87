// ABOUTME: Bounded polling of platform operations with exponential backoff.
// ABOUTME: Cancellable via CancelToken; transient read errors retry in-loop.

use super::api::OperationPoller;
use super::error::PlatformError;
use super::types::OperationStatus;
use crate::cancel::CancelToken;
use crate::types::{OperationId, RevisionId};
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

/// Tuning for the operation-polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Delay before the first re-poll. Doubles each round.
    pub interval: Duration,
    /// Upper bound on the backed-off delay.
    pub max_interval: Duration,
    /// Overall bound on the wait. Exceeding it is a `Timeout`.
    pub timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_interval: Duration::from_secs(15),
            timeout: Duration::from_secs(600),
        }
    }
}

/// Why a polling wait ended without the operation succeeding.
#[derive(Debug, Error)]
pub enum WaitError {
    #[error("operation {operation} did not complete within {waited:?}")]
    Timeout {
        operation: OperationId,
        waited: Duration,
    },

    #[error("wait for operation {operation} was cancelled")]
    Cancelled { operation: OperationId },

    #[error("operation {operation} failed: {message}")]
    OperationFailed {
        operation: OperationId,
        message: String,
    },

    #[error(transparent)]
    Platform(PlatformError),
}

/// Poll an operation until it reaches a terminal status.
///
/// Returns the revision the operation produced, if any. Transient platform
/// errors during a poll are retried on the next tick (the read is free of
/// side effects); non-transient errors end the wait. Cancellation is
/// observed between polls and interrupts the backoff sleep promptly.
pub async fn wait_for_operation<P: OperationPoller + ?Sized>(
    platform: &P,
    op: &OperationId,
    settings: &PollSettings,
    cancel: &CancelToken,
) -> Result<Option<RevisionId>, WaitError> {
    let started = Instant::now();
    let deadline = started + settings.timeout;
    let mut delay = settings.interval;

    loop {
        if cancel.is_cancelled() {
            return Err(WaitError::Cancelled {
                operation: op.clone(),
            });
        }

        match platform.poll_operation(op).await {
            Ok(OperationStatus::Succeeded { revision }) => return Ok(revision),
            Ok(OperationStatus::Failed { message }) => {
                return Err(WaitError::OperationFailed {
                    operation: op.clone(),
                    message,
                });
            }
            Ok(OperationStatus::Running) => {
                tracing::debug!(operation = %op, "operation still running");
            }
            Err(e) if e.is_transient() => {
                tracing::debug!(operation = %op, error = %e, "transient poll failure, will retry");
            }
            Err(e) => return Err(WaitError::Platform(e)),
        }

        if Instant::now() + delay >= deadline {
            return Err(WaitError::Timeout {
                operation: op.clone(),
                waited: started.elapsed(),
            });
        }

        tokio::select! {
            _ = cancel.cancelled() => {
                return Err(WaitError::Cancelled {
                    operation: op.clone(),
                });
            }
            _ = tokio::time::sleep(delay) => {}
        }

        delay = (delay * 2).min(settings.max_interval);
    }
}
