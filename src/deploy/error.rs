// ABOUTME: Error taxonomy for deployment operations.
// ABOUTME: Separates local validation, transient, terminal, and cancellation.

use super::spec::SpecError;
use crate::platform::PlatformError;
use crate::types::ServiceName;
use std::time::Duration;

/// Errors returned by `Deployer::deploy`.
///
/// `RemoteUnavailable` is the only variant worth a blind caller retry; the
/// compare-before-write design makes that retry safe. `Failed` and
/// `Timeout` leave whatever partial state the platform reports in place for
/// inspection.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The spec failed local validation; no remote call was issued.
    #[error("invalid deploy spec: {0}")]
    Validation(#[from] SpecError),

    /// The platform could not be reached. Retrying the whole operation is
    /// safe.
    #[error("platform unavailable while deploying {service}: {detail}")]
    RemoteUnavailable { service: ServiceName, detail: String },

    /// The platform reported a terminal failure for this attempt.
    #[error("deployment of {service} failed: {diagnostic}")]
    Failed {
        service: ServiceName,
        diagnostic: String,
    },

    /// Polling exceeded its bound. The submitted mutation may still be in
    /// flight on the remote side.
    #[error("deployment of {service} did not become ready within {waited:?}")]
    Timeout {
        service: ServiceName,
        waited: Duration,
    },

    /// The caller cancelled the wait.
    #[error("deployment of {service} cancelled")]
    Cancelled { service: ServiceName },
}

impl DeployError {
    /// Fold a platform read/submit error into the deploy taxonomy.
    pub(crate) fn from_platform(service: &ServiceName, error: PlatformError) -> Self {
        if error.is_transient() {
            DeployError::RemoteUnavailable {
                service: service.clone(),
                detail: error.to_string(),
            }
        } else {
            DeployError::Failed {
                service: service.clone(),
                diagnostic: error.to_string(),
            }
        }
    }
}
