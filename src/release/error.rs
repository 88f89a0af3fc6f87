// ABOUTME: Error taxonomy for release operations.
// ABOUTME: Mirrors the deploy taxonomy with policy validation in front.

use super::policy::PolicyError;
use crate::platform::PlatformError;
use crate::types::ServiceName;
use std::time::Duration;

/// Errors returned by `Releaser::release`.
#[derive(Debug, thiserror::Error)]
pub enum ReleaseError {
    /// The policy failed validation or readiness gating; no remote routing
    /// mutation was issued.
    #[error("invalid traffic policy for {service}: {source}")]
    PolicyInvalid {
        service: ServiceName,
        #[source]
        source: PolicyError,
    },

    /// The platform could not be reached. Retrying the whole operation is
    /// safe.
    #[error("platform unavailable while releasing {service}: {detail}")]
    RemoteUnavailable { service: ServiceName, detail: String },

    /// The platform reported a terminal failure applying the routing change.
    #[error("release of {service} failed: {diagnostic}")]
    Failed {
        service: ServiceName,
        diagnostic: String,
    },

    /// Polling exceeded its bound. Routing may still be converging remotely.
    #[error("release of {service} did not settle within {waited:?}")]
    Timeout {
        service: ServiceName,
        waited: Duration,
    },

    /// The caller cancelled the wait.
    #[error("release of {service} cancelled")]
    Cancelled { service: ServiceName },
}

impl ReleaseError {
    pub(crate) fn from_platform(service: &ServiceName, error: PlatformError) -> Self {
        if error.is_transient() {
            ReleaseError::RemoteUnavailable {
                service: service.clone(),
                detail: error.to_string(),
            }
        } else {
            ReleaseError::Failed {
                service: service.clone(),
                diagnostic: error.to_string(),
            }
        }
    }
}
