// ABOUTME: Traffic-split reconciliation against the remote platform.
// ABOUTME: Gate on revision readiness, compare routing, apply once, poll.

use super::error::ReleaseError;
use super::policy::{PolicyError, TrafficPolicy};
use crate::cancel::CancelToken;
use crate::platform::{
    DeploymentApi, Endpoint, PollSettings, RevisionState, RoutingApi, WaitError,
    wait_for_operation,
};
use crate::types::ServiceName;

/// Converges the platform's routing configuration to a traffic policy.
///
/// The releaser never mutates a deployment; it only changes which ready
/// revisions receive traffic. Like the deployer, it re-reads remote state on
/// every call and issues at most one routing mutation.
pub struct Releaser<P> {
    platform: P,
    poll: PollSettings,
}

impl<P: DeploymentApi + RoutingApi> Releaser<P> {
    pub fn new(platform: P) -> Self {
        Self::with_poll_settings(platform, PollSettings::default())
    }

    pub fn with_poll_settings(platform: P, poll: PollSettings) -> Self {
        Self { platform, poll }
    }

    /// Apply `policy` to the routing of `service`, returning the stable
    /// endpoint once the split is active.
    ///
    /// # Errors
    ///
    /// `PolicyInvalid` when a referenced revision is unknown or not ready
    /// (checked against the platform before any mutation);
    /// `RemoteUnavailable` on transient failure; `Failed`, `Timeout`, and
    /// `Cancelled` as for deploys. Partial routing state is never rolled
    /// back.
    pub async fn release(
        &self,
        service: &ServiceName,
        policy: &TrafficPolicy,
        cancel: &CancelToken,
    ) -> Result<Endpoint, ReleaseError> {
        if cancel.is_cancelled() {
            return Err(ReleaseError::Cancelled {
                service: service.clone(),
            });
        }

        // Readiness gating: every referenced revision must exist and be
        // ready. Read-only; rejects rather than clamping the policy.
        for target in policy.targets() {
            let remote = self
                .platform
                .get_revision(service, &target.revision)
                .await
                .map_err(|e| ReleaseError::from_platform(service, e))?;

            match remote {
                None => {
                    return Err(ReleaseError::PolicyInvalid {
                        service: service.clone(),
                        source: PolicyError::UnknownRevision(target.revision.clone()),
                    });
                }
                Some(revision) if revision.state != RevisionState::Ready => {
                    return Err(ReleaseError::PolicyInvalid {
                        service: service.clone(),
                        source: PolicyError::RevisionNotReady {
                            revision: target.revision.clone(),
                            state: revision.state,
                        },
                    });
                }
                Some(_) => {}
            }
        }

        let current = self
            .platform
            .get_routing(service)
            .await
            .map_err(|e| ReleaseError::from_platform(service, e))?;

        if policy.matches(&current.targets)
            && let Some(endpoint) = current.endpoint
        {
            tracing::info!(
                service = %service,
                endpoint = %endpoint,
                "routing already matches requested policy, nothing to release"
            );
            return Ok(endpoint);
        }

        if cancel.is_cancelled() {
            return Err(ReleaseError::Cancelled {
                service: service.clone(),
            });
        }

        let targets: Vec<_> = policy.targets().iter().cloned().collect();
        tracing::info!(service = %service, targets = targets.len(), "submitting routing update");
        let op = self
            .platform
            .apply_routing(service, &targets)
            .await
            .map_err(|e| ReleaseError::from_platform(service, e))?;

        if let Err(e) = wait_for_operation(&self.platform, &op, &self.poll, cancel).await {
            return Err(map_wait_error(service, e));
        }

        let settled = self
            .platform
            .get_routing(service)
            .await
            .map_err(|e| ReleaseError::from_platform(service, e))?;

        settled.endpoint.ok_or_else(|| ReleaseError::Failed {
            service: service.clone(),
            diagnostic: "platform reported no endpoint after routing settled".to_string(),
        })
    }
}

fn map_wait_error(service: &ServiceName, error: WaitError) -> ReleaseError {
    match error {
        WaitError::Timeout { waited, .. } => ReleaseError::Timeout {
            service: service.clone(),
            waited,
        },
        WaitError::Cancelled { .. } => ReleaseError::Cancelled {
            service: service.clone(),
        },
        WaitError::OperationFailed { message, .. } => ReleaseError::Failed {
            service: service.clone(),
            diagnostic: message,
        },
        WaitError::Platform(e) => ReleaseError::from_platform(service, e),
    }
}
