// ABOUTME: Deployment reconciliation against the remote platform.
// ABOUTME: Validate, read current state, compare, apply once, poll to terminal.

use super::descriptor::{descriptors_match, desired_descriptor};
use super::error::DeployError;
use super::revision::DeploymentRevision;
use super::spec::DeploySpec;
use crate::cancel::CancelToken;
use crate::platform::{DeploymentApi, PollSettings, RevisionState, WaitError, wait_for_operation};
use crate::types::{ArtifactRef, ServiceName};

/// Converges the platform to run an artifact under a desired-state spec.
///
/// Every call re-reads remote state before deciding whether to mutate, and
/// issues at most one create-or-update. Re-running with unchanged inputs
/// returns the existing revision without touching the platform.
///
/// Concurrent deploys of the *same* service are not safe against each other;
/// serializing them is the caller's responsibility. Different services are
/// fully independent.
pub struct Deployer<P> {
    platform: P,
    poll: PollSettings,
}

impl<P: DeploymentApi> Deployer<P> {
    pub fn new(platform: P) -> Self {
        Self::with_poll_settings(platform, PollSettings::default())
    }

    pub fn with_poll_settings(platform: P, poll: PollSettings) -> Self {
        Self { platform, poll }
    }

    /// Deploy `artifact` under `spec`, returning the resulting revision.
    ///
    /// # Errors
    ///
    /// `Validation` before any remote call; `RemoteUnavailable` on transient
    /// platform failure (safe to retry whole); `Failed` on a terminal remote
    /// diagnostic; `Timeout` when polling exceeds its bound; `Cancelled`
    /// when the caller's token fires. Partial remote state is never rolled
    /// back.
    pub async fn deploy(
        &self,
        artifact: &ArtifactRef,
        spec: &DeploySpec,
        cancel: &CancelToken,
    ) -> Result<DeploymentRevision, DeployError> {
        spec.validate()?;
        let service = &spec.service;

        if cancel.is_cancelled() {
            return Err(DeployError::Cancelled {
                service: service.clone(),
            });
        }

        let desired = desired_descriptor(artifact, spec);

        let current = self
            .platform
            .get_service(service)
            .await
            .map_err(|e| DeployError::from_platform(service, e))?;

        if let Some(remote) = current
            && descriptors_match(&remote.descriptor, &desired)
            && let Some(ready) = remote.ready_revision
        {
            tracing::info!(
                service = %service,
                revision = %ready.id,
                "platform already reflects desired state, nothing to deploy"
            );
            return Ok(DeploymentRevision::from_remote(ready, spec.clone()));
        }

        if cancel.is_cancelled() {
            return Err(DeployError::Cancelled {
                service: service.clone(),
            });
        }

        tracing::info!(service = %service, artifact = %artifact, "submitting deployment");
        let op = self
            .platform
            .apply_service(&desired)
            .await
            .map_err(|e| DeployError::from_platform(service, e))?;

        let revision_id = match wait_for_operation(&self.platform, &op, &self.poll, cancel).await {
            Ok(Some(id)) => id,
            Ok(None) => {
                return Err(DeployError::Failed {
                    service: service.clone(),
                    diagnostic: format!("operation {op} completed without a revision reference"),
                });
            }
            Err(e) => return Err(map_wait_error(service, e)),
        };

        let remote = self
            .platform
            .get_revision(service, &revision_id)
            .await
            .map_err(|e| DeployError::from_platform(service, e))?
            .ok_or_else(|| DeployError::Failed {
                service: service.clone(),
                diagnostic: format!("platform has no record of revision {revision_id}"),
            })?;

        match remote.state {
            RevisionState::Ready => {
                tracing::info!(service = %service, revision = %remote.id, "revision ready");
                Ok(DeploymentRevision::from_remote(remote, spec.clone()))
            }
            RevisionState::Failed => Err(DeployError::Failed {
                service: service.clone(),
                diagnostic: remote
                    .detail
                    .unwrap_or_else(|| "revision failed without diagnostic".to_string()),
            }),
            RevisionState::Pending => Err(DeployError::Failed {
                service: service.clone(),
                diagnostic: format!(
                    "revision {revision_id} still pending after its operation completed"
                ),
            }),
        }
    }
}

fn map_wait_error(service: &ServiceName, error: WaitError) -> DeployError {
    match error {
        WaitError::Timeout { waited, .. } => DeployError::Timeout {
            service: service.clone(),
            waited,
        },
        WaitError::Cancelled { .. } => DeployError::Cancelled {
            service: service.clone(),
        },
        WaitError::OperationFailed { message, .. } => DeployError::Failed {
            service: service.clone(),
            diagnostic: message,
        },
        WaitError::Platform(e) => DeployError::from_platform(service, e),
    }
}
