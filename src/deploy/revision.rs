// ABOUTME: Immutable deployment revision record returned by the deployer.
// ABOUTME: Snapshot of artifact, spec, and remote status at creation time.

use super::spec::DeploySpec;
use crate::platform::{RemoteRevision, RevisionState};
use crate::types::{ArtifactRef, RevisionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The result of a successful deploy: one immutable, versioned instantiation
/// of an artifact and spec on the platform.
///
/// Revisions are append-only history. A changed deploy produces a new
/// revision; an existing one is never rewritten, only superseded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentRevision {
    pub id: RevisionId,
    pub artifact: ArtifactRef,
    /// Snapshot of the spec this revision was deployed from.
    pub spec: DeploySpec,
    pub created_at: DateTime<Utc>,
    pub status: RevisionState,
}

impl DeploymentRevision {
    /// Build the record from the platform's revision report and the spec
    /// that produced it.
    pub fn from_remote(remote: RemoteRevision, spec: DeploySpec) -> Self {
        Self {
            id: remote.id,
            artifact: remote.artifact,
            spec,
            created_at: remote.created_at,
            status: remote.state,
        }
    }
}
