// ABOUTME: Wire-shaped records exchanged with the managed serving platform.
// ABOUTME: Descriptors, revisions, operations, routing state, and endpoints.

use crate::types::{ArtifactRef, RevisionId, ServiceName};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Instance-count bounds for a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalingBounds {
    /// Minimum instances kept warm. Zero allows scale-to-zero.
    pub min: u32,
    /// Maximum instances the platform may run.
    pub max: u32,
}

/// Per-instance resource limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceLimits {
    /// Memory limit in MiB. None means the platform default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_mib: Option<u64>,
    /// CPU limit in millicores. None means the platform default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_millis: Option<u64>,
}

/// The deterministic desired-state descriptor for a service.
///
/// Everything in here affects runtime behavior and participates in the
/// current-vs-desired comparison. Platform-assigned metadata (timestamps,
/// etags, injected labels) deliberately lives outside this struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub service: ServiceName,
    pub artifact: ArtifactRef,
    pub project: String,
    pub region: String,
    pub scaling: ScalingBounds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<u32>,
    #[serde(default)]
    pub resources: ResourceLimits,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

/// A service as reported by the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteService {
    pub descriptor: ServiceDescriptor,
    /// The revision currently serving, if one has reached `Ready`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_revision: Option<RemoteRevision>,
    /// Platform-assigned, excluded from state comparison.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

/// Remote status of a deployment revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevisionState {
    /// The platform is still provisioning instances for this revision.
    Pending,
    /// The revision is serving and can receive traffic.
    Ready,
    /// The revision failed to come up; terminal.
    Failed,
}

impl fmt::Display for RevisionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevisionState::Pending => write!(f, "pending"),
            RevisionState::Ready => write!(f, "ready"),
            RevisionState::Failed => write!(f, "failed"),
        }
    }
}

/// A revision record as reported by the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteRevision {
    pub id: RevisionId,
    pub artifact: ArtifactRef,
    pub created_at: DateTime<Utc>,
    pub state: RevisionState,
    /// Diagnostic text accompanying a `Failed` state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Status of an asynchronous platform operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum OperationStatus {
    Running,
    Succeeded {
        /// The revision produced, for deployment operations. Routing
        /// operations complete without one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        revision: Option<RevisionId>,
    },
    Failed {
        message: String,
    },
}

/// One entry of a traffic split: a revision and its integer percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficTarget {
    pub revision: RevisionId,
    pub percent: u8,
}

impl TrafficTarget {
    pub fn new(revision: RevisionId, percent: u8) -> Self {
        Self { revision, percent }
    }
}

/// The platform's current routing configuration for a service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutingState {
    #[serde(default)]
    pub targets: Vec<TrafficTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<Endpoint>,
    /// Monotonic routing generation assigned by the platform.
    #[serde(default)]
    pub generation: u64,
}

/// The stable, externally reachable address of a released service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub url: String,
    /// Routing generation this endpoint was observed at.
    #[serde(default)]
    pub generation: u64,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}
