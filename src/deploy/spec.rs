// ABOUTME: Desired-state deploy specification and its local validation.
// ABOUTME: Invalid specs fail fast before any remote call is issued.

use crate::platform::{ResourceLimits, ScalingBounds};
use crate::types::ServiceName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Local validation failures of a `DeploySpec`. No remote side effects.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("max instances must be at least 1")]
    NoCapacity,

    #[error("min instances ({min}) exceeds max instances ({max})")]
    ScalingBoundsInverted { min: u32, max: u32 },

    #[error("request concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("target project cannot be empty")]
    EmptyProject,

    #[error("target region cannot be empty")]
    EmptyRegion,
}

/// Caller-owned desired-state configuration for one deployment.
///
/// Passed by value into the deployer; a snapshot of it is embedded in the
/// resulting revision record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploySpec {
    pub service: ServiceName,
    pub project: String,
    pub region: String,
    pub scaling: ScalingBounds,
    /// Maximum concurrent requests per instance. None takes the platform
    /// default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<u32>,
    #[serde(default)]
    pub resources: ResourceLimits,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl DeploySpec {
    /// Validate the spec locally. Called by the deployer before it issues
    /// any remote call.
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.scaling.max == 0 {
            return Err(SpecError::NoCapacity);
        }
        if self.scaling.min > self.scaling.max {
            return Err(SpecError::ScalingBoundsInverted {
                min: self.scaling.min,
                max: self.scaling.max,
            });
        }
        if self.concurrency == Some(0) {
            return Err(SpecError::ZeroConcurrency);
        }
        if self.project.is_empty() {
            return Err(SpecError::EmptyProject);
        }
        if self.region.is_empty() {
            return Err(SpecError::EmptyRegion);
        }
        Ok(())
    }
}
