// ABOUTME: Desired-state descriptor construction and structural comparison.
// ABOUTME: Comparison normalizes platform defaults and ignores injected labels.

use super::spec::DeploySpec;
use crate::platform::ServiceDescriptor;
use crate::types::ArtifactRef;

/// Concurrency the platform assumes when a descriptor leaves it unset.
const DEFAULT_CONCURRENCY: u32 = 80;

/// Label prefix the platform injects on every service it manages. These
/// labels are platform-assigned metadata, not desired state.
const PLATFORM_LABEL_PREFIX: &str = "serving.platform/";

/// Compute the deterministic desired-state descriptor for an artifact and
/// spec. Identical inputs always yield an identical descriptor.
pub fn desired_descriptor(artifact: &ArtifactRef, spec: &DeploySpec) -> ServiceDescriptor {
    ServiceDescriptor {
        service: spec.service.clone(),
        artifact: artifact.clone(),
        project: spec.project.clone(),
        region: spec.region.clone(),
        scaling: spec.scaling,
        concurrency: spec.concurrency,
        resources: spec.resources,
        env: spec.env.clone(),
        labels: spec.labels.clone(),
    }
}

/// Structural equality on the fields that affect runtime behavior.
///
/// Both sides are normalized first, so a platform echo that filled in the
/// default concurrency or injected its own labels still matches the
/// descriptor it was created from.
pub fn descriptors_match(current: &ServiceDescriptor, desired: &ServiceDescriptor) -> bool {
    normalize(current) == normalize(desired)
}

fn normalize(descriptor: &ServiceDescriptor) -> ServiceDescriptor {
    let mut normalized = descriptor.clone();
    normalized.concurrency = Some(descriptor.concurrency.unwrap_or(DEFAULT_CONCURRENCY));
    normalized
        .labels
        .retain(|key, _| !key.starts_with(PLATFORM_LABEL_PREFIX));
    normalized
}
