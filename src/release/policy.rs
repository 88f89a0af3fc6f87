// ABOUTME: Traffic policy validation for release operations.
// ABOUTME: Integer weights over revisions, summing to exactly 100.

use crate::platform::{RevisionState, TrafficTarget};
use crate::types::RevisionId;
use nonempty::NonEmpty;
use std::collections::BTreeMap;
use thiserror::Error;

/// Ways a traffic policy can be invalid.
///
/// Shape violations are caught at construction; `UnknownRevision` and
/// `RevisionNotReady` are raised by the releaser's readiness gating before
/// any remote mutation. Violations are rejected, never clamped.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("traffic weights sum to {sum}, expected exactly 100")]
    WeightSum { sum: u32 },

    #[error("revision {0} appears more than once in the policy")]
    DuplicateRevision(RevisionId),

    #[error("revision {0} has a zero weight and would receive no traffic")]
    ZeroWeight(RevisionId),

    #[error("revision {0} does not exist on the platform")]
    UnknownRevision(RevisionId),

    #[error("revision {revision} is {state}, only ready revisions can receive traffic")]
    RevisionNotReady {
        revision: RevisionId,
        state: RevisionState,
    },
}

/// A validated percentage split of traffic across deployment revisions.
///
/// Construction guarantees the shape invariants; readiness of the referenced
/// revisions is checked against the platform at release time.
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficPolicy {
    targets: NonEmpty<TrafficTarget>,
}

impl TrafficPolicy {
    /// Build a policy, validating weight sum, duplicates, and zero weights.
    pub fn new(targets: NonEmpty<TrafficTarget>) -> Result<Self, PolicyError> {
        let mut seen: BTreeMap<&str, ()> = BTreeMap::new();
        let mut sum: u32 = 0;

        for target in &targets {
            if target.percent == 0 {
                return Err(PolicyError::ZeroWeight(target.revision.clone()));
            }
            if seen.insert(target.revision.as_str(), ()).is_some() {
                return Err(PolicyError::DuplicateRevision(target.revision.clone()));
            }
            sum += u32::from(target.percent);
        }

        if sum != 100 {
            return Err(PolicyError::WeightSum { sum });
        }

        Ok(Self { targets })
    }

    /// The common case: route all traffic to a single revision.
    pub fn single(revision: RevisionId) -> Self {
        Self {
            targets: NonEmpty::new(TrafficTarget::new(revision, 100)),
        }
    }

    pub fn targets(&self) -> &NonEmpty<TrafficTarget> {
        &self.targets
    }

    /// Whether current routing already carries exactly this split.
    /// Target order is irrelevant; only the revision-to-weight mapping counts.
    pub fn matches(&self, current: &[TrafficTarget]) -> bool {
        let wanted: BTreeMap<&str, u8> = self
            .targets
            .iter()
            .map(|t| (t.revision.as_str(), t.percent))
            .collect();
        let actual: BTreeMap<&str, u8> = current
            .iter()
            .map(|t| (t.revision.as_str(), t.percent))
            .collect();
        wanted == actual
    }
}
