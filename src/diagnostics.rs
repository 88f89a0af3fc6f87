// ABOUTME: Diagnostics accumulator for non-fatal warnings during deployment.
// ABOUTME: Collects warnings that shouldn't fail a deploy but should surface.

/// Collects non-fatal warnings during deploy and release operations.
#[derive(Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning collected during an operation.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// The artifact is addressed by tag only; its content can drift between
    /// deploys.
    pub fn unpinned_artifact(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::UnpinnedArtifact,
            message: message.into(),
        }
    }

    /// Minimum instances is zero; idle services cold-start on first request.
    pub fn scale_to_zero(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::ScaleToZero,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Artifact reference carries no digest.
    UnpinnedArtifact,
    /// Service scales to zero instances when idle.
    ScaleToZero,
}
