// ABOUTME: Platform API error types with SNAFU pattern.
// ABOUTME: Distinguishes transient transport failures from terminal rejections.

use snafu::Snafu;

/// Errors crossing the remote platform API boundary.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PlatformError {
    /// The platform could not be reached, or answered with a status that
    /// indicates a retry may succeed (connection failure, 429, 5xx).
    #[snafu(display("platform unavailable: {message}"))]
    Unavailable { message: String },

    /// The platform understood the request and refused it.
    #[snafu(display("platform rejected request ({code}): {message}"))]
    Rejected { code: u16, message: String },

    /// The platform answered with a body this client could not decode.
    #[snafu(display("malformed platform response: {message}"))]
    Malformed { message: String },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformErrorKind {
    Unavailable,
    Rejected,
    Malformed,
}

impl PlatformError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> PlatformErrorKind {
        match self {
            PlatformError::Unavailable { .. } => PlatformErrorKind::Unavailable,
            PlatformError::Rejected { .. } => PlatformErrorKind::Rejected,
            PlatformError::Malformed { .. } => PlatformErrorKind::Malformed,
        }
    }

    /// Whether a blind retry of the same request may succeed.
    ///
    /// Callers rely on compare-before-write idempotence, so retrying a
    /// transient failure is safe by construction.
    pub fn is_transient(&self) -> bool {
        matches!(self, PlatformError::Unavailable { .. })
    }
}
