// ABOUTME: Remote managed-platform API boundary.
// ABOUTME: Capability traits, wire types, HTTP client, and operation polling.

mod api;
mod error;
mod http;
mod types;
mod wait;

pub use api::{DeploymentApi, OperationPoller, RoutingApi};
pub use error::{PlatformError, PlatformErrorKind};
pub use http::HttpPlatform;
pub use types::{
    Endpoint, OperationStatus, RemoteRevision, RemoteService, ResourceLimits, RevisionState,
    RoutingState, ScalingBounds, ServiceDescriptor, TrafficTarget,
};
pub use wait::{PollSettings, WaitError, wait_for_operation};
