// ABOUTME: Capability traits for the managed serving platform's admin API.
// ABOUTME: Defines DeploymentApi, RoutingApi, and shared operation polling.

use super::error::PlatformError;
use super::types::{
    OperationStatus, RemoteRevision, RemoteService, RoutingState, ServiceDescriptor, TrafficTarget,
};
use crate::types::{OperationId, RevisionId, ServiceName};
use async_trait::async_trait;

/// Polling of asynchronous platform operations.
///
/// Both deployment and routing mutations return an operation handle that is
/// polled until it reaches a terminal status.
#[async_trait]
pub trait OperationPoller: Send + Sync {
    /// Read the current status of an operation.
    async fn poll_operation(&self, op: &OperationId) -> Result<OperationStatus, PlatformError>;
}

/// Deployment surface of the platform: services and their revisions.
///
/// Mutations are create-or-update; the platform appends a new immutable
/// revision whenever the applied descriptor differs from the current one.
#[async_trait]
pub trait DeploymentApi: OperationPoller {
    /// Fetch the service under the given logical name, or None if it has
    /// never been deployed.
    async fn get_service(&self, name: &ServiceName)
    -> Result<Option<RemoteService>, PlatformError>;

    /// Submit a create-or-update of the service to the desired descriptor.
    async fn apply_service(
        &self,
        desired: &ServiceDescriptor,
    ) -> Result<OperationId, PlatformError>;

    /// Fetch one revision of a service, or None if the platform has no
    /// record of it.
    async fn get_revision(
        &self,
        name: &ServiceName,
        revision: &RevisionId,
    ) -> Result<Option<RemoteRevision>, PlatformError>;
}

/// Routing surface of the platform: traffic splits and endpoints.
///
/// Routing mutations never touch deployments; they only change which
/// revisions receive traffic.
#[async_trait]
pub trait RoutingApi: OperationPoller {
    /// Fetch the current routing configuration for a service.
    async fn get_routing(&self, name: &ServiceName) -> Result<RoutingState, PlatformError>;

    /// Submit a routing update to the given traffic split.
    async fn apply_routing(
        &self,
        name: &ServiceName,
        targets: &[TrafficTarget],
    ) -> Result<OperationId, PlatformError>;
}
