// ABOUTME: In-memory platform implementing the admin API traits.
// ABOUTME: Records mutation calls and scripts operation outcomes for tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use strato::platform::{
    DeploymentApi, Endpoint, OperationPoller, OperationStatus, PlatformError, RemoteRevision,
    RemoteService, RevisionState, RoutingApi, RoutingState, ServiceDescriptor, TrafficTarget,
};
use strato::types::{OperationId, RevisionId, ServiceName};

#[derive(Default)]
struct State {
    service: Option<RemoteService>,
    revisions: HashMap<String, RemoteRevision>,
    routing: RoutingState,
    operations: HashMap<String, VecDeque<OperationStatus>>,
    rev_counter: u32,
    op_counter: u32,
    apply_service_calls: u32,
    apply_routing_calls: u32,
    read_calls: u32,
    fail_next_deploy: Option<String>,
    stall_operations: bool,
    suppress_endpoint: bool,
    get_service_failures: VecDeque<PlatformError>,
}

/// An in-memory stand-in for the remote platform.
///
/// Mutations are applied eagerly; the paired operation completes after one
/// `Running` poll, so polling loops take at least one backoff tick. Clones
/// share state, mirroring how deployer and releaser share one remote.
#[derive(Clone, Default)]
pub struct FakePlatform {
    state: Arc<Mutex<State>>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    // --- seeding -----------------------------------------------------------

    pub fn seed_revision(&self, id: &str, artifact: &str, state: RevisionState) {
        let mut s = self.state.lock();
        let n = s.rev_counter + 1;
        s.rev_counter = n;
        s.revisions.insert(
            id.to_string(),
            RemoteRevision {
                id: RevisionId::new(id),
                artifact: strato::types::ArtifactRef::parse(artifact)
                    .expect("test artifact reference should parse"),
                created_at: Utc.timestamp_opt(1_750_000_000 + i64::from(n), 0).unwrap(),
                state,
                detail: None,
            },
        );
    }

    pub fn seed_routing(&self, targets: Vec<TrafficTarget>, url: &str) {
        let mut s = self.state.lock();
        s.routing = RoutingState {
            targets,
            endpoint: Some(Endpoint {
                url: url.to_string(),
                generation: 1,
            }),
            generation: 1,
        };
    }

    // --- failure scripting -------------------------------------------------

    /// The next deploy operation ends `Failed` with this diagnostic, leaving
    /// a failed revision behind.
    pub fn fail_next_deploy(&self, message: &str) {
        self.state.lock().fail_next_deploy = Some(message.to_string());
    }

    /// All operations report `Running` forever.
    pub fn stall_operations(&self) {
        self.state.lock().stall_operations = true;
    }

    /// Routing updates settle without the platform reporting an endpoint.
    pub fn suppress_endpoint(&self) {
        self.state.lock().suppress_endpoint = true;
    }

    /// The next `get_service` fails with the given error.
    pub fn fail_next_get_service(&self, error: PlatformError) {
        self.state.lock().get_service_failures.push_back(error);
    }

    // --- assertions --------------------------------------------------------

    pub fn apply_service_calls(&self) -> u32 {
        self.state.lock().apply_service_calls
    }

    pub fn apply_routing_calls(&self) -> u32 {
        self.state.lock().apply_routing_calls
    }

    /// Total calls of any kind, reads included.
    pub fn remote_calls(&self) -> u32 {
        let s = self.state.lock();
        s.read_calls + s.apply_service_calls + s.apply_routing_calls
    }

    pub fn revision_count(&self) -> usize {
        self.state.lock().revisions.len()
    }

    pub fn routing(&self) -> RoutingState {
        self.state.lock().routing.clone()
    }
}

#[async_trait]
impl OperationPoller for FakePlatform {
    async fn poll_operation(&self, op: &OperationId) -> Result<OperationStatus, PlatformError> {
        let mut s = self.state.lock();
        s.read_calls += 1;

        if s.stall_operations {
            return Ok(OperationStatus::Running);
        }

        let script = s
            .operations
            .get_mut(op.as_str())
            .ok_or_else(|| PlatformError::Rejected {
                code: 404,
                message: format!("operation {op} not found"),
            })?;

        // Drain the script but keep the terminal status repeatable.
        if script.len() > 1 {
            Ok(script.pop_front().expect("script is non-empty"))
        } else {
            Ok(script.front().cloned().expect("script is non-empty"))
        }
    }
}

#[async_trait]
impl DeploymentApi for FakePlatform {
    async fn get_service(
        &self,
        _name: &ServiceName,
    ) -> Result<Option<RemoteService>, PlatformError> {
        let mut s = self.state.lock();
        s.read_calls += 1;
        if let Some(error) = s.get_service_failures.pop_front() {
            return Err(error);
        }
        Ok(s.service.clone())
    }

    async fn apply_service(
        &self,
        desired: &ServiceDescriptor,
    ) -> Result<OperationId, PlatformError> {
        let mut s = self.state.lock();
        s.apply_service_calls += 1;
        s.op_counter += 1;
        let op = OperationId::new(format!("op-{}", s.op_counter));

        if let Some(message) = s.fail_next_deploy.take() {
            // A failed rollout still leaves its revision visible.
            s.rev_counter += 1;
            let n = s.rev_counter;
            let id = format!("{}-{:05}", desired.service, n);
            s.revisions.insert(
                id.clone(),
                RemoteRevision {
                    id: RevisionId::new(id),
                    artifact: desired.artifact.clone(),
                    created_at: Utc.timestamp_opt(1_750_000_000 + i64::from(n), 0).unwrap(),
                    state: RevisionState::Failed,
                    detail: Some(message.clone()),
                },
            );
            s.operations.insert(
                op.as_str().to_string(),
                VecDeque::from([
                    OperationStatus::Running,
                    OperationStatus::Failed { message },
                ]),
            );
            return Ok(op);
        }

        s.rev_counter += 1;
        let n = s.rev_counter;
        let id = format!("{}-{:05}", desired.service, n);
        let revision = RemoteRevision {
            id: RevisionId::new(id.clone()),
            artifact: desired.artifact.clone(),
            created_at: Utc.timestamp_opt(1_750_000_000 + i64::from(n), 0).unwrap(),
            state: RevisionState::Ready,
            detail: None,
        };
        s.revisions.insert(id, revision.clone());
        s.service = Some(RemoteService {
            descriptor: desired.clone(),
            ready_revision: Some(revision.clone()),
            etag: Some(format!("etag-{n}")),
        });
        s.operations.insert(
            op.as_str().to_string(),
            VecDeque::from([
                OperationStatus::Running,
                OperationStatus::Succeeded {
                    revision: Some(revision.id),
                },
            ]),
        );

        Ok(op)
    }

    async fn get_revision(
        &self,
        _name: &ServiceName,
        revision: &RevisionId,
    ) -> Result<Option<RemoteRevision>, PlatformError> {
        let mut s = self.state.lock();
        s.read_calls += 1;
        Ok(s.revisions.get(revision.as_str()).cloned())
    }
}

#[async_trait]
impl RoutingApi for FakePlatform {
    async fn get_routing(&self, _name: &ServiceName) -> Result<RoutingState, PlatformError> {
        let mut s = self.state.lock();
        s.read_calls += 1;
        Ok(s.routing.clone())
    }

    async fn apply_routing(
        &self,
        name: &ServiceName,
        targets: &[TrafficTarget],
    ) -> Result<OperationId, PlatformError> {
        let mut s = self.state.lock();
        s.apply_routing_calls += 1;
        s.op_counter += 1;
        let op = OperationId::new(format!("op-{}", s.op_counter));

        let generation = s.routing.generation + 1;
        let endpoint = if s.suppress_endpoint {
            None
        } else {
            Some(Endpoint {
                url: format!("https://{name}.run.example.app"),
                generation,
            })
        };
        s.routing = RoutingState {
            targets: targets.to_vec(),
            endpoint,
            generation,
        };
        s.operations.insert(
            op.as_str().to_string(),
            VecDeque::from([
                OperationStatus::Running,
                OperationStatus::Succeeded { revision: None },
            ]),
        );

        Ok(op)
    }
}
