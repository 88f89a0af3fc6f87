// ABOUTME: Integration tests for deployment reconciliation.
// ABOUTME: Exercises idempotence, validation, failure, timeout, cancellation.

mod support;

use std::collections::BTreeMap;
use std::time::Duration;
use support::fake_platform::FakePlatform;
use strato::cancel::CancelToken;
use strato::deploy::{DeployError, DeploySpec, Deployer};
use strato::platform::{PlatformError, PollSettings, ResourceLimits, RevisionState, ScalingBounds};
use strato::types::{ArtifactRef, ServiceName};

fn spec() -> DeploySpec {
    DeploySpec {
        service: ServiceName::new("web").unwrap(),
        project: "acme-prod".to_string(),
        region: "eu-west1".to_string(),
        scaling: ScalingBounds { min: 1, max: 3 },
        concurrency: None,
        resources: ResourceLimits::default(),
        env: BTreeMap::new(),
        labels: BTreeMap::new(),
    }
}

fn artifact(reference: &str) -> ArtifactRef {
    ArtifactRef::parse(reference).unwrap()
}

fn fast_poll() -> PollSettings {
    PollSettings {
        interval: Duration::from_millis(100),
        max_interval: Duration::from_secs(1),
        timeout: Duration::from_secs(60),
    }
}

#[tokio::test(start_paused = true)]
async fn first_deploy_creates_a_ready_revision() {
    let platform = FakePlatform::new();
    let deployer = Deployer::with_poll_settings(platform.clone(), fast_poll());

    let revision = deployer
        .deploy(&artifact("img:v1"), &spec(), &CancelToken::new())
        .await
        .expect("deploy should succeed");

    assert_eq!(revision.id.as_str(), "web-00001");
    assert_eq!(revision.status, RevisionState::Ready);
    assert_eq!(revision.artifact, artifact("img:v1"));
    assert_eq!(platform.apply_service_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn redeploying_identical_inputs_returns_existing_revision_without_mutation() {
    let platform = FakePlatform::new();
    let deployer = Deployer::with_poll_settings(platform.clone(), fast_poll());
    let cancel = CancelToken::new();

    let first = deployer
        .deploy(&artifact("img:v1"), &spec(), &cancel)
        .await
        .expect("first deploy should succeed");

    let second = deployer
        .deploy(&artifact("img:v1"), &spec(), &cancel)
        .await
        .expect("second deploy should succeed");

    assert_eq!(first.id, second.id);
    assert_eq!(platform.apply_service_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn changed_artifact_produces_a_new_revision() {
    let platform = FakePlatform::new();
    let deployer = Deployer::with_poll_settings(platform.clone(), fast_poll());
    let cancel = CancelToken::new();

    let first = deployer
        .deploy(&artifact("img:v1"), &spec(), &cancel)
        .await
        .expect("v1 deploy should succeed");

    let second = deployer
        .deploy(&artifact("img:v2"), &spec(), &cancel)
        .await
        .expect("v2 deploy should succeed");

    assert_ne!(first.id, second.id);
    assert_eq!(platform.apply_service_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn changed_spec_produces_a_new_revision() {
    let platform = FakePlatform::new();
    let deployer = Deployer::with_poll_settings(platform.clone(), fast_poll());
    let cancel = CancelToken::new();

    deployer
        .deploy(&artifact("img:v1"), &spec(), &cancel)
        .await
        .expect("initial deploy should succeed");

    let mut changed = spec();
    changed.env.insert("FEATURE".to_string(), "on".to_string());
    deployer
        .deploy(&artifact("img:v1"), &changed, &cancel)
        .await
        .expect("changed deploy should succeed");

    assert_eq!(platform.apply_service_calls(), 2);
}

#[tokio::test]
async fn invalid_spec_short_circuits_before_any_remote_call() {
    let platform = FakePlatform::new();
    let deployer = Deployer::new(platform.clone());

    let mut invalid = spec();
    invalid.scaling = ScalingBounds { min: 5, max: 3 };

    let error = deployer
        .deploy(&artifact("img:v1"), &invalid, &CancelToken::new())
        .await
        .expect_err("inverted bounds must be rejected");

    assert!(matches!(error, DeployError::Validation(_)));
    assert_eq!(platform.remote_calls(), 0);
}

#[tokio::test]
async fn already_cancelled_token_short_circuits_before_any_remote_call() {
    let platform = FakePlatform::new();
    let deployer = Deployer::new(platform.clone());

    let cancel = CancelToken::new();
    cancel.cancel();

    let error = deployer
        .deploy(&artifact("img:v1"), &spec(), &cancel)
        .await
        .expect_err("cancelled token must abort the deploy");

    assert!(matches!(error, DeployError::Cancelled { .. }));
    assert_eq!(platform.remote_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn cancellation_during_polling_returns_promptly() {
    let platform = FakePlatform::new();
    platform.stall_operations();
    let deployer = Deployer::with_poll_settings(platform.clone(), fast_poll());

    let cancel = CancelToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        trigger.cancel();
    });

    let error = deployer
        .deploy(&artifact("img:v1"), &spec(), &cancel)
        .await
        .expect_err("cancellation must interrupt the wait");

    assert!(matches!(error, DeployError::Cancelled { .. }));
    // The mutation had already been submitted when the wait was cancelled.
    assert_eq!(platform.apply_service_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn polling_past_the_bound_times_out() {
    let platform = FakePlatform::new();
    platform.stall_operations();

    let deployer = Deployer::with_poll_settings(
        platform.clone(),
        PollSettings {
            interval: Duration::from_millis(100),
            max_interval: Duration::from_secs(1),
            timeout: Duration::from_secs(5),
        },
    );

    let error = deployer
        .deploy(&artifact("img:v1"), &spec(), &CancelToken::new())
        .await
        .expect_err("stalled operation must time out");

    assert!(matches!(error, DeployError::Timeout { .. }));
}

#[tokio::test(start_paused = true)]
async fn remote_failure_carries_the_diagnostic_and_keeps_the_revision() {
    let platform = FakePlatform::new();
    platform.fail_next_deploy("container failed to listen on $PORT");
    let deployer = Deployer::with_poll_settings(platform.clone(), fast_poll());

    let error = deployer
        .deploy(&artifact("img:v1"), &spec(), &CancelToken::new())
        .await
        .expect_err("failed rollout must surface");

    match error {
        DeployError::Failed { diagnostic, .. } => {
            assert!(diagnostic.contains("failed to listen on $PORT"));
        }
        other => panic!("expected Failed, got {other:?}"),
    }
    // The failed revision is left in place for inspection, not rolled back.
    assert_eq!(platform.revision_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn transient_unavailability_is_reported_and_a_retry_succeeds() {
    let platform = FakePlatform::new();
    platform.fail_next_get_service(PlatformError::Unavailable {
        message: "503 gateway drained".to_string(),
    });
    let deployer = Deployer::with_poll_settings(platform.clone(), fast_poll());
    let cancel = CancelToken::new();

    let error = deployer
        .deploy(&artifact("img:v1"), &spec(), &cancel)
        .await
        .expect_err("unavailable platform must surface");
    assert!(matches!(error, DeployError::RemoteUnavailable { .. }));
    assert_eq!(platform.apply_service_calls(), 0);

    // A blind retry of the whole operation is safe by construction.
    let revision = deployer
        .deploy(&artifact("img:v1"), &spec(), &cancel)
        .await
        .expect("retry should succeed");
    assert_eq!(revision.status, RevisionState::Ready);
    assert_eq!(platform.apply_service_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn revision_snapshot_embeds_the_spec_it_was_deployed_from() {
    let platform = FakePlatform::new();
    let deployer = Deployer::with_poll_settings(platform.clone(), fast_poll());

    let mut with_env = spec();
    with_env
        .env
        .insert("LOG_LEVEL".to_string(), "info".to_string());

    let revision = deployer
        .deploy(&artifact("img:v1"), &with_env, &CancelToken::new())
        .await
        .expect("deploy should succeed");

    assert_eq!(revision.spec, with_env);
}
