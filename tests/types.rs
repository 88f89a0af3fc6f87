// ABOUTME: Tests for validated domain newtypes.
// ABOUTME: Artifact reference parsing, service names, and typed identifiers.

use strato::types::{ArtifactRef, OperationId, RevisionId, ServiceName};

// =============================================================================
// ArtifactRef
// =============================================================================

#[test]
fn bare_name_defaults_to_latest_tag() {
    let artifact = ArtifactRef::parse("web").unwrap();

    assert_eq!(artifact.name(), "web");
    assert_eq!(artifact.tag(), Some("latest"));
    assert!(artifact.registry().is_none());
    assert!(!artifact.is_pinned());
}

#[test]
fn registry_tag_and_digest_all_parse() {
    let artifact =
        ArtifactRef::parse("registry.example.com:5000/acme/web:v1@sha256:0a1b2c3d").unwrap();

    assert_eq!(artifact.registry(), Some("registry.example.com:5000"));
    assert_eq!(artifact.name(), "acme/web");
    assert_eq!(artifact.tag(), Some("v1"));
    assert_eq!(artifact.digest(), Some("sha256:0a1b2c3d"));
    assert!(artifact.is_pinned());
}

#[test]
fn digest_only_reference_gets_no_implicit_tag() {
    let artifact = ArtifactRef::parse("web@sha256:0a1b2c3d").unwrap();

    assert_eq!(artifact.tag(), None);
    assert!(artifact.is_pinned());
}

#[test]
fn namespaced_name_without_registry_stays_whole() {
    let artifact = ArtifactRef::parse("acme/web:v1").unwrap();

    assert!(artifact.registry().is_none());
    assert_eq!(artifact.name(), "acme/web");
}

#[test]
fn localhost_counts_as_a_registry() {
    let artifact = ArtifactRef::parse("localhost/web:v1").unwrap();

    assert_eq!(artifact.registry(), Some("localhost"));
    assert_eq!(artifact.name(), "web");
}

#[test]
fn display_round_trips_the_reference() {
    let input = "registry.example.com/acme/web:v1@sha256:0a1b2c3d";
    let artifact = ArtifactRef::parse(input).unwrap();

    assert_eq!(artifact.to_string(), input);
}

#[test]
fn empty_and_garbage_references_are_rejected() {
    assert!(ArtifactRef::parse("").is_err());
    assert!(ArtifactRef::parse("   ").is_err());
    assert!(ArtifactRef::parse("web image").is_err());
}

#[test]
fn artifact_serde_round_trips_as_a_string() {
    let artifact = ArtifactRef::parse("registry.example.com/acme/web:v1").unwrap();
    let json = serde_json::to_string(&artifact).unwrap();

    assert_eq!(json, "\"registry.example.com/acme/web:v1\"");
    let back: ArtifactRef = serde_json::from_str(&json).unwrap();
    assert_eq!(back, artifact);
}

// =============================================================================
// ServiceName
// =============================================================================

#[test]
fn valid_service_names_pass() {
    assert!(ServiceName::new("web").is_ok());
    assert!(ServiceName::new("web-frontend-2").is_ok());
}

#[test]
fn invalid_service_names_fail() {
    assert!(ServiceName::new("").is_err());
    assert!(ServiceName::new("Web").is_err());
    assert!(ServiceName::new("-web").is_err());
    assert!(ServiceName::new("web-").is_err());
    assert!(ServiceName::new("web_frontend").is_err());
    assert!(ServiceName::new(&"a".repeat(64)).is_err());
}

// =============================================================================
// Typed identifiers
// =============================================================================

#[test]
fn ids_display_their_value() {
    let revision = RevisionId::new("web-00042");
    assert_eq!(revision.to_string(), "web-00042");
}

#[test]
fn ids_of_the_same_kind_compare_by_value() {
    assert_eq!(RevisionId::new("a"), RevisionId::new("a"));
    assert_ne!(RevisionId::new("a"), RevisionId::new("b"));
}

#[test]
fn id_serde_round_trips_as_a_string() {
    let op = OperationId::new("op-7");
    let json = serde_json::to_string(&op).unwrap();

    assert_eq!(json, "\"op-7\"");
    let back: OperationId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, op);
}

// Never called; fails to compile if revision and operation IDs become
// interchangeable.
#[allow(dead_code)]
fn id_kinds_are_distinct_types(revision: RevisionId, operation: OperationId) -> (String, String) {
    fn takes_revision(id: &RevisionId) -> String {
        id.to_string()
    }
    fn takes_operation(id: &OperationId) -> String {
        id.to_string()
    }
    (takes_revision(&revision), takes_operation(&operation))
}
