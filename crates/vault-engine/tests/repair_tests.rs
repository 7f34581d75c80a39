//! Repair engine behaviour: convergence, partial repair, capability paths.

use std::sync::Arc;
use vault_engine::{DumpEngine, ToolRegistry, ValidationEngine};
use vault_hash::ChecksumRegistry;
use vault_model::{ArtifactKey, ArtifactToolProfile, DumpOptions};
use vault_test_utils::{MockArtifact, MockTool, VisitLog, artifact, resource_info, session};

fn profile() -> ArtifactToolProfile {
    ArtifactToolProfile::new("demo", Some("g1"))
}

fn two_resource_artifact() -> Vec<MockArtifact> {
    let info = artifact("demo", "g1", "42");
    vec![
        MockArtifact::new(info.clone())
            .with_resource(resource_info(&info.key, "img", "1.png"), "first bytes")
            .with_resource(resource_info(&info.key, "img", "2.png"), "second bytes"),
    ]
}

fn registry_of(artifacts: Vec<MockArtifact>, listing: bool, lookup: bool) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register("demo", move || {
        let mut tool = MockTool::new("demo").with_artifacts(artifacts.clone());
        if !listing {
            tool = tool.without_listing();
        }
        if !lookup {
            tool = tool.without_lookup();
        }
        tool
    });
    registry
}

/// Dump, corrupt both resources, validate; returns the ready repair setup.
async fn broken_session(
    artifacts: Vec<MockArtifact>,
) -> (
    vault_engine::ToolConfig,
    vault_store::MemoryDataStore,
    ValidationEngine,
) {
    let (config, _, data) = session();
    let registry = registry_of(artifacts.clone(), true, true);
    DumpEngine::new(config.clone(), Arc::new(ChecksumRegistry::new()))
        .dump(&registry, &profile(), &DumpOptions::default())
        .await
        .unwrap();
    for blueprint in &artifacts {
        for (r, _) in &blueprint.resources {
            data.put_bytes(r.key.clone(), b"tampered".to_vec());
        }
    }
    let mut validation = ValidationEngine::new(
        config.clone(),
        Arc::new(ChecksumRegistry::new()),
        None,
    )
    .unwrap();
    validation
        .process_profiles(&registry, &[profile()])
        .await
        .unwrap();
    (config, data, validation)
}

#[tokio::test]
async fn repair_converges_when_tool_reproduces_everything() {
    let (_, data, validation) = broken_session(two_resource_artifact()).await;
    assert_eq!(validation.resource_failures(), 2);

    let registry = registry_of(two_resource_artifact(), true, true);
    let outcome = validation
        .to_repair()
        .repair(&registry, &[profile()], Some("SHA512"))
        .await
        .unwrap();

    assert!(outcome.success);
    assert!(outcome.remaining.is_empty());
    // Content restored and checksums rewritten under the requested algorithm.
    let key = resource_info(&ArtifactKey::new("demo", "g1", "42"), "img", "1.png").key;
    assert_eq!(data.get_bytes(&key).unwrap(), b"first bytes");
}

#[tokio::test]
async fn repaired_checksums_use_the_requested_algorithm() {
    let (config, _, validation) = broken_session(two_resource_artifact()).await;
    let registry = registry_of(two_resource_artifact(), true, true);
    validation
        .to_repair()
        .repair(&registry, &[profile()], Some("SHA512"))
        .await
        .unwrap();

    let key = resource_info(&ArtifactKey::new("demo", "g1", "42"), "img", "1.png").key;
    let stored = config.registration.try_get_resource(&key).await.unwrap().unwrap();
    assert_eq!(stored.checksum.unwrap().algorithm_id, "SHA512");
}

#[tokio::test]
async fn missing_resource_in_fresh_data_stays_failed() {
    let (_, _, validation) = broken_session(two_resource_artifact()).await;
    // Fresh data only reproduces 1.png; 2.png disappeared upstream.
    let info = artifact("demo", "g1", "42");
    let fresh = vec![
        MockArtifact::new(info.clone())
            .with_resource(resource_info(&info.key, "img", "1.png"), "first bytes"),
    ];
    let registry = registry_of(fresh, true, true);
    let outcome = validation
        .to_repair()
        .repair(&registry, &[profile()], Some("SHA256"))
        .await
        .unwrap();

    assert!(!outcome.success);
    assert_eq!(outcome.remaining.resource_failures(), 1);
    let remaining = outcome.remaining.get(&info.key).unwrap();
    assert_eq!(remaining[0].key.file, "2.png");
}

#[tokio::test]
async fn unfindable_artifact_is_not_fatal() {
    let (_, _, validation) = broken_session(two_resource_artifact()).await;
    // Tool can find nothing at all.
    let registry = registry_of(Vec::new(), true, true);
    let outcome = validation
        .to_repair()
        .repair(&registry, &[profile()], Some("SHA256"))
        .await
        .unwrap();

    assert!(!outcome.success);
    assert_eq!(outcome.remaining.resource_failures(), 2);
}

#[tokio::test]
async fn finder_is_preferred_and_queried_once_per_artifact() {
    let (_, _, validation) = broken_session(two_resource_artifact()).await;
    let found = VisitLog::default();
    let listed = VisitLog::default();
    let mut registry = ToolRegistry::new();
    let artifacts = two_resource_artifact();
    let (found_c, listed_c) = (found.clone(), listed.clone());
    registry.register("demo", move || {
        MockTool::new("demo")
            .with_artifacts(artifacts.clone())
            .with_found_log(found_c.clone())
            .with_listed_log(listed_c.clone())
    });

    let outcome = validation
        .to_repair()
        .repair(&registry, &[profile()], Some("SHA256"))
        .await
        .unwrap();
    assert!(outcome.success);
    assert_eq!(*found.lock().unwrap(), vec!["42"]);
    assert!(listed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn lister_only_tool_repairs_via_full_listing() {
    let (_, data, validation) = broken_session(two_resource_artifact()).await;
    let registry = registry_of(two_resource_artifact(), true, false);
    let outcome = validation
        .to_repair()
        .repair(&registry, &[profile()], Some("SHA256"))
        .await
        .unwrap();

    assert!(outcome.success);
    let key = resource_info(&ArtifactKey::new("demo", "g1", "42"), "img", "2.png").key;
    assert_eq!(data.get_bytes(&key).unwrap(), b"second bytes");
}

#[tokio::test]
async fn tool_without_any_capability_is_a_configuration_error() {
    let (_, _, validation) = broken_session(two_resource_artifact()).await;
    let registry = registry_of(two_resource_artifact(), false, false);
    assert!(
        validation
            .to_repair()
            .repair(&registry, &[profile()], Some("SHA256"))
            .await
            .is_err()
    );
}

#[tokio::test]
async fn profiles_without_failures_are_not_visited() {
    let (_, _, validation) = broken_session(two_resource_artifact()).await;
    let listed = VisitLog::default();
    let mut registry = ToolRegistry::new();
    let listed_c = listed.clone();
    registry.register("other", move || {
        MockTool::new("other").with_listed_log(listed_c.clone())
    });
    let artifacts = two_resource_artifact();
    registry.register("demo", move || {
        MockTool::new("demo").with_artifacts(artifacts.clone())
    });

    let other = ArtifactToolProfile::new("other", Some("g9"));
    let outcome = validation
        .to_repair()
        .repair(&registry, &[other, profile()], Some("SHA256"))
        .await
        .unwrap();
    assert!(outcome.success);
    assert!(listed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn validation_keeps_its_own_failure_set_after_handoff() {
    let (_, _, validation) = broken_session(two_resource_artifact()).await;
    let registry = registry_of(two_resource_artifact(), true, true);
    let outcome = validation
        .to_repair()
        .repair(&registry, &[profile()], Some("SHA256"))
        .await
        .unwrap();

    // Repair healed its copy; the validation engine still reports what it
    // found.
    assert!(outcome.success);
    assert_eq!(validation.resource_failures(), 2);
}
