//! End-to-end archive lifecycle over the disk-backed data store:
//! dump, audit, corrupt, repair, re-audit.

use std::sync::Arc;
use vault_engine::{DumpEngine, RehashEngine, ToolConfig, ToolRegistry, ValidationEngine};
use vault_hash::ChecksumRegistry;
use vault_model::{
    ArtifactKey, ArtifactToolProfile, DumpOptions, profiles_from_str,
};
use vault_store::{DataStore, DiskDataStore, MemoryRegistrationStore, RegistrationStore};
use vault_test_utils::{MockArtifact, MockTool, artifact, resource_info};

fn catalog() -> Vec<MockArtifact> {
    let a42 = artifact("demo", "g1", "42");
    let a43 = artifact("demo", "g1", "43");
    vec![
        MockArtifact::new(a42.clone())
            .with_resource(resource_info(&a42.key, "img", "1.png"), "png payload 42")
            .with_resource(resource_info(&a42.key, "", "meta.json"), "{\"id\":42}"),
        MockArtifact::new(a43.clone())
            .with_resource(resource_info(&a43.key, "img", "1.png"), "png payload 43"),
    ]
}

fn registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register("demo", || MockTool::new("demo").with_artifacts(catalog()));
    registry
}

fn profiles() -> Vec<ArtifactToolProfile> {
    profiles_from_str(r#"[{"tool": "demo", "group": "g1", "options": {"depth": 1}}]"#).unwrap()
}

struct Session {
    config: ToolConfig,
    registration: Arc<MemoryRegistrationStore>,
    disk: DiskDataStore,
    _dir: tempfile::TempDir,
}

fn disk_session() -> Session {
    let dir = tempfile::tempdir().unwrap();
    let registration = Arc::new(MemoryRegistrationStore::new());
    let disk = DiskDataStore::new(dir.path()).unwrap();
    let config = ToolConfig::new(registration.clone(), Arc::new(disk.clone()));
    Session {
        config,
        registration,
        disk,
        _dir: dir,
    }
}

fn checksums() -> Arc<ChecksumRegistry> {
    Arc::new(ChecksumRegistry::new())
}

async fn dump_all(session: &Session) {
    DumpEngine::new(session.config.clone(), checksums())
        .dump_all(&registry(), &profiles(), &DumpOptions::default())
        .await
        .unwrap();
}

fn validator(session: &Session) -> ValidationEngine {
    ValidationEngine::new(session.config.clone(), checksums(), None).unwrap()
}

#[tokio::test]
async fn dump_then_validate_is_clean() {
    let session = disk_session();
    dump_all(&session).await;

    let mut validation = validator(&session);
    let result = validation
        .process_profiles(&registry(), &profiles())
        .await
        .unwrap();
    assert_eq!(result.artifacts, 2);
    assert_eq!(result.resources, 3);
    assert!(!validation.any_failed());
}

#[tokio::test]
async fn dump_writes_the_expected_disk_layout() {
    let session = disk_session();
    dump_all(&session).await;

    let key = resource_info(&ArtifactKey::new("demo", "g1", "42"), "img", "1.png").key;
    let path = session.disk.path_for(&key).unwrap();
    assert_eq!(std::fs::read(path).unwrap(), b"png payload 42");
}

#[tokio::test]
async fn corrupt_validate_repair_revalidate() {
    let session = disk_session();
    dump_all(&session).await;

    // Flip one byte of one stored file.
    let key = resource_info(&ArtifactKey::new("demo", "g1", "42"), "img", "1.png").key;
    let path = session.disk.path_for(&key).unwrap();
    let mut bytes = std::fs::read(&path).unwrap();
    bytes[0] ^= 0x01;
    std::fs::write(&path, &bytes).unwrap();

    let mut validation = validator(&session);
    validation
        .process_profiles(&registry(), &profiles())
        .await
        .unwrap();
    assert!(validation.any_failed());
    assert_eq!(validation.resource_failures(), 1);
    let failing = validation
        .failures()
        .get(&ArtifactKey::new("demo", "g1", "42"))
        .unwrap();
    assert_eq!(failing[0].key, key);

    let outcome = validation
        .to_repair()
        .repair(&registry(), &profiles(), Some("SHA256"))
        .await
        .unwrap();
    assert!(outcome.success);
    assert_eq!(std::fs::read(&path).unwrap(), b"png payload 42");

    let mut second = validator(&session);
    second
        .process_profiles(&registry(), &profiles())
        .await
        .unwrap();
    assert!(!second.any_failed());
}

#[tokio::test]
async fn deleted_content_is_detected_and_restored() {
    let session = disk_session();
    dump_all(&session).await;

    let key = resource_info(&ArtifactKey::new("demo", "g1", "43"), "img", "1.png").key;
    session.disk.delete(&key).await.unwrap();

    let mut validation = validator(&session);
    validation
        .process_profiles(&registry(), &profiles())
        .await
        .unwrap();
    assert_eq!(validation.resource_failures(), 1);

    let outcome = validation
        .to_repair()
        .repair(&registry(), &profiles(), Some("SHA256"))
        .await
        .unwrap();
    assert!(outcome.success);
    assert!(session.disk.exists(&key).await.unwrap());
}

#[tokio::test]
async fn incremental_redump_skips_known_artifacts() {
    let session = disk_session();
    dump_all(&session).await;

    let engine = DumpEngine::new(session.config.clone(), checksums());
    let second = engine
        .dump_all(&registry(), &profiles(), &DumpOptions::default())
        .await
        .unwrap();
    // Default mode is artifact-granular soft: both known full artifacts
    // are settled without refetching anything.
    assert_eq!(second.artifacts_skipped, 2);
    assert_eq!(second.resources_written, 0);
}

#[tokio::test]
async fn rehash_migrates_disk_archive_to_new_algorithm() {
    let session = disk_session();
    dump_all(&session).await;

    let result = RehashEngine::new(session.config.clone(), checksums())
        .rehash("SHA512")
        .await
        .unwrap();
    assert_eq!(result.rehashed, 3);
    assert!(result.failed.is_empty());

    // The migrated archive still validates clean.
    let mut validation = validator(&session);
    validation
        .process_profiles(&registry(), &profiles())
        .await
        .unwrap();
    assert!(!validation.any_failed());

    let key = resource_info(&ArtifactKey::new("demo", "g1", "42"), "", "meta.json").key;
    let stored = session
        .registration
        .try_get_resource(&key)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.checksum.unwrap().algorithm_id, "SHA512");
}
