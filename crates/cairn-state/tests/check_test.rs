//! Agent check reconciliation tests against the recording store

mod common;

use cairn_state::{CheckDefinition, CheckState, StateError, TtlStatus};
use common::{Call, MemoryStore};

fn mem() -> CheckDefinition {
    CheckDefinition::new("mem")
        .with_ttl("15s")
        .with_notes("memory watchdog")
}

fn registrations(store: &MemoryStore) -> usize {
    store
        .calls()
        .iter()
        .filter(|c| matches!(c, Call::RegisterCheck(_)))
        .count()
}

// ============== Present ==============

#[tokio::test]
async fn test_present_registers_missing_check() {
    let store = MemoryStore::new();
    let result = CheckState::new(&store).present(&mem()).await.unwrap();

    assert!(result.changed);
    assert!(result.succeeded);
    assert_eq!(result.message, "Check \"mem\" created");
    assert_eq!(registrations(&store), 1);
    assert!(store.check("mem").is_some());
}

#[tokio::test]
async fn test_present_in_sync_registers_once_unchanged() {
    let store = MemoryStore::new().with_check(mem());
    let result = CheckState::new(&store).present(&mem()).await.unwrap();

    assert!(!result.changed);
    assert_eq!(result.message, "Check \"mem\" already in desired state");
    assert_eq!(registrations(&store), 1);
}

#[tokio::test]
async fn test_present_notes_drift() {
    let store = MemoryStore::new().with_check(mem());
    let result = CheckState::new(&store)
        .present(&mem().with_notes("swap watchdog"))
        .await
        .unwrap();

    assert!(result.changed);
    assert_eq!(result.message, "Check \"mem\" updated");
    assert_eq!(registrations(&store), 1);
}

#[tokio::test]
async fn test_present_script_check() {
    let store = MemoryStore::new();
    let desired = CheckDefinition::new("disk")
        .with_id("disk-root")
        .with_script("df -h /", "30s");
    let result = CheckState::new(&store).present(&desired).await.unwrap();

    assert!(result.changed);
    assert_eq!(
        store.calls()[0],
        Call::GetCheck("disk".to_string(), Some("disk-root".to_string()))
    );
    assert!(store.check("disk-root").is_some());
}

#[tokio::test]
async fn test_present_without_id_ignores_other_instance() {
    let store = MemoryStore::new().with_check(mem().with_id("mem-1"));
    let result = CheckState::new(&store).present(&mem()).await.unwrap();

    assert!(result.changed);
    assert_eq!(result.message, "Check \"mem\" created");
    assert_eq!(store.writes(), vec![Call::RegisterCheck("mem".to_string())]);
    assert!(store.check("mem").is_some());
    assert!(store.check("mem-1").is_some());
}

#[tokio::test]
async fn test_present_register_failure_after_lookup() {
    let store = MemoryStore::new().failing_writes("agent unavailable");
    let err = CheckState::new(&store).present(&mem()).await.unwrap_err();

    assert!(matches!(err, StateError::Store(_)));
    assert_eq!(
        store.calls(),
        vec![
            Call::GetCheck("mem".to_string(), None),
            Call::RegisterCheck("mem".to_string()),
        ]
    );
    assert!(store.check("mem").is_none());
}

// ============== Absent ==============

#[tokio::test]
async fn test_absent_missing_check_never_deregisters() {
    let store = MemoryStore::new();
    let result = CheckState::new(&store).absent("mem").await.unwrap();

    assert!(!result.changed);
    assert!(result.succeeded);
    assert_eq!(result.message, "Check \"mem\" already absent");
    assert!(store.writes().is_empty());
}

#[tokio::test]
async fn test_absent_deregisters_existing_check() {
    let store = MemoryStore::new().with_check(mem().with_id("mem-1"));
    let result = CheckState::new(&store).absent("mem").await.unwrap();

    assert!(result.changed);
    assert_eq!(result.message, "Check \"mem\" removed");
    assert_eq!(
        store.writes(),
        vec![Call::DeregisterCheck("mem-1".to_string())]
    );
}

#[tokio::test]
async fn test_absent_twice() {
    let store = MemoryStore::new().with_check(mem());
    let checks = CheckState::new(&store);

    assert!(checks.absent("mem").await.unwrap().changed);
    assert!(!checks.absent("mem").await.unwrap().changed);
}

// ============== TTL ==============

#[tokio::test]
async fn test_ttl_set_targets_check_directly() {
    let store = MemoryStore::new();
    let result = CheckState::new(&store)
        .ttl_set("mem", "warning", Some("75% used"))
        .await
        .unwrap();

    assert!(!result.changed);
    assert!(result.succeeded);
    assert_eq!(result.message, "Check set to warning");
    assert_eq!(
        store.calls(),
        vec![Call::SetCheckStatus(
            "mem".to_string(),
            TtlStatus::Warning,
            Some("75% used".to_string())
        )]
    );
}

#[tokio::test]
async fn test_ttl_set_status_is_case_sensitive() {
    let store = MemoryStore::new();
    let result = CheckState::new(&store)
        .ttl_set("mem", "Passing", None)
        .await
        .unwrap();

    assert!(!result.succeeded);
    assert!(store.calls().is_empty());
}

// ============== Store Failures ==============

#[tokio::test]
async fn test_store_error_propagates() {
    let store = MemoryStore::new().failing("503 Service Unavailable");
    let err = CheckState::new(&store).present(&mem()).await.unwrap_err();

    assert!(matches!(err, StateError::Store(_)));
    assert!(err.to_string().starts_with("store error:"));
}
