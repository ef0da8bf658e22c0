//! Consistency gaps of the index + record scheme.
//!
//! The registry performs independent reads and writes with no locking, so these tests pin down
//! what actually happens when operations interleave or a second write fails. They assert the
//! lossy outcome on purpose: if one of them starts failing, the registry gained coordination
//! and the expectation should be revisited.

use desci_registry::domain::project::{parse_index, record_key, INDEX_KEY};
use desci_registry::domain::{
    PresignedSigner, ProjectDraft, ProjectRegistry, RegistryError, RegistrySettings,
};
use desci_registry::{InMemoryKvStore, KeyValueStore};
use std::sync::Arc;
use std::time::Duration;

fn registry(store: Arc<InMemoryKvStore>) -> ProjectRegistry {
    ProjectRegistry::with_settings(
        store,
        RegistrySettings {
            decrypt_delay: Duration::ZERO,
            ..RegistrySettings::default()
        },
    )
}

#[tokio::test]
async fn concurrent_investments_lose_an_update() {
    let store = Arc::new(InMemoryKvStore::with_latency(Duration::from_millis(20)));
    let registry = registry(store.clone());
    let owner = PresignedSigner::connected("0xowner");
    let project = registry
        .create(ProjectDraft::new("Race", "two investors"), &owner)
        .await
        .unwrap();

    let alice = PresignedSigner::connected("0xalice");
    let bob = PresignedSigner::connected("0xbob");
    let (a, b) = tokio::join!(
        registry.invest(&project.id, 100, &alice),
        registry.invest(&project.id, 200, &bob)
    );

    // Both callers are told their investment was recorded...
    assert_eq!(a.unwrap().contributors.len(), 1);
    assert_eq!(b.unwrap().contributors.len(), 1);

    // ...but both read the record before either wrote it, so the later write replaced the earlier.
    let stored = registry.get(&project.id).await.unwrap();
    assert_eq!(stored.contributors.len(), 1, "lost update: only one contribution survives");
    assert_eq!(stored.contributors[0].address, "0xbob");
    assert_eq!(stored.contributors[0].percentage, 20.0);
}

#[tokio::test]
async fn sequential_investments_both_survive() {
    let store = Arc::new(InMemoryKvStore::with_latency(Duration::from_millis(5)));
    let registry = registry(store);
    let project = registry
        .create(ProjectDraft::new("Calm", "one at a time"), &PresignedSigner::connected("0xowner"))
        .await
        .unwrap();

    registry
        .invest(&project.id, 100, &PresignedSigner::connected("0xalice"))
        .await
        .unwrap();
    registry
        .invest(&project.id, 200, &PresignedSigner::connected("0xbob"))
        .await
        .unwrap();

    let stored = registry.get(&project.id).await.unwrap();
    assert_eq!(stored.contributors.len(), 2);
}

#[tokio::test]
async fn concurrent_creates_drop_an_index_entry() {
    let store = Arc::new(InMemoryKvStore::with_latency(Duration::from_millis(20)));
    let registry = registry(store.clone());
    let owner = PresignedSigner::connected("0xowner");

    let (a, b) = tokio::join!(
        registry.create(ProjectDraft::new("A", "first"), &owner),
        registry.create(ProjectDraft::new("B", "second"), &owner)
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    // Both records were committed.
    assert!(store.contains_key(&record_key(&a.id)).await);
    assert!(store.contains_key(&record_key(&b.id)).await);

    // Both appends started from the same empty index; the later write wins.
    let index = parse_index(&store.get_data(INDEX_KEY).await.unwrap()).unwrap();
    assert_eq!(index, vec![b.id.clone()]);

    let listed = registry.list().await.unwrap();
    assert_eq!(listed.len(), 1, "orphaned record is invisible to listings");
    assert_eq!(listed[0].id, b.id);
}

#[tokio::test]
async fn failed_index_write_leaves_orphan_record() {
    let store = Arc::new(InMemoryKvStore::new());
    let registry = registry(store.clone());
    let owner = PresignedSigner::connected("0xowner");

    store.fail_writes_to(INDEX_KEY).await;
    let err = registry
        .create(ProjectDraft::new("Orphan", "index write fails"), &owner)
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Store(_)));

    // The record write committed before the index write failed; nothing rolls it back.
    assert_eq!(store.write_count(), 1);
    assert!(registry.list().await.unwrap().is_empty());

    store.clear_faults().await;
    let visible = registry
        .create(ProjectDraft::new("Visible", "index write succeeds"), &owner)
        .await
        .unwrap();
    let listed = registry.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, visible.id);
    assert_eq!(store.write_count(), 3);
}

#[tokio::test]
async fn rejected_record_write_changes_nothing() {
    let store = Arc::new(InMemoryKvStore::new());
    let registry = registry(store.clone());
    let owner = PresignedSigner::connected("0xowner");
    let project = registry
        .create(ProjectDraft::new("P", "d"), &owner)
        .await
        .unwrap();

    store.reject_writes_to(&record_key(&project.id)).await;
    let err = registry
        .invest(&project.id, 100, &PresignedSigner::connected("0xalice"))
        .await
        .unwrap_err();
    assert!(err.is_user_rejection());
    assert!(registry.get(&project.id).await.unwrap().contributors.is_empty());
}
