//! Integration tests for the resolver over a real SQLite store
//!
//! Run with: cargo test --package doorkeep-storage --test integration_resolver

use std::time::Duration;

use doorkeep_core::{Credential, Error, NormalizedCode};
use doorkeep_storage::repositories::{AccessLogRepository, CredentialRepository};
use doorkeep_storage::{Database, DatabaseConfig, Resolver, SqliteCredentialStore};
use rstest::rstest;

async fn seeded_store() -> (Database, SqliteCredentialStore) {
    let db = Database::in_memory().await.unwrap();
    let store = SqliteCredentialStore::new(&db);
    store
        .credentials()
        .create(&Credential::new("u123", 42, "Alice"))
        .await
        .unwrap();
    store
        .credentials()
        .create(&Credential::new("u777", 7, "Bob"))
        .await
        .unwrap();
    (db, store)
}

#[tokio::test]
async fn test_resolve_then_record_writes_one_audit_entry() {
    let (db, store) = seeded_store().await;
    let resolver = Resolver::new(store);

    let credential = resolver.resolve(&NormalizedCode::new("u123")).await.unwrap();
    assert_eq!(credential.display_name, "Alice");
    assert_eq!(resolver.store().access_log().count().await.unwrap(), 0);

    resolver.record_access(&credential).await;

    let logged: Vec<(i64,)> = sqlx::query_as("SELECT identity_id FROM access_log")
        .fetch_all(db.pool())
        .await
        .unwrap();
    assert_eq!(logged, vec![(42,)]);
}

#[tokio::test]
async fn test_record_access_on_closed_store_is_silent() {
    let (db, store) = seeded_store().await;
    let resolver = Resolver::new(store);
    let credential = resolver.resolve(&NormalizedCode::new("u123")).await.unwrap();
    db.close().await;

    resolver.record_access(&credential).await;
}

#[rstest]
#[case::unknown("u999")]
#[case::prefix("u12")]
#[case::empty("")]
#[case::quoted("u123' OR '1'='1")]
#[tokio::test]
async fn test_non_matching_codes_are_not_found(#[case] code: &str) {
    let (_db, store) = seeded_store().await;
    let resolver = Resolver::new(store);

    let result = resolver.resolve(&NormalizedCode::new(code)).await;

    assert!(matches!(result, Err(Error::NotFound)));
    assert_eq!(resolver.store().access_log().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_duplicate_badge_resolves_to_oldest_row() {
    let (_db, store) = seeded_store().await;
    store
        .credentials()
        .create(&Credential::new("u123", 99, "Impostor"))
        .await
        .unwrap();
    let resolver = Resolver::new(store);

    let credential = resolver.resolve(&NormalizedCode::new("u123")).await.unwrap();

    assert_eq!(credential.identity_id, 42);
}

#[tokio::test]
async fn test_closed_store_is_unavailable() {
    let (db, store) = seeded_store().await;
    let resolver = Resolver::with_timeout(store, Duration::from_secs(1));
    db.close().await;

    let result = resolver.resolve(&NormalizedCode::new("u123")).await;

    assert!(matches!(result, Err(Error::StoreUnavailable { .. })));
}

#[tokio::test]
async fn test_resolves_repeatedly_on_same_pool() {
    let (_db, store) = seeded_store().await;
    let resolver = Resolver::new(store);

    for _ in 0..5 {
        let credential = resolver.resolve(&NormalizedCode::new("u777")).await.unwrap();
        resolver.record_access(&credential).await;
    }

    assert_eq!(resolver.store().access_log().count().await.unwrap(), 5);
}

#[tokio::test]
async fn test_file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doorkeep.db");
    let config = DatabaseConfig::new(path.to_string_lossy());

    {
        let db = Database::new(config.clone()).await.unwrap();
        SqliteCredentialStore::new(&db)
            .credentials()
            .create(&Credential::new("u555", 5, "Dana"))
            .await
            .unwrap();
        db.close().await;
    }

    let db = Database::new(config).await.unwrap();
    let resolver = Resolver::new(SqliteCredentialStore::new(&db));
    let credential = resolver.resolve(&NormalizedCode::new("u555")).await.unwrap();
    assert_eq!(credential.display_name, "Dana");
    db.close().await;
}

#[tokio::test]
async fn test_migration_idempotency() {
    let db = Database::in_memory().await.unwrap();

    db.migrate().await.unwrap();
    db.migrate().await.unwrap();

    let result: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN ('credentials', 'access_log')",
    )
    .fetch_one(db.pool())
    .await
    .unwrap();

    assert_eq!(result.0, 2);
    db.close().await;
}

#[tokio::test]
async fn test_concurrent_lookups() {
    let (db, _store) = seeded_store().await;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = SqliteCredentialStore::new(&db);
            tokio::spawn(async move {
                Resolver::new(store)
                    .resolve(&NormalizedCode::new("u123"))
                    .await
                    .map(|c| c.identity_id)
            })
        })
        .collect();

    for result in futures::future::join_all(handles).await {
        assert_eq!(result.unwrap().unwrap(), 42);
    }
    db.close().await;
}
