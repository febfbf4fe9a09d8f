//! Integration tests for the PostgreSQL record store.
//!
//! These tests require a real PostgreSQL database and use SQLx test macros
//! to ensure proper test isolation and cleanup.
//!
//! Run with: `DATABASE_URL=postgres://... cargo test --test postgres_integration -- --ignored`

use std::sync::Arc;

use chrono::{Duration, Utc};
use sqlx::Row;
use vessel_registry_repository::{
    PartitionedRecordStore, PostgresRecordStore, ScanRequest, VesselService, ViewName,
};
use vessel_registry_shared::{
    CategoryReference, PortReference, ScopeReference, Vessel, VesselId, Visibility,
};

/// Creates a test vessel with default values.
fn make_vessel(name: &str, visibility: Visibility, scope: &str) -> Vessel {
    Vessel::builder()
        .with_name(name)
        .with_category("Cargo")
        .with_visibility(visibility)
        .with_creation_scope(scope)
        .build()
        .unwrap()
}

fn setup(pool: sqlx::PgPool) -> (Arc<PostgresRecordStore>, VesselService) {
    let store = Arc::new(PostgresRecordStore::new(pool));
    let service = VesselService::new(store.clone());
    (store, service)
}

async fn count(pool: &sqlx::PgPool, table: &str) -> i64 {
    sqlx::query(&format!("SELECT COUNT(*) AS n FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap()
        .get::<i64, _>("n")
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore]
async fn test_add_writes_every_relevant_table(pool: sqlx::PgPool) {
    let (_, service) = setup(pool.clone());
    let vessel = make_vessel("Le_Name", Visibility::Global, "Le_center")
        .to_builder()
        .with_departure("brest", Utc::now() - Duration::hours(1))
        .build()
        .unwrap();

    let id = service.add(vessel.clone()).await.unwrap();

    assert_eq!(count(&pool, "vessels_by_uuid").await, 1);
    assert_eq!(count(&pool, "vessels").await, 1);
    assert_eq!(count(&pool, "vessels_by_departure_port").await, 1);

    let found = service.find(&id.to_string()).await.unwrap().unwrap();
    assert_eq!(found.without_id(), vessel);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore]
async fn test_scoped_listing_and_filters(pool: sqlx::PgPool) {
    let (_, service) = setup(pool);
    let global = service
        .add(make_vessel("Global ENT", Visibility::Global, "T"))
        .await
        .unwrap();
    let local = service
        .add(make_vessel("ENT Local", Visibility::Scoped, "S"))
        .await
        .unwrap();
    service
        .add(make_vessel("Hidden ENT", Visibility::Scoped, "T"))
        .await
        .unwrap();
    service
        .add(make_vessel("100%_cargo", Visibility::Global, "T"))
        .await
        .unwrap();

    let scope = ScopeReference::new("S");
    let mut found: Vec<VesselId> = service
        .find_by_name_fragment(&scope, "ent")
        .await
        .unwrap()
        .iter()
        .filter_map(|v| v.id())
        .collect();
    found.sort();
    let mut expected = vec![global, local];
    expected.sort();
    assert_eq!(found, expected);

    let wildcard = service.find_by_name_fragment(&scope, "%").await.unwrap();
    assert_eq!(wildcard.len(), 1);

    let cargo = service
        .find_by_category(&scope, &CategoryReference::new("Cargo"))
        .await
        .unwrap();
    assert_eq!(cargo.len(), 3);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore]
async fn test_recent_departures(pool: sqlx::PgPool) {
    let (_, service) = setup(pool);
    for hours_ago in [1, 19, 21] {
        let vessel = make_vessel("Le_Name", Visibility::Global, "Le_center")
            .to_builder()
            .with_departure("P", Utc::now() - Duration::hours(hours_ago))
            .build()
            .unwrap();
        service.add(vessel).await.unwrap();
    }

    let recent = service
        .find_by_departure_port(&PortReference::new("P"))
        .await
        .unwrap();

    assert_eq!(recent.len(), 2);
    let first = recent[0].last_departure().unwrap().time();
    let second = recent[1].last_departure().unwrap().time();
    assert!(first < second);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore]
async fn test_update_removes_stale_scope_row(pool: sqlx::PgPool) {
    let (store, service) = setup(pool.clone());
    let id = service
        .add(make_vessel("Le_Name", Visibility::Scoped, "S"))
        .await
        .unwrap();

    let global = service
        .find(&id.to_string())
        .await
        .unwrap()
        .unwrap()
        .to_builder()
        .with_visibility(Visibility::Global)
        .build()
        .unwrap();
    service.update(global).await.unwrap();

    let under_s = store
        .scan(&ScanRequest::partition(ViewName::ByScope, "S"))
        .await
        .unwrap();
    assert!(under_s.is_empty());
    assert_eq!(count(&pool, "vessels").await, 1);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore]
async fn test_remove_clears_every_table(pool: sqlx::PgPool) {
    let (_, service) = setup(pool.clone());
    let vessel = make_vessel("Le_Name", Visibility::Scoped, "S")
        .to_builder()
        .with_departure("brest", Utc::now())
        .build()
        .unwrap();
    let id = service.add(vessel).await.unwrap();

    let removed = service.remove(&id.to_string()).await.unwrap();
    let removed_again = service.remove(&id.to_string()).await.unwrap();

    assert!(removed.is_some());
    assert!(removed_again.is_none());
    assert_eq!(count(&pool, "vessels_by_uuid").await, 0);
    assert_eq!(count(&pool, "vessels").await, 0);
    assert_eq!(count(&pool, "vessels_by_departure_port").await, 0);
}
