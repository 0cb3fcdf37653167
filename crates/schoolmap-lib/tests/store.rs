use std::collections::HashSet;

use schoolmap_lib::{rank_by_distance, GeoPoint, NewSchool, SchoolStore, StoreConfig};
use tempfile::TempDir;

fn file_store(dir: &TempDir, pool_size: usize) -> SchoolStore {
    let config = StoreConfig::default()
        .with_path(dir.path().join("schools.db"))
        .with_pool_size(pool_size);
    SchoolStore::open(&config).expect("open store")
}

fn school(i: usize) -> NewSchool {
    let location = GeoPoint::new(i as f64, -(i as f64)).expect("valid point");
    NewSchool::new(format!("School {i}"), format!("{i} Elm Street"), location)
}

#[tokio::test]
async fn schema_bootstrap_can_run_repeatedly() {
    let dir = TempDir::new().expect("create temp dir");
    let store = file_store(&dir, 2);

    store.ensure_schema().await.expect("first bootstrap");
    store.ensure_schema().await.expect("second bootstrap");
    store.create(school(1)).await.expect("insert");
    store.ensure_schema().await.expect("bootstrap after insert");

    assert_eq!(store.list_all().await.expect("list").len(), 1);
}

#[tokio::test]
async fn records_survive_reopening_the_file() {
    let dir = TempDir::new().expect("create temp dir");
    let created = {
        let store = file_store(&dir, 1);
        store.ensure_schema().await.expect("bootstrap");
        store.create(school(3)).await.expect("insert")
    };

    let reopened = file_store(&dir, 1);
    reopened.ensure_schema().await.expect("bootstrap");
    assert_eq!(reopened.list_all().await.expect("list"), vec![created]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_get_unique_ids() {
    let dir = TempDir::new().expect("create temp dir");
    let store = file_store(&dir, 4);
    store.ensure_schema().await.expect("bootstrap");

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move { store.create(school(i)).await })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        let created = handle.await.expect("task joined").expect("insert succeeded");
        assert!(ids.insert(created.id), "duplicate id {}", created.id);
    }

    let all = store.list_all().await.expect("list");
    assert_eq!(all.len(), 10);
    let state = store.pool().state();
    assert_eq!(state.connections, 4);
    assert_eq!(state.idle_connections, 4);
}

#[tokio::test]
async fn listed_schools_rank_by_distance() {
    let store = SchoolStore::open_in_memory().expect("open store");
    store.ensure_schema().await.expect("bootstrap");

    for i in [5, 1, 3] {
        store.create(school(i)).await.expect("insert");
    }

    let origin = GeoPoint::new(0.0, 0.0).expect("origin");
    let ranked = rank_by_distance(origin, store.list_all().await.expect("list"));

    let names: Vec<_> = ranked.iter().map(|r| r.school.name.as_str()).collect();
    assert_eq!(names, vec!["School 1", "School 3", "School 5"]);
    assert!(ranked.iter().all(|r| r.distance >= 0.0));
}

#[tokio::test]
async fn invalid_pool_size_is_rejected() {
    let dir = TempDir::new().expect("create temp dir");
    let config = StoreConfig::default()
        .with_path(dir.path().join("schools.db"))
        .with_pool_size(0);
    let err = SchoolStore::open(&config).expect_err("zero-sized pool");
    assert!(err.to_string().contains("at least 1"));
}
